/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /authorize は gateway 向け（常に 200 + policy を返す）
 * - /me は access middleware で保護する（Deny は 401）
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{authorize::authorize, me::me};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = access::apply(Router::new().route("/me", get(me)), state);

    Router::new()
        .route("/authorize", post(authorize))
        .merge(protected)
}
