//! Authorization ヘッダ検証 → AuthCtx を extensions に入れる
//!
//! - ヘッダが無い場合は空文字列として Authorizer に渡す（結果は Deny）
//! - Deny は理由に関わらず同じ 401 を返す。失敗の種類はログにだけ残る
//!   （`Authorizer::authorize` 側で記録済み）

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// 保護したい Router に認可 middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let decision = state.authorizer.authorize(auth).await;
    if !decision.is_allow() {
        return Err(AppError::Unauthorized);
    }

    let auth_ctx = AuthCtx::new(decision.principal_id());

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
