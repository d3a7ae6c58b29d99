/*
 * Responsibility
 * - GET /me: access middleware を通った principal を返す
 */
use axum::Json;

use crate::api::v1::{dto::authorize::MeResponse, extractors::AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        principal_id: ctx.principal_id,
    })
}
