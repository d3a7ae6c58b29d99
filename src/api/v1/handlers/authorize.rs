/*
 * Responsibility
 * - POST /authorize: gateway から呼ばれる TOKEN authorizer
 * - Allow/Deny どちらも 200 + policy document で返す（Deny の理由は返さない）
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    api::v1::dto::authorize::{AuthorizeRequest, AuthorizeResponse},
    error::AppError,
    state::AppState,
};

pub async fn authorize(
    State(state): State<AppState>,
    payload: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> Result<Json<AuthorizeResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request("INVALID_BODY", e.body_text()))?;

    let header = req.authorization_token.unwrap_or_default();
    let decision = state.authorizer.authorize(&header).await;

    Ok(Json(AuthorizeResponse(decision.policy())))
}
