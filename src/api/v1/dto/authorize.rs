/*
 * Responsibility
 * - POST /authorize の request/response DTO
 * - gateway の TOKEN authorizer イベント形式に合わせる
 */
use serde::{Deserialize, Serialize};

use crate::services::auth::decision::AuthorizerPolicy;

/// `{"type": "TOKEN", "authorizationToken": "Bearer ...", "methodArn": "..."}`
///
/// Only the header value is read; other members are accepted and ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    #[serde(default)]
    pub authorization_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AuthorizeResponse(pub AuthorizerPolicy);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub principal_id: String,
}
