/*
 * Responsibility
 * - Handler から見える「認可済みコンテキスト」の型
 * - middleware が Authorizer の Allow を受けて request extensions に格納する
 */

/// 認可済みリクエストに付与されるコンテキスト
///
/// - `principal_id` は検証済みトークンの `sub`
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub principal_id: String,
}

impl AuthCtx {
    pub fn new(principal_id: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
        }
    }
}
