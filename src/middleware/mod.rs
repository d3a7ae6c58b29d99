/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: Authorization ヘッダ → Authorizer → AuthCtx
 * - http: request-id / trace / body limit / timeout
 */
pub mod auth;
pub mod http;
