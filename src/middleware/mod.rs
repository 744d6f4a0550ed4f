/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (bearer 検証 / role gate), cors, http (request-id/timeout/limit), security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
