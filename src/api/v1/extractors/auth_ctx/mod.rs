/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the verified request context (AuthContext) to handlers
 * - axum-specific code stays in extractor; the context type lives in types
 *
 * Public API:
 * - AuthContext
 * - AuthCtxExtractor
 */

mod extractor;
mod types;

pub use extractor::AuthCtxExtractor;
pub use types::AuthContext;
