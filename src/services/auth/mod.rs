pub mod claims;
pub mod error;
pub mod service;
pub mod token;

pub use claims::{Claims, Identity, Role};
pub use error::{AuthError, TokenError};
pub use service::AuthService;
pub use token::TokenCodec;
