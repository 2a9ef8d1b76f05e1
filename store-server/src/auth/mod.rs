//! Authentication module
//!
//! - [`JwtService`] - session token issuing and verification
//! - [`NonceBroker`] - out-of-band admin login handshake
//! - [`CurrentUser`] / [`AdminUser`] - request extractors

pub mod extractor;
pub mod jwt;
pub mod nonce;

pub use extractor::{AdminUser, CurrentUser};
pub use jwt::{ADMIN_TOKEN_TTL_HOURS, Claims, JwtConfig, JwtError, JwtService, ROLE_ADMIN, ROLE_USER};
pub use nonce::{Clock, NonceBroker, NonceError, SystemClock};
