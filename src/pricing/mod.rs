//! Pricing access.
//!
//! # Data Flow
//! ```text
//! GET /api/pricing/status
//!     → handlers.rs (extract headers)
//!     → PricingVerifier (default: SessionCookieVerifier)
//!         → token.rs (find `pricing-session`, check HMAC + expiry)
//!     → {"verified": bool}
//! ```

pub mod handlers;
pub mod token;
pub mod verifier;

pub use handlers::PricingStatus;
pub use token::{issue_token, session_cookie, verify_token, TokenError, TokenStatus};
pub use verifier::{PricingVerifier, SessionCookieVerifier, VerifyError};
