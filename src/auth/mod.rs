//! Authentication
//!
//! Passwordless email-code login: the OTP service issues and verifies codes,
//! the JWT service signs the resulting access tokens, and the extractor
//! turns bearer tokens back into a [`CurrentUser`] for handlers.

pub mod extractor;
pub mod jwt;
pub mod mailer;
pub mod otp;
pub mod throttle;

pub use extractor::{AdminUser, CurrentUser};
pub use jwt::{Claims, JwtConfig, JwtService};
pub use mailer::{LogMailer, Mailer};
pub use otp::{AuthToken, OtpService};
pub use throttle::{MemoryThrottle, ThrottleStore};
