//! Token issuance and verification.
//!
//! # Components
//!
//! - `claims` - Claims carried by a token and the scalar extra-claim values
//! - `clock` - Time source used for issued-at and expiry decisions
//! - `codec` - HS256 encode/decode with constant-time signature checks
//! - `validator` - Binds a decoded token to an expected identity

pub mod claims;
pub mod clock;
pub mod codec;
pub mod validator;

pub use claims::{ClaimValue, Claims, ExtraClaims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::TokenCodec;
pub use validator::TokenValidator;
