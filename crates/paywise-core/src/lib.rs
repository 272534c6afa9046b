pub mod error;
pub mod types;

#[cfg(feature = "emi")]
pub mod emi;

#[cfg(feature = "sip")]
pub mod sip;

pub use error::PaywiseError;
pub use types::*;

/// Standard result type for all paywise operations
pub type PaywiseResult<T> = Result<T, PaywiseError>;
