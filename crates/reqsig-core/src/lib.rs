//! Configuration, clock, and shared types for reqsig.
//!
//! This crate holds the pieces the signing pipeline in `reqsig-auth` consumes
//! but does not own: the verification policy loaded from the environment, the
//! wall-clock capability used for timestamps, and the configuration error type.

mod clock;
mod config;
mod error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DEFAULT_TIMESTAMP_GRACE_SECS, VerifyConfig};
pub use error::{ReqsigError, ReqsigResult};
