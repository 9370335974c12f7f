//! Third-party capability interfaces.
//!
//! Handlers depend only on these traits. The shipped implementations return static
//! payloads and make no network calls.

pub mod cap_table;
pub mod financials;
pub mod verification;

pub use cap_table::{CapTableProvider, MockCapTableProvider};
pub use financials::{FinancialsProvider, MockFinancialsProvider};
pub use verification::{MockVerificationProvider, VerificationProvider};
