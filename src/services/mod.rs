pub mod audit;
pub mod calculator;
pub mod code_generator;
pub mod failure;
pub mod ledger;
pub mod orders;
pub mod redemption;
pub mod settings;

pub use audit::{AuditEvent, AuditService};
pub use failure::{FailureBody, ReferralFailure};
pub use redemption::RedemptionOutcome;
