//! Referral failure taxonomy
//!
//! Every way a referral operation can be refused. Failures are ordinary values:
//! redemption and validity checks return them inside a structured result instead
//! of aborting the request.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralFailure {
    #[error("Referral system is disabled for this outlet")]
    FeatureDisabled,

    #[error("Order amount is below the minimum required for referral discounts")]
    BelowMinimumOrder,

    #[error("Referral code not found")]
    CodeNotFound,

    #[error("Referral code is not active")]
    CodeInactive,

    #[error("Referral code has expired")]
    CodeExpired,

    #[error("Referral code has reached maximum uses")]
    UsageLimitReached,

    #[error("Referral code already exists")]
    DuplicateCode,

    #[error("No referral configuration exists for this outlet")]
    NoOutletConfiguration,
}

impl ReferralFailure {
    /// Stable reason code, as serialized on the wire
    pub fn code(&self) -> &'static str {
        match self {
            ReferralFailure::FeatureDisabled => "FEATURE_DISABLED",
            ReferralFailure::BelowMinimumOrder => "BELOW_MINIMUM_ORDER",
            ReferralFailure::CodeNotFound => "CODE_NOT_FOUND",
            ReferralFailure::CodeInactive => "CODE_INACTIVE",
            ReferralFailure::CodeExpired => "CODE_EXPIRED",
            ReferralFailure::UsageLimitReached => "USAGE_LIMIT_REACHED",
            ReferralFailure::DuplicateCode => "DUPLICATE_CODE",
            ReferralFailure::NoOutletConfiguration => "NO_OUTLET_CONFIGURATION",
        }
    }

    /// Human-readable message shown at the till
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status used when the failure is raised as an `AppError`
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReferralFailure::CodeNotFound | ReferralFailure::NoOutletConfiguration => {
                StatusCode::NOT_FOUND
            }
            ReferralFailure::DuplicateCode => StatusCode::CONFLICT,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// `{success: false, reason, message}` body returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FailureBody {
    pub success: bool,
    pub reason: ReferralFailure,
    pub message: String,
}

impl From<ReferralFailure> for FailureBody {
    fn from(reason: ReferralFailure) -> Self {
        Self {
            success: false,
            reason,
            message: reason.message(),
        }
    }
}

impl std::fmt::Display for FailureBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.reason.code(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_match_serde() {
        for failure in [
            ReferralFailure::FeatureDisabled,
            ReferralFailure::BelowMinimumOrder,
            ReferralFailure::CodeNotFound,
            ReferralFailure::CodeInactive,
            ReferralFailure::CodeExpired,
            ReferralFailure::UsageLimitReached,
            ReferralFailure::DuplicateCode,
            ReferralFailure::NoOutletConfiguration,
        ] {
            let json = serde_json::to_value(failure).unwrap();
            assert_eq!(json, failure.code());
        }
    }

    #[test]
    fn test_failure_body() {
        let body = FailureBody::from(ReferralFailure::CodeExpired);
        assert!(!body.success);
        assert_eq!(body.message, "Referral code has expired");
        assert_eq!(body.to_string(), "CODE_EXPIRED: Referral code has expired");
    }
}
