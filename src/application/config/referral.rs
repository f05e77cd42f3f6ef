use std::env;

/// Default bound on code generation attempts before giving up with `DUPLICATE_CODE`
pub const DEFAULT_CODE_MAX_ATTEMPTS: u32 = 100;

/// Service-wide referral knobs (per-outlet values live in `referral_settings`)
#[derive(Debug, Clone)]
pub struct ReferralConfig {
    /// Maximum number of candidate codes tried per generation request
    /// (env: `POS_REFERRAL_CODE_MAX_ATTEMPTS`)
    pub code_max_attempts: u32,
}

impl ReferralConfig {
    pub fn from_env() -> Self {
        Self {
            code_max_attempts: env::var("POS_REFERRAL_CODE_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u32| *v > 0)
                .unwrap_or(DEFAULT_CODE_MAX_ATTEMPTS),
        }
    }
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            code_max_attempts: DEFAULT_CODE_MAX_ATTEMPTS,
        }
    }
}
