use crate::config::referral::ReferralConfig;
use crate::services::audit::AuditService;

pub use crate::db::DbConn;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub audit: AuditService,
    pub referral: ReferralConfig,
}

impl AppState {
    pub fn new(db: DbConn, audit: AuditService, referral: ReferralConfig) -> Self {
        Self {
            db,
            audit,
            referral,
        }
    }
}
