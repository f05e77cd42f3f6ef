use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[schema(value_type = String)]
    pub timestamp: DateTimeUtc,
    pub outlet_id: Option<i64>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<String>, // JSON string for flexible data
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Audit action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    // Settings
    SettingsCreated,
    SettingsUpdated,

    // Code lifecycle
    CodeGenerated,
    CodeActivated,
    CodeDeactivated,

    // Redemption
    CodeRedeemed,
    RedemptionRejected,

    // Orders
    OrderCommitted,
    RewardCreated,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::SettingsCreated => write!(f, "settings_created"),
            AuditAction::SettingsUpdated => write!(f, "settings_updated"),
            AuditAction::CodeGenerated => write!(f, "code_generated"),
            AuditAction::CodeActivated => write!(f, "code_activated"),
            AuditAction::CodeDeactivated => write!(f, "code_deactivated"),
            AuditAction::CodeRedeemed => write!(f, "code_redeemed"),
            AuditAction::RedemptionRejected => write!(f, "redemption_rejected"),
            AuditAction::OrderCommitted => write!(f, "order_committed"),
            AuditAction::RewardCreated => write!(f, "reward_created"),
        }
    }
}

// Resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Settings,
    ReferralCode,
    Order,
    Reward,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Settings => write!(f, "settings"),
            ResourceType::ReferralCode => write!(f, "referral_code"),
            ResourceType::Order => write!(f, "order"),
            ResourceType::Reward => write!(f, "reward"),
        }
    }
}
