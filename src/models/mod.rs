pub mod audit_log;
pub mod customer;
pub mod outlet;
pub mod pos_order;
pub mod referral_code;
pub mod referral_redemption;
pub mod referral_reward;
pub mod referral_setting;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::audit_log::{self, Entity as AuditLog};
    pub use super::customer::{self, Entity as Customer};
    pub use super::outlet::{self, Entity as Outlet};
    pub use super::pos_order::{self, Entity as PosOrder};
    pub use super::referral_code::{self, Entity as ReferralCode};
    pub use super::referral_redemption::{self, Entity as ReferralRedemption};
    pub use super::referral_reward::{self, Entity as ReferralReward};
    pub use super::referral_setting::{self, Entity as ReferralSetting};
}
