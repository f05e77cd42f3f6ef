pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_outlets;
mod m20261019_000002_create_customers;
mod m20261019_000003_create_referral_settings;
mod m20261019_000004_create_referral_codes;
mod m20261019_000005_create_pos_orders;
mod m20261019_000006_create_referral_rewards;
mod m20261019_000007_create_audit_logs;
mod m20261019_000008_create_referral_redemptions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_outlets::Migration),
            Box::new(m20261019_000002_create_customers::Migration),
            Box::new(m20261019_000003_create_referral_settings::Migration),
            Box::new(m20261019_000004_create_referral_codes::Migration),
            Box::new(m20261019_000005_create_pos_orders::Migration),
            Box::new(m20261019_000006_create_referral_rewards::Migration),
            Box::new(m20261019_000007_create_audit_logs::Migration),
            Box::new(m20261019_000008_create_referral_redemptions::Migration),
        ]
    }
}
