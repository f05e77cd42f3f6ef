pub mod customer;
pub mod order;
pub mod outlet;
pub mod referral_code;
pub mod settings;

pub use customer::*;
pub use order::*;
pub use outlet::*;
pub use referral_code::*;
pub use settings::*;
