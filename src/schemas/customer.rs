use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::customer;

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateCustomer {
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub name: String,
    #[validate(length(max = 32, message = "Phone number is too long"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<customer::Model> for CustomerResponse {
    fn from(customer: customer::Model) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            phone: customer.phone,
            created_at: customer.created_at,
        }
    }
}
