use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::outlet;

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateOutlet {
    #[validate(length(min = 1, max = 100, message = "Outlet name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OutletResponse {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<outlet::Model> for OutletResponse {
    fn from(outlet: outlet::Model) -> Self {
        Self {
            id: outlet.id,
            name: outlet.name,
            created_at: outlet.created_at,
        }
    }
}
