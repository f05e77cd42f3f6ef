use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::db::DbConn;
use crate::error::Result;
use crate::models::audit_log::{self, AuditAction, ResourceType};

/// Audit service recording referral lifecycle events
#[derive(Clone)]
pub struct AuditService {
    db: DbConn,
}

/// One audit entry before it is written
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    pub outlet_id: Option<i64>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: AuditAction, resource_type: ResourceType) -> Self {
        Self {
            action,
            resource_type,
            resource_id: None,
            outlet_id: None,
            details: None,
        }
    }

    pub fn resource(mut self, id: impl ToString) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    pub fn outlet(mut self, outlet_id: i64) -> Self {
        self.outlet_id = Some(outlet_id);
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AuditService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Log an audit event
    pub async fn log(
        &self,
        event: AuditEvent,
        success: bool,
        error_message: Option<String>,
    ) -> Result<()> {
        let log_entry = audit_log::ActiveModel {
            timestamp: Set(chrono::Utc::now()),
            outlet_id: Set(event.outlet_id),
            action: Set(event.action.to_string()),
            resource_type: Set(event.resource_type.to_string()),
            resource_id: Set(event.resource_id),
            details: Set(event.details.map(|d| d.to_string())),
            success: Set(success),
            error_message: Set(error_message),
            ..Default::default()
        };

        log_entry.insert(&self.db).await?;
        Ok(())
    }

    /// Log a successful action. Audit write failures never fail the request.
    pub async fn log_success(&self, event: AuditEvent) {
        let action = event.action;
        if let Err(e) = self.log(event, true, None).await {
            tracing::warn!("Failed to write audit log for {}: {}", action, e);
        }
    }

    /// Log a refused or failed action
    pub async fn log_failure(&self, event: AuditEvent, error: &str) {
        let action = event.action;
        if let Err(e) = self.log(event, false, Some(error.to_string())).await {
            tracing::warn!("Failed to write audit log for {}: {}", action, e);
        }
    }
}

/// Query parameters for fetching audit logs
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub outlet_id: Option<i64>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub success: Option<bool>,
}

/// Paginated audit log response
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AuditLogResponse {
    pub logs: Vec<audit_log::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Get audit logs with filtering and pagination
pub async fn get_audit_logs(db: &DbConn, query: AuditLogQuery) -> Result<AuditLogResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(50).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut select = audit_log::Entity::find();

    if let Some(outlet_id) = query.outlet_id {
        select = select.filter(audit_log::Column::OutletId.eq(outlet_id));
    }

    if let Some(action) = &query.action {
        select = select.filter(audit_log::Column::Action.eq(action.clone()));
    }

    if let Some(resource_type) = &query.resource_type {
        select = select.filter(audit_log::Column::ResourceType.eq(resource_type.clone()));
    }

    if let Some(success) = query.success {
        select = select.filter(audit_log::Column::Success.eq(success));
    }

    let total = select.clone().count(db).await?;

    let logs = select
        .order_by_desc(audit_log::Column::Timestamp)
        .order_by_desc(audit_log::Column::Id)
        .offset(offset)
        .limit(per_page)
        .all(db)
        .await?;

    let total_pages = total.div_ceil(per_page);

    Ok(AuditLogResponse {
        logs,
        total,
        page,
        per_page,
        total_pages,
    })
}
