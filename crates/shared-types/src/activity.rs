use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Activity action vocabulary. One entry per significant mutation.
pub const ACTIVITY_ACTIONS: &[&str] = &[
    "USER_REGISTERED",
    "USER_LOGIN",
    "USER_APPROVED",
    "USER_SUSPENDED",
    "CASE_DRAFTED",
    "CASE_CREATED",
    "CASE_SUBMITTED",
    "CASE_APPROVED",
    "TRANSFER_REQUESTED",
    "TRANSFER_APPROVED",
    "TRANSFER_REJECTED",
    "FORENSIC_ASSIGNED",
    "JUDGE_ASSIGNED",
    "HEARING_SCHEDULED",
    "VERDICT_SUBMITTED",
    "EVIDENCE_UPLOADED",
    "ANALYSIS_SUBMITTED",
    "EVIDENCE_MARKED_IMMUTABLE",
];

pub fn is_valid_activity_action(s: &str) -> bool {
    ACTIVITY_ACTIONS.contains(&s)
}

/// One append-only audit-trail record. Write-only from the application's
/// perspective; read by admin audit views.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct ActivityLog {
    pub id: Uuid,
    pub actor: Option<Uuid>,
    pub actor_role: String,
    pub action: String,
    /// Public case identifier (`CASE-...`), when the action is case-scoped.
    pub case_ref: Option<String>,
    /// Public identifier of another touched resource (evidence, user).
    pub resource_ref: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// API response shape for an audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ActivityLogResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub actor_role: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_ref: Option<String>,
    pub description: String,
    pub created_at: String,
}

impl From<ActivityLog> for ActivityLogResponse {
    fn from(a: ActivityLog) -> Self {
        Self {
            id: a.id.to_string(),
            actor: a.actor.map(|u| u.to_string()),
            actor_role: a.actor_role,
            action: a.action,
            case_ref: a.case_ref,
            resource_ref: a.resource_ref,
            description: a.description,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Paged audit listing.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ActivitySearchResponse {
    pub entries: Vec<ActivityLogResponse>,
    pub total: i64,
}
