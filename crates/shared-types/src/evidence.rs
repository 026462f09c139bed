use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ── Validation constants ────────────────────────────────────────────

/// Valid evidence status values matching the DB CHECK constraint.
pub const EVIDENCE_STATUSES: &[&str] = &[
    "UPLOADED",
    "PENDING_ANALYSIS",
    "ANALYZING",
    "ANALYSIS_COMPLETE",
    "VERIFIED",
    "IMMUTABLE",
];

/// Valid evidence type values matching the DB CHECK constraint.
pub const EVIDENCE_TYPES: &[&str] = &[
    "document", "photo", "video", "audio", "physical", "digital", "other",
];

/// Custody-chain action vocabulary.
pub const CUSTODY_ACTIONS: &[&str] = &[
    "UPLOADED",
    "ANALYSIS_SUBMITTED",
    "MARKED_IMMUTABLE",
    "AVAILABILITY_CHECKED",
];

pub fn is_valid_evidence_status(s: &str) -> bool {
    EVIDENCE_STATUSES.contains(&s)
}

pub fn is_valid_evidence_type(s: &str) -> bool {
    EVIDENCE_TYPES.contains(&s)
}

// ── DB row structs ──────────────────────────────────────────────────

/// An evidence artifact pinned to content-addressed storage.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Evidence {
    pub id: Uuid,
    /// Human-readable composite identifier (`EV-<millis>-<rand>`).
    pub evidence_id: String,
    pub case_id: Uuid,
    pub evidence_type: String,
    pub description: String,
    pub uploaded_by: Uuid,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    /// Content hash returned by the pinning service.
    pub ipfs_hash: String,
    pub gateway_url: String,
    /// SHA-256 of the uploaded bytes, computed server-side at upload.
    pub sha256: String,
    pub status: String,
    pub analysis_status: Option<String>,
    pub analysis_report: Option<String>,
    pub analysis_notes: Option<String>,
    pub analyzed_by: Option<Uuid>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub is_immutable: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One entry in an evidence item's append-only custody chain.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct CustodyEntry {
    pub id: Uuid,
    pub evidence_id: Uuid,
    pub action: String,
    pub actor: Uuid,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}

// ── Request DTOs ────────────────────────────────────────────────────

/// Analysis submission by the assigned forensic analyst.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct SubmitAnalysisRequest {
    #[validate(length(min = 1, message = "report must not be empty"))]
    pub report: String,
    pub notes: Option<String>,
}

// ── API response types ──────────────────────────────────────────────

/// API response shape for an evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EvidenceResponse {
    pub id: String,
    pub evidence_id: String,
    pub case_id: String,
    pub evidence_type: String,
    pub description: String,
    pub uploaded_by: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub ipfs_hash: String,
    pub gateway_url: String,
    pub sha256: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<String>,
    pub is_immutable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
    pub created_at: String,
}

impl From<Evidence> for EvidenceResponse {
    fn from(e: Evidence) -> Self {
        Self {
            id: e.id.to_string(),
            evidence_id: e.evidence_id,
            case_id: e.case_id.to_string(),
            evidence_type: e.evidence_type,
            description: e.description,
            uploaded_by: e.uploaded_by.to_string(),
            file_name: e.file_name,
            file_size: e.file_size,
            mime_type: e.mime_type,
            ipfs_hash: e.ipfs_hash,
            gateway_url: e.gateway_url,
            sha256: e.sha256,
            status: e.status,
            analysis_status: e.analysis_status,
            analysis_report: e.analysis_report,
            analyzed_by: e.analyzed_by.map(|u| u.to_string()),
            analyzed_at: e.analyzed_at.map(|d| d.to_rfc3339()),
            is_immutable: e.is_immutable,
            verified_at: e.verified_at.map(|d| d.to_rfc3339()),
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

/// Custody-chain entry with the actor's display identity resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct CustodyEntryResponse {
    pub id: Uuid,
    pub action: String,
    pub actor: Uuid,
    pub actor_username: String,
    pub actor_role: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}
