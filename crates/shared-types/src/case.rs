use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ── Validation constants ────────────────────────────────────────────

/// Valid case status values matching the DB CHECK constraint.
pub const CASE_STATUSES: &[&str] = &[
    "DRAFT",
    "REGISTERED",
    "PENDING_APPROVAL",
    "APPROVED",
    "IN_FORENSIC_ANALYSIS",
    "ANALYSIS_COMPLETE",
    "HEARING",
    "CLOSED",
];

/// Valid case priority values matching the DB CHECK constraint.
pub const CASE_PRIORITIES: &[&str] = &["LOW", "MEDIUM", "HIGH", "CRITICAL"];

/// Valid transfer request states. A case carries at most one active request.
pub const TRANSFER_STATUSES: &[&str] = &["PENDING", "APPROVED", "REJECTED"];

pub fn is_valid_case_status(s: &str) -> bool {
    CASE_STATUSES.contains(&s)
}

pub fn is_valid_case_priority(s: &str) -> bool {
    CASE_PRIORITIES.contains(&s)
}

// ── Status state machine ────────────────────────────────────────────

/// Case lifecycle status. `TRANSFER_APPROVED` and similar transient
/// markers are timeline entries only, never a case status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Draft,
    Registered,
    PendingApproval,
    Approved,
    InForensicAnalysis,
    AnalysisComplete,
    Hearing,
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Draft => "DRAFT",
            CaseStatus::Registered => "REGISTERED",
            CaseStatus::PendingApproval => "PENDING_APPROVAL",
            CaseStatus::Approved => "APPROVED",
            CaseStatus::InForensicAnalysis => "IN_FORENSIC_ANALYSIS",
            CaseStatus::AnalysisComplete => "ANALYSIS_COMPLETE",
            CaseStatus::Hearing => "HEARING",
            CaseStatus::Closed => "CLOSED",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(CaseStatus::Draft),
            "REGISTERED" => Some(CaseStatus::Registered),
            "PENDING_APPROVAL" => Some(CaseStatus::PendingApproval),
            "APPROVED" => Some(CaseStatus::Approved),
            "IN_FORENSIC_ANALYSIS" => Some(CaseStatus::InForensicAnalysis),
            "ANALYSIS_COMPLETE" => Some(CaseStatus::AnalysisComplete),
            "HEARING" => Some(CaseStatus::Hearing),
            "CLOSED" => Some(CaseStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status-mutating lifecycle actions. Each action has an explicit set of
/// allowed source statuses; a mutation from any other status is rejected
/// with a conflict instead of overwriting (a closed case can never be
/// silently reopened by an assignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseAction {
    SubmitDraft,
    SubmitForApproval,
    Approve,
    AssignForensic,
    CompleteAnalysis,
    AssignJudge,
    ScheduleHearing,
    SubmitVerdict,
}

impl CaseAction {
    /// Statuses from which this action may be taken.
    pub fn allowed_from(&self) -> &'static [CaseStatus] {
        use CaseStatus::*;
        match self {
            CaseAction::SubmitDraft => &[Draft],
            CaseAction::SubmitForApproval => &[Registered],
            CaseAction::Approve => &[Registered, PendingApproval],
            CaseAction::AssignForensic => &[Registered, PendingApproval, Approved],
            CaseAction::CompleteAnalysis => &[InForensicAnalysis],
            CaseAction::AssignJudge => &[
                Registered,
                PendingApproval,
                Approved,
                InForensicAnalysis,
                AnalysisComplete,
            ],
            CaseAction::ScheduleHearing => &[Hearing],
            CaseAction::SubmitVerdict => &[
                Registered,
                PendingApproval,
                Approved,
                InForensicAnalysis,
                AnalysisComplete,
                Hearing,
            ],
        }
    }

    /// Status the case lands in when the action succeeds.
    pub fn to_status(&self) -> CaseStatus {
        match self {
            CaseAction::SubmitDraft => CaseStatus::Registered,
            CaseAction::SubmitForApproval => CaseStatus::PendingApproval,
            CaseAction::Approve => CaseStatus::Approved,
            CaseAction::AssignForensic => CaseStatus::InForensicAnalysis,
            CaseAction::CompleteAnalysis => CaseStatus::AnalysisComplete,
            CaseAction::AssignJudge => CaseStatus::Hearing,
            CaseAction::ScheduleHearing => CaseStatus::Hearing,
            CaseAction::SubmitVerdict => CaseStatus::Closed,
        }
    }

    pub fn permits(&self, from: CaseStatus) -> bool {
        self.allowed_from().contains(&from)
    }

    /// Source statuses as DB strings, for `status = ANY($n)` guards.
    pub fn allowed_from_strs(&self) -> Vec<&'static str> {
        self.allowed_from().iter().map(|s| s.as_str()).collect()
    }
}

// ── DB row structs ──────────────────────────────────────────────────

/// An investigative case record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Case {
    pub id: Uuid,
    /// Human-readable composite identifier exposed to clients
    /// (`CASE-<millis>-<rand>`), distinct from the row UUID.
    pub case_id: String,
    pub title: String,
    pub description: String,
    pub case_number: String,
    pub location: String,
    pub priority: String,
    pub is_draft: bool,
    pub status: String,
    pub registered_by: Uuid,
    pub assigned_forensic: Option<Uuid>,
    pub assigned_judge: Option<Uuid>,
    pub police_station: String,
    pub transfer_status: Option<String>,
    pub transfer_to_station: Option<String>,
    pub transfer_requested_by: Option<Uuid>,
    pub transfer_requested_at: Option<DateTime<Utc>>,
    /// Set when case creation was mirrored on the ledger; approval
    /// requires it.
    pub ledger_case_id: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approval_tx_hash: Option<String>,
    pub verdict_decision: Option<String>,
    pub verdict_summary: Option<String>,
    pub verdict_by: Option<Uuid>,
    pub verdict_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// One entry in a case's append-only status timeline.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct CaseEvent {
    pub id: Uuid,
    pub case_id: Uuid,
    pub status: String,
    pub note: String,
    pub actor: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A scheduled hearing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Hearing {
    pub id: Uuid,
    pub case_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub notes: String,
    pub scheduled_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A free-text note attached to a case.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct CaseNote {
    pub id: Uuid,
    pub case_id: Uuid,
    pub author: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Valid party kinds matching the DB CHECK constraint.
pub const PARTY_KINDS: &[&str] = &["SUSPECT", "WITNESS"];

pub fn is_valid_party_kind(s: &str) -> bool {
    PARTY_KINDS.contains(&s)
}

/// A suspect or witness attached to a case.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct CaseParty {
    pub id: Uuid,
    pub case_id: Uuid,
    pub kind: String,
    pub full_name: String,
    pub description: String,
    pub contact: String,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// ── Request DTOs ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateCaseRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, max = 64, message = "case_number must be 1-64 characters"))]
    pub case_number: String,
    pub location: String,
    /// One of LOW, MEDIUM, HIGH, CRITICAL. Defaults to MEDIUM.
    pub priority: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    pub police_station: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateDraftRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub case_number: Option<String>,
    pub location: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct TransferRequestBody {
    #[validate(length(min = 1, message = "to_station must not be empty"))]
    pub to_station: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AssignRequest {
    /// UUID of the forensic analyst or judge being assigned.
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct VerdictRequest {
    #[validate(length(min = 1, message = "decision must not be empty"))]
    pub decision: String,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScheduleHearingRequest {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Wall-clock time, `HH:MM` (24h).
    pub time: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateCaseNoteRequest {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreatePartyRequest {
    /// SUSPECT or WITNESS.
    pub kind: String,
    #[validate(length(min = 1, message = "full_name must not be empty"))]
    pub full_name: String,
    pub description: Option<String>,
    pub contact: Option<String>,
}

// ── API response types ──────────────────────────────────────────────

/// API response shape for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CaseResponse {
    pub id: String,
    pub case_id: String,
    pub title: String,
    pub description: String,
    pub case_number: String,
    pub location: String,
    pub priority: String,
    pub is_draft: bool,
    pub status: String,
    pub registered_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_forensic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_judge: Option<String>,
    pub police_station: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_to_station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_case_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict_decision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict_summary: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
}

impl From<Case> for CaseResponse {
    fn from(c: Case) -> Self {
        Self {
            id: c.id.to_string(),
            case_id: c.case_id,
            title: c.title,
            description: c.description,
            case_number: c.case_number,
            location: c.location,
            priority: c.priority,
            is_draft: c.is_draft,
            status: c.status,
            registered_by: c.registered_by.to_string(),
            assigned_forensic: c.assigned_forensic.map(|u| u.to_string()),
            assigned_judge: c.assigned_judge.map(|u| u.to_string()),
            police_station: c.police_station,
            transfer_status: c.transfer_status,
            transfer_to_station: c.transfer_to_station,
            ledger_case_id: c.ledger_case_id,
            approval_tx_hash: c.approval_tx_hash,
            verdict_decision: c.verdict_decision,
            verdict_summary: c.verdict_summary,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
            closed_at: c.closed_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// API response shape for a timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TimelineEntryResponse {
    pub id: String,
    pub status: String,
    pub note: String,
    pub actor: String,
    pub created_at: String,
}

impl From<CaseEvent> for TimelineEntryResponse {
    fn from(e: CaseEvent) -> Self {
        Self {
            id: e.id.to_string(),
            status: e.status,
            note: e.note,
            actor: e.actor.to_string(),
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

/// API response shape for a hearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HearingResponse {
    pub id: String,
    pub scheduled_at: String,
    pub location: String,
    pub notes: String,
    pub scheduled_by: String,
}

impl From<Hearing> for HearingResponse {
    fn from(h: Hearing) -> Self {
        Self {
            id: h.id.to_string(),
            scheduled_at: h.scheduled_at.to_rfc3339(),
            location: h.location,
            notes: h.notes,
            scheduled_by: h.scheduled_by.to_string(),
        }
    }
}
