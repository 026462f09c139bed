use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::repo;

/// One audit record to append.
#[derive(Debug, Clone)]
pub struct Activity {
    pub actor: Option<Uuid>,
    pub actor_role: String,
    pub action: &'static str,
    pub case_ref: Option<String>,
    pub resource_ref: Option<String>,
    pub description: String,
}

impl Activity {
    pub fn new(actor: Uuid, actor_role: &str, action: &'static str, description: String) -> Self {
        Self {
            actor: Some(actor),
            actor_role: actor_role.to_string(),
            action,
            case_ref: None,
            resource_ref: None,
            description,
        }
    }

    pub fn case(mut self, case_ref: &str) -> Self {
        self.case_ref = Some(case_ref.to_string());
        self
    }

    pub fn resource(mut self, resource_ref: &str) -> Self {
        self.resource_ref = Some(resource_ref.to_string());
        self
    }
}

/// Fire-and-forget audit writer.
///
/// `record` spawns the INSERT on the runtime; a write failure is logged
/// at WARN and never surfaces to the request that produced it, so the
/// audit trail has no delivery guarantee.
#[derive(Clone)]
pub struct ActivityRecorder {
    pool: Pool<Postgres>,
}

impl ActivityRecorder {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn record(&self, entry: Activity) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            if let Err(e) = repo::activity::insert(
                &pool,
                entry.actor,
                &entry.actor_role,
                entry.action,
                entry.case_ref.as_deref(),
                entry.resource_ref.as_deref(),
                &entry.description,
            )
            .await
            {
                tracing::warn!(action = entry.action, error = %e, "activity log write failed");
            }
        });
    }
}
