use chrono::Utc;
use rand::Rng;
use shared_types::UserRole;

/// Build a public composite identifier: `<prefix>-<millis>-<4-digit random>`.
/// These are the identifiers exposed to clients; the DB row UUID is
/// returned alongside them but never used in external references.
fn composite(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("{prefix}-{millis}-{suffix:04}")
}

pub fn new_case_id() -> String {
    composite("CASE")
}

pub fn new_evidence_id() -> String {
    composite("EV")
}

/// Role-scoped badge identifier issued at registration.
pub fn new_badge_id(role: UserRole) -> String {
    composite(role.badge_prefix())
}
