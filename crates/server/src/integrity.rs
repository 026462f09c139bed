//! Periodic availability sweep over pinned evidence payloads.
//!
//! Asks the gateway whether each pinned hash is still reachable and logs
//! the stragglers. Reachability is all this checks; it is not a content
//! integrity proof.

use sqlx::{Pool, Postgres};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::pinning::PinningClient;
use crate::repo;

/// Spawn the background sweep. Runs forever on its own task.
pub fn spawn_integrity_sweep(
    pool: Pool<Postgres>,
    pinning: Arc<PinningClient>,
    interval_secs: u64,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // First tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            run_sweep(&pool, &pinning).await;
        }
    });
    info!(interval_secs, "integrity sweep scheduled");
}

async fn run_sweep(pool: &Pool<Postgres>, pinning: &PinningClient) {
    let pinned = match repo::evidence::list_pinned_hashes(pool).await {
        Ok(pinned) => pinned,
        Err(e) => {
            warn!(error = %e, "integrity sweep could not list pinned evidence");
            return;
        }
    };

    let total = pinned.len();
    let mut unreachable = 0usize;
    for (evidence_id, hash) in pinned {
        match pinning.check_availability(&hash).await {
            Ok(true) => {}
            Ok(false) => {
                unreachable += 1;
                warn!(%evidence_id, %hash, "pinned evidence unreachable at gateway");
            }
            Err(e) => {
                unreachable += 1;
                warn!(%evidence_id, %hash, error = %e, "availability check failed");
            }
        }
    }

    if unreachable == 0 {
        debug!(total, "integrity sweep complete, all pins reachable");
    } else {
        warn!(total, unreachable, "integrity sweep found unreachable pins");
    }
}
