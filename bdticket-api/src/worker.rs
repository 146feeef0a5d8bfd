use chrono::Utc;
use tokio::time::{interval, Duration};
use tracing::{error, info};
use uuid::Uuid;

use bdticket_shared::activity::ActivityLog;

use crate::state::AppState;

/// Background sweep releasing expired seat locks. A pending booking
/// holds seats only until its lock window closes; past that the seats
/// go back on sale here instead of waiting for the next write.
pub async fn start_lock_sweeper(state: AppState) {
    let mut ticker = interval(Duration::from_secs(state.business_rules.lock_sweep_seconds));
    info!(
        "Lock sweeper started, sweeping every {}s",
        state.business_rules.lock_sweep_seconds
    );

    loop {
        ticker.tick().await;
        match sweep_expired_locks(&state).await {
            Ok(0) => {}
            Ok(released) => info!("Released {} expired seat locks", released),
            Err(e) => error!("Lock sweep failed: {}", e),
        }
    }
}

/// One sweep pass. Returns how many batches had their lock released.
pub async fn sweep_expired_locks(
    state: &AppState,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let now = Utc::now();
    let mut released = 0;

    for mut ticket in state.tickets.expired_locks(now).await? {
        if !ticket.expire_lock(now) {
            continue;
        }
        state.tickets.update_ticket(&ticket).await?;

        // Sweeper entries carry the nil user id.
        let entry = ActivityLog::record(
            Uuid::nil(),
            "lock_expired",
            format!("Seat lock expired on batch {}", ticket.batch_number),
            None,
        );
        state.activity.record_activity(&entry).await?;
        let _ = state.events_tx.send(entry.event());
        state.metrics.locks_expired.inc();
        released += 1;
    }

    Ok(released)
}
