//! Auto-refresh ticker.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, trace};

use super::{Inner, Shell};

/// Spawn a task that re-runs the shell's search every `period`.
///
/// The first search happens one full period after spawning. The task holds
/// only a weak reference and exits once the shell is dropped. Aborting it
/// stops future ticks; searches it already dispatched run to completion
/// because each one is its own task.
pub(super) fn spawn_ticker(shell: Weak<Inner>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let Some(inner) = shell.upgrade() else {
                debug!("shell dropped, stopping auto-refresh");
                break;
            };
            trace!("auto-refresh tick");
            Shell { inner }.search().await;
        }
    })
}
