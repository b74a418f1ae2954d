//! Presentation-state reconciliation.
//!
//! The stored display mode is the source of truth; the host's presentation
//! tree is a projection of it that other code can and does disturb. Rather
//! than chasing every possible disturbance with events, a recurring task
//! re-derives the projection at a fixed short interval and corrects any
//! drift it finds. Convergence is therefore bounded by one interval no
//! matter what mutated the markers.
//!
//! The switch-button label is refreshed on every tick whether or not drift
//! was detected; it always advertises the mode a press would move to.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::SiteMode;
use crate::storage::ModeStore;

/// Interval between enforcement ticks.
pub const ENFORCE_INTERVAL: Duration = Duration::from_millis(100);

/// Seam to the host's mode-dependent presentation.
///
/// Implementations are expected to be cheap: `applied_mode` is called every
/// tick, and `apply_mode` must be idempotent because drift detection can
/// race with external mutation and re-apply an already-correct mapping.
pub trait PresentationSurface: Send + Sync {
    /// Returns the mode the surface currently displays, `None` when no mode
    /// markers are present at all.
    fn applied_mode(&self) -> Option<SiteMode>;

    /// Applies the full mode-to-presentation mapping.
    fn apply_mode(&self, mode: SiteMode);

    /// Updates the switch-button label.
    fn set_switch_label(&self, label: &str);
}

/// Runs one enforcement tick against the surface.
///
/// Exposed separately from [`spawn`] so hosts can force a synchronous
/// enforcement (e.g. right after wiring up) and tests can drive ticks
/// directly.
pub fn enforce(store: &ModeStore, surface: &dyn PresentationSurface) {
    let mode = store.mode();

    surface.set_switch_label(mode.other().label());

    if surface.applied_mode() != Some(mode) {
        tracing::debug!(mode = ?mode, "presentation drift detected; reapplying mode");
        surface.apply_mode(mode);
    }
}

/// Spawns the recurring enforcement task.
///
/// The first tick fires immediately, so the surface reflects the stored mode
/// as soon as the engine starts. The task runs until `shutdown` is
/// cancelled.
pub fn spawn(
    store: Arc<ModeStore>,
    surface: Arc<dyn PresentationSurface>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ENFORCE_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tracing::debug!(interval = ?ENFORCE_INTERVAL, "reconciliation loop started");

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::debug!("reconciliation loop stopped");
                    break;
                }
                _ = ticker.tick() => enforce(&store, surface.as_ref()),
            }
        }
    })
}
