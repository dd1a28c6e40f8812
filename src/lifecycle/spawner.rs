//! # Staggered Activation
//!
//! [`spawn_batch`] activates a number of gems one after another, spaced by a
//! fixed interval, on its own Tokio task. The returned [`SpawnHandle`] stops
//! it early; gems already activated stay in the scene.

use crate::clients::PoolClient;
use crate::model::PoolId;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn, Instrument};

/// Handle to a running batch.
///
/// Dropping the handle cancels the batch as well.
pub struct SpawnHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<usize>,
}

impl SpawnHandle {
    /// Stops further activations. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the batch to end and returns how many gems it activated.
    pub async fn finish(self) -> Result<usize, JoinError> {
        let SpawnHandle { cancel, task } = self;
        // The sender must outlive the wait, or the batch reads its drop as a cancel.
        let activated = task.await;
        drop(cancel);
        activated
    }
}

/// Starts activating `count` gems from `pool_id`, one per `interval`.
///
/// The first gem is activated right away. A zero interval activates the whole
/// batch back to back. The batch ends early when cancelled, when the pool is
/// disabled, or when the pool actor is gone.
pub fn spawn_batch(
    pool: PoolClient,
    pool_id: PoolId,
    count: usize,
    interval: Duration,
) -> SpawnHandle {
    let (cancel, mut cancelled) = oneshot::channel::<()>();
    let span = tracing::info_span!("spawn_batch", %pool_id, count);

    let task = tokio::spawn(
        async move {
            let mut activated = 0;
            for n in 0..count {
                if n > 0 {
                    if interval.is_zero() {
                        if !matches!(
                            cancelled.try_recv(),
                            Err(oneshot::error::TryRecvError::Empty)
                        ) {
                            info!(activated, "Batch cancelled");
                            return activated;
                        }
                    } else {
                        tokio::select! {
                            biased;
                            _ = &mut cancelled => {
                                info!(activated, "Batch cancelled");
                                return activated;
                            }
                            _ = tokio::time::sleep(interval) => {}
                        }
                    }
                }

                match pool.activate_one(pool_id).await {
                    Ok(Some(gem)) => {
                        activated += 1;
                        debug!(gem_id = %gem.id, activated, "Batch activation");
                    }
                    Ok(None) => {
                        debug!(activated, "Pool disabled; batch stopped");
                        return activated;
                    }
                    Err(e) => {
                        warn!(error = %e, activated, "Batch stopped");
                        return activated;
                    }
                }
            }
            info!(activated, "Batch complete");
            activated
        }
        .instrument(span),
    );

    SpawnHandle {
        cancel: Some(cancel),
        task,
    }
}
