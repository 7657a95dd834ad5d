//! Periodic tick driver
//!
//! A tokio task calls `Engine::tick` once per interval for as long as the
//! owning session lives. Ticks are skipped entirely while the canvas has no
//! size. Late ticks are delayed, not bursted: the cadence is best effort and
//! drift is never compensated.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::engine::SharedEngine;

/// Shortest accepted tick period
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a running tick loop
///
/// Dropping the handle stops the loop after the current tick.
#[derive(Debug)]
pub struct Scheduler {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl Scheduler {
    /// Start ticking `engine` every `period`. Must be called inside a tokio runtime.
    pub fn spawn(engine: SharedEngine, period: Duration) -> Self {
        let (shutdown, rx) = oneshot::channel();
        let period = period.max(MIN_PERIOD);
        log::info!("Scheduler starting ({} ms period)", period.as_millis());
        let handle = tokio::spawn(run(engine, period, rx));
        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop future ticks and wait for the loop to exit
    ///
    /// Returns how many ticks the loop delivered. State is left as it was
    /// after the last tick.
    pub async fn stop(mut self) -> u64 {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.await {
            Ok(ticks) => ticks,
            Err(e) => {
                log::error!("Scheduler task failed: {e}");
                0
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn run(engine: SharedEngine, period: Duration, mut shutdown: oneshot::Receiver<()>) -> u64 {
    let mut timer = time::interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut delivered = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = timer.tick() => {
                if tick_if_ready(&engine) {
                    delivered += 1;
                }
            }
        }
    }

    log::info!("Scheduler stopped after {delivered} ticks");
    delivered
}

/// One synchronous step; the lock is never held across an await
fn tick_if_ready(engine: &SharedEngine) -> bool {
    let mut engine = engine.lock();
    if !engine.is_ready() {
        return false;
    }
    engine.tick();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::engine::Engine;
    use crate::sim::ScriptedSource;

    const PERIOD: Duration = Duration::from_millis(33);

    fn shared_ship() -> SharedEngine {
        Engine::with_random_source(GameConfig::spaceship(), ScriptedSource::default())
            .into_shared()
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_without_geometry() {
        let engine = shared_ship();
        let scheduler = Scheduler::spawn(engine.clone(), PERIOD);
        time::sleep(PERIOD * 20).await;
        assert!(scheduler.is_running());
        assert_eq!(scheduler.stop().await, 0);
        assert_eq!(engine.lock().state().time_ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_tick_per_period() {
        let engine = shared_ship();
        engine.lock().resize(200.0, 200.0, true);
        let scheduler = Scheduler::spawn(engine.clone(), PERIOD);
        time::sleep(PERIOD * 10).await;
        let delivered = scheduler.stop().await;
        assert!((9..=11).contains(&delivered), "delivered {delivered}");
        assert_eq!(engine.lock().state().time_ticks, delivered);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_start_once_resized() {
        let engine = shared_ship();
        let scheduler = Scheduler::spawn(engine.clone(), PERIOD);
        time::sleep(PERIOD * 5).await;
        assert_eq!(engine.lock().state().time_ticks, 0);

        engine.lock().resize(200.0, 200.0, false);
        time::sleep(PERIOD * 5).await;
        let delivered = scheduler.stop().await;
        assert!((4..=6).contains(&delivered), "delivered {delivered}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_ticks() {
        let engine = shared_ship();
        engine.lock().resize(200.0, 200.0, false);
        let scheduler = Scheduler::spawn(engine.clone(), PERIOD);
        time::sleep(PERIOD * 3).await;
        scheduler.stop().await;

        let frozen = engine.lock().state().time_ticks;
        time::sleep(PERIOD * 10).await;
        assert_eq!(engine.lock().state().time_ticks, frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_halts_ticks() {
        let engine = shared_ship();
        engine.lock().resize(200.0, 200.0, false);
        let scheduler = Scheduler::spawn(engine.clone(), PERIOD);
        time::sleep(PERIOD * 3).await;
        drop(scheduler);
        tokio::task::yield_now().await;

        let frozen = engine.lock().state().time_ticks;
        time::sleep(PERIOD * 10).await;
        assert_eq!(engine.lock().state().time_ticks, frozen);
    }
}
