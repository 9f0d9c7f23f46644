//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission control loop and lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::{MissionEngine, TickOutcome};
use crate::record::MissionRecord;

/// Cloneable handle serialising ticks from several threads through one lock.
///
/// Each tick runs entirely under the lock, so tick numbers stay gapless and
/// voltage stays non-increasing whatever thread issues the tick.
#[derive(Debug, Clone)]
pub struct SharedMissionEngine {
    inner: Arc<Mutex<MissionEngine>>,
}

impl SharedMissionEngine {
    pub fn new(engine: MissionEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn tick(&self) -> TickOutcome {
        self.inner.lock().tick()
    }

    /// Run `f` against the engine while holding the lock.
    pub fn with_engine<T>(&self, f: impl FnOnce(&MissionEngine) -> T) -> T {
        f(&self.inner.lock())
    }

    /// Copy of the record taken under the lock.
    pub fn record_snapshot(&self) -> MissionRecord {
        self.inner.lock().record().clone()
    }
}

impl From<MissionEngine> for SharedMissionEngine {
    fn from(engine: MissionEngine) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use waialua_common::config::AppConfig;

    #[test]
    fn concurrent_ticks_stay_ordered() {
        let mut config = AppConfig::default();
        config.mission.decay_rate = 0.001;
        let engine = MissionEngine::builder(&config).seed(8).build().unwrap();
        let shared = SharedMissionEngine::new(engine);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.tick();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread");
        }

        assert_eq!(shared.with_engine(|engine| engine.ticks()), 100);
        let record = shared.record_snapshot();
        let samples = record.snapshot();
        assert_eq!(samples.len(), 100);
        for pair in samples.windows(2) {
            assert_eq!(pair[1].tick, pair[0].tick + 1);
            assert!(pair[1].voltage <= pair[0].voltage);
        }
    }
}
