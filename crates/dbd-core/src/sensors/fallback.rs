use super::{SensorSnapshot, SensorSource};
use crate::domain::DbdResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrigin {
    Live,
    LastKnown,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FallbackReading {
    pub snapshot: SensorSnapshot,
    pub origin: ReadingOrigin,
}

/// Never fails: a read error is logged and replaced by the last good
/// snapshot, or by `default` when nothing has been read yet.
pub struct FallbackSource<S> {
    inner: S,
    default: SensorSnapshot,
    last_good: Option<SensorSnapshot>,
    consecutive_failures: u32,
}

impl<S: SensorSource> FallbackSource<S> {
    pub fn new(inner: S, default: SensorSnapshot) -> Self {
        Self {
            inner,
            default,
            last_good: None,
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn read(&mut self) -> FallbackReading {
        match self.inner.read_snapshot() {
            Ok(snapshot) => {
                if self.consecutive_failures > 0 {
                    tracing::info!(
                        source = self.inner.name(),
                        failures = self.consecutive_failures,
                        "sensor source recovered"
                    );
                }
                self.consecutive_failures = 0;
                self.last_good = Some(snapshot);
                FallbackReading {
                    snapshot,
                    origin: ReadingOrigin::Live,
                }
            }
            Err(error) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                let reading = match self.last_good {
                    Some(snapshot) => FallbackReading {
                        snapshot,
                        origin: ReadingOrigin::LastKnown,
                    },
                    None => FallbackReading {
                        snapshot: self.default,
                        origin: ReadingOrigin::Default,
                    },
                };
                tracing::warn!(
                    source = self.inner.name(),
                    error = %error,
                    origin = ?reading.origin,
                    "sensor read failed, using fallback"
                );
                reading
            }
        }
    }
}

impl<S: SensorSource> SensorSource for FallbackSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read_snapshot(&mut self) -> DbdResult<SensorSnapshot> {
        Ok(self.read().snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::{FallbackSource, ReadingOrigin};
    use crate::domain::{DbdError, DbdResult};
    use crate::sensors::{SensorSnapshot, SensorSource};
    use std::collections::VecDeque;

    struct ScriptedSource {
        script: VecDeque<DbdResult<SensorSnapshot>>,
    }

    impl SensorSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn read_snapshot(&mut self) -> DbdResult<SensorSnapshot> {
            self.script.pop_front().unwrap_or_else(|| {
                Err(DbdError::io_system("IO.SCRIPT", "script exhausted"))
            })
        }
    }

    fn reading(temperature: f64) -> SensorSnapshot {
        SensorSnapshot {
            temperature_c: Some(temperature),
            ..SensorSnapshot::default()
        }
    }

    #[test]
    fn falls_back_to_default_then_last_known() {
        let default = reading(20.0);
        let mut source = FallbackSource::new(
            ScriptedSource {
                script: VecDeque::from(vec![
                    Err(DbdError::io_system("IO.SERIAL_TIMEOUT", "timed out")),
                    Ok(reading(31.0)),
                    Err(DbdError::io_system("IO.SERIAL_TIMEOUT", "timed out")),
                ]),
            },
            default,
        );

        let first = source.read();
        assert_eq!(first.origin, ReadingOrigin::Default);
        assert_eq!(first.snapshot, default);
        assert_eq!(source.consecutive_failures(), 1);

        let second = source.read();
        assert_eq!(second.origin, ReadingOrigin::Live);
        assert_eq!(second.snapshot.temperature_c, Some(31.0));
        assert_eq!(source.consecutive_failures(), 0);

        let third = source.read();
        assert_eq!(third.origin, ReadingOrigin::LastKnown);
        assert_eq!(third.snapshot.temperature_c, Some(31.0));
    }

    #[test]
    fn wrapped_source_never_errors() {
        let mut source = FallbackSource::new(
            ScriptedSource {
                script: VecDeque::new(),
            },
            SensorSnapshot::default(),
        );
        for _ in 0..3 {
            assert!(source.read_snapshot().is_ok());
        }
        assert_eq!(source.consecutive_failures(), 3);
        assert_eq!(source.name(), "scripted");
    }
}
