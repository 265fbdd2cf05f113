//! Live readings from the bench: a cloud real-time database document or a
//! microcontroller on a serial line, both behind [`SensorSource`].

pub mod cloud;
pub mod fallback;
pub mod serial;

pub use cloud::{CloudSettings, CloudStore};
pub use fallback::{FallbackReading, FallbackSource, ReadingOrigin};
pub use serial::{SerialLink, SerialSettings};

use crate::domain::DbdResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub captured_at: Option<DateTime<Utc>>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub nox_ppm: Option<f64>,
    pub co_ppm: Option<f64>,
    pub h2_ppm: Option<f64>,
    pub ozone_ppm: Option<f64>,
}

impl SensorSnapshot {
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = Some(at);
        self
    }

    pub fn has_readings(&self) -> bool {
        [
            self.temperature_c,
            self.humidity_pct,
            self.nox_ppm,
            self.co_ppm,
            self.h2_ppm,
            self.ozone_ppm,
        ]
        .iter()
        .any(Option::is_some)
    }
}

pub trait SensorSource {
    fn name(&self) -> &str;

    fn read_snapshot(&mut self) -> DbdResult<SensorSnapshot>;
}

impl<S> SensorSource for Box<S>
where
    S: SensorSource + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_snapshot(&mut self) -> DbdResult<SensorSnapshot> {
        (**self).read_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::SensorSnapshot;
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_snapshot_has_no_readings() {
        assert!(!SensorSnapshot::default().has_readings());
        let stamped = SensorSnapshot::default().stamped(
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0)
                .single()
                .expect("valid timestamp"),
        );
        assert!(!stamped.has_readings());
        assert!(stamped.captured_at.is_some());
    }

    #[test]
    fn any_field_counts_as_a_reading() {
        let snapshot = SensorSnapshot {
            h2_ppm: Some(0.4),
            ..SensorSnapshot::default()
        };
        assert!(snapshot.has_readings());
    }
}
