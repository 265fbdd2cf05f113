use super::{SensorSnapshot, SensorSource};
use crate::domain::{DbdError, DbdResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

/// A half-written line is common right after the port opens.
const MAX_LINE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 9600,
            timeout_ms: 2_000,
        }
    }
}

/// Decodes one microcontroller frame: `temperature,humidity[,ozone_ppm]`.
pub fn parse_line(line: &str) -> DbdResult<SensorSnapshot> {
    let trimmed = line.trim();
    let values = trimmed
        .split(',')
        .map(|field| field.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| {
            DbdError::io_system(
                "IO.SERIAL_FRAME",
                format!("serial frame '{trimmed}' has a non-numeric field: {source}"),
            )
        })?;

    if !(2..=3).contains(&values.len()) {
        return Err(DbdError::io_system(
            "IO.SERIAL_FRAME",
            format!(
                "serial frame '{trimmed}' must carry 2 or 3 values, got {}",
                values.len()
            ),
        ));
    }
    if let Some(value) = values.iter().find(|value| !value.is_finite()) {
        return Err(DbdError::io_system(
            "IO.SERIAL_FRAME",
            format!("serial frame '{trimmed}' contains non-finite value {value}"),
        ));
    }

    Ok(SensorSnapshot {
        temperature_c: Some(values[0]),
        humidity_pct: Some(values[1]),
        ozone_ppm: values.get(2).copied(),
        ..SensorSnapshot::default()
    })
}

/// Line-oriented reader over any buffered byte stream; [`SerialLink::open`]
/// binds it to a real port.
pub struct SerialLink<R> {
    name: String,
    reader: R,
}

impl SerialLink<BufReader<Box<dyn serialport::SerialPort>>> {
    pub fn open(settings: &SerialSettings) -> DbdResult<Self> {
        if settings.port.trim().is_empty() {
            return Err(DbdError::input_validation(
                "INPUT.SERIAL_PORT",
                "no serial port configured",
            ));
        }
        let port = serialport::new(settings.port.as_str(), settings.baud_rate)
            .timeout(Duration::from_millis(settings.timeout_ms))
            .open()
            .map_err(|source| {
                DbdError::io_system(
                    "IO.SERIAL_OPEN",
                    format!(
                        "failed to open serial port '{}' at {} baud: {}",
                        settings.port, settings.baud_rate, source
                    ),
                )
            })?;
        tracing::info!(
            port = settings.port.as_str(),
            baud_rate = settings.baud_rate,
            "serial link opened"
        );
        Ok(Self::from_reader(settings.port.clone(), BufReader::new(port)))
    }
}

impl<R: BufRead> SerialLink<R> {
    pub fn from_reader(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    /// Next non-empty line, without its terminator.
    pub fn read_line(&mut self) -> DbdResult<String> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.reader.read_line(&mut line).map_err(|source| {
                let placeholder = if source.kind() == ErrorKind::TimedOut {
                    "IO.SERIAL_TIMEOUT"
                } else {
                    "IO.SERIAL_READ"
                };
                DbdError::io_system(
                    placeholder,
                    format!("failed to read from serial link '{}': {}", self.name, source),
                )
            })?;
            if read == 0 {
                return Err(DbdError::io_system(
                    "IO.SERIAL_CLOSED",
                    format!("serial link '{}' closed", self.name),
                ));
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }
    }
}

impl<R: BufRead> SensorSource for SerialLink<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_snapshot(&mut self) -> DbdResult<SensorSnapshot> {
        let mut last_error = None;
        for _ in 0..MAX_LINE_ATTEMPTS {
            let line = self.read_line()?;
            match parse_line(&line) {
                Ok(snapshot) => return Ok(snapshot.stamped(Utc::now())),
                Err(error) => {
                    tracing::debug!(line = line.as_str(), "skipping malformed serial frame");
                    last_error = Some(error);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            DbdError::internal("SYS.SERIAL_ATTEMPTS", "no serial frame attempts were made")
        }))
    }
}
