//! Summary statistics over a file of weather station readings.
//!
//! Every non-blank line of the file is one [`Reading`]; [`WeatherFile::process`]
//! averages temperature, humidity, pressure and wind speed over all of them and
//! picks the wind direction seen most often. A single bad line aborts the whole
//! computation.

use std::{
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

mod direction;
mod error;
mod reading;

pub use direction::{direction_to_degrees, Direction, UnknownDirection};
pub use error::{AggregateError, ErrorKind, Result};
pub use reading::{ParseReadingError, Reading, ReadingErrorKind};

/// A file of readings. Nothing is read until [`WeatherFile::process`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherFile {
    path: PathBuf,
}

impl WeatherFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn process(&self) -> Result<Summary> {
        let file = File::open(&self.path).map_err(|source| AggregateError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "processing weather file");

        summarize(BufReader::new(file), &self.path)
    }
}

/// Parses and aggregates every line of `reader`. `origin` only names the input
/// in errors.
pub fn summarize(reader: impl BufRead, origin: &Path) -> Result<Summary> {
    let mut accumulator = Accumulator::default();

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let number = index + 1;
        let bytes = bytes.map_err(|source| AggregateError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        let line = std::str::from_utf8(&bytes)
            .map_err(|e| AggregateError::not_utf8(origin, number, &bytes, e))?;

        let line = line.trim();
        if line.is_empty() {
            trace!(line = number, "skipping blank line");
            continue;
        }

        let reading: Reading = line
            .parse()
            .map_err(|e| AggregateError::bad_line(origin, number, line, e))?;
        trace!(line = number, station = %reading.station, "parsed reading");

        accumulator.add(&reading);
    }

    let summary = accumulator.finish().ok_or_else(|| AggregateError::NoReadings {
        path: origin.to_path_buf(),
    })?;
    debug!(
        path = %origin.display(),
        readings = summary.readings,
        temperature = summary.temperature,
        humidity = summary.humidity,
        pressure = summary.pressure,
        wind_speed = summary.wind_speed,
        wind_direction = %summary.wind_direction,
        "summarized readings"
    );

    Ok(summary)
}

/// The compass point seen most often.
///
/// When several directions share the highest count, the one with the lowest
/// heading wins (N before E before S before W). Returns `None` when there is
/// nothing to choose from.
pub fn predominant_direction(frequencies: &BTreeMap<Direction, usize>) -> Option<Direction> {
    let mut best: Option<(Direction, usize)> = None;
    for (&direction, &count) in frequencies {
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((direction, count));
        }
    }
    best.map(|(direction, _)| direction)
}

/// Running totals for one pass over a file.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    temperature: f64,
    humidity: f64,
    pressure: f64,
    wind_speed: f64,
    count: usize,
    // Invariant: the counts sum up to `count`
    directions: BTreeMap<Direction, usize>,
}

impl Accumulator {
    pub fn add(&mut self, reading: &Reading) {
        self.temperature += reading.temperature;
        self.humidity += reading.humidity;
        self.pressure += reading.pressure;
        self.wind_speed += reading.wind_speed;
        *self.directions.entry(reading.wind_direction).or_default() += 1;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn frequencies(&self) -> &BTreeMap<Direction, usize> {
        &self.directions
    }

    /// `None` if no reading was ever added.
    pub fn finish(&self) -> Option<Summary> {
        debug_assert_eq!(self.count, self.directions.values().sum::<usize>());

        let wind_direction = predominant_direction(&self.directions)?;
        let count = self.count as f64;

        Some(Summary {
            temperature: self.temperature / count,
            humidity: self.humidity / count,
            pressure: self.pressure / count,
            wind_speed: self.wind_speed / count,
            wind_direction,
            readings: self.count,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: Direction,

    /// Number of lines that went into the averages.
    pub readings: usize,
}

impl Summary {
    pub fn wind_direction_degrees(&self) -> f64 {
        self.wind_direction.degrees()
    }

    /// `(temperature, humidity, pressure, wind speed, wind direction in degrees)`
    pub fn into_tuple(self) -> (f64, f64, f64, f64, f64) {
        self.into()
    }
}

impl From<Summary> for (f64, f64, f64, f64, f64) {
    fn from(summary: Summary) -> Self {
        (
            summary.temperature,
            summary.humidity,
            summary.pressure,
            summary.wind_speed,
            summary.wind_direction_degrees(),
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Readings: {}", self.readings)?;
        writeln!(f, "Mean temperature: {:.2}", self.temperature)?;
        writeln!(f, "Mean humidity: {:.2}", self.humidity)?;
        writeln!(f, "Mean pressure: {:.2}", self.pressure)?;
        writeln!(f, "Mean wind speed: {:.2}", self.wind_speed)?;
        write!(
            f,
            "Predominant wind direction: {} ({}°)",
            self.wind_direction,
            self.wind_direction_degrees()
        )
    }
}
