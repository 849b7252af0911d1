use std::{fmt, str::FromStr};

use thiserror::Error;

/// The 16 points of the compass, clockwise from north.
///
/// The declaration order is the heading order, so the derived `Ord` sorts
/// directions by degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown wind direction: `{0}`")]
pub struct UnknownDirection(pub String);

impl Direction {
    pub const ALL: [Direction; 16] = [
        Self::N,
        Self::NNE,
        Self::NE,
        Self::ENE,
        Self::E,
        Self::ESE,
        Self::SE,
        Self::SSE,
        Self::S,
        Self::SSW,
        Self::SW,
        Self::WSW,
        Self::W,
        Self::WNW,
        Self::NW,
        Self::NNW,
    ];

    /// Angle between two neighbouring compass points.
    pub const STEP: f64 = 22.5;

    /// Heading in degrees, N = 0 and growing clockwise.
    pub fn degrees(self) -> f64 {
        self as usize as f64 * Self::STEP
    }

    /// Nearest compass point to an arbitrary heading.
    pub fn from_degrees(degrees: f64) -> Self {
        let heading = degrees.rem_euclid(360.0);
        let index = (heading / Self::STEP).round() as usize % Self::ALL.len();
        Self::ALL[index]
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NNE => "NNE",
            Self::NE => "NE",
            Self::ENE => "ENE",
            Self::E => "E",
            Self::ESE => "ESE",
            Self::SE => "SE",
            Self::SSE => "SSE",
            Self::S => "S",
            Self::SSW => "SSW",
            Self::SW => "SW",
            Self::WSW => "WSW",
            Self::W => "W",
            Self::WNW => "WNW",
            Self::NW => "NW",
            Self::NNW => "NNW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "N" => Ok(Self::N),
            "NNE" => Ok(Self::NNE),
            "NE" => Ok(Self::NE),
            "ENE" => Ok(Self::ENE),
            "E" => Ok(Self::E),
            "ESE" => Ok(Self::ESE),
            "SE" => Ok(Self::SE),
            "SSE" => Ok(Self::SSE),
            "S" => Ok(Self::S),
            "SSW" => Ok(Self::SSW),
            "SW" => Ok(Self::SW),
            "WSW" => Ok(Self::WSW),
            "W" => Ok(Self::W),
            "WNW" => Ok(Self::WNW),
            "NW" => Ok(Self::NW),
            "NNW" => Ok(Self::NNW),
            s => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// Converts a compass abbreviation (`"N"`, `"SSW"`, ...) to its heading in degrees.
pub fn direction_to_degrees(abbreviation: &str) -> Result<f64, UnknownDirection> {
    abbreviation.parse::<Direction>().map(Direction::degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_points() {
        assert_eq!(direction_to_degrees("N").unwrap(), 0.0);
        assert_eq!(direction_to_degrees("E").unwrap(), 90.0);
        assert_eq!(direction_to_degrees("S").unwrap(), 180.0);
        assert_eq!(direction_to_degrees("W").unwrap(), 270.0);
    }

    #[test]
    fn intermediate_points() {
        assert_eq!(direction_to_degrees("NNE").unwrap(), 22.5);
        assert_eq!(direction_to_degrees("NE").unwrap(), 45.0);
        assert_eq!(direction_to_degrees("ENE").unwrap(), 67.5);
        assert_eq!(direction_to_degrees("SSW").unwrap(), 202.5);
        assert_eq!(direction_to_degrees("NNW").unwrap(), 337.5);
    }

    #[test]
    fn every_abbreviation_maps_to_a_distinct_multiple_of_the_step() {
        let mut seen = Vec::new();
        for direction in Direction::ALL {
            let parsed: Direction = direction.abbreviation().parse().unwrap();
            assert_eq!(parsed, direction);

            let degrees = direction.degrees();
            assert!((0.0..360.0).contains(&degrees));
            assert_eq!(degrees % Direction::STEP, 0.0);
            assert!(!seen.contains(&degrees), "{direction} collides");
            seen.push(degrees);
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn unknown_abbreviations_are_rejected() {
        for bad in ["", "X", "NNNE", "n", "North"] {
            assert_eq!(
                direction_to_degrees(bad),
                Err(UnknownDirection(bad.to_string()))
            );
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(" SW ".parse::<Direction>(), Ok(Direction::SW));
    }

    #[test]
    fn nearest_point_from_degrees() {
        assert_eq!(Direction::from_degrees(0.0), Direction::N);
        assert_eq!(Direction::from_degrees(359.0), Direction::N);
        assert_eq!(Direction::from_degrees(-90.0), Direction::W);
        assert_eq!(Direction::from_degrees(100.0), Direction::E);
        assert_eq!(Direction::from_degrees(202.5), Direction::SSW);
        assert_eq!(Direction::from_degrees(720.0 + 45.0), Direction::NE);
    }

    #[test]
    fn ordering_follows_heading() {
        let mut sorted = Direction::ALL;
        sorted.sort_by(|l, r| l.degrees().total_cmp(&r.degrees()));
        assert_eq!(sorted, Direction::ALL);
        assert!(Direction::N < Direction::E);
    }
}
