//! Closed value sets used by incident filters

use serde::{Deserialize, Serialize};

use super::filters::ValidationError;

/// Compass direction the fire came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }

    /// Parse an exact (case-sensitive) direction code
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidChoice {
                field: "direction",
                allowed: Self::ALL.iter().map(|d| d.as_str()).collect(),
            })
    }
}

/// Weapon class that produced the incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Artillery,
    Mortar,
    Mlrs,
    UavDrop,
    Other,
}

impl SourceType {
    pub const ALL: [SourceType; 5] = [
        Self::Artillery,
        Self::Mortar,
        Self::Mlrs,
        Self::UavDrop,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artillery => "ARTILLERY",
            Self::Mortar => "MORTAR",
            Self::Mlrs => "MLRS",
            Self::UavDrop => "UAV_DROP",
            Self::Other => "OTHER",
        }
    }

    /// Parse an exact (case-sensitive) source type code
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidChoice {
                field: "source_type",
                allowed: Self::ALL.iter().map(|t| t.as_str()).collect(),
            })
    }
}

/// Time bucket for series and heatmaps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Day,
    #[default]
    Week,
}

impl Bucket {
    /// Unit name as accepted by PostgreSQL `date_trunc`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            _ => Err(ValidationError::InvalidBucket),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_all() {
        for d in Direction::ALL {
            assert_eq!(Direction::parse(d.as_str()).unwrap(), d);
        }
    }

    #[test]
    fn test_direction_parse_is_case_sensitive() {
        let err = Direction::parse("ne").unwrap_err();
        assert_eq!(
            err.to_string(),
            "direction must be one of [N, NE, E, SE, S, SW, W, NW]"
        );
    }

    #[test]
    fn test_source_type_parse() {
        assert_eq!(SourceType::parse("UAV_DROP").unwrap(), SourceType::UavDrop);
        assert_eq!(SourceType::parse("MLRS").unwrap(), SourceType::Mlrs);
        let err = SourceType::parse("ROCKET").unwrap_err();
        assert_eq!(
            err.to_string(),
            "source_type must be one of [ARTILLERY, MORTAR, MLRS, UAV_DROP, OTHER]"
        );
    }

    #[test]
    fn test_source_type_serde_matches_codes() {
        for t in SourceType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!(Bucket::parse("day").unwrap(), Bucket::Day);
        assert_eq!(Bucket::parse("week").unwrap(), Bucket::Week);
        assert_eq!(Bucket::default(), Bucket::Week);
        assert!(matches!(
            Bucket::parse("month"),
            Err(ValidationError::InvalidBucket)
        ));
    }
}
