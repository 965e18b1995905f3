use std::fmt;

use chrono::{DateTime, Utc};
use json::JsonValue;

use crate::model::rank::{Division, Rank, Tier};

pub mod account;
pub mod booster;
pub mod order;
pub mod pricing;
pub mod review;
pub mod stats;

#[derive(Debug)]
pub enum ParsingError {
    InvalidType(String),
    UnknownValue(String, String),
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParsingError::InvalidType(field) => write!(f, "Unexpected type for field '{}'", field),
            ParsingError::UnknownValue(field, value) => {
                write!(f, "Unknown value '{}' for field '{}'", value, field)
            }
        }
    }
}

pub fn parse_rank(json: &JsonValue, field: &str) -> Result<Rank, ParsingError> {
    let tier_name = json["tier"]
        .as_str()
        .ok_or_else(|| ParsingError::InvalidType(format!("{}.tier", field)))?;
    let tier = Tier::from_name(tier_name)
        .ok_or_else(|| ParsingError::UnknownValue(format!("{}.tier", field), tier_name.to_string()))?;

    if tier.is_apex() {
        return Ok(Rank::apex(tier));
    }

    let division_label = json["division"]
        .as_str()
        .ok_or_else(|| ParsingError::InvalidType(format!("{}.division", field)))?;
    let division = Division::from_label(division_label).ok_or_else(|| {
        ParsingError::UnknownValue(format!("{}.division", field), division_label.to_string())
    })?;

    Ok(Rank::new(tier, division))
}

pub fn parse_timestamp(json: &JsonValue, field: &str) -> Result<DateTime<Utc>, ParsingError> {
    let raw = json.as_str().ok_or(ParsingError::InvalidType(field.into()))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ParsingError::UnknownValue(field.into(), raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_objects_parse_both_shapes() {
        let json = json::object! { tier: "Gold", division: "II" };
        let rank = parse_rank(&json, "rank").unwrap();
        assert_eq!(rank, Rank::new(Tier::Gold, Division::Two));

        // Apex ranks carry no division.
        let json = json::object! { tier: "Challenger" };
        let rank = parse_rank(&json, "rank").unwrap();
        assert_eq!(rank, Rank::apex(Tier::Challenger));
    }

    #[test]
    fn bad_tier_names_are_reported_with_the_field_path() {
        let json = json::object! { tier: "Wood", division: "II" };
        let err = parse_rank(&json, "startRank").unwrap_err();
        assert!(matches!(err, ParsingError::UnknownValue(field, _) if field == "startRank.tier"));
    }
}
