use json::JsonValue;

use crate::model::booster::{Booster, BoosterProfile};

use super::ParsingError;

pub fn parse_boosters(json: &JsonValue) -> Result<Vec<Booster>, ParsingError> {
    if let JsonValue::Array(array) = json {
        let mut boosters = Vec::new();
        for entry in array {
            boosters.push(parse_booster(entry)?);
        }
        return Ok(boosters);
    }

    Err(ParsingError::InvalidType("root".into()))
}

pub fn parse_booster(json: &JsonValue) -> Result<Booster, ParsingError> {
    let id = json["id"]
        .as_u64()
        .ok_or(ParsingError::InvalidType("id".into()))?;
    let display_name = json["displayName"]
        .as_str()
        .ok_or(ParsingError::InvalidType("displayName".into()))?;
    let completed_orders = json["completedOrders"]
        .as_u32()
        .ok_or(ParsingError::InvalidType("completedOrders".into()))?;
    let available = json["available"]
        .as_bool()
        .ok_or(ParsingError::InvalidType("available".into()))?;

    // Fresh boosters have no history; nulls are expected, wrong types are not.
    let rating = optional_f64(&json["rating"], "rating")?;
    let win_rate = optional_f64(&json["winRate"], "winRate")?;
    let avg_completion_hours = optional_f64(&json["avgCompletionHours"], "avgCompletionHours")?;

    let mut languages = Vec::new();
    for language in json["languages"].members() {
        languages.push(
            language
                .as_str()
                .ok_or(ParsingError::InvalidType("languages".into()))?
                .to_string(),
        );
    }

    Ok(Booster {
        id: id.into(),
        display_name: display_name.to_string(),
        rating,
        win_rate,
        avg_completion_hours,
        completed_orders,
        available,
        languages,
    })
}

pub fn parse_booster_profile(json: &JsonValue) -> Result<BoosterProfile, ParsingError> {
    let booster = parse_booster(json)?;
    let bio = json["bio"].as_str().unwrap_or_default().to_string();

    let mut main_roles = Vec::new();
    for role in json["mainRoles"].members() {
        main_roles.push(
            role.as_str()
                .ok_or(ParsingError::InvalidType("mainRoles".into()))?
                .to_string(),
        );
    }

    Ok(BoosterProfile {
        booster,
        bio,
        main_roles,
    })
}

fn optional_f64(value: &JsonValue, field: &str) -> Result<Option<f64>, ParsingError> {
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_f64()
        .map(Some)
        .ok_or(ParsingError::InvalidType(field.into()))
}
