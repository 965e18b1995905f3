use json::JsonValue;

use crate::model::user::{Profile, Role};

use super::ParsingError;

pub fn parse_profile(json: &JsonValue) -> Result<Profile, ParsingError> {
    let id = json["id"]
        .as_u64()
        .ok_or(ParsingError::InvalidType("id".into()))?;
    let email = json["email"]
        .as_str()
        .ok_or(ParsingError::InvalidType("email".into()))?;
    let display_name = json["displayName"]
        .as_str()
        .ok_or(ParsingError::InvalidType("displayName".into()))?;
    let role_raw = json["role"]
        .as_str()
        .ok_or(ParsingError::InvalidType("role".into()))?;
    let role =
        Role::from_str(role_raw).ok_or(ParsingError::UnknownValue("role".into(), role_raw.to_string()))?;

    Ok(Profile {
        id: id.into(),
        email: email.to_string(),
        display_name: display_name.to_string(),
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_rejects_unknown_roles() {
        let json = json::object! {
            id: 4, email: "ana@example.com", displayName: "Ana", role: "booster",
        };
        assert_eq!(parse_profile(&json).unwrap().role, Role::Booster);

        let json = json::object! {
            id: 4, email: "ana@example.com", displayName: "Ana", role: "superuser",
        };
        assert!(parse_profile(&json).is_err());
    }
}
