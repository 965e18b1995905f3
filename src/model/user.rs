use std::fmt;

use super::ids::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Booster,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Booster => "booster",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(value: &str) -> Option<Role> {
        match value {
            "client" => Some(Role::Client),
            "booster" => Some(Role::Booster),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}
