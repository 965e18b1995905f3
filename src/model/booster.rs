use super::ids::BoosterId;

/// A service provider account, as listed by the marketplace API.
/// Performance numbers are optional: a fresh booster has no history yet.
#[derive(Debug, Clone)]
pub struct Booster {
    pub id: BoosterId,
    pub display_name: String,
    pub rating: Option<f64>,
    pub win_rate: Option<f64>,
    pub avg_completion_hours: Option<f64>,
    pub completed_orders: u32,
    pub available: bool,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BoosterProfile {
    pub booster: Booster,
    pub bio: String,
    pub main_roles: Vec<String>,
}
