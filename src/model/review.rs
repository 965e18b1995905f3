use chrono::{DateTime, Utc};

use super::ids::{BoosterId, OrderId};

#[derive(Debug, Clone)]
pub struct Review {
    pub order: OrderId,
    pub booster: BoosterId,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
