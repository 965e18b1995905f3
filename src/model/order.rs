use std::fmt;

use chrono::{DateTime, Utc};

use super::{
    ids::{BoosterId, MatchId, OrderId},
    rank::{BoostTarget, Rank},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    PaymentSubmitted,
    Paid,
    InProgress,
    Completed,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::PaymentSubmitted => "payment_submitted",
            OrderStatus::Paid => "paid",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(value: &str) -> Option<OrderStatus> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "payment_submitted" => Some(OrderStatus::PaymentSubmitted),
            "paid" => Some(OrderStatus::Paid),
            "in_progress" => Some(OrderStatus::InProgress),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            "rejected" => Some(OrderStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Top,
    Jungle,
    Mid,
    Bot,
    Support,
}

pub const LANES: [Lane; 5] = [Lane::Top, Lane::Jungle, Lane::Mid, Lane::Bot, Lane::Support];

impl Lane {
    pub fn name(&self) -> &'static str {
        match self {
            Lane::Top => "Top",
            Lane::Jungle => "Jungle",
            Lane::Mid => "Mid",
            Lane::Bot => "Bot",
            Lane::Support => "Support",
        }
    }

    pub fn from_name(name: &str) -> Option<Lane> {
        LANES.iter().find(|l| l.name().eq_ignore_ascii_case(name)).copied()
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Modifiers a customer can attach to a boost. Order of application during
/// pricing is fixed, see the rank-distance policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoostOptions {
    pub duo: bool,
    pub champion: Option<String>,
    pub lane: Option<Lane>,
    pub offline: bool,
    pub private_stream: bool,
}

/// Everything a price quote or an order creation request needs. Validated
/// by the pricing policies; the server recomputes the authoritative price.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub start: Rank,
    pub target: BoostTarget,
    pub options: BoostOptions,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub booster: Option<BoosterId>,
    pub intent: OrderIntent,
    pub status: OrderStatus,
    pub total_price: f64,
    pub current_rank: Option<Rank>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub id: MatchId,
    pub order: OrderId,
    pub champion: String,
    pub victory: bool,
    pub played_at: DateTime<Utc>,
}
