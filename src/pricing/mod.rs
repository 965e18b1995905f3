use std::fmt;

use crate::model::{
    order::OrderIntent,
    pricing::PriceBreakdown,
    rank::{Rank, Tier},
};

pub mod bulk;
pub mod estimate;

pub use bulk::BulkTransitionPolicy;
pub use estimate::RankDistancePolicy;

/// One seam for every pricing strategy. Both client-side estimators
/// implement it; the server-authoritative price arrives through the API
/// instead and never goes through here.
pub trait PricingPolicy {
    fn name(&self) -> &'static str;

    fn quote(&self, intent: &OrderIntent) -> Result<PriceBreakdown, PricingError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Target must sit strictly above the start by ladder position.
    InvalidRange { start: Rank, end: Rank },
    /// Rank targets into apex tiers are priced by wins, not divisions.
    ApexRankTarget(Tier),
    /// Win targets only make sense inside an apex tier.
    NonApexWinTarget(Tier),
    InvalidWinCount,
    /// No bulk prices saved yet; distinct from any network failure.
    ConfigurationRequired,
    /// Bulk prices exist but do not cover this tier.
    MissingConfiguration(Tier),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PricingError::InvalidRange { start, end } => {
                write!(f, "Target rank {} must be above the current rank {}", end, start)
            }
            PricingError::ApexRankTarget(tier) => {
                write!(f, "{} is an apex tier, choose a win count instead of a division", tier)
            }
            PricingError::NonApexWinTarget(tier) => {
                write!(f, "Win targets are only available for apex tiers, not {}", tier)
            }
            PricingError::InvalidWinCount => write!(f, "Win count must be at least 1"),
            PricingError::ConfigurationRequired => {
                write!(f, "No bulk pricing configuration saved yet")
            }
            PricingError::MissingConfiguration(tier) => {
                write!(f, "Bulk pricing configuration does not cover {}", tier)
            }
        }
    }
}
