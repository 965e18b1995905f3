use crate::model::{
    order::OrderIntent,
    pricing::{BreakdownCategory, BulkPricingConfig, PriceBreakdown, PriceTable},
    rank::{BoostTarget, Rank, Tier, LADDER},
};

use super::{PricingError, PricingPolicy};

/// Path-summing estimator over a booster's bulk configuration: remaining
/// division steps in the start tier, every fully traversed tier at its own
/// unit price, one transition fee per tier boundary crossed. An individual
/// per-pair override short-circuits the whole formula.
pub struct BulkTransitionPolicy {
    config: BulkPricingConfig,
    overrides: PriceTable,
}

impl BulkTransitionPolicy {
    pub fn new(config: BulkPricingConfig, overrides: PriceTable) -> Self {
        Self { config, overrides }
    }

    fn division_price(&self, tier: Tier) -> Result<f64, PricingError> {
        self.config
            .division_price(tier)
            .ok_or(PricingError::MissingConfiguration(tier))
    }

    fn transition_fee_into(&self, tier: Tier) -> Result<f64, PricingError> {
        self.config
            .transition_fee_into(tier)
            .ok_or(PricingError::MissingConfiguration(tier))
    }

    /// Every tier the path touches must be priced before any arithmetic
    /// happens; a partially saved configuration never yields a number.
    fn ensure_coverage(&self, start: Tier, end: Tier) -> Result<(), PricingError> {
        for tier in &LADDER[start.ordinal()..=end.ordinal()] {
            self.division_price(*tier)?;
            if *tier != start {
                self.transition_fee_into(*tier)?;
            }
        }
        Ok(())
    }
}

impl PricingPolicy for BulkTransitionPolicy {
    fn name(&self) -> &'static str {
        "bulk-transition"
    }

    fn quote(&self, intent: &OrderIntent) -> Result<PriceBreakdown, PricingError> {
        let start = intent.start;
        let end = match intent.target {
            BoostTarget::Rank(rank) => rank,
            BoostTarget::Wins { tier, .. } => return Err(PricingError::NonApexWinTarget(tier)),
        };

        if start.tier.is_apex() {
            return Err(PricingError::ApexRankTarget(start.tier));
        }
        if end.tier.is_apex() {
            return Err(PricingError::ApexRankTarget(end.tier));
        }
        if end.position() <= start.position() {
            return Err(PricingError::InvalidRange { start, end });
        }

        if let Some(price) = self.overrides.lookup(start, end) {
            let mut breakdown = PriceBreakdown::builder();
            breakdown.push(
                format!("Precio individual {} → {}", start, end),
                price,
                BreakdownCategory::Override,
            );
            return Ok(breakdown.finish(price));
        }

        if self.config.is_empty() {
            return Err(PricingError::ConfigurationRequired);
        }
        self.ensure_coverage(start.tier, end.tier)?;

        let mut breakdown = PriceBreakdown::builder();
        let mut total = 0.0;

        if end.tier == start.tier {
            let steps = end.division.index() - start.division.index();
            let amount = steps as f64 * self.division_price(start.tier)?;
            breakdown.push(
                format!("{} Divisiones en {}", steps, start.tier),
                amount,
                BreakdownCategory::Distance,
            );
            return Ok(breakdown.finish(amount));
        }

        // Climb out of the start tier.
        let start_steps = start.steps_to_tier_top();
        if start_steps > 0 {
            let amount = start_steps as f64 * self.division_price(start.tier)?;
            breakdown.push(
                format!("{} Divisiones en {}", start_steps, start.tier),
                amount,
                BreakdownCategory::Distance,
            );
            total += amount;
        }

        // Fully traversed tiers between start and end: entering costs the
        // transition fee, crossing costs the tier's own within-tier steps.
        let mut previous = start.tier;
        for tier in &LADDER[start.tier.ordinal() + 1..end.tier.ordinal()] {
            let fee = self.transition_fee_into(*tier)?;
            breakdown.push(
                format!("Transición {} → {}", previous, tier),
                fee,
                BreakdownCategory::Distance,
            );
            total += fee;

            let steps = tier.division_count() - 1;
            let amount = steps as f64 * self.division_price(*tier)?;
            breakdown.push(
                format!("{} Divisiones en {}", steps, tier),
                amount,
                BreakdownCategory::Distance,
            );
            total += amount;
            previous = *tier;
        }

        // Enter the end tier and climb to the requested division.
        let fee = self.transition_fee_into(end.tier)?;
        breakdown.push(
            format!("Transición {} → {}", previous, end.tier),
            fee,
            BreakdownCategory::Distance,
        );
        total += fee;

        let end_steps = end.division.index();
        if end_steps > 0 {
            let amount = end_steps as f64 * self.division_price(end.tier)?;
            breakdown.push(
                format!("{} Divisiones en {}", end_steps, end.tier),
                amount,
                BreakdownCategory::Distance,
            );
            total += amount;
        }

        Ok(breakdown.finish(total))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        order::BoostOptions,
        pricing::PriceTableEntry,
        rank::{Division, DIVISIONS},
    };

    use super::*;

    fn config() -> BulkPricingConfig {
        let mut config = BulkPricingConfig::default();
        config.division_prices.insert(Tier::Iron, 5.0);
        config.division_prices.insert(Tier::Bronze, 6.0);
        config.division_prices.insert(Tier::Silver, 7.0);
        config.transition_fees.insert(Tier::Bronze, 10.0);
        config.transition_fees.insert(Tier::Silver, 12.0);
        config
    }

    fn policy() -> BulkTransitionPolicy {
        BulkTransitionPolicy::new(config(), PriceTable::default())
    }

    fn rank_intent(start: Rank, end: Rank) -> OrderIntent {
        OrderIntent {
            start,
            target: BoostTarget::Rank(end),
            options: BoostOptions::default(),
        }
    }

    #[test]
    fn worked_example_from_the_configuration_page() {
        // Iron IV -> Bronze I: 3 * 5 + 10 + 3 * 6 = 43.
        let breakdown = policy()
            .quote(&rank_intent(
                Rank::new(Tier::Iron, Division::Four),
                Rank::new(Tier::Bronze, Division::One),
            ))
            .unwrap();
        assert_eq!(breakdown.total, 43.0);
    }

    #[test]
    fn same_tier_is_distance_times_unit_price_with_no_fee() {
        for (start_idx, end_idx) in [(0usize, 1usize), (0, 3), (1, 3)] {
            let breakdown = policy()
                .quote(&rank_intent(
                    Rank::new(Tier::Bronze, DIVISIONS[start_idx]),
                    Rank::new(Tier::Bronze, DIVISIONS[end_idx]),
                ))
                .unwrap();
            assert_eq!(breakdown.total, (end_idx - start_idx) as f64 * 6.0);
            assert!(!breakdown.entries.iter().any(|e| e.label.contains("Transición")));
        }
    }

    #[test]
    fn intervening_tiers_are_summed_with_their_inbound_fees() {
        // Iron IV -> Silver I: 3*5 + 10 + 3*6 + 12 + 3*7 = 76.
        let breakdown = policy()
            .quote(&rank_intent(
                Rank::new(Tier::Iron, Division::Four),
                Rank::new(Tier::Silver, Division::One),
            ))
            .unwrap();
        assert_eq!(breakdown.total, 76.0);
    }

    #[test]
    fn tier_boundary_alone_costs_only_the_transition_fee() {
        // Iron I -> Bronze IV: no division steps on either side.
        let breakdown = policy()
            .quote(&rank_intent(
                Rank::new(Tier::Iron, Division::One),
                Rank::new(Tier::Bronze, Division::Four),
            ))
            .unwrap();
        assert_eq!(breakdown.total, 10.0);
    }

    #[test]
    fn descending_or_equal_ranges_never_produce_a_price() {
        let policy = policy();
        let bronze_two = Rank::new(Tier::Bronze, Division::Two);
        assert!(matches!(
            policy.quote(&rank_intent(bronze_two, bronze_two)),
            Err(PricingError::InvalidRange { .. })
        ));
        assert!(matches!(
            policy.quote(&rank_intent(bronze_two, Rank::new(Tier::Iron, Division::One))),
            Err(PricingError::InvalidRange { .. })
        ));
    }

    #[test]
    fn empty_configuration_short_circuits() {
        let policy = BulkTransitionPolicy::new(BulkPricingConfig::default(), PriceTable::default());
        let result = policy.quote(&rank_intent(
            Rank::new(Tier::Iron, Division::Four),
            Rank::new(Tier::Iron, Division::One),
        ));
        assert_eq!(result, Err(PricingError::ConfigurationRequired));
    }

    #[test]
    fn partial_configuration_names_the_uncovered_tier() {
        let result = policy().quote(&rank_intent(
            Rank::new(Tier::Silver, Division::Four),
            Rank::new(Tier::Gold, Division::One),
        ));
        assert_eq!(result, Err(PricingError::MissingConfiguration(Tier::Gold)));
    }

    #[test]
    fn apex_tiers_are_outside_the_bulk_formula() {
        let result = policy().quote(&rank_intent(
            Rank::new(Tier::Diamond, Division::One),
            Rank::apex(Tier::Master),
        ));
        assert_eq!(result, Err(PricingError::ApexRankTarget(Tier::Master)));
    }

    #[test]
    fn individual_override_beats_the_formula() {
        let from = Rank::new(Tier::Iron, Division::Four);
        let to = Rank::new(Tier::Bronze, Division::One);
        let overrides = PriceTable {
            entries: vec![PriceTableEntry {
                from,
                to,
                price: 99.0,
            }],
        };
        let policy = BulkTransitionPolicy::new(config(), overrides);

        let breakdown = policy.quote(&rank_intent(from, to)).unwrap();
        assert_eq!(breakdown.total, 99.0);
        assert_eq!(breakdown.entries[0].category, BreakdownCategory::Override);

        // Any other pair still goes through the formula.
        let other = policy
            .quote(&rank_intent(from, Rank::new(Tier::Bronze, Division::Two)))
            .unwrap();
        assert_eq!(other.total, 3.0 * 5.0 + 10.0 + 2.0 * 6.0);
    }

    #[test]
    fn override_still_requires_a_valid_range() {
        let from = Rank::new(Tier::Bronze, Division::One);
        let to = Rank::new(Tier::Iron, Division::Four);
        let overrides = PriceTable {
            entries: vec![PriceTableEntry {
                from,
                to,
                price: 99.0,
            }],
        };
        let policy = BulkTransitionPolicy::new(config(), overrides);
        assert!(matches!(
            policy.quote(&rank_intent(from, to)),
            Err(PricingError::InvalidRange { .. })
        ));
    }
}
