use crate::model::{
    order::OrderIntent,
    pricing::{BreakdownCategory, PriceBreakdown},
    rank::BoostTarget,
};

use super::{PricingError, PricingPolicy};

// Product constants for the advisory estimate shown in the calculator.
// The server recomputes the real price; these only have to track it.
pub const BASE_FEE: f64 = 20.0;
pub const DIVISION_FEE: f64 = 8.0;
pub const TIER_FEE: f64 = 25.0;
pub const DIVISION_ADJUSTMENT_FEE: f64 = 4.0;
pub const WIN_FEE: f64 = 8.0;
pub const DUO_MULTIPLIER: f64 = 1.20;
pub const CHAMPION_FEE: f64 = 15.0;
pub const LANE_FEE: f64 = 10.0;
pub const OFFLINE_FEE: f64 = 10.0;
pub const STREAM_MULTIPLIER: f64 = 1.15;
pub const MINIMUM_PRICE: f64 = 20.0;

/// Coarse rank-distance estimator. Cross-tier boosts charge one flat
/// per-tier fee regardless of how many divisions each intervening tier
/// has; only the bulk policy walks the actual path.
pub struct RankDistancePolicy;

impl PricingPolicy for RankDistancePolicy {
    fn name(&self) -> &'static str {
        "rank-distance"
    }

    fn quote(&self, intent: &OrderIntent) -> Result<PriceBreakdown, PricingError> {
        let mut breakdown = PriceBreakdown::builder();
        let mut total;

        match intent.target {
            BoostTarget::Wins { tier, count } => {
                if !tier.is_apex() {
                    return Err(PricingError::NonApexWinTarget(tier));
                }
                if count == 0 {
                    return Err(PricingError::InvalidWinCount);
                }
                // Win pricing is independent of where the customer starts.
                total = count as f64 * WIN_FEE;
                breakdown.push(
                    format!("{} Victorias en {}", count, tier),
                    total,
                    BreakdownCategory::Distance,
                );
            }
            BoostTarget::Rank(end) => {
                let start = intent.start;
                if end.tier.is_apex() {
                    return Err(PricingError::ApexRankTarget(end.tier));
                }
                if end.position() <= start.position() {
                    return Err(PricingError::InvalidRange { start, end });
                }

                if end.tier == start.tier {
                    let steps = end.division.index() - start.division.index();
                    total = BASE_FEE + steps as f64 * DIVISION_FEE;
                    breakdown.push(
                        format!("{} Divisiones en {}", steps, start.tier),
                        total,
                        BreakdownCategory::Distance,
                    );
                } else {
                    let tier_diff = (end.tier.ordinal() - start.tier.ordinal()) as f64;
                    total = BASE_FEE + tier_diff * TIER_FEE;
                    breakdown.push(
                        format!("{} Tiers de {} a {}", tier_diff, start.tier, end.tier),
                        total,
                        BreakdownCategory::Distance,
                    );

                    // Division delta can be negative (e.g. Gold I -> Platinum IV).
                    let division_delta = end.division.index() as f64 - start.division.index() as f64;
                    let adjustment = division_delta * DIVISION_ADJUSTMENT_FEE;
                    breakdown.push("Ajuste de divisiones", adjustment, BreakdownCategory::Distance);
                    total += adjustment;
                }
            }
        }

        // Modifiers apply in fixed order: duo multiplier first, flat extras
        // next, the stream multiplier last over everything before it.
        if intent.options.duo {
            let surcharge = total * (DUO_MULTIPLIER - 1.0);
            breakdown.push("Modo Dúo (+20%)", surcharge, BreakdownCategory::Mode);
            total += surcharge;
        }
        if intent.options.champion.is_some() {
            breakdown.push("Campeón específico", CHAMPION_FEE, BreakdownCategory::Extra);
            total += CHAMPION_FEE;
        }
        if intent.options.lane.is_some() {
            breakdown.push("Selección de línea", LANE_FEE, BreakdownCategory::Extra);
            total += LANE_FEE;
        }
        if intent.options.offline {
            breakdown.push("Modo offline", OFFLINE_FEE, BreakdownCategory::Extra);
            total += OFFLINE_FEE;
        }
        if intent.options.private_stream {
            let surcharge = total * (STREAM_MULTIPLIER - 1.0);
            breakdown.push("Stream privado (+15%)", surcharge, BreakdownCategory::Extra);
            total += surcharge;
        }

        if total < MINIMUM_PRICE {
            breakdown.push("Precio mínimo", MINIMUM_PRICE - total, BreakdownCategory::Minimum);
            total = MINIMUM_PRICE;
        }

        Ok(breakdown.finish(total))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::model::{
        order::{BoostOptions, Lane, OrderIntent},
        rank::{BoostTarget, Division, Rank, Tier, DIVISIONS, LADDER},
    };

    use super::*;

    fn intent(start: Rank, target: BoostTarget, options: BoostOptions) -> OrderIntent {
        OrderIntent { start, target, options }
    }

    fn rank_intent(start: Rank, end: Rank) -> OrderIntent {
        intent(start, BoostTarget::Rank(end), BoostOptions::default())
    }

    fn quote(intent: &OrderIntent) -> PriceBreakdown {
        RankDistancePolicy.quote(intent).unwrap()
    }

    #[test]
    fn same_tier_example_from_the_calculator_page() {
        // Iron IV -> Iron I, solo, no extras: 20 + 3 * 8 = 44.
        let breakdown = quote(&rank_intent(
            Rank::new(Tier::Iron, Division::Four),
            Rank::new(Tier::Iron, Division::One),
        ));
        assert_eq!(breakdown.total, 44.0);
        assert_eq!(breakdown.entries.len(), 2);
        assert_eq!(breakdown.entries[0].label, "3 Divisiones en Iron");
        assert_eq!(breakdown.entries[0].amount, 44.0);
        assert_eq!(breakdown.entries[1].category, BreakdownCategory::Total);
    }

    #[test]
    fn apex_target_prices_wins_only() {
        for start in [
            Rank::new(Tier::Iron, Division::Four),
            Rank::new(Tier::Diamond, Division::One),
        ] {
            let breakdown = quote(&intent(
                start,
                BoostTarget::Wins {
                    tier: Tier::Master,
                    count: 10,
                },
                BoostOptions::default(),
            ));
            assert_eq!(breakdown.total, 10.0 * WIN_FEE);
        }
    }

    #[test]
    fn rank_target_into_apex_tier_is_rejected() {
        let result = RankDistancePolicy.quote(&rank_intent(
            Rank::new(Tier::Diamond, Division::One),
            Rank::apex(Tier::Master),
        ));
        assert_eq!(result, Err(PricingError::ApexRankTarget(Tier::Master)));
    }

    #[test]
    fn win_target_in_normal_tier_is_rejected() {
        let result = RankDistancePolicy.quote(&intent(
            Rank::new(Tier::Gold, Division::Four),
            BoostTarget::Wins {
                tier: Tier::Gold,
                count: 5,
            },
            BoostOptions::default(),
        ));
        assert_eq!(result, Err(PricingError::NonApexWinTarget(Tier::Gold)));
    }

    #[test]
    fn equal_or_descending_range_is_rejected() {
        let gold_two = Rank::new(Tier::Gold, Division::Two);
        assert!(matches!(
            RankDistancePolicy.quote(&rank_intent(gold_two, gold_two)),
            Err(PricingError::InvalidRange { .. })
        ));
        assert!(matches!(
            RankDistancePolicy.quote(&rank_intent(gold_two, Rank::new(Tier::Silver, Division::One))),
            Err(PricingError::InvalidRange { .. })
        ));
    }

    #[test]
    fn duo_multiplier_applies_before_flat_extras() {
        // Base 44, duo -> 52.8, champion +15 -> 67.8. Champion-first would
        // give (44 + 15) * 1.2 = 70.8.
        let breakdown = quote(&intent(
            Rank::new(Tier::Iron, Division::Four),
            BoostTarget::Rank(Rank::new(Tier::Iron, Division::One)),
            BoostOptions {
                duo: true,
                champion: Some("Yasuo".to_string()),
                ..BoostOptions::default()
            },
        ));
        assert_eq!(breakdown.total, 67.8);
    }

    #[test]
    fn stream_multiplier_applies_last() {
        // Base 44, champion +15, offline +10 -> 69, stream -> 79.35.
        let breakdown = quote(&intent(
            Rank::new(Tier::Iron, Division::Four),
            BoostTarget::Rank(Rank::new(Tier::Iron, Division::One)),
            BoostOptions {
                champion: Some("Yasuo".to_string()),
                offline: true,
                private_stream: true,
                ..BoostOptions::default()
            },
        ));
        assert_eq!(breakdown.total, 79.35);
    }

    #[test]
    fn small_apex_orders_are_clamped_to_the_floor() {
        let breakdown = quote(&intent(
            Rank::apex(Tier::Master),
            BoostTarget::Wins {
                tier: Tier::Master,
                count: 1,
            },
            BoostOptions::default(),
        ));
        assert_eq!(breakdown.total, MINIMUM_PRICE);
        assert!(breakdown
            .entries
            .iter()
            .any(|e| e.category == BreakdownCategory::Minimum));
    }

    #[test]
    fn cross_tier_charges_flat_per_tier_fee() {
        // Iron IV -> Bronze I: 20 + 1 * 25 + 3 * 4 = 57. Deliberately not
        // a path sum over intervening divisions.
        let breakdown = quote(&rank_intent(
            Rank::new(Tier::Iron, Division::Four),
            Rank::new(Tier::Bronze, Division::One),
        ));
        assert_eq!(breakdown.total, 57.0);
    }

    #[test]
    fn negative_division_delta_reduces_the_adjustment() {
        // Gold I -> Platinum IV: 20 + 25 - 3 * 4 = 33.
        let breakdown = quote(&rank_intent(
            Rank::new(Tier::Gold, Division::One),
            Rank::new(Tier::Platinum, Division::Four),
        ));
        assert_eq!(breakdown.total, 33.0);
        assert!(breakdown.entries.iter().any(|e| e.amount < 0.0));
    }

    fn sub_apex_rank() -> impl Strategy<Value = Rank> {
        (0usize..7, 0usize..4).prop_map(|(t, d)| Rank::new(LADDER[t], DIVISIONS[d]))
    }

    fn arbitrary_options() -> impl Strategy<Value = BoostOptions> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(duo, champion, lane, offline, private_stream)| BoostOptions {
                duo,
                champion: champion.then(|| "Ahri".to_string()),
                lane: lane.then_some(Lane::Mid),
                offline,
                private_stream,
            },
        )
    }

    proptest! {
        #[test]
        fn same_tier_price_is_monotonic_in_distance(
            tier_idx in 0usize..7,
            start_idx in 0usize..3,
            options in arbitrary_options(),
        ) {
            let tier = LADDER[tier_idx];
            let start = Rank::new(tier, DIVISIONS[start_idx]);
            let mut previous = 0.0;
            for end_idx in (start_idx + 1)..4 {
                let end = Rank::new(tier, DIVISIONS[end_idx]);
                let breakdown = quote(&intent(start, BoostTarget::Rank(end), options.clone()));
                prop_assert!(breakdown.total >= previous);
                previous = breakdown.total;
            }
        }

        #[test]
        fn price_never_drops_below_the_floor(
            start in sub_apex_rank(),
            end in sub_apex_rank(),
            options in arbitrary_options(),
        ) {
            if let Ok(breakdown) = RankDistancePolicy.quote(&intent(start, BoostTarget::Rank(end), options)) {
                prop_assert!(breakdown.total >= MINIMUM_PRICE);
            }
        }
    }
}
