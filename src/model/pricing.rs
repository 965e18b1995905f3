use std::collections::HashMap;

use super::rank::{Rank, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownCategory {
    Distance,
    Mode,
    Extra,
    Minimum,
    Override,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownEntry {
    pub label: String,
    pub amount: f64,
    pub category: BreakdownCategory,
}

/// Itemized estimate: the steps actually applied, in the order they were
/// applied, ending with the clamped total. Zero-value steps are omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub entries: Vec<BreakdownEntry>,
    pub total: f64,
}

impl PriceBreakdown {
    pub fn builder() -> BreakdownBuilder {
        BreakdownBuilder { entries: Vec::new() }
    }
}

pub struct BreakdownBuilder {
    entries: Vec<BreakdownEntry>,
}

impl BreakdownBuilder {
    pub fn push(&mut self, label: impl Into<String>, amount: f64, category: BreakdownCategory) {
        if amount != 0.0 {
            self.entries.push(BreakdownEntry {
                label: label.into(),
                amount: round_cents(amount),
                category,
            });
        }
    }

    pub fn finish(mut self, total: f64) -> PriceBreakdown {
        let total = round_cents(total);
        self.entries.push(BreakdownEntry {
            label: "Total".to_string(),
            amount: total,
            category: BreakdownCategory::Total,
        });
        PriceBreakdown {
            entries: self.entries,
            total,
        }
    }
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Per-division unit prices and inter-tier transition fees, keyed by the
/// tier being entered. Edited by boosters, resolved by the server; covers
/// arbitrary (start, end) pairs without per-pair storage.
#[derive(Debug, Clone, Default)]
pub struct BulkPricingConfig {
    pub division_prices: HashMap<Tier, f64>,
    pub transition_fees: HashMap<Tier, f64>,
}

impl BulkPricingConfig {
    pub fn is_empty(&self) -> bool {
        self.division_prices.is_empty()
    }

    pub fn division_price(&self, tier: Tier) -> Option<f64> {
        self.division_prices.get(&tier).copied()
    }

    pub fn transition_fee_into(&self, tier: Tier) -> Option<f64> {
        self.transition_fees.get(&tier).copied()
    }
}

/// Individually configured price for an exact (from, to) pair. Takes
/// strict precedence over the bulk formula.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTableEntry {
    pub from: Rank,
    pub to: Rank,
    pub price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    pub entries: Vec<PriceTableEntry>,
}

impl PriceTable {
    pub fn lookup(&self, from: Rank, to: Rank) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.from == from && e.to == to)
            .map(|e| e.price)
    }
}
