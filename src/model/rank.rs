use std::fmt;

/// The ranked ladder, lowest to highest. Master and above are apex tiers:
/// they carry no divisions and progress is measured in wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

pub const LADDER: [Tier; 10] = [
    Tier::Iron,
    Tier::Bronze,
    Tier::Silver,
    Tier::Gold,
    Tier::Platinum,
    Tier::Emerald,
    Tier::Diamond,
    Tier::Master,
    Tier::Grandmaster,
    Tier::Challenger,
];

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Iron => "Iron",
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
            Tier::Emerald => "Emerald",
            Tier::Diamond => "Diamond",
            Tier::Master => "Master",
            Tier::Grandmaster => "Grandmaster",
            Tier::Challenger => "Challenger",
        }
    }

    pub fn from_name(name: &str) -> Option<Tier> {
        LADDER.iter().find(|t| t.name().eq_ignore_ascii_case(name)).copied()
    }

    pub fn ordinal(&self) -> usize {
        LADDER.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn is_apex(&self) -> bool {
        matches!(self, Tier::Master | Tier::Grandmaster | Tier::Challenger)
    }

    /// Apex tiers expose exactly one implicit division.
    pub fn division_count(&self) -> u32 {
        if self.is_apex() {
            1
        } else {
            4
        }
    }

    pub fn next(&self) -> Option<Tier> {
        LADDER.get(self.ordinal() + 1).copied()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sub-level within a non-apex tier, IV (lowest) to I (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Division {
    Four,
    Three,
    Two,
    One,
}

pub const DIVISIONS: [Division; 4] = [Division::Four, Division::Three, Division::Two, Division::One];

impl Division {
    /// Index within the tier, 0 = lowest (IV).
    pub fn index(&self) -> u32 {
        match self {
            Division::Four => 0,
            Division::Three => 1,
            Division::Two => 2,
            Division::One => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Division::Four => "IV",
            Division::Three => "III",
            Division::Two => "II",
            Division::One => "I",
        }
    }

    pub fn from_label(label: &str) -> Option<Division> {
        DIVISIONS.iter().find(|d| d.label().eq_ignore_ascii_case(label)).copied()
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A spot on the ladder. The division of an apex rank is implicit and
/// ignored everywhere the rank is compared or priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rank {
    pub tier: Tier,
    pub division: Division,
}

impl Rank {
    pub fn new(tier: Tier, division: Division) -> Self {
        if tier.is_apex() {
            Rank {
                tier,
                division: Division::One,
            }
        } else {
            Rank { tier, division }
        }
    }

    pub fn apex(tier: Tier) -> Self {
        Rank {
            tier,
            division: Division::One,
        }
    }

    /// Canonical ladder position: division counts of all lower tiers plus
    /// the division index within this tier. Total-orders every rank.
    pub fn position(&self) -> u32 {
        let below: u32 = LADDER.iter().take(self.tier.ordinal()).map(Tier::division_count).sum();
        if self.tier.is_apex() {
            below
        } else {
            below + self.division.index()
        }
    }

    /// Division steps left to the top of this rank's own tier.
    pub fn steps_to_tier_top(&self) -> u32 {
        if self.tier.is_apex() {
            0
        } else {
            self.tier.division_count() - 1 - self.division.index()
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.tier.is_apex() {
            write!(f, "{}", self.tier)
        } else {
            write!(f, "{} {}", self.tier, self.division)
        }
    }
}

/// What a boost should reach: a ladder rank, or a number of wins for
/// customers already sitting in an apex tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoostTarget {
    Rank(Rank),
    Wins { tier: Tier, count: u32 },
}

impl fmt::Display for BoostTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoostTarget::Rank(rank) => write!(f, "{}", rank),
            BoostTarget::Wins { tier, count } => write!(f, "{} wins in {}", count, tier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_positions_are_strictly_increasing() {
        let mut previous = None;
        for tier in LADDER {
            for division in DIVISIONS.iter().take(tier.division_count() as usize) {
                let position = Rank::new(tier, *division).position();
                if let Some(prev) = previous {
                    assert!(position > prev, "{} {} not above previous", tier, division);
                }
                previous = Some(position);
            }
        }
    }

    #[test]
    fn apex_ranks_ignore_divisions() {
        let a = Rank::new(Tier::Master, Division::Four);
        let b = Rank::new(Tier::Master, Division::One);
        assert_eq!(a.position(), b.position());
        assert_eq!(Tier::Master.division_count(), 1);
    }

    #[test]
    fn position_counts_divisions_of_lower_tiers() {
        // 7 sub-apex tiers of 4 divisions each below Master.
        assert_eq!(Rank::apex(Tier::Master).position(), 28);
        assert_eq!(Rank::new(Tier::Bronze, Division::Four).position(), 4);
        assert_eq!(Rank::new(Tier::Iron, Division::One).position(), 3);
    }

    #[test]
    fn division_labels_round_trip() {
        assert_eq!(Division::from_label("IV"), Some(Division::Four));
        assert_eq!(Division::from_label("i"), Some(Division::One));
        assert_eq!(Division::from_label("V"), None);
        assert_eq!(Tier::from_name("gold"), Some(Tier::Gold));
        assert_eq!(Tier::from_name("Wood"), None);
    }
}
