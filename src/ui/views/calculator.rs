use crossterm::event::KeyCode;
use ratatui::{
    style::Color,
    text::Line,
    widgets::{Paragraph, Wrap},
};

use crate::{
    model::{
        order::{BoostOptions, Lane, OrderIntent, LANES},
        pricing::{BreakdownCategory, PriceBreakdown},
        rank::{BoostTarget, Division, Rank, Tier},
    },
    pricing::{PricingError, PricingPolicy, RankDistancePolicy},
    styled_line,
    ui::{
        views::{cycle_division, cycle_tier, RenderableView},
        Controller, RenderContext, ViewResult, ACCENT,
    },
};

/// Interactive rank-distance estimator. Everything is computed locally;
/// no request leaves this view.
pub struct CalculatorView {
    start: Rank,
    target: Rank,
    wins: u32,
    options: BoostOptions,
}

impl CalculatorView {
    pub fn new(_ctrl: &Controller) -> Self {
        Self {
            start: Rank::new(Tier::Iron, Division::Four),
            target: Rank::new(Tier::Iron, Division::One),
            wins: 1,
            options: BoostOptions::default(),
        }
    }

    fn intent(&self) -> OrderIntent {
        let target = if self.target.tier.is_apex() {
            BoostTarget::Wins {
                tier: self.target.tier,
                count: self.wins,
            }
        } else {
            BoostTarget::Rank(self.target)
        };

        OrderIntent {
            start: self.start,
            target,
            options: self.options.clone(),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('t') => self.start = Rank::new(cycle_tier(self.start.tier), self.start.division),
            KeyCode::Char('d') => self.start = Rank::new(self.start.tier, cycle_division(self.start.division)),
            KeyCode::Char('T') => self.target = Rank::new(cycle_tier(self.target.tier), self.target.division),
            KeyCode::Char('D') => self.target = Rank::new(self.target.tier, cycle_division(self.target.division)),
            KeyCode::Char('+') => self.wins = self.wins.saturating_add(1),
            KeyCode::Char('-') => self.wins = self.wins.saturating_sub(1),
            KeyCode::Char('u') => self.options.duo = !self.options.duo,
            KeyCode::Char('c') => {
                self.options.champion = match self.options.champion {
                    Some(_) => None,
                    None => Some("a elegir".to_string()),
                }
            }
            KeyCode::Char('l') => self.options.lane = cycle_lane(self.options.lane),
            KeyCode::Char('o') => self.options.offline = !self.options.offline,
            KeyCode::Char('s') => self.options.private_stream = !self.options.private_stream,
            _ => {}
        }
    }

    fn selection_lines(&self) -> Vec<Line<'static>> {
        let target_label = if self.target.tier.is_apex() {
            format!("{} wins in {}", self.wins, self.target.tier)
        } else {
            format!("{}", self.target)
        };

        let flag = |on: bool| if on { "on" } else { "off" };
        let lane = self
            .options
            .lane
            .map(|l| l.name().to_string())
            .unwrap_or_else(|| "any".to_string());
        let champion = if self.options.champion.is_some() { "on" } else { "off" };

        vec![
            styled_line!("Boost range"; Bold ACCENT),
            styled_line!("  [t/d] From:  {}", self.start),
            styled_line!("  [T/D] To:    {}  (+/- adjusts wins for apex tiers)", target_label),
            styled_line!(),
            styled_line!("Options"; Bold ACCENT),
            styled_line!(
                "  [u] duo: {}   [c] champion: {}   [l] lane: {}   [o] offline: {}   [s] stream: {}",
                flag(self.options.duo),
                champion,
                lane,
                flag(self.options.offline),
                flag(self.options.private_stream)
            ),
            styled_line!(),
        ]
    }
}

impl RenderableView for CalculatorView {
    fn title(&self) -> &str {
        "Price Calculator"
    }

    fn update(&mut self, _controller: &Controller, keys: &[KeyCode]) {
        for key in keys {
            self.handle_key(*key);
        }
    }

    fn render(&self, rc: RenderContext) -> ViewResult {
        let mut lines = self.selection_lines();

        match RankDistancePolicy.quote(&self.intent()) {
            Ok(breakdown) => lines.extend(breakdown_lines(&breakdown)),
            Err(err) => lines.push(validation_line(&err)),
        }

        let paragraph = Paragraph::new(lines)
            .block(rc.block)
            .wrap(Wrap { trim: false })
            .scroll((rc.scroll_offset, 0));
        rc.frame.render_widget(paragraph, rc.area);
        Ok(())
    }
}

pub fn breakdown_lines(breakdown: &PriceBreakdown) -> Vec<Line<'static>> {
    let mut lines = vec![styled_line!("Estimate"; Bold ACCENT)];

    for entry in &breakdown.entries {
        let color = match entry.category {
            BreakdownCategory::Distance => Color::White,
            BreakdownCategory::Mode => Color::Cyan,
            BreakdownCategory::Extra => Color::Gray,
            BreakdownCategory::Minimum => Color::Yellow,
            BreakdownCategory::Override => Color::Magenta,
            BreakdownCategory::Total => Color::Green,
        };

        let row = format!("  {:<32} ${:>8.2}", entry.label, entry.amount);
        if entry.category == BreakdownCategory::Total {
            lines.push(styled_line!(row; Bold color));
        } else {
            lines.push(styled_line!(row; color));
        }
    }

    lines
}

pub fn validation_line(error: &PricingError) -> Line<'static> {
    styled_line!("  {}", error; Color::Yellow)
}

fn cycle_lane(lane: Option<Lane>) -> Option<Lane> {
    match lane {
        None => Some(LANES[0]),
        Some(current) => {
            let index = LANES.iter().position(|l| *l == current).unwrap_or(0);
            LANES.get(index + 1).copied()
        }
    }
}
