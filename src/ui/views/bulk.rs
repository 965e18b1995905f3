use crossterm::event::KeyCode;
use itertools::Itertools;
use ratatui::{
    style::Color,
    text::Line,
    widgets::{Paragraph, Wrap},
};

use crate::{
    model::{
        order::{BoostOptions, OrderIntent},
        pricing::{BulkPricingConfig, PriceTable},
        rank::{BoostTarget, Division, Rank, Tier, LADDER},
    },
    pricing::{BulkTransitionPolicy, PricingPolicy},
    styled_line,
    ui::{
        views::calculator::{breakdown_lines, validation_line},
        views::{cycle_division, cycle_tier, RenderableView},
        AsyncData, Controller, RenderContext, ViewResult, ACCENT,
    },
};

/// Booster-side preview of the bulk transition formula: the saved division
/// prices and transition fees, plus a probe estimate for a chosen range.
pub struct BulkPricingView {
    config: AsyncData<Option<BulkPricingConfig>>,
    overrides: AsyncData<Option<PriceTable>>,
    from: Rank,
    to: Rank,
}

impl BulkPricingView {
    pub fn new(ctrl: &Controller) -> Self {
        Self {
            config: AsyncData::new(ctrl.manager.get_bulk_config()),
            overrides: AsyncData::new(ctrl.manager.get_my_price_table()),
            from: Rank::new(Tier::Iron, Division::Four),
            to: Rank::new(Tier::Silver, Division::Four),
        }
    }

    fn config_lines(&self, config: &BulkPricingConfig) -> Vec<Line<'static>> {
        let mut lines = vec![styled_line!("Saved configuration"; Bold ACCENT)];

        for tier in LADDER.iter().filter(|t| !t.is_apex()) {
            let price = config
                .division_price(*tier)
                .map(|p| format!("${:.2} / division", p))
                .unwrap_or_else(|| "not set".to_string());
            let fee = config
                .transition_fee_into(*tier)
                .map(|f| format!("${:.2} entry fee", f))
                .unwrap_or_else(|| "no entry fee".to_string());
            lines.push(styled_line!("  {:<10} {:<22} {}", tier.name(), price, fee));
        }

        lines
    }

    fn override_lines(&self, table: &PriceTable) -> Vec<Line<'static>> {
        let mut lines = vec![styled_line!(), styled_line!("Individual overrides"; Bold ACCENT)];

        if table.entries.is_empty() {
            lines.push(styled_line!("  none"; Color::DarkGray));
            return lines;
        }

        for entry in table
            .entries
            .iter()
            .sorted_by_key(|e| (e.from.position(), e.to.position()))
        {
            lines.push(styled_line!(
                "  {} → {}  ${:.2}",
                entry.from,
                entry.to,
                entry.price;
                Color::Magenta
            ));
        }

        lines
    }

    fn probe_lines(&self, config: &BulkPricingConfig, table: &PriceTable) -> Vec<Line<'static>> {
        let mut lines = vec![
            styled_line!(),
            styled_line!("Probe estimate  [t/d] from: {}   [T/D] to: {}", self.from, self.to; Bold ACCENT),
        ];

        let policy = BulkTransitionPolicy::new(config.clone(), table.clone());
        let intent = OrderIntent {
            start: self.from,
            target: BoostTarget::Rank(self.to),
            options: BoostOptions::default(),
        };

        match policy.quote(&intent) {
            Ok(breakdown) => lines.extend(breakdown_lines(&breakdown)),
            Err(err) => lines.push(validation_line(&err)),
        }

        lines
    }
}

impl RenderableView for BulkPricingView {
    fn title(&self) -> &str {
        "Bulk Pricing"
    }

    fn update(&mut self, _controller: &Controller, keys: &[KeyCode]) {
        self.config.poll();
        self.overrides.poll();

        for key in keys {
            match key {
                KeyCode::Char('t') => self.from = Rank::new(cycle_tier(self.from.tier), self.from.division),
                KeyCode::Char('d') => self.from = Rank::new(self.from.tier, cycle_division(self.from.division)),
                KeyCode::Char('T') => self.to = Rank::new(cycle_tier(self.to.tier), self.to.division),
                KeyCode::Char('D') => self.to = Rank::new(self.to.tier, cycle_division(self.to.division)),
                _ => {}
            }
        }
    }

    fn refresh_data(&mut self, controller: &Controller) -> Result<(), String> {
        self.config = AsyncData::new(controller.manager.get_bulk_config());
        self.overrides = AsyncData::new(controller.manager.get_my_price_table());
        Ok(())
    }

    fn render(&self, rc: RenderContext) -> ViewResult {
        if self.config.is_loading() || self.overrides.is_loading() {
            let paragraph = Paragraph::new(vec![styled_line!("Loading pricing configuration...")]).block(rc.block);
            rc.frame.render_widget(paragraph, rc.area);
            return Ok(());
        }

        if let Some(err) = self.config.error().or(self.overrides.error()) {
            rc.error(err);
            return Ok(());
        }

        let config = self.config.data().cloned().flatten().unwrap_or_default();
        let overrides = self.overrides.data().cloned().flatten().unwrap_or_default();

        let mut lines = self.config_lines(&config);
        lines.extend(self.override_lines(&overrides));
        lines.extend(self.probe_lines(&config, &overrides));

        let paragraph = Paragraph::new(lines)
            .block(rc.block)
            .wrap(Wrap { trim: false })
            .scroll((rc.scroll_offset, 0));
        rc.frame.render_widget(paragraph, rc.area);
        Ok(())
    }
}
