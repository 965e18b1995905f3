use crossterm::event::KeyCode;
use itertools::Itertools;
use ratatui::{
    style::Color,
    text::Line,
    widgets::{Paragraph, Wrap},
};

use crate::{
    model::rank::{Division, Rank, Tier, LADDER},
    service::quotes::{sort_candidates, CandidateQuote, QuoteBoard, QuoteState, SortKey},
    styled_line, styled_span,
    ui::{
        views::{eval_color_scale, RenderableView},
        AsyncData, Controller, RenderContext, ViewResult, ACCENT,
    },
};

use crate::model::booster::Booster;

const RATING_SCALE: [(f64, Color); 4] = [
    (4.5, Color::Green),
    (3.5, Color::Yellow),
    (2.5, Color::Rgb(230, 140, 30)),
    (0.0, Color::Red),
];

/// Booster catalog with a live per-booster quote for the selected range.
/// Changing the range drops the running fan-out and starts a fresh one.
pub struct BoosterListView {
    boosters: AsyncData<Vec<Booster>>,
    board: Option<QuoteBoard>,
    sort_key: SortKey,
    from: Rank,
    to: Rank,
}

impl BoosterListView {
    pub fn new(ctrl: &Controller) -> Self {
        Self {
            boosters: AsyncData::new(ctrl.manager.get_boosters()),
            board: None,
            sort_key: SortKey::Rating,
            from: Rank::new(Tier::Iron, Division::Four),
            to: Rank::new(Tier::Bronze, Division::Four),
        }
    }

    fn restart_quotes(&mut self) {
        // Dropping the old board cancels its in-flight requests.
        self.board = None;
    }

    fn candidates(&self, boosters: &[Booster]) -> Vec<CandidateQuote> {
        let mut candidates = boosters
            .iter()
            .map(|booster| CandidateQuote {
                booster: booster.clone(),
                state: self
                    .board
                    .as_ref()
                    .map(|b| b.state(&booster.id).clone())
                    .unwrap_or(QuoteState::Pending),
            })
            .collect_vec();
        sort_candidates(&mut candidates, self.sort_key);
        candidates
    }
}

impl RenderableView for BoosterListView {
    fn title(&self) -> &str {
        "Choose a Booster"
    }

    fn update(&mut self, controller: &Controller, keys: &[KeyCode]) {
        self.boosters.poll();

        for key in keys {
            match key {
                KeyCode::Char('s') => self.sort_key = self.sort_key.next(),
                KeyCode::Char('f') => {
                    self.from = Rank::new(cycle_sub_apex(self.from.tier), self.from.division);
                    self.restart_quotes();
                }
                KeyCode::Char('t') => {
                    self.to = Rank::new(cycle_sub_apex(self.to.tier), self.to.division);
                    self.restart_quotes();
                }
                _ => {}
            }
        }

        if self.board.is_none() {
            if let Some(boosters) = self.boosters.data() {
                self.board = Some(QuoteBoard::spawn(
                    controller.manager.client(),
                    boosters,
                    self.from,
                    self.to,
                ));
            }
        }

        if let Some(board) = &mut self.board {
            board.poll();
        }
    }

    fn refresh_data(&mut self, controller: &Controller) -> Result<(), String> {
        self.boosters = AsyncData::new(controller.manager.get_boosters());
        self.restart_quotes();
        Ok(())
    }

    fn render(&self, rc: RenderContext) -> ViewResult {
        if self.boosters.is_loading() {
            let paragraph = Paragraph::new(vec![styled_line!("Loading boosters...")]).block(rc.block);
            rc.frame.render_widget(paragraph, rc.area);
            return Ok(());
        }

        if let Some(err) = self.boosters.error() {
            rc.error(err);
            return Ok(());
        }

        let boosters = self.boosters.data().cloned().unwrap_or_default();
        let mut lines = vec![
            styled_line!(
                "[f] From: {}   [t] To: {}   [s] Sort: {}",
                self.from,
                self.to,
                self.sort_key.label();
                ACCENT
            ),
            styled_line!(),
        ];

        if boosters.is_empty() {
            lines.push(styled_line!("  No boosters available right now."; Color::Yellow));
        }

        for candidate in self.candidates(&boosters) {
            lines.push(candidate_line(&candidate));
        }

        let paragraph = Paragraph::new(lines)
            .block(rc.block)
            .wrap(Wrap { trim: false })
            .scroll((rc.scroll_offset, 0));
        rc.frame.render_widget(paragraph, rc.area);
        Ok(())
    }
}

fn candidate_line(candidate: &CandidateQuote) -> Line<'static> {
    let booster = &candidate.booster;

    let rating_span = match booster.rating {
        Some(rating) => styled_span!("{:.1}★", rating; eval_color_scale(rating, &RATING_SCALE)),
        None => styled_span!("  new"; Color::DarkGray),
    };

    let stats = format!(
        "  {:>4.0}% wr  {:>5} orders  {:<18}",
        booster.win_rate.unwrap_or(0.0),
        booster.completed_orders,
        booster.languages.iter().join(", ")
    );

    let quote_span = match &candidate.state {
        QuoteState::Pending => styled_span!("..."; Color::DarkGray),
        QuoteState::Quoted(price) => styled_span!("${:.2}", price; Bold Color::Green),
        QuoteState::Unconfigured => styled_span!("no price table"; Color::DarkGray),
        QuoteState::Failed(reason) => styled_span!("failed: {}", reason; Color::Red),
    };

    let availability = if booster.available { "  " } else { "✕ " };

    styled_line!(LIST [
        styled_span!("  {}{:<20}", availability, booster.display_name),
        rating_span,
        styled_span!("{}", stats),
        quote_span,
    ])
}

fn cycle_sub_apex(tier: Tier) -> Tier {
    match tier.next() {
        Some(next) if !next.is_apex() => next,
        _ => LADDER[0],
    }
}
