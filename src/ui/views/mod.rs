use crossterm::event::KeyCode;

use crate::model::rank::{Division, Tier, DIVISIONS, LADDER};
use crate::ui::{Controller, RenderContext, ViewResult};

pub mod account;
pub mod boosters;
pub mod bulk;
pub mod calculator;
pub mod orders;

pub use account::AccountView;
pub use boosters::BoosterListView;
pub use bulk::BulkPricingView;
pub use calculator::CalculatorView;
pub use orders::MyOrdersView;

/// Trait for rendering views in the TUI
pub trait RenderableView {
    /// Render the view into a ratatui Frame with scroll support
    fn render(&self, rc: RenderContext) -> ViewResult;

    fn update(&mut self, _controller: &Controller, _keys: &[KeyCode]) {}

    fn title(&self) -> &str;

    /// Returns the auto-refresh interval in seconds, or None if no auto-refresh
    fn auto_refresh_interval(&self) -> Option<f32> {
        None
    }

    /// Called when the view should refresh its data
    fn refresh_data(&mut self, _controller: &Controller) -> Result<(), String> {
        Ok(())
    }
}

/// Picks the first color whose threshold the value still reaches, walking
/// the scale from best to worst.
pub fn eval_color_scale<T: PartialOrd>(value: T, scale: &[(T, ratatui::style::Color)]) -> ratatui::style::Color {
    for (threshold, color) in scale {
        if value >= *threshold {
            return *color;
        }
    }
    scale
        .last()
        .map(|(_, color)| *color)
        .unwrap_or(ratatui::style::Color::White)
}

/// Shared key handlers for the rank pickers: wrap around the ladder.
pub fn cycle_tier(tier: Tier) -> Tier {
    tier.next().unwrap_or(LADDER[0])
}

pub fn cycle_division(division: Division) -> Division {
    let index = division.index() as usize;
    DIVISIONS[(index + 1) % DIVISIONS.len()]
}

#[macro_export]
macro_rules! styled_span {
    // Expression with color and bold (expr; Bold Color::X)
    ($expr:expr; Bold $color:expr) => {
        ratatui::text::Span::styled(
            format!("{}", $expr),
            ratatui::style::Style::default()
                .fg($color)
                .add_modifier(ratatui::style::Modifier::BOLD),
        )
    };

    // Expression with color (expr; Color::X)
    ($expr:expr; $color:expr) => {
        ratatui::text::Span::styled(format!("{}", $expr), ratatui::style::Style::default().fg($color))
    };

    // Formatted text with color and bold (text, args...; Bold Color::X)
    ($text:literal, $($arg:expr),+; Bold $color:expr) => {
        ratatui::text::Span::styled(
            format!($text, $($arg),+),
            ratatui::style::Style::default()
                .fg($color)
                .add_modifier(ratatui::style::Modifier::BOLD),
        )
    };

    // Formatted text with color (text, args...; Color::X)
    ($text:literal, $($arg:expr),+; $color:expr) => {
        ratatui::text::Span::styled(
            format!($text, $($arg),+),
            ratatui::style::Style::default().fg($color),
        )
    };

    // Formatted text (text, args...)
    ($text:literal, $($arg:expr),+) => {
        ratatui::text::Span::raw(format!($text, $($arg),+))
    };

    // Plain expression
    ($expr:expr) => {
        ratatui::text::Span::raw(format!("{}", $expr))
    };
}

#[macro_export]
macro_rules! styled_line {
    // Empty line
    () => {
        ratatui::text::Line::raw("")
    };

    // Span list
    (LIST [$($args:expr),+ $(,)?]) => {
        ratatui::text::Line::from(vec![$($args),+])
    };

    // Single styled span
    ($($args:tt)+) => {
        ratatui::text::Line::from($crate::styled_span!($($args)+))
    };
}
