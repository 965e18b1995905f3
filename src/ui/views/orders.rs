use crossterm::event::KeyCode;
use itertools::Itertools;
use ratatui::{
    style::Color,
    text::Line,
    widgets::{Paragraph, Wrap},
};

use crate::{
    model::order::{Order, OrderStatus},
    styled_line, styled_span,
    ui::{views::RenderableView, AsyncData, Controller, RenderContext, ViewResult, ACCENT},
};

pub struct MyOrdersView {
    orders: AsyncData<Vec<Order>>,
}

impl MyOrdersView {
    pub fn new(ctrl: &Controller) -> Self {
        Self {
            orders: AsyncData::new(ctrl.manager.get_my_orders()),
        }
    }
}

impl RenderableView for MyOrdersView {
    fn title(&self) -> &str {
        "My Orders"
    }

    fn update(&mut self, _controller: &Controller, _keys: &[KeyCode]) {
        self.orders.poll();
    }

    fn refresh_data(&mut self, controller: &Controller) -> Result<(), String> {
        self.orders = AsyncData::new(controller.manager.get_my_orders());
        Ok(())
    }

    fn render(&self, rc: RenderContext) -> ViewResult {
        if self.orders.is_loading() {
            let paragraph = Paragraph::new(vec![styled_line!("Loading orders...")]).block(rc.block);
            rc.frame.render_widget(paragraph, rc.area);
            return Ok(());
        }

        if let Some(err) = self.orders.error() {
            rc.error(err);
            return Ok(());
        }

        let orders = self.orders.data().cloned().unwrap_or_default();
        let mut lines = Vec::new();

        if orders.is_empty() {
            lines.push(styled_line!("  No orders yet."; Color::Yellow));
        }

        // Newest first.
        for order in orders.iter().sorted_by_key(|o| o.created_at).rev() {
            lines.push(order_line(order));
            if let Some(rank) = order.current_rank {
                lines.push(styled_line!("      currently at {}", rank; Color::DarkGray));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(rc.block)
            .wrap(Wrap { trim: false })
            .scroll((rc.scroll_offset, 0));
        rc.frame.render_widget(paragraph, rc.area);
        Ok(())
    }
}

fn order_line(order: &Order) -> Line<'static> {
    let status_color = match order.status {
        OrderStatus::Completed => Color::Green,
        OrderStatus::InProgress | OrderStatus::Paid => ACCENT,
        OrderStatus::Pending | OrderStatus::PaymentSubmitted => Color::Yellow,
        OrderStatus::Cancelled | OrderStatus::Rejected => Color::Red,
    };

    styled_line!(LIST [
        styled_span!("  #{:<8}", order.id),
        styled_span!("{:<18}", order.status; status_color),
        styled_span!("{} → {}  ", order.intent.start, order.intent.target),
        styled_span!("${:.2}  ", order.total_price; Bold Color::White),
        styled_span!("{}", order.created_at.format("%Y-%m-%d"); Color::DarkGray),
    ])
}
