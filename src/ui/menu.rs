use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

use crate::ui::{views::*, Controller, ACCENT};

pub struct Menu {
    menu_entries: Vec<MenuEntry>,
    selected: usize,
}

struct MenuEntry {
    description: &'static str,
    factory: Option<ViewFactory>,
}

type ViewFactory = fn(&Controller) -> Box<dyn RenderableView>;

impl Menu {
    pub fn new() -> Self {
        let menu_entries = Self::get_menu_entries();
        let selected = menu_entries.iter().position(|e| e.factory.is_some()).unwrap_or(0);
        Self { menu_entries, selected }
    }

    pub fn next(&mut self) {
        self.advance(|i, len| (i + 1) % len);
    }

    pub fn previous(&mut self) {
        self.advance(|i, len| if i == 0 { len - 1 } else { i - 1 });
    }

    /// Moves the cursor, skipping group headers.
    fn advance(&mut self, step: fn(usize, usize) -> usize) {
        let len = self.menu_entries.len();
        if len == 0 {
            return;
        }

        let mut i = self.selected;
        loop {
            i = step(i, len);
            if self.menu_entries[i].factory.is_some() {
                self.selected = i;
                break;
            }
            if i == self.selected {
                break;
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .menu_entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if entry.factory.is_none() {
                    ListItem::new(format!("━━ {} ━━", entry.description))
                        .style(Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD))
                } else {
                    let prefix = if i == self.selected { "  ► " } else { "    " };
                    ListItem::new(format!("{}{}", prefix, entry.description))
                }
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(ACCENT))
                    .padding(Padding::uniform(1))
                    .title("Commands")
                    .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            )
            .highlight_style(Style::default().bg(Color::White).fg(Color::Black))
            .highlight_symbol("");

        frame.render_stateful_widget(list, area, &mut list_state);
    }

    pub fn get_factory(&self) -> Option<ViewFactory> {
        self.menu_entries.get(self.selected).and_then(|e| e.factory)
    }

    fn get_menu_entries() -> Vec<MenuEntry> {
        macro_rules! menu_entry {
            (group: $desc:expr) => {
                MenuEntry {
                    description: $desc,
                    factory: None,
                }
            };
            (item: $desc:expr, $view:ty) => {
                MenuEntry {
                    description: $desc,
                    factory: Some(|ctrl| Box::new(<$view>::new(ctrl))),
                }
            };
        }

        vec![
            menu_entry!(group: "Boosting"),
            menu_entry!(item: "Price Calculator", CalculatorView),
            menu_entry!(item: "Choose a Booster", BoosterListView),
            menu_entry!(group: "Orders"),
            menu_entry!(item: "My Orders", MyOrdersView),
            menu_entry!(group: "Booster Tools"),
            menu_entry!(item: "Bulk Pricing", BulkPricingView),
            menu_entry!(group: "Account"),
            menu_entry!(item: "Profile", AccountView),
        ]
    }
}
