use std::sync::mpsc::Receiver;

use crossterm::event::KeyCode;
use itertools::Itertools;
use ratatui::{
    style::Color,
    text::Line,
    widgets::{Paragraph, Wrap},
};

use crate::{
    model::{
        booster::BoosterProfile,
        user::{Profile, Role},
    },
    service::data_manager::DataRetrievalResult,
    styled_line,
    ui::{views::RenderableView, AsyncData, Controller, RenderContext, ViewResult, ACCENT},
};

/// Account overview. Boosters additionally see their public profile and
/// can flip their availability from here.
pub struct AccountView {
    profile: Profile,
    booster_profile: AsyncData<Option<BoosterProfile>>,
    toggle: Option<Receiver<DataRetrievalResult<()>>>,
    notice: Option<String>,
}

impl AccountView {
    pub fn new(ctrl: &Controller) -> Self {
        Self {
            profile: ctrl.manager.get_profile().clone(),
            booster_profile: AsyncData::new(ctrl.manager.get_my_booster_profile()),
            toggle: None,
            notice: None,
        }
    }

    fn profile_lines(&self) -> Vec<Line<'static>> {
        vec![
            styled_line!("Account"; Bold ACCENT),
            styled_line!("  Name:   {}", self.profile.display_name),
            styled_line!("  Email:  {}", self.profile.email),
            styled_line!("  Role:   {}", self.profile.role),
        ]
    }

    fn booster_lines(&self, profile: &BoosterProfile) -> Vec<Line<'static>> {
        let availability = if profile.booster.available {
            styled_line!("  [a] Availability: accepting orders"; Color::Green)
        } else {
            styled_line!("  [a] Availability: paused"; Color::Red)
        };

        vec![
            styled_line!(),
            styled_line!("Booster profile"; Bold ACCENT),
            styled_line!("  Bio:    {}", profile.bio),
            styled_line!("  Roles:  {}", profile.main_roles.iter().join(", ")),
            availability,
        ]
    }
}

impl RenderableView for AccountView {
    fn title(&self) -> &str {
        "Profile"
    }

    fn update(&mut self, controller: &Controller, keys: &[KeyCode]) {
        self.booster_profile.poll();

        if let Some(rx) = &self.toggle {
            if let Ok(result) = rx.try_recv() {
                self.notice = Some(match result {
                    Ok(()) => "Availability updated.".to_string(),
                    Err(err) => format!("Could not update availability: {}", err),
                });
                self.toggle = None;
                self.booster_profile = AsyncData::new(controller.manager.get_my_booster_profile());
            }
        }

        let is_booster = self.profile.role == Role::Booster;
        for key in keys {
            if *key == KeyCode::Char('a') && is_booster && self.toggle.is_none() {
                self.toggle = Some(controller.manager.toggle_availability());
                self.notice = Some("Updating availability...".to_string());
            }
        }
    }

    fn refresh_data(&mut self, controller: &Controller) -> Result<(), String> {
        self.booster_profile = AsyncData::new(controller.manager.get_my_booster_profile());
        self.notice = None;
        Ok(())
    }

    fn render(&self, rc: RenderContext) -> ViewResult {
        let mut lines = self.profile_lines();

        if self.booster_profile.is_loading() {
            lines.push(styled_line!());
            lines.push(styled_line!("  Loading booster profile..."; Color::DarkGray));
        } else if let Some(err) = self.booster_profile.error() {
            lines.push(styled_line!());
            lines.push(styled_line!("  Booster profile unavailable: {}", err; Color::Red));
        } else if let Some(Some(profile)) = self.booster_profile.data() {
            lines.extend(self.booster_lines(profile));
        }

        if let Some(notice) = &self.notice {
            lines.push(styled_line!());
            lines.push(styled_line!("  {}", notice; Color::Yellow));
        }

        let paragraph = Paragraph::new(lines)
            .block(rc.block)
            .wrap(Wrap { trim: false })
            .scroll((rc.scroll_offset, 0));
        rc.frame.render_widget(paragraph, rc.area);
        Ok(())
    }
}
