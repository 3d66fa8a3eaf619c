use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Gauge, Paragraph};
use tui_input::Input;

use questline_core::screen::{CAROUSEL_LEN, MediaMode, ScreenState};

use crate::theme;
use crate::ui::text::{
    compact_hint, focus_line, gate_action_line, key_hint_height, key_hint_paragraph,
    label_value_line, wrapped_paragraph, yes_no,
};

use super::{CarouselSlot, ContactField, FlowScreen, LoginField};

impl FlowScreen {
    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        match self.controller.screen() {
            ScreenState::Login(_) => self.render_login(frame),
            ScreenState::Level1(_) => self.render_contact(frame),
            ScreenState::Level2(_) => self.render_feature(frame),
            ScreenState::Level3(_) => self.render_media(frame),
            ScreenState::Level4(_) => self.render_dual_select(frame),
            ScreenState::Complete => self.render_complete(frame),
        }

        // Modal overlays paint over whatever screen spawned them.
        self.picker_host.render(frame);
        self.confirm_host.render(frame);
    }

    fn render_login(&self, frame: &mut ratatui::Frame<'_>) {
        let key_text = compact_hint(
            frame.area().width,
            "Type to edit    Tab: switch field    Enter: login    Ctrl+S: sign up    Ctrl+C: quit",
            "Tab: switch    Enter: login    Ctrl+S: sign up    Ctrl+C: quit",
            "Tab switch | Enter login | Ctrl+S sign up | Ctrl+C quit",
        );
        let body = screen_scaffold(
            frame,
            self.controller.position().title(),
            "Enter your credentials to begin",
            key_text,
        );

        let [username_area, password_area, status_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(2),
            ])
            .areas(body);

        render_input_block(
            frame,
            username_area,
            "Username",
            &self.username_input,
            self.login_focus == LoginField::Username,
            false,
        );
        render_input_block(
            frame,
            password_area,
            "Password",
            &self.password_input,
            self.login_focus == LoginField::Password,
            true,
        );

        let status = Text::from(vec![
            gate_action_line("Login", self.controller.can_advance()),
            Line::from(Span::styled(
                "Sign Up (Ctrl+S) is recorded but goes nowhere",
                theme::secondary_text(),
            )),
        ]);
        frame.render_widget(wrapped_paragraph(status), status_area);
    }

    fn render_contact(&self, frame: &mut ratatui::Frame<'_>) {
        let key_text = compact_hint(
            frame.area().width,
            "Type to edit    Tab: switch field    Enter: submit    Ctrl+C: quit",
            "Tab: switch    Enter: submit    Ctrl+C: quit",
            "Tab switch | Enter submit | Ctrl+C quit",
        );
        let body = screen_scaffold(
            frame,
            self.controller.position().title(),
            "Leave your contact details",
            key_text,
        );

        let [email_area, phone_area, status_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(2),
            ])
            .areas(body);

        render_input_block(
            frame,
            email_area,
            "Email",
            &self.email_input,
            self.contact_focus == ContactField::Email,
            false,
        );
        render_input_block(
            frame,
            phone_area,
            "Phone number",
            &self.phone_input,
            self.contact_focus == ContactField::Phone,
            false,
        );

        frame.render_widget(
            wrapped_paragraph(Text::from(vec![gate_action_line(
                "Submit",
                self.controller.can_advance(),
            )])),
            status_area,
        );
    }

    fn render_feature(&self, frame: &mut ratatui::Frame<'_>) {
        let ScreenState::Level2(feature) = self.controller.screen() else {
            return;
        };

        let key_text = compact_hint(
            frame.area().width,
            "Space: toggle feature    Left/Right: adjust    Shift+Left/Right: adjust by 10    Enter: proceed",
            "Space: toggle    Left/Right: adjust    Enter: proceed",
            "Space toggle | Left/Right adjust | Enter proceed",
        );
        let body = screen_scaffold(
            frame,
            self.controller.position().title(),
            "Tune the feature before proceeding",
            key_text,
        );

        let [toggle_area, gauge_area, status_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(2),
            ])
            .areas(body);

        frame.render_widget(
            wrapped_paragraph(Text::from(vec![label_value_line(
                "Enable feature",
                yes_no(feature.enabled()),
            )])),
            toggle_area,
        );

        let gauge = Gauge::default()
            .block(theme::chrome("Intensity"))
            .gauge_style(theme::focus_prompt())
            .ratio((feature.intensity() / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.0} / 100", feature.intensity()));
        frame.render_widget(gauge, gauge_area);

        frame.render_widget(
            wrapped_paragraph(Text::from(vec![gate_action_line(
                "Proceed",
                self.controller.can_advance(),
            )])),
            status_area,
        );
    }

    fn render_media(&self, frame: &mut ratatui::Frame<'_>) {
        let ScreenState::Level3(media) = self.controller.screen() else {
            return;
        };

        let key_text = compact_hint(
            frame.area().width,
            "Left/Right: choose option    i: add image    Enter: finish    Ctrl+C: quit",
            "Left/Right: option    i: add image    Enter: finish",
            "Left/Right option | i image | Enter finish",
        );
        let body = screen_scaffold(
            frame,
            self.controller.position().title(),
            "Choose an option and attach an image",
            key_text,
        );

        let mut segments = Vec::new();
        for (index, mode) in MediaMode::ALL.iter().enumerate() {
            if index > 0 {
                segments.push(Span::raw("  "));
            }
            let label = format!(" {} ", mode.label());
            if *mode == media.mode() {
                segments.push(Span::styled(label, theme::highlight(Color::Cyan)));
            } else {
                segments.push(Span::raw(label));
            }
        }

        let mut lines = vec![Line::from(segments), Line::from("")];
        lines.push(label_value_line(
            "Picked image",
            media
                .picked_image()
                .map(|image| image.name.clone())
                .unwrap_or_else(|| "none".to_string()),
        ));
        if media.image_pick_available() {
            lines.push(focus_line("Press i to open the image picker"));
        } else {
            lines.push(Line::from(Span::styled(
                "This option does not take an image",
                theme::secondary_text(),
            )));
        }
        lines.push(Line::from(""));
        lines.push(gate_action_line("Finish", self.controller.can_advance()));

        frame.render_widget(wrapped_paragraph(Text::from(lines)), body);
    }

    fn render_dual_select(&self, frame: &mut ratatui::Frame<'_>) {
        let ScreenState::Level4(selection) = self.controller.screen() else {
            return;
        };

        let key_text = compact_hint(
            frame.area().width,
            "Tab: switch carousel    Left/Right: move    Space: select    Enter: end    Ctrl+C: quit",
            "Tab: switch    Left/Right: move    Space: select    Enter: end",
            "Tab switch | Left/Right move | Space select | Enter end",
        );
        let body = screen_scaffold(
            frame,
            self.controller.position().title(),
            "Select the last item in each carousel",
            key_text,
        );

        let [first_area, second_area, status_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(2),
            ])
            .areas(body);

        render_carousel(
            frame,
            first_area,
            "First carousel",
            selection.slot_a(),
            self.cursor_a,
            self.carousel_focus == CarouselSlot::SlotA,
        );
        render_carousel(
            frame,
            second_area,
            "Second carousel",
            selection.slot_b(),
            self.cursor_b,
            self.carousel_focus == CarouselSlot::SlotB,
        );

        frame.render_widget(
            wrapped_paragraph(Text::from(vec![gate_action_line(
                "End",
                self.controller.can_advance(),
            )])),
            status_area,
        );
    }

    fn render_complete(&self, frame: &mut ratatui::Frame<'_>) {
        let key_text = compact_hint(
            frame.area().width,
            "Enter/q: quit questline    b: back to start",
            "Enter/q: quit    b: back to start",
            "Enter/q quit | b back",
        );
        let body = screen_scaffold(
            frame,
            self.controller.position().title(),
            "You made it",
            key_text,
        );

        let text = Text::from(vec![
            Line::from(Span::styled("Congratulations!", theme::success_prompt())),
            Line::from(""),
            Line::from("You have cleared every level of the questline."),
            Line::from(""),
            Line::from(Span::styled(
                "Back to Start (b) is recorded but goes nowhere",
                theme::secondary_text(),
            )),
        ]);
        frame.render_widget(wrapped_paragraph(text), body);
    }
}

fn screen_scaffold(
    frame: &mut ratatui::Frame<'_>,
    title: &str,
    subtitle: &str,
    key_text: &str,
) -> Rect {
    let area = frame.area();
    let footer_height = key_hint_height(area.width, key_text);
    let [header, body, footer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(footer_height),
        ])
        .areas(area);

    let header_text = Text::from(vec![Line::from("questline"), focus_line(subtitle)]);
    frame.render_widget(
        wrapped_paragraph(header_text).block(theme::chrome(title)),
        header,
    );

    frame.render_widget(
        key_hint_paragraph(key_text).block(theme::key_block()),
        footer,
    );

    body.inner(Margin {
        vertical: 1,
        horizontal: 2,
    })
}

fn render_input_block(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    input: &Input,
    focused: bool,
    masked: bool,
) {
    let block = if focused {
        theme::chrome(focus_line(title))
    } else {
        theme::chrome(title)
    };

    let inner = area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    });
    let width = inner.width as usize;
    let scroll = input.visual_scroll(width.max(1));
    let display = if masked {
        "*".repeat(input.value().chars().count())
    } else {
        input.value().to_string()
    };
    let paragraph = Paragraph::new(display)
        .scroll((0, scroll as u16))
        .block(block);
    frame.render_widget(paragraph, area);

    if focused && width > 0 {
        let visual = input.visual_cursor();
        let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
        frame.set_cursor_position((inner.x + relative as u16, inner.y));
    }
}

fn render_carousel(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    selected: Option<usize>,
    cursor: usize,
    focused: bool,
) {
    let block = if focused {
        theme::chrome(focus_line(title))
    } else {
        theme::chrome(title)
    };

    let mut cells = Vec::new();
    for index in 0..CAROUSEL_LEN {
        if index > 0 {
            cells.push(Span::raw(" "));
        }
        let marker = if selected == Some(index) { "*" } else { " " };
        let cell = format!("[{marker}{}]", index + 1);
        if focused && cursor == index {
            cells.push(Span::styled(cell, theme::highlight(Color::Cyan)));
        } else if selected == Some(index) {
            cells.push(Span::styled(cell, theme::success_prompt()));
        } else {
            cells.push(Span::raw(cell));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(cells)).block(block),
        area,
    );
}
