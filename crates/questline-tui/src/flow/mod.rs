mod render;

use std::path::Path;
use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use questline_core::config::QuestlineConfig;
use questline_core::controller::NavigationController;
use questline_core::diagnostics;
use questline_core::flow::FlowPosition;
use questline_core::screen::{CAROUSEL_LEN, ScreenState};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::UiExit;
use crate::hosts::{ImagePickerHost, ModalConfirmHost};
use crate::keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowSignal {
    Continue,
    Exit(UiExit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactField {
    Email,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarouselSlot {
    SlotA,
    SlotB,
}

/// Presentation shell around the navigation controller: text input widgets,
/// carousel cursors, and the two modal gateway hosts. All gating decisions
/// stay in the controller; this type only translates keys.
pub(crate) struct FlowScreen {
    controller: NavigationController,
    confirm_host: Arc<ModalConfirmHost>,
    picker_host: Arc<ImagePickerHost>,
    last_position: FlowPosition,
    username_input: Input,
    password_input: Input,
    login_focus: LoginField,
    email_input: Input,
    phone_input: Input,
    contact_focus: ContactField,
    carousel_focus: CarouselSlot,
    cursor_a: usize,
    cursor_b: usize,
}

impl FlowScreen {
    pub(crate) fn new(config: &QuestlineConfig, cwd: &Path) -> Self {
        let confirm_host = Arc::new(ModalConfirmHost::default());
        let picker_host = Arc::new(ImagePickerHost::new(
            config.media_dir(cwd),
            config.media.extensions.clone(),
        ));
        let controller = NavigationController::new(picker_host.clone(), confirm_host.clone());
        let last_position = controller.position();

        Self {
            controller,
            confirm_host,
            picker_host,
            last_position,
            username_input: Input::default(),
            password_input: Input::default(),
            login_focus: LoginField::Username,
            email_input: Input::default(),
            phone_input: Input::default(),
            contact_focus: ContactField::Email,
            carousel_focus: CarouselSlot::SlotA,
            cursor_a: 0,
            cursor_b: 0,
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Option<UiExit> {
        let signal = self.route_key(key);
        self.controller.on_tick();
        self.refresh_after_events();
        match signal {
            FlowSignal::Continue => None,
            FlowSignal::Exit(exit) => Some(exit),
        }
    }

    pub(crate) fn on_tick(&mut self) {
        self.controller.on_tick();
        self.refresh_after_events();
    }

    fn route_key(&mut self, key: KeyEvent) -> FlowSignal {
        // Open modal overlays swallow input before the screen sees it.
        if self.confirm_host.on_key(key) || self.picker_host.on_key(key) {
            return FlowSignal::Continue;
        }

        match self.controller.position() {
            FlowPosition::Login => self.on_key_login(key),
            FlowPosition::Level1 => self.on_key_contact(key),
            FlowPosition::Level2 => self.on_key_feature(key),
            FlowPosition::Level3 => self.on_key_media(key),
            FlowPosition::Level4 => self.on_key_dual_select(key),
            FlowPosition::Complete => self.on_key_complete(key),
        }
    }

    fn on_key_login(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_sign_up(key) {
            diagnostics::record("sign up requested (no-op)");
            return FlowSignal::Continue;
        }

        if keymap::is_switch_focus(key) {
            self.login_focus = match self.login_focus {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
            return FlowSignal::Continue;
        }

        if keymap::is_confirm(key) {
            self.controller.advance();
            return FlowSignal::Continue;
        }

        let input = match self.login_focus {
            LoginField::Username => &mut self.username_input,
            LoginField::Password => &mut self.password_input,
        };
        if input.handle_event(&Event::Key(key)).is_some() {
            let value = input.value().to_string();
            if let ScreenState::Login(credentials) = self.controller.screen_mut() {
                match self.login_focus {
                    LoginField::Username => credentials.set_username(value),
                    LoginField::Password => credentials.set_password(value),
                }
            }
        }

        FlowSignal::Continue
    }

    fn on_key_contact(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_switch_focus(key) {
            self.contact_focus = match self.contact_focus {
                ContactField::Email => ContactField::Phone,
                ContactField::Phone => ContactField::Email,
            };
            return FlowSignal::Continue;
        }

        if keymap::is_confirm(key) {
            self.controller.advance();
            return FlowSignal::Continue;
        }

        let input = match self.contact_focus {
            ContactField::Email => &mut self.email_input,
            ContactField::Phone => &mut self.phone_input,
        };
        if input.handle_event(&Event::Key(key)).is_some() {
            let value = input.value().to_string();
            if let ScreenState::Level1(contact) = self.controller.screen_mut() {
                match self.contact_focus {
                    ContactField::Email => contact.set_email(value),
                    ContactField::Phone => contact.set_phone(value),
                }
            }
        }

        FlowSignal::Continue
    }

    fn on_key_feature(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_confirm(key) {
            self.controller.advance();
            return FlowSignal::Continue;
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            10.0
        } else {
            1.0
        };

        if let ScreenState::Level2(feature) = self.controller.screen_mut() {
            if keymap::is_toggle(key) {
                feature.toggle_enabled();
            } else if keymap::is_left(key) {
                feature.adjust_intensity(-step);
            } else if keymap::is_right(key) {
                feature.adjust_intensity(step);
            }
        }

        FlowSignal::Continue
    }

    fn on_key_media(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_confirm(key) {
            // Finish: the controller spawns the confirm prompt when gated on.
            self.controller.advance();
            return FlowSignal::Continue;
        }

        if matches!(key.code, KeyCode::Char('i')) {
            self.controller.begin_image_pick();
            return FlowSignal::Continue;
        }

        if let ScreenState::Level3(media) = self.controller.screen_mut() {
            if keymap::is_left(key) {
                media.set_mode(media.mode().cycle_left());
            } else if keymap::is_right(key) {
                media.set_mode(media.mode().cycle_right());
            }
        }

        FlowSignal::Continue
    }

    fn on_key_dual_select(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_confirm(key) {
            self.controller.advance();
            return FlowSignal::Continue;
        }

        if keymap::is_switch_focus(key) {
            self.carousel_focus = match self.carousel_focus {
                CarouselSlot::SlotA => CarouselSlot::SlotB,
                CarouselSlot::SlotB => CarouselSlot::SlotA,
            };
            return FlowSignal::Continue;
        }

        let cursor = match self.carousel_focus {
            CarouselSlot::SlotA => &mut self.cursor_a,
            CarouselSlot::SlotB => &mut self.cursor_b,
        };

        if keymap::is_left(key) {
            *cursor = cursor.saturating_sub(1);
            return FlowSignal::Continue;
        }

        if keymap::is_right(key) {
            if *cursor + 1 < CAROUSEL_LEN {
                *cursor += 1;
            }
            return FlowSignal::Continue;
        }

        if keymap::is_toggle(key) {
            let index = *cursor;
            if let ScreenState::Level4(selection) = self.controller.screen_mut() {
                match self.carousel_focus {
                    CarouselSlot::SlotA => selection.select_slot_a(index),
                    CarouselSlot::SlotB => selection.select_slot_b(index),
                }
            }
        }

        FlowSignal::Continue
    }

    fn on_key_complete(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_back_to_start(key) {
            diagnostics::record("back to start requested (no-op)");
            return FlowSignal::Continue;
        }

        if keymap::is_confirm(key) || keymap::is_quit(key) || keymap::is_back(key) {
            return FlowSignal::Exit(UiExit::Completed);
        }

        FlowSignal::Continue
    }

    fn refresh_after_events(&mut self) {
        let position = self.controller.position();
        if position != self.last_position {
            self.last_position = position;
            self.reset_screen_widgets();
            diagnostics::record(format!("advanced to {}", position.title()));
        }
    }

    // Screens never share widget state; a transition always lands on a blank
    // slate, matching the fresh holder the controller installs.
    fn reset_screen_widgets(&mut self) {
        self.username_input = Input::default();
        self.password_input = Input::default();
        self.login_focus = LoginField::Username;
        self.email_input = Input::default();
        self.phone_input = Input::default();
        self.contact_focus = ContactField::Email;
        self.carousel_focus = CarouselSlot::SlotA;
        self.cursor_a = 0;
        self.cursor_b = 0;
    }
}
