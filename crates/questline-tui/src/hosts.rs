use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use crossterm::event::KeyEvent;
use questline_core::gateway::{
    ConfirmEvent, ConfirmPromptGateway, ConfirmRequest, MediaPickEvent, MediaPickerGateway,
};
use questline_core::media::list_image_candidates;
use ratatui::style::Color;
use ratatui::text::{Line, Span, Text};

use crate::keymap;
use crate::theme;
use crate::ui::binary_choice::{BinaryChoice, BinaryChoiceEvent};
use crate::ui::image_list::ImageList;
use crate::ui::modal::{ModalSpec, render_modal};
use crate::ui::text::{compact_hint, highlighted_selection_line};

struct ConfirmModal {
    request: ConfirmRequest,
    choice: BinaryChoice,
    token: u64,
    sender: Sender<ConfirmEvent>,
}

/// Confirm prompt gateway backed by a modal overlay. `spawn_confirm` parks
/// the request until the user answers; the answer travels back on the
/// request's channel. A dropped receiver (flow reset underneath the modal)
/// makes the send a no-op, which is exactly the discard the flow wants.
#[derive(Default)]
pub(crate) struct ModalConfirmHost {
    pending: Mutex<Option<ConfirmModal>>,
}

impl ModalConfirmHost {
    pub(crate) fn is_open(&self) -> bool {
        self.lock_pending().is_some()
    }

    pub(crate) fn on_key(&self, key: KeyEvent) -> bool {
        let mut slot = self.pending.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(modal) = slot.as_mut() else {
            return false;
        };

        match modal.choice.on_key(key) {
            BinaryChoiceEvent::Continue => {}
            BinaryChoiceEvent::ConfirmYes => {
                let _ = modal.sender.send(ConfirmEvent::Done {
                    token: modal.token,
                    accepted: true,
                });
                *slot = None;
            }
            BinaryChoiceEvent::ConfirmNo | BinaryChoiceEvent::Dismiss => {
                let _ = modal.sender.send(ConfirmEvent::Done {
                    token: modal.token,
                    accepted: false,
                });
                *slot = None;
            }
        }
        true
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        let slot = self.lock_pending();
        let Some(modal) = slot.as_ref() else {
            return;
        };

        let key_text = compact_hint(
            frame.area().width,
            "Space/Left/Right: toggle    Enter: confirm    Esc: no",
            "Space: toggle    Enter: confirm    Esc: no",
            "Space toggle | Enter confirm | Esc no",
        );
        render_modal(
            frame,
            ModalSpec {
                title: &modal.request.title,
                title_style: Some(theme::focus_prompt()),
                body: Text::from(vec![
                    Line::from(modal.request.message.clone()),
                    Line::from(""),
                    highlighted_selection_line(modal.choice.selected_label()),
                ]),
                key_hint: Some(key_text),
                width_pct: 64,
                height_pct: 40,
            },
        );
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<ConfirmModal>> {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ConfirmPromptGateway for ModalConfirmHost {
    fn spawn_confirm(&self, request: ConfirmRequest, token: u64) -> Receiver<ConfirmEvent> {
        let (sender, receiver) = mpsc::channel();
        *self.lock_pending() = Some(ConfirmModal {
            request,
            choice: BinaryChoice::new(true),
            token,
            sender,
        });
        receiver
    }
}

struct PickerModal {
    list: ImageList,
    notice: Option<String>,
    token: u64,
    sender: Sender<MediaPickEvent>,
}

/// Image picker gateway backed by a flat file list over the configured media
/// directory, restricted to the configured image extensions.
pub(crate) struct ImagePickerHost {
    media_dir: PathBuf,
    extensions: Vec<String>,
    pending: Mutex<Option<PickerModal>>,
}

impl ImagePickerHost {
    pub(crate) fn new(media_dir: PathBuf, extensions: Vec<String>) -> Self {
        Self {
            media_dir,
            extensions,
            pending: Mutex::new(None),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.lock_pending().is_some()
    }

    pub(crate) fn on_key(&self, key: KeyEvent) -> bool {
        let mut slot = self.pending.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(modal) = slot.as_mut() else {
            return false;
        };

        if keymap::is_back(key) {
            let _ = modal.sender.send(MediaPickEvent::Done {
                token: modal.token,
                image: None,
            });
            *slot = None;
            return true;
        }

        if keymap::is_up(key) {
            modal.list.move_up();
            return true;
        }

        if keymap::is_down(key) {
            modal.list.move_down();
            return true;
        }

        if keymap::is_confirm(key) {
            // Enter with nothing listed is inert; only Esc resolves then.
            if let Some(image) = modal.list.current().cloned() {
                let _ = modal.sender.send(MediaPickEvent::Done {
                    token: modal.token,
                    image: Some(image),
                });
                *slot = None;
            }
            return true;
        }

        true
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        let slot = self.lock_pending();
        let Some(modal) = slot.as_ref() else {
            return;
        };

        let key_text = compact_hint(
            frame.area().width,
            "Up/Down or j/k: move    Enter: pick    Esc: cancel",
            "j/k: move    Enter: pick    Esc: cancel",
            "j/k move | Enter pick | Esc cancel",
        );

        let mut body_lines = Vec::new();
        if let Some(notice) = &modal.notice {
            body_lines.push(Line::from(notice.clone()));
        }
        for (index, item) in modal.list.items().iter().enumerate() {
            let marker = if modal.list.selected() == index {
                ">>"
            } else {
                "  "
            };
            let line = format!("{marker} {}", item.name);
            if modal.list.selected() == index {
                body_lines.push(Line::from(Span::styled(
                    line,
                    theme::highlight(Color::Cyan),
                )));
            } else {
                body_lines.push(Line::from(line));
            }
        }

        render_modal(
            frame,
            ModalSpec {
                title: "Pick an image",
                title_style: Some(theme::focus_prompt()),
                body: Text::from(body_lines),
                key_hint: Some(key_text),
                width_pct: 70,
                height_pct: 60,
            },
        );
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<PickerModal>> {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl MediaPickerGateway for ImagePickerHost {
    fn spawn_pick(&self, token: u64) -> Receiver<MediaPickEvent> {
        let (sender, receiver) = mpsc::channel();

        let (items, notice) = match list_image_candidates(&self.media_dir, &self.extensions) {
            Ok(candidates) if candidates.is_empty() => (
                Vec::new(),
                Some(format!(
                    "No images found in {}",
                    self.media_dir.display()
                )),
            ),
            Ok(candidates) => (candidates, None),
            Err(error) => (Vec::new(), Some(error.to_string())),
        };

        *self.lock_pending() = Some(PickerModal {
            list: ImageList::from_candidates(items),
            notice,
            token,
            sender,
        });
        receiver
    }
}
