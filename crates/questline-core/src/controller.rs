use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use crate::flow::{self, FlowPosition};
use crate::gateway::{
    ConfirmEvent, ConfirmPromptGateway, ConfirmRequest, MediaPickEvent, MediaPickerGateway,
};
use crate::screen::ScreenState;

pub const CONFIRM_TITLE: &str = "Confirmation";
pub const CONFIRM_MESSAGE: &str = "Are you sure you want to continue?";

struct PendingPick {
    token: u64,
    receiver: Receiver<MediaPickEvent>,
}

struct PendingConfirm {
    token: u64,
    receiver: Receiver<ConfirmEvent>,
}

/// Owns the single current flow position and the single current screen
/// holder. All transitions funnel through `advance`/`reset`; gateway
/// resolutions land via `on_tick`. Gate-unsatisfied calls are silent no-ops,
/// never errors.
pub struct NavigationController {
    position: FlowPosition,
    screen: ScreenState,
    media_picker: Arc<dyn MediaPickerGateway>,
    confirm_prompt: Arc<dyn ConfirmPromptGateway>,
    pending_pick: Option<PendingPick>,
    pending_confirm: Option<PendingConfirm>,
    next_token: u64,
}

impl NavigationController {
    pub fn new(
        media_picker: Arc<dyn MediaPickerGateway>,
        confirm_prompt: Arc<dyn ConfirmPromptGateway>,
    ) -> Self {
        Self {
            position: flow::reset_target(),
            screen: ScreenState::fresh(flow::reset_target()),
            media_picker,
            confirm_prompt,
            pending_pick: None,
            pending_confirm: None,
            next_token: 1,
        }
    }

    pub fn position(&self) -> FlowPosition {
        self.position
    }

    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut ScreenState {
        &mut self.screen
    }

    pub fn can_advance(&self) -> bool {
        self.screen.can_advance()
    }

    pub fn is_confirming(&self) -> bool {
        self.pending_confirm.is_some()
    }

    pub fn is_picking(&self) -> bool {
        self.pending_pick.is_some()
    }

    /// Forward transition request. Ignored (not queued) while a confirm is
    /// already in flight or the current gate is unsatisfied. Level3 does not
    /// transition directly: its Finish spawns the confirm prompt and enters
    /// the confirming sub-state.
    pub fn advance(&mut self) {
        if self.pending_confirm.is_some() || !self.screen.can_advance() {
            return;
        }

        if self.position == FlowPosition::Level3 {
            let token = self.allocate_token();
            let receiver = self.confirm_prompt.spawn_confirm(
                ConfirmRequest {
                    title: CONFIRM_TITLE.to_string(),
                    message: CONFIRM_MESSAGE.to_string(),
                },
                token,
            );
            self.pending_confirm = Some(PendingConfirm { token, receiver });
            return;
        }

        self.transition_forward();
    }

    /// Opens the media picker for Level3's image slot. A no-op anywhere else,
    /// while a pick or confirm is already pending, or while the current mode
    /// has no image affordance.
    pub fn begin_image_pick(&mut self) {
        if self.pending_pick.is_some() || self.pending_confirm.is_some() {
            return;
        }
        let ScreenState::Level3(media) = &self.screen else {
            return;
        };
        if !media.image_pick_available() {
            return;
        }

        let token = self.allocate_token();
        let receiver = self.media_picker.spawn_pick(token);
        self.pending_pick = Some(PendingPick { token, receiver });
    }

    /// Unconditional return to Login with a fresh credential holder. Pending
    /// gateway requests are abandoned; their late answers have no channel to
    /// arrive on.
    pub fn reset(&mut self) {
        self.position = flow::reset_target();
        self.screen = ScreenState::fresh(self.position);
        self.pending_pick = None;
        self.pending_confirm = None;
    }

    pub fn on_tick(&mut self) {
        self.drain_pick();
        self.drain_confirm();
    }

    fn transition_forward(&mut self) {
        self.position = self.position.next();
        self.screen = ScreenState::fresh(self.position);
    }

    fn allocate_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token = self.next_token.saturating_add(1);
        token
    }

    fn drain_pick(&mut self) {
        let mut events = Vec::new();
        let mut disconnected = false;
        if let Some(pending) = &self.pending_pick {
            loop {
                match pending.receiver.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        for event in events {
            self.apply_pick_event(event);
        }

        // Host went away without answering: same outcome as a dismissal.
        if disconnected && self.pending_pick.is_some() {
            self.pending_pick = None;
        }
    }

    fn apply_pick_event(&mut self, event: MediaPickEvent) {
        let MediaPickEvent::Done { token, image } = event;
        let Some(pending) = &self.pending_pick else {
            return;
        };
        if token != pending.token {
            return;
        }

        self.pending_pick = None;

        // Single-active-screen invariant should make this unreachable, but a
        // late result must never land on stale state.
        let ScreenState::Level3(media) = &mut self.screen else {
            return;
        };
        if let Some(image) = image {
            media.set_picked_image(Some(image));
        }
    }

    fn drain_confirm(&mut self) {
        let mut events = Vec::new();
        let mut disconnected = false;
        if let Some(pending) = &self.pending_confirm {
            loop {
                match pending.receiver.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        for event in events {
            self.apply_confirm_event(event);
        }

        if disconnected && self.pending_confirm.is_some() {
            self.pending_confirm = None;
        }
    }

    fn apply_confirm_event(&mut self, event: ConfirmEvent) {
        let ConfirmEvent::Done { token, accepted } = event;
        let Some(pending) = &self.pending_confirm else {
            return;
        };
        if token != pending.token {
            return;
        }

        self.pending_confirm = None;

        if !accepted {
            return;
        }

        if let ScreenState::Level3(media) = &mut self.screen {
            media.mark_confirmed();
        }
        if self.position == FlowPosition::Level3 {
            self.transition_forward();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::sync::mpsc::{self, Sender};

    use crate::flow::FlowPosition;
    use crate::gateway::{
        ConfirmEvent, ConfirmPromptGateway, ConfirmRequest, MediaPickEvent, MediaPickerGateway,
    };
    use crate::media::ImageHandle;
    use crate::screen::{MediaMode, ScreenState};

    use super::{CONFIRM_MESSAGE, CONFIRM_TITLE, NavigationController};

    #[derive(Default)]
    struct ScriptedMediaPicker {
        calls: Mutex<Vec<u64>>,
        senders: Mutex<Vec<Sender<MediaPickEvent>>>,
    }

    impl ScriptedMediaPicker {
        fn call_count(&self) -> usize {
            self.calls.lock().expect("calls lock").len()
        }

        fn last_token(&self) -> u64 {
            *self
                .calls
                .lock()
                .expect("calls lock")
                .last()
                .expect("pick call should exist")
        }

        fn send(&self, event: MediaPickEvent) {
            let sender = self
                .senders
                .lock()
                .expect("senders lock")
                .last()
                .cloned()
                .expect("pick sender should exist");
            sender.send(event).expect("send pick event");
        }
    }

    impl MediaPickerGateway for ScriptedMediaPicker {
        fn spawn_pick(&self, token: u64) -> mpsc::Receiver<MediaPickEvent> {
            self.calls.lock().expect("calls lock").push(token);
            let (sender, receiver) = mpsc::channel();
            self.senders.lock().expect("senders lock").push(sender);
            receiver
        }
    }

    #[derive(Default)]
    struct ScriptedConfirmPrompt {
        calls: Mutex<Vec<(ConfirmRequest, u64)>>,
        senders: Mutex<Vec<Sender<ConfirmEvent>>>,
    }

    impl ScriptedConfirmPrompt {
        fn call_count(&self) -> usize {
            self.calls.lock().expect("calls lock").len()
        }

        fn last_call(&self) -> (ConfirmRequest, u64) {
            self.calls
                .lock()
                .expect("calls lock")
                .last()
                .cloned()
                .expect("confirm call should exist")
        }

        fn send(&self, event: ConfirmEvent) {
            let sender = self
                .senders
                .lock()
                .expect("senders lock")
                .last()
                .cloned()
                .expect("confirm sender should exist");
            sender.send(event).expect("send confirm event");
        }

        fn close_channel(&self) {
            let _ = self.senders.lock().expect("senders lock").pop();
        }
    }

    impl ConfirmPromptGateway for ScriptedConfirmPrompt {
        fn spawn_confirm(
            &self,
            request: ConfirmRequest,
            token: u64,
        ) -> mpsc::Receiver<ConfirmEvent> {
            self.calls.lock().expect("calls lock").push((request, token));
            let (sender, receiver) = mpsc::channel();
            self.senders.lock().expect("senders lock").push(sender);
            receiver
        }
    }

    fn controller() -> (
        NavigationController,
        Arc<ScriptedMediaPicker>,
        Arc<ScriptedConfirmPrompt>,
    ) {
        let picker = Arc::new(ScriptedMediaPicker::default());
        let prompt = Arc::new(ScriptedConfirmPrompt::default());
        let controller = NavigationController::new(picker.clone(), prompt.clone());
        (controller, picker, prompt)
    }

    fn image() -> ImageHandle {
        ImageHandle::from_path("/tmp/photos/cat.png".into())
    }

    fn satisfy_login(controller: &mut NavigationController) {
        let ScreenState::Login(credentials) = controller.screen_mut() else {
            panic!("expected login screen");
        };
        credentials.set_username("ariel");
        credentials.set_password("hunter2");
    }

    fn satisfy_contact(controller: &mut NavigationController) {
        let ScreenState::Level1(contact) = controller.screen_mut() else {
            panic!("expected level 1 screen");
        };
        contact.set_email("a@b");
        contact.set_phone("555");
    }

    fn satisfy_feature(controller: &mut NavigationController) {
        let ScreenState::Level2(feature) = controller.screen_mut() else {
            panic!("expected level 2 screen");
        };
        feature.set_enabled(true);
        feature.set_intensity(75.0);
    }

    fn satisfy_media(controller: &mut NavigationController) {
        let ScreenState::Level3(media) = controller.screen_mut() else {
            panic!("expected level 3 screen");
        };
        media.set_mode(MediaMode::OptionB);
        media.set_picked_image(Some(image()));
    }

    fn satisfy_dual_select(controller: &mut NavigationController) {
        let ScreenState::Level4(selection) = controller.screen_mut() else {
            panic!("expected level 4 screen");
        };
        selection.select_slot_a(4);
        selection.select_slot_b(4);
    }

    #[test]
    fn advance_with_unsatisfied_gate_is_an_idempotent_noop() {
        let (mut controller, _picker, prompt) = controller();

        controller.advance();
        controller.advance();

        assert_eq!(controller.position(), FlowPosition::Login);
        assert_eq!(
            controller.screen(),
            &ScreenState::fresh(FlowPosition::Login)
        );
        assert_eq!(prompt.call_count(), 0);
    }

    #[test]
    fn login_scenario_gates_then_advances_to_fresh_contact() {
        let (mut controller, _picker, _prompt) = controller();

        {
            let ScreenState::Login(credentials) = controller.screen_mut() else {
                panic!("expected login screen");
            };
            credentials.set_password("x");
        }
        assert!(!controller.can_advance());

        {
            let ScreenState::Login(credentials) = controller.screen_mut() else {
                panic!("expected login screen");
            };
            credentials.set_username("a");
        }
        assert!(controller.can_advance());

        controller.advance();
        assert_eq!(controller.position(), FlowPosition::Level1);
        assert_eq!(
            controller.screen(),
            &ScreenState::fresh(FlowPosition::Level1)
        );
    }

    #[test]
    fn satisfied_gates_walk_forward_without_revisiting() {
        let (mut controller, _picker, prompt) = controller();
        let mut visited = vec![controller.position()];

        satisfy_login(&mut controller);
        controller.advance();
        visited.push(controller.position());

        satisfy_contact(&mut controller);
        controller.advance();
        visited.push(controller.position());

        satisfy_feature(&mut controller);
        controller.advance();
        visited.push(controller.position());

        satisfy_media(&mut controller);
        controller.advance();
        let (_, token) = prompt.last_call();
        prompt.send(ConfirmEvent::Done {
            token,
            accepted: true,
        });
        controller.on_tick();
        visited.push(controller.position());

        satisfy_dual_select(&mut controller);
        controller.advance();
        visited.push(controller.position());

        assert_eq!(
            visited,
            vec![
                FlowPosition::Login,
                FlowPosition::Level1,
                FlowPosition::Level2,
                FlowPosition::Level3,
                FlowPosition::Level4,
                FlowPosition::Complete,
            ]
        );

        controller.advance();
        assert_eq!(controller.position(), FlowPosition::Complete);
    }

    #[test]
    fn level3_finish_spawns_confirm_and_enters_confirming() {
        let (mut controller, _picker, prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();
        satisfy_media(&mut controller);

        controller.advance();

        assert!(controller.is_confirming());
        assert_eq!(controller.position(), FlowPosition::Level3);
        let (request, _token) = prompt.last_call();
        assert_eq!(request.title, CONFIRM_TITLE);
        assert_eq!(request.message, CONFIRM_MESSAGE);
    }

    #[test]
    fn confirm_no_returns_to_level3_unchanged() {
        let (mut controller, _picker, prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();
        satisfy_media(&mut controller);
        controller.advance();

        let (_, token) = prompt.last_call();
        prompt.send(ConfirmEvent::Done {
            token,
            accepted: false,
        });
        controller.on_tick();

        assert!(!controller.is_confirming());
        assert_eq!(controller.position(), FlowPosition::Level3);
        let ScreenState::Level3(media) = controller.screen() else {
            panic!("expected level 3 screen");
        };
        assert!(media.picked_image().is_some());
        assert!(!media.confirmed());
    }

    #[test]
    fn confirm_yes_transitions_to_fresh_level4() {
        let (mut controller, _picker, prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();
        satisfy_media(&mut controller);
        controller.advance();

        let (_, token) = prompt.last_call();
        prompt.send(ConfirmEvent::Done {
            token,
            accepted: true,
        });
        controller.on_tick();

        assert!(!controller.is_confirming());
        assert_eq!(controller.position(), FlowPosition::Level4);
        assert_eq!(
            controller.screen(),
            &ScreenState::fresh(FlowPosition::Level4)
        );
    }

    #[test]
    fn finish_while_confirming_is_ignored_not_queued() {
        let (mut controller, _picker, prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();
        satisfy_media(&mut controller);

        controller.advance();
        controller.advance();
        controller.advance();

        assert_eq!(prompt.call_count(), 1);
    }

    #[test]
    fn confirm_channel_disconnect_resolves_as_dismissal() {
        let (mut controller, _picker, prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();
        satisfy_media(&mut controller);
        controller.advance();

        prompt.close_channel();
        controller.on_tick();

        assert!(!controller.is_confirming());
        assert_eq!(controller.position(), FlowPosition::Level3);
    }

    #[test]
    fn image_pick_applies_to_current_level3_state() {
        let (mut controller, picker, _prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();

        assert!(!controller.can_advance());
        controller.begin_image_pick();
        assert!(controller.is_picking());

        picker.send(MediaPickEvent::Done {
            token: picker.last_token(),
            image: Some(image()),
        });
        controller.on_tick();

        assert!(!controller.is_picking());
        assert!(controller.can_advance());
    }

    #[test]
    fn pick_request_requires_image_backed_mode() {
        let (mut controller, picker, _prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();

        {
            let ScreenState::Level3(media) = controller.screen_mut() else {
                panic!("expected level 3 screen");
            };
            media.set_mode(MediaMode::OptionA);
        }
        controller.begin_image_pick();

        assert_eq!(picker.call_count(), 0);
        assert!(!controller.is_picking());
    }

    #[test]
    fn pick_cancel_leaves_state_unchanged() {
        let (mut controller, picker, _prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();

        controller.begin_image_pick();
        picker.send(MediaPickEvent::Done {
            token: picker.last_token(),
            image: None,
        });
        controller.on_tick();

        assert!(!controller.is_picking());
        let ScreenState::Level3(media) = controller.screen() else {
            panic!("expected level 3 screen");
        };
        assert!(media.picked_image().is_none());
    }

    #[test]
    fn pick_result_with_stale_token_is_discarded() {
        let (mut controller, picker, _prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();

        controller.begin_image_pick();
        let token = picker.last_token();
        picker.send(MediaPickEvent::Done {
            token: token + 1000,
            image: Some(image()),
        });
        controller.on_tick();

        let ScreenState::Level3(media) = controller.screen() else {
            panic!("expected level 3 screen");
        };
        assert!(media.picked_image().is_none());
        assert!(controller.is_picking());

        picker.send(MediaPickEvent::Done {
            token,
            image: Some(image()),
        });
        controller.on_tick();
        assert!(controller.can_advance());
    }

    #[test]
    fn second_pick_request_while_pending_is_ignored() {
        let (mut controller, picker, _prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();

        controller.begin_image_pick();
        controller.begin_image_pick();

        assert_eq!(picker.call_count(), 1);
    }

    #[test]
    fn reset_abandons_pending_pick_and_returns_to_login() {
        let (mut controller, _picker, _prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();
        controller.begin_image_pick();

        controller.reset();

        assert!(!controller.is_picking());
        assert_eq!(controller.position(), FlowPosition::Login);
        assert_eq!(
            controller.screen(),
            &ScreenState::fresh(FlowPosition::Login)
        );
    }

    #[test]
    fn reset_from_complete_returns_to_fresh_login() {
        let (mut controller, _picker, prompt) = controller();
        satisfy_login(&mut controller);
        controller.advance();
        satisfy_contact(&mut controller);
        controller.advance();
        satisfy_feature(&mut controller);
        controller.advance();
        satisfy_media(&mut controller);
        controller.advance();
        let (_, token) = prompt.last_call();
        prompt.send(ConfirmEvent::Done {
            token,
            accepted: true,
        });
        controller.on_tick();
        satisfy_dual_select(&mut controller);
        controller.advance();
        assert_eq!(controller.position(), FlowPosition::Complete);

        controller.reset();

        assert_eq!(controller.position(), FlowPosition::Login);
        let ScreenState::Login(credentials) = controller.screen() else {
            panic!("expected login screen");
        };
        assert!(credentials.username().is_empty());
        assert!(credentials.password().is_empty());
    }
}
