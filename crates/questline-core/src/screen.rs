use crate::flow::FlowPosition;
use crate::gates;
use crate::media::ImageHandle;

pub const CAROUSEL_LEN: usize = 5;
pub const CAROUSEL_TARGET: usize = CAROUSEL_LEN - 1;
pub const INTENSITY_GATE: f64 = 50.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialState {
    username: String,
    password: String,
}

impl CredentialState {
    pub fn set_username(&mut self, value: impl Into<String>) {
        self.username = value.into();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn can_advance(&self) -> bool {
        gates::both_true(
            gates::is_non_empty(&self.username),
            gates::is_non_empty(&self.password),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactState {
    email: String,
    phone: String,
}

impl ContactState {
    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = value.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    // Deliberately the same literal non-empty check the login screen uses;
    // email/phone formats are not validated.
    pub fn can_advance(&self) -> bool {
        gates::both_true(
            gates::is_non_empty(&self.email),
            gates::is_non_empty(&self.phone),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureState {
    enabled: bool,
    intensity: f64,
}

impl FeatureState {
    pub fn set_enabled(&mut self, value: bool) {
        self.enabled = value;
    }

    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Slider semantics: values land clamped into [0, 100].
    pub fn set_intensity(&mut self, value: f64) {
        self.intensity = value.clamp(0.0, 100.0);
    }

    pub fn adjust_intensity(&mut self, delta: f64) {
        self.set_intensity(self.intensity + delta);
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn can_advance(&self) -> bool {
        gates::both_true(
            self.enabled,
            gates::is_above_threshold(self.intensity, INTENSITY_GATE),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaMode {
    OptionA,
    OptionB,
    OptionC,
}

impl MediaMode {
    pub const ALL: [MediaMode; 3] = [Self::OptionA, Self::OptionB, Self::OptionC];

    pub fn label(self) -> &'static str {
        match self {
            Self::OptionA => "Option 1",
            Self::OptionB => "Option 2",
            Self::OptionC => "Option 3",
        }
    }

    pub fn cycle_left(self) -> Self {
        match self {
            Self::OptionA => Self::OptionC,
            Self::OptionB => Self::OptionA,
            Self::OptionC => Self::OptionB,
        }
    }

    pub fn cycle_right(self) -> Self {
        match self {
            Self::OptionA => Self::OptionB,
            Self::OptionB => Self::OptionC,
            Self::OptionC => Self::OptionA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaState {
    mode: MediaMode,
    picked_image: Option<ImageHandle>,
    confirmed: bool,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            mode: MediaMode::OptionB,
            picked_image: None,
            confirmed: false,
        }
    }
}

impl MediaState {
    pub fn set_mode(&mut self, mode: MediaMode) {
        self.mode = mode;
    }

    pub fn set_picked_image(&mut self, image: Option<ImageHandle>) {
        self.picked_image = image;
    }

    pub fn mark_confirmed(&mut self) {
        self.confirmed = true;
    }

    pub fn mode(&self) -> MediaMode {
        self.mode
    }

    pub fn picked_image(&self) -> Option<&ImageHandle> {
        self.picked_image.as_ref()
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn image_pick_available(&self) -> bool {
        self.mode == MediaMode::OptionB
    }

    // A previously picked image survives a mode switch in the holder, but
    // the gate ignores it unless the image-backed mode is active.
    pub fn can_advance(&self) -> bool {
        gates::both_true(self.mode == MediaMode::OptionB, self.picked_image.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DualSelectState {
    slot_a: Option<usize>,
    slot_b: Option<usize>,
}

impl DualSelectState {
    pub fn select_slot_a(&mut self, index: usize) {
        if index < CAROUSEL_LEN {
            self.slot_a = Some(index);
        }
    }

    pub fn select_slot_b(&mut self, index: usize) {
        if index < CAROUSEL_LEN {
            self.slot_b = Some(index);
        }
    }

    pub fn slot_a(&self) -> Option<usize> {
        self.slot_a
    }

    pub fn slot_b(&self) -> Option<usize> {
        self.slot_b
    }

    pub fn can_advance(&self) -> bool {
        gates::both_true(
            gates::is_exact_index(self.slot_a, CAROUSEL_TARGET),
            gates::is_exact_index(self.slot_b, CAROUSEL_TARGET),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    Login(CredentialState),
    Level1(ContactState),
    Level2(FeatureState),
    Level3(MediaState),
    Level4(DualSelectState),
    Complete,
}

impl ScreenState {
    pub fn fresh(position: FlowPosition) -> Self {
        match position {
            FlowPosition::Login => Self::Login(CredentialState::default()),
            FlowPosition::Level1 => Self::Level1(ContactState::default()),
            FlowPosition::Level2 => Self::Level2(FeatureState::default()),
            FlowPosition::Level3 => Self::Level3(MediaState::default()),
            FlowPosition::Level4 => Self::Level4(DualSelectState::default()),
            FlowPosition::Complete => Self::Complete,
        }
    }

    pub fn can_advance(&self) -> bool {
        match self {
            Self::Login(state) => state.can_advance(),
            Self::Level1(state) => state.can_advance(),
            Self::Level2(state) => state.can_advance(),
            Self::Level3(state) => state.can_advance(),
            Self::Level4(state) => state.can_advance(),
            Self::Complete => false,
        }
    }
}
