use std::sync::mpsc::Receiver;

use crate::media::ImageHandle;

/// A single flow-level request to an external collaborator. The spawn call
/// returns immediately; the terminal event arrives on the receiver once the
/// user (or the host) resolves it. Events carry the request token so late
/// answers can be told apart from the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPickEvent {
    Done {
        token: u64,
        image: Option<ImageHandle>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
    Done { token: u64, accepted: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
}

pub trait MediaPickerGateway {
    fn spawn_pick(&self, token: u64) -> Receiver<MediaPickEvent>;
}

pub trait ConfirmPromptGateway {
    fn spawn_confirm(&self, request: ConfirmRequest, token: u64) -> Receiver<ConfirmEvent>;
}
