use maybe_sync::{MaybeSend, MaybeSync};

/// Messenger is used to notify the host application that the engine has work waiting for the
/// host's sequencing context (e.g. a completed image fetch that must be pumped with
/// [`MarkerEngine::process_image_completions`](crate::MarkerEngine::process_image_completions)).
pub trait Messenger: MaybeSend + MaybeSync {
    /// Asks the host to give the engine a turn on its sequencing context.
    fn request_redraw(&self);
}

/// Messenger that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger {}

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}
