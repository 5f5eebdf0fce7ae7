//! Narrow interface between the core and whatever draws the UI.

use tokio::sync::mpsc;

/// Colour of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Pending,
    Success,
    Error,
}

pub trait PresentationSink: Send + Sync {
    /// Replace the visible status line
    fn status(&self, message: &str, tone: Tone);

    /// One-shot cue that the gate opened (the login → menu transition)
    fn transition(&self);

    /// Ask the host application to exit
    fn quit(&self);
}

/// Events delivered from workers to the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Status { message: String, tone: Tone },
    Transition,
    Quit,
}

/// Sink that forwards everything over a channel.
/// Background tasks hold one of these instead of touching the UI.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: UiEvent) {
        // receiver gone means the loop already exited
        let _ = self.tx.send(event);
    }
}

impl PresentationSink for ChannelSink {
    fn status(&self, message: &str, tone: Tone) {
        self.send(UiEvent::Status {
            message: message.to_string(),
            tone,
        });
    }

    fn transition(&self) {
        self.send(UiEvent::Transition);
    }

    fn quit(&self) {
        self.send(UiEvent::Quit);
    }
}
