//! Events raised back to the app loop by widget collaborators.
//!
//! Routing through an event enum avoids bubbling channels through layers of
//! widgets: the resize debouncer and the commit callback each hold an
//! [`AppEventSender`] clone and post here.

use tokio::sync::mpsc;

#[derive(Debug)]
pub(crate) enum AppEvent {
    /// The resize coalescer elapsed; deliver the flush to the staging editor.
    FlushResize,
    /// A staged batch was committed with these items.
    Committed(Vec<String>),
}

#[derive(Clone, Debug)]
pub(crate) struct AppEventSender {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl AppEventSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    /// Send an event to the app loop. Logs instead of failing when the loop
    /// has already shut down.
    pub(crate) fn send(&self, event: AppEvent) {
        if let Err(err) = self.tx.send(event) {
            tracing::error!("failed to send AppEvent: {err}");
        }
    }
}
