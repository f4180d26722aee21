//! Event delivery from the SDK to its consumer.

use jules_core::SessionEvent;
use tokio::sync::mpsc;

/// Cloneable producer half of the event stream.
///
/// Sending never blocks and never fails loudly: once the consumer has gone
/// away, events are dropped.
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with the receiver the consumer subscribes to.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    /// Appends a line to the diagnostic log.
    pub fn log(&self, text: impl Into<String>) {
        self.emit(SessionEvent::log(text));
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_after_receiver_dropped_is_silent() {
        let (sink, rx) = EventSink::channel();
        drop(rx);

        sink.log("nobody listens");
        assert!(sink.is_closed());
    }

    #[test]
    fn test_log_wraps_text_in_log_entry() {
        let (sink, mut rx) = EventSink::channel();
        sink.log("client initialized");

        match rx.try_recv().unwrap() {
            SessionEvent::LogAppended { entry } => assert_eq!(entry.text, "client initialized"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
