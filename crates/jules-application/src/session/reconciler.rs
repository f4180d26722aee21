//! Turns raw activity pages into deduplicated session events.

use std::collections::HashSet;

use jules_core::{Activity, ActivityKind, Message, SessionEvent};
use tracing::debug;

/// Per-session seen-set plus classification of new activities.
///
/// Lives exactly as long as one polling run; dropping it forgets every
/// delivered id, so a later run for the same session delivers everything
/// again.
#[derive(Debug)]
pub struct ActivityReconciler {
    session_name: String,
    seen: HashSet<String>,
}

impl ActivityReconciler {
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
            seen: HashSet::new(),
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Classifies every not-yet-seen activity, preserving page order.
    pub fn reconcile(&mut self, activities: Vec<Activity>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for activity in activities {
            if !self.seen.insert(activity.id.clone()) {
                continue;
            }
            debug!(
                session = %self.session_name,
                activity = %activity.id,
                kind = activity.kind.label(),
                "new activity"
            );
            events.push(self.classify(activity));
        }
        events
    }

    pub fn has_seen(&self, activity_id: &str) -> bool {
        self.seen.contains(activity_id)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    fn classify(&self, activity: Activity) -> SessionEvent {
        let id = activity.id;
        match activity.kind {
            ActivityKind::AgentMessaged { text } => SessionEvent::NewMessage {
                session_name: Some(self.session_name.clone()),
                message: Message::agent(text),
            },
            ActivityKind::UserMessaged { text } => {
                SessionEvent::log(format!("Activity {id}: user message echoed ({text})"))
            }
            ActivityKind::PlanGenerated => {
                SessionEvent::log(format!("Activity {id}: plan generated, awaiting approval"))
            }
            ActivityKind::PlanApproved => {
                SessionEvent::log(format!("Activity {id}: plan approved"))
            }
            ActivityKind::ProgressUpdated { title, description } => {
                if description.is_empty() {
                    SessionEvent::log(format!("Activity {id}: progress: {title}"))
                } else {
                    SessionEvent::log(format!("Activity {id}: progress: {title} - {description}"))
                }
            }
            ActivityKind::SessionCompleted => {
                SessionEvent::log(format!("Activity {id}: session completed"))
            }
            ActivityKind::SessionFailed { reason } => {
                SessionEvent::log(format!("Activity {id}: session failed: {reason}"))
            }
            ActivityKind::Unknown => {
                SessionEvent::log(format!("Activity {id}: unrecognized kind, ignored"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jules_core::MessageRole;

    fn agent_texts(events: &[SessionEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::NewMessage { message, .. } => Some(message.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_agent_message_becomes_new_message() {
        let mut reconciler = ActivityReconciler::new("sessions/1");
        let events = reconciler.reconcile(vec![Activity::agent_message("a1", "hi")]);

        assert_eq!(events.len(), 1);
        match &events[0] {
            SessionEvent::NewMessage {
                session_name,
                message,
            } => {
                assert_eq!(session_name.as_deref(), Some("sessions/1"));
                assert_eq!(message.role, MessageRole::Agent);
                assert_eq!(message.text, "hi");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(reconciler.has_seen("a1"));
    }

    #[test]
    fn test_overlapping_pages_are_delivered_once() {
        let mut reconciler = ActivityReconciler::new("sessions/1");
        let first = reconciler.reconcile(vec![Activity::agent_message("a1", "hi")]);
        let second = reconciler.reconcile(vec![
            Activity::agent_message("a1", "hi"),
            Activity::agent_message("a2", "there"),
        ]);

        assert_eq!(agent_texts(&first), vec!["hi"]);
        assert_eq!(agent_texts(&second), vec!["there"]);
        assert_eq!(reconciler.seen_count(), 2);
    }

    #[test]
    fn test_duplicates_within_one_page_are_dropped() {
        let mut reconciler = ActivityReconciler::new("sessions/1");
        let events = reconciler.reconcile(vec![
            Activity::agent_message("a1", "one"),
            Activity::agent_message("a1", "one"),
        ]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_page_order_is_preserved() {
        let mut reconciler = ActivityReconciler::new("sessions/1");
        let events = reconciler.reconcile(vec![
            Activity::agent_message("z9", "first"),
            Activity::agent_message("a1", "second"),
            Activity::agent_message("m5", "third"),
        ]);
        assert_eq!(agent_texts(&events), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_non_message_kinds_are_diagnostics_only() {
        let mut reconciler = ActivityReconciler::new("sessions/1");
        let events = reconciler.reconcile(vec![
            Activity::new("p1", ActivityKind::PlanGenerated),
            Activity::new("u1", ActivityKind::Unknown),
            Activity::new(
                "f1",
                ActivityKind::SessionFailed {
                    reason: "quota".to_string(),
                },
            ),
        ]);

        assert_eq!(events.len(), 3);
        assert!(agent_texts(&events).is_empty());
        match &events[2] {
            SessionEvent::LogAppended { entry } => assert!(entry.text.contains("quota")),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(reconciler.has_seen("u1"));
    }
}
