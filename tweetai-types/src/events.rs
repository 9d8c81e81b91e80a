use serde::{Deserialize, Serialize};

/// Events pushed to connected real-time clients
///
/// Serialized with the event name in an `event` field, e.g.
/// `{"event":"autobot-count","count":42}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RealtimeEvent {
    #[serde(rename = "autobot-count")]
    AutobotCount { count: i64 },
}

impl RealtimeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RealtimeEvent::AutobotCount { .. } => "autobot-count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autobot_count_wire_format() {
        let event = RealtimeEvent::AutobotCount { count: 42 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"autobot-count","count":42}"#);
    }

    #[test]
    fn test_event_name_matches_tag() {
        let event = RealtimeEvent::AutobotCount { count: 0 };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], event.name());
    }
}
