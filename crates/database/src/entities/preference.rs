//! Notification preference entity definitions

use serde::{Deserialize, Serialize};

/// A single notification toggle, unique per (user, type, channel).
///
/// Serialized as-is into the preference cache, so the serde shape is part of
/// the cache snapshot format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPreference {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: String,
    pub channel: String,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePreferenceRequest {
    pub notification_type: String,
    pub channel: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl CreatePreferenceRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.notification_type.trim().is_empty() {
            return Err("Notification type cannot be empty".to_string());
        }
        if self.channel.trim().is_empty() {
            return Err("Channel cannot be empty".to_string());
        }
        if self.notification_type.len() > 50 || self.channel.len() > 50 {
            return Err("Notification type and channel are limited to 50 characters".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePreferenceRequest {
    pub enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_to_enabled() {
        let request: CreatePreferenceRequest =
            serde_json::from_str(r#"{"notification_type": "email", "channel": "marketing"}"#)
                .unwrap();

        assert!(request.enabled);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_channel_rejected() {
        let request = CreatePreferenceRequest {
            notification_type: "email".to_string(),
            channel: "  ".to_string(),
            enabled: true,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn cache_snapshot_round_trips() {
        let preference = NotificationPreference {
            id: 7,
            user_id: 3,
            notification_type: "push".to_string(),
            channel: "transactional".to_string(),
            enabled: false,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: None,
        };

        let json = serde_json::to_string(&vec![preference.clone()]).unwrap();
        let parsed: Vec<NotificationPreference> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![preference]);
    }
}
