//! Situation feedback (alarm correlation feedback)

use super::enums::{CodedEnum, FeedbackType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operator feedback on one alarm of a correlated situation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationFeedback {
    pub alarm_key: Option<String>,
    pub fingerprint: Option<String>,
    pub feedback_type: Option<FeedbackType>,
    pub reason: Option<String>,
    pub user: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub root_cause: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl SituationFeedback {
    /// Wire form for write operations; the entity itself is left untouched
    pub fn to_payload(&self) -> FeedbackPayload {
        FeedbackPayload {
            alarm_key: self.alarm_key.clone(),
            fingerprint: self.fingerprint.clone(),
            feedback_type: self.feedback_type.map(|t| t.code().to_string()),
            reason: self.reason.clone(),
            user: self.user.clone(),
            timestamp: self.timestamp.map(|t| t.timestamp_millis()),
            root_cause: self.root_cause,
            tags: self.tags.clone(),
        }
    }
}

/// Serialized feedback as sent to the server
///
/// Unset fields are omitted, `feedbackType` is the string code and
/// `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
