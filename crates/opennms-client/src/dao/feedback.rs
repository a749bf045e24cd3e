//! Situation feedback (API v2)

use super::envelope::{shape, unwrap_list};
use super::mapper;
use crate::common::query::Filter;
use crate::common::RequestOptions;
use crate::error::OnmsError;
use crate::http_trait::OnmsHttp;
use crate::models::{FeedbackPayload, SituationFeedback};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const FEEDBACK_PATH: &str = "api/v2/situation-feedback";

/// Data access for correlation feedback on situations
#[derive(Clone)]
pub struct SituationFeedbackDao {
    http: Arc<dyn OnmsHttp>,
}

impl std::fmt::Debug for SituationFeedbackDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SituationFeedbackDao")
            .field("base_url", &self.http.base_url())
            .finish()
    }
}

impl SituationFeedbackDao {
    pub fn new(http: Arc<dyn OnmsHttp>) -> Self {
        Self { http }
    }

    /// All feedback recorded for a situation
    pub async fn get_feedback(&self, situation_id: u64) -> Result<Vec<SituationFeedback>, OnmsError> {
        debug!("Getting feedback for situation {}", situation_id);
        let path = format!("{FEEDBACK_PATH}/{situation_id}");
        let body = self.http.get(&path, &RequestOptions::json()).await?.into_json()?;
        unwrap_list(body, "feedback")?
            .iter()
            .map(mapper::situation_feedback)
            .collect()
    }

    /// Feedback tags starting with `prefix`
    pub async fn get_tags(&self, prefix: &str) -> Result<Vec<String>, OnmsError> {
        debug!("Getting feedback tags with prefix {:?}", prefix);
        let filter = Filter::new().param("prefix", prefix);
        let options = RequestOptions::json().with_filter(Some(&filter));
        let body = self
            .http
            .get(&format!("{FEEDBACK_PATH}/tags"), &options)
            .await?
            .into_json()?;
        unwrap_list(body, "tag")?
            .into_iter()
            .map(|tag| match tag {
                Value::String(tag) => Ok(tag),
                other => Err(OnmsError::MalformedResponse(format!(
                    "expected a tag string but got {}",
                    shape(&other)
                ))),
            })
            .collect()
    }

    /// Submit feedback for a situation
    pub async fn save_feedback(
        &self,
        situation_id: u64,
        feedback: &[SituationFeedback],
    ) -> Result<(), OnmsError> {
        debug!("Saving {} feedback entries for situation {}", feedback.len(), situation_id);
        let body = serde_json::to_value(self.serialize_feedback(feedback))?;
        self.http
            .post_json(&format!("{FEEDBACK_PATH}/{situation_id}"), &body, &RequestOptions::json())
            .await?;
        Ok(())
    }

    /// Wire form of `feedback`; the entries themselves are left untouched
    pub fn serialize_feedback(&self, feedback: &[SituationFeedback]) -> Vec<FeedbackPayload> {
        feedback.iter().map(SituationFeedback::to_payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockOnmsHttp;
    use crate::models::FeedbackType;
    use serde_json::json;

    fn dao(mock: &MockOnmsHttp) -> SituationFeedbackDao {
        SituationFeedbackDao::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_get_feedback_bare_array() {
        let mock = MockOnmsHttp::new("http://demo.opennms.org/opennms/");
        mock.respond_json(
            "api/v2/situation-feedback/616",
            json!([
                {
                    "alarmKey": "uei.opennms.org/alarms/trigger:localhost:0.0.0.0:ALARM_C",
                    "fingerprint": "NDg3ZjdiMjJmNjgzMTJkMmMxYmJjOTNiMWFlYTQ0NWI=",
                    "feedbackType": "CORRECT",
                    "reason": null,
                    "user": "admin",
                    "timestamp": 1553886888758_i64,
                    "rootCause": false,
                    "tags": ["banana", "ball"]
                },
                {"alarmKey": "other", "feedbackType": "FALSE_POSITIVE"}
            ]),
        );

        let feedback = dao(&mock).get_feedback(616).await.unwrap();
        assert_eq!(feedback.len(), 2);
        assert_eq!(feedback[0].feedback_type, Some(FeedbackType::Correct));
        assert_eq!(feedback[0].reason, None);
        assert_eq!(feedback[0].root_cause, Some(false));
        assert_eq!(feedback[0].tags.as_ref().map(Vec::len), Some(2));
        assert_eq!(feedback[1].feedback_type, Some(FeedbackType::FalsePositive));
    }

    #[tokio::test]
    async fn test_get_feedback_unknown_type() {
        let mock = MockOnmsHttp::new("http://demo.opennms.org/opennms/");
        mock.respond_json("api/v2/situation-feedback/1", json!([{"feedbackType": "MAYBE"}]));

        let err = dao(&mock).get_feedback(1).await.unwrap_err();
        assert!(matches!(err, OnmsError::UnknownEnumerationCode { kind: "feedback type", .. }));
    }

    #[tokio::test]
    async fn test_get_tags_sends_prefix() {
        let mock = MockOnmsHttp::new("http://demo.opennms.org/opennms/");
        mock.respond_json("api/v2/situation-feedback/tags", json!(["ball", "banana", "bar", "baz"]));

        let tags = dao(&mock).get_tags("ba").await.unwrap();
        assert_eq!(tags, vec!["ball", "banana", "bar", "baz"]);

        let request = &mock.requests()[0];
        let filter = request.filter.as_ref().unwrap();
        assert_eq!(filter.params(), &[("prefix".to_string(), "ba".to_string())]);
    }

    #[tokio::test]
    async fn test_get_tags_rejects_non_strings() {
        let mock = MockOnmsHttp::new("http://demo.opennms.org/opennms/");
        mock.respond_json("api/v2/situation-feedback/tags", json!(["ok", 3]));
        assert!(matches!(
            dao(&mock).get_tags("o").await,
            Err(OnmsError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_save_feedback_posts_payloads() {
        let mock = MockOnmsHttp::new("http://demo.opennms.org/opennms/");
        mock.respond_json("api/v2/situation-feedback/210", Value::Null);

        let feedback = SituationFeedback {
            alarm_key: Some("some-key".to_string()),
            fingerprint: Some("hash#".to_string()),
            feedback_type: Some(FeedbackType::Correct),
            ..Default::default()
        };
        dao(&mock).save_feedback(210, &[feedback]).await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.body,
            Some(json!([{"alarmKey": "some-key", "fingerprint": "hash#", "feedbackType": "CORRECT"}]))
        );
    }

    #[tokio::test]
    async fn test_save_feedback_propagates_status() {
        let mock = MockOnmsHttp::new("http://demo.opennms.org/opennms/");
        mock.respond_status("api/v2/situation-feedback/210", 403, "forbidden");

        let err = dao(&mock).save_feedback(210, &[]).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_serialize_feedback_leaves_entries_untouched() {
        let mock = MockOnmsHttp::new("http://demo.opennms.org/opennms/");
        let feedback = SituationFeedback {
            alarm_key: Some("some-key".to_string()),
            fingerprint: Some("hash#".to_string()),
            feedback_type: Some(FeedbackType::Correct),
            ..Default::default()
        };
        let original = feedback.clone();

        let payloads = dao(&mock).serialize_feedback(std::slice::from_ref(&feedback));
        assert_eq!(payloads[0].feedback_type.as_deref(), Some("CORRECT"));
        assert_eq!(feedback, original);
        assert_eq!(
            serde_json::to_string(&payloads).unwrap(),
            r#"[{"alarmKey":"some-key","fingerprint":"hash#","feedbackType":"CORRECT"}]"#
        );
    }
}
