use super::util::http_client;
use crate::core::market::Result;
use crate::core::{AnalysisError, Feedback, FeedbackSink};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};

/// Posts feedback to a form-collection endpoint. One attempt per submission.
pub struct FormFeedbackSink {
    endpoint: String,
    client: reqwest::Client,
}

impl FormFeedbackSink {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self> {
        Ok(FormFeedbackSink {
            endpoint: endpoint.to_string(),
            client: http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl FeedbackSink for FormFeedbackSink {
    #[instrument(name = "FeedbackSubmit", skip_all, fields(endpoint = %self.endpoint))]
    async fn submit(&self, feedback: &Feedback) -> Result<()> {
        feedback.validate()?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(feedback)
            .send()
            .await
            .map_err(|e| {
                AnalysisError::ExternalService(format!("Failed to submit feedback: {e}"))
            })?;

        let status = response.status();
        debug!(%status, "Feedback endpoint responded");
        if status != StatusCode::OK {
            return Err(AnalysisError::ExternalService(format!(
                "Feedback endpoint returned {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feedback() -> Feedback {
        Feedback {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            contact: "+55 11 99999-0000".to_string(),
            feedback: "Please add more tickers".to_string(),
        }
    }

    async fn mock_endpoint(status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/f/abc123"))
            .and(header("accept", "application/json"))
            .and(body_json(serde_json::json!({
                "name": "Ana",
                "email": "ana@example.com",
                "contact": "+55 11 99999-0000",
                "feedback": "Please add more tickers"
            })))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let mock_server = mock_endpoint(200).await;
        let sink = FormFeedbackSink::new(&format!("{}/f/abc123", mock_server.uri()), 5).unwrap();
        assert!(sink.submit(&feedback()).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_200_status_is_an_error() {
        // accepted-but-not-OK still counts as a failure, and is not retried
        let mock_server = mock_endpoint(202).await;
        let sink = FormFeedbackSink::new(&format!("{}/f/abc123", mock_server.uri()), 5).unwrap();
        let err = sink.submit(&feedback()).await.unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ExternalService("Feedback endpoint returned 202 Accepted".to_string())
        );
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mock_server = mock_endpoint(503).await;
        let sink = FormFeedbackSink::new(&format!("{}/f/abc123", mock_server.uri()), 5).unwrap();
        assert!(matches!(
            sink.submit(&feedback()).await,
            Err(AnalysisError::ExternalService(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_feedback_is_not_sent() {
        let mock_server = MockServer::start().await;
        let sink = FormFeedbackSink::new(&format!("{}/f/abc123", mock_server.uri()), 5).unwrap();
        let mut invalid = feedback();
        invalid.name = String::new();

        assert!(matches!(
            sink.submit(&invalid).await,
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let sink = FormFeedbackSink::new("http://127.0.0.1:1/f/abc123", 2).unwrap();
        let err = sink.submit(&feedback()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to submit feedback"));
    }
}
