use crate::form::FieldRecord;
use crate::models::{ErrorDetail, ErrorResponse, PredictionResponse};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a submission did not produce a prediction.
///
/// The `Display` text is what gets shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The request never got a response (connection refused, DNS, timeout...)
    #[error("{0}")]
    Transport(String),

    /// Plain `detail` message sent by the service
    #[error("{0}")]
    Detail(String),

    /// First validation issue, named after the last segment of its location
    #[error("Invalid input for '{field}': {msg}")]
    Validation { field: String, msg: String },

    /// Error status whose body is not JSON at all
    #[error("Server responded with status: {0}")]
    Status(u16),

    /// A success status whose body is not a prediction
    #[error("Malformed response from server: {0}")]
    MalformedResponse(String),

    /// Error body without a usable detail
    #[error("An unknown error occurred.")]
    Unknown,
}

/// Result of one complete submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(PredictionResponse),
    Failure(SubmitError),
}

impl From<Result<PredictionResponse, SubmitError>> for Outcome {
    fn from(result: Result<PredictionResponse, SubmitError>) -> Self {
        match result {
            Ok(response) => Outcome::Success(response),
            Err(error) => Outcome::Failure(error),
        }
    }
}

/// Client for the remote prediction endpoint
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    /// Create a client. Without a timeout the transport default applies.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the record and interpret whatever comes back
    pub async fn submit(&self, record: &FieldRecord) -> Outcome {
        let outcome: Outcome = self.dispatch(record).await.into();
        match &outcome {
            Outcome::Success(response) => info!(
                prediction = %response.prediction,
                label = response.prediction_label,
                "prediction received"
            ),
            Outcome::Failure(error) => warn!(%error, "prediction failed"),
        }
        outcome
    }

    /// POST the record as JSON. Single attempt, no retry.
    pub async fn dispatch(&self, record: &FieldRecord) -> Result<PredictionResponse, SubmitError> {
        debug!(endpoint = %self.endpoint, fields = record.len(), "dispatching prediction request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        debug!(%status, bytes = body.len(), "response received");

        interpret_response(status, &body)
    }
}

/// Turn a status and raw body into a prediction or an error
pub fn interpret_response(status: StatusCode, body: &str) -> Result<PredictionResponse, SubmitError> {
    if status.is_success() {
        return serde_json::from_str(body)
            .map_err(|e| SubmitError::MalformedResponse(e.to_string()));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => Err(interpret_error_body(ErrorResponse::from_value(&value))),
        Err(_) => Err(SubmitError::Status(status.as_u16())),
    }
}

/// Pick a message out of a parsed error body
pub fn interpret_error_body(error: ErrorResponse) -> SubmitError {
    match error.detail {
        Some(ErrorDetail::Message(message)) => SubmitError::Detail(message),
        Some(ErrorDetail::Validation(issue)) => issue
            .and_then(|issue| {
                let field = issue.field()?.to_string();
                Some(SubmitError::Validation {
                    field,
                    msg: issue.msg,
                })
            })
            .unwrap_or(SubmitError::Unknown),
        None => SubmitError::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Form;
    use mockito::Matcher;

    fn interpret_error(status: u16, body: &str) -> String {
        let status = StatusCode::from_u16(status).unwrap();
        interpret_response(status, body).unwrap_err().to_string()
    }

    #[test]
    fn test_interpret_success() {
        let response =
            interpret_response(StatusCode::OK, r#"{"prediction":">50K","prediction_label":1}"#)
                .unwrap();
        assert_eq!(response.prediction, ">50K");
        assert_eq!(response.prediction_label, 1);
    }

    #[test]
    fn test_interpret_malformed_success_body() {
        let err = interpret_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, SubmitError::MalformedResponse(_)));
    }

    #[test]
    fn test_string_detail_is_verbatim() {
        assert_eq!(interpret_error(401, r#"{"detail":"Invalid token"}"#), "Invalid token");
    }

    #[test]
    fn test_validation_detail_names_field() {
        assert_eq!(
            interpret_error(
                422,
                r#"{"detail":[{"loc":["body","age"],"msg":"must be positive"}]}"#
            ),
            "Invalid input for 'age': must be positive"
        );
    }

    #[test]
    fn test_validation_detail_uses_first_issue() {
        let body = r#"{"detail":[
            {"loc":["body","fnlwgt"],"msg":"Input should be greater than 0"},
            {"loc":["body","age"],"msg":"Input should be less than or equal to 90"}
        ]}"#;
        assert_eq!(
            interpret_error(422, body),
            "Invalid input for 'fnlwgt': Input should be greater than 0"
        );
    }

    #[test]
    fn test_validation_single_segment_loc() {
        assert_eq!(
            interpret_error(422, r#"{"detail":[{"loc":["body"],"msg":"Field required"}]}"#),
            "Invalid input for 'body': Field required"
        );
        assert_eq!(
            interpret_error(422, r#"{"detail":[{"loc":["body",3],"msg":"bad"}]}"#),
            "Invalid input for '3': bad"
        );
    }

    #[test]
    fn test_empty_validation_list_falls_back() {
        assert_eq!(interpret_error(422, r#"{"detail":[]}"#), "An unknown error occurred.");
        assert_eq!(
            interpret_error(422, r#"{"detail":[{"loc":[],"msg":"bad"}]}"#),
            "An unknown error occurred."
        );
    }

    #[test]
    fn test_later_malformed_issue_keeps_first_message() {
        assert_eq!(
            interpret_error(
                422,
                r#"{"detail":[{"loc":["body","age"],"msg":"must be positive"},{"type":"missing"}]}"#
            ),
            "Invalid input for 'age': must be positive"
        );
    }

    #[test]
    fn test_json_bodies_of_other_shapes() {
        assert_eq!(interpret_error(400, r#"{"detail":42}"#), "42");
        assert_eq!(interpret_error(404, r#""Not Found""#), "An unknown error occurred.");
        assert_eq!(interpret_error(400, r#"{"detail":{"reason":"x"}}"#), "An unknown error occurred.");
        assert_eq!(interpret_error(422, r#"{"detail":["oops"]}"#), "An unknown error occurred.");
    }

    #[test]
    fn test_empty_string_detail_falls_back() {
        assert_eq!(interpret_error(400, r#"{"detail":""}"#), "An unknown error occurred.");
    }

    #[test]
    fn test_missing_detail_falls_back() {
        assert_eq!(interpret_error(400, r#"{}"#), "An unknown error occurred.");
        assert_eq!(interpret_error(400, r#"{"detail":null}"#), "An unknown error occurred.");
    }

    #[test]
    fn test_unparsable_error_body_reports_status() {
        assert_eq!(
            interpret_error(500, "Internal Server Error"),
            "Server responded with status: 500"
        );
        assert_eq!(interpret_error(502, ""), "Server responded with status: 502");
    }

    #[tokio::test]
    async fn test_submit_posts_json_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "age": 39,
                "workclass": "State-gov",
                "hours-per-week": 0
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"prediction":"<=50K","prediction_label":0}"#)
            .create_async()
            .await;

        let mut form = Form::new();
        form.set("age", "39").unwrap();
        form.set("workclass", "State-gov").unwrap();
        form.set("hours-per-week", "lots").unwrap();

        let client = PredictionClient::new(format!("{}/predict", server.url()), None).unwrap();
        let outcome = client.submit(&form.collect()).await;

        mock.assert_async().await;
        assert_eq!(
            outcome,
            Outcome::Success(PredictionResponse {
                prediction: "<=50K".to_string(),
                prediction_label: 0,
            })
        );
    }

    #[tokio::test]
    async fn test_submit_validation_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(422)
            .with_body(r#"{"detail":[{"loc":["body","age"],"msg":"Input should be greater than or equal to 17"}]}"#)
            .create_async()
            .await;

        let client = PredictionClient::new(format!("{}/predict", server.url()), None).unwrap();
        let outcome = client.submit(&Form::new().collect()).await;

        assert_eq!(
            outcome,
            Outcome::Failure(SubmitError::Validation {
                field: "age".to_string(),
                msg: "Input should be greater than or equal to 17".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_submit_server_error_without_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let client = PredictionClient::new(format!("{}/predict", server.url()), None).unwrap();
        let outcome = client.submit(&Form::new().collect()).await;

        assert_eq!(outcome, Outcome::Failure(SubmitError::Status(500)));
    }

    #[tokio::test]
    async fn test_submit_connection_refused() {
        // Bind then drop a listener so the port is very likely closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PredictionClient::new(format!("http://{}/predict", addr), None).unwrap();
        match client.submit(&Form::new().collect()).await {
            Outcome::Failure(SubmitError::Transport(message)) => assert!(!message.is_empty()),
            other => panic!("expected transport failure, got {:?}", other),
        }
    }
}
