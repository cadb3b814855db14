use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Successful reply from the prediction service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Human-readable class, e.g. ">50K"
    pub prediction: String,
    /// 1 for the positive class, anything else is the negative class
    pub prediction_label: i64,
}

impl PredictionResponse {
    pub fn is_positive(&self) -> bool {
        self.prediction_label == 1
    }
}

/// Error reply from the prediction service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Absent when the body has no usable `detail`
    pub detail: Option<ErrorDetail>,
}

impl ErrorResponse {
    /// Read whatever JSON the service sent back.
    ///
    /// Bodies that are not objects, or whose `detail` is empty, null, false or
    /// zero, carry no detail.
    pub fn from_value(value: &Value) -> Self {
        Self {
            detail: value.get("detail").and_then(ErrorDetail::from_value),
        }
    }
}

/// Either a plain message or a list of validation issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    Message(String),
    /// First entry of the list, if it has the expected shape
    Validation(Option<ValidationIssue>),
}

impl ErrorDetail {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(message) if !message.is_empty() => {
                Some(ErrorDetail::Message(message.clone()))
            }
            Value::Number(number) if number.as_f64() != Some(0.0) => {
                Some(ErrorDetail::Message(number.to_string()))
            }
            Value::Bool(true) => Some(ErrorDetail::Message("true".to_string())),
            Value::Array(items) => Some(ErrorDetail::Validation(
                items
                    .first()
                    .and_then(|item| ValidationIssue::deserialize(item).ok()),
            )),
            _ => None,
        }
    }
}

/// One entry of a validation error list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidationIssue {
    /// Path to the offending input, e.g. `["body", "age"]`
    #[serde(default)]
    pub loc: Vec<LocSegment>,
    pub msg: String,
}

impl ValidationIssue {
    /// The last segment of `loc`, which names the field
    pub fn field(&self) -> Option<&LocSegment> {
        self.loc.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Index(i64),
    Name(String),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Index(index) => write!(f, "{}", index),
            LocSegment::Name(name) => f.write_str(name),
        }
    }
}
