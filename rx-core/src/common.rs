//! Request and response data types shared between the portal clients and the backend

use crate::{otp::OtpCode, phone_number::PhoneNumber};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Message used for any HTTP 400 carrying per-field errors
pub const VALIDATION_ERRORS_MESSAGE: &str = "Please correct the validation errors";

/// OTP generation request struct
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OtpRequest {
    /// The phone number the OTP should be sent to
    pub phone_number: PhoneNumber,
}

/// Account deletion request struct
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AccountDeletionRequest {
    /// Phone number of the account to delete
    pub phone_number: PhoneNumber,
    /// OTP that was sent to that phone number
    pub otp: OtpCode,
}

/// Prescription lookup request struct
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PrescriptionRequest {
    /// The prescription token from the link the patient received
    pub token: String,
    /// The patient's phone number
    pub phone_number: PhoneNumber,
}

/// Generic status payload the backend answers with
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ServerMessage {
    /// Human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Status string, e.g. `"success"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Machine readable code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Additional detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Anything else the backend sent along
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerMessage {
    /// Read the body of a successful response.
    ///
    /// Any 2xx is a success, so this never fails. Non-string values of the
    /// known keys are kept as their JSON text, and a body that isn't a JSON
    /// object ends up in `message` as text.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(object)) => Self::from_json_object(object),
            Ok(Value::Null) => Self::default(),
            Ok(Value::String(text)) => Self::text(text),
            Ok(other) => Self::text(other.to_string()),
            Err(_) => Self::text(String::from_utf8_lossy(body).into_owned()),
        }
    }

    fn from_json_object(mut object: Map<String, Value>) -> Self {
        let message = take_text(&mut object, "message");
        let status = take_text(&mut object, "status");
        let code = take_text(&mut object, "code");
        let detail = take_text(&mut object, "detail");

        Self {
            message,
            status,
            code,
            detail,
            extra: object,
        }
    }

    fn text(text: String) -> Self {
        let text = text.trim();
        Self {
            message: (!text.is_empty()).then(|| text.to_string()),
            ..Self::default()
        }
    }
}

fn take_text(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Error body for anything that isn't a field validation error
#[derive(Deserialize, Debug, Default)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
}

/// Validation messages keyed by the name of the offending field.
///
/// Field names come straight from the backend and aren't known up front.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Build field errors from a JSON object.
    ///
    /// Lists of strings are taken as-is, a bare string becomes a one-element list
    /// and anything else is kept as its JSON text.
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        Self(
            object
                .into_iter()
                .map(|(field, value)| (field, messages_from_value(value)))
                .collect(),
        )
    }

    /// Messages for the given field, if any
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Messages for the given field joined into a single line
    pub fn joined(&self, field: &str) -> Option<String> {
        self.get(field)
            .filter(|messages| !messages.is_empty())
            .map(|messages| messages.join(", "))
    }

    /// Iterate over all fields and their messages
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Whether the backend didn't name any field
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: IntoIterator<Item = M>, M: Into<String>> FromIterator<(K, V)>
    for FieldErrors
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, messages)| {
                    (field.into(), messages.into_iter().map(Into::into).collect())
                })
                .collect(),
        )
    }
}

fn messages_from_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s],
        other => vec![other.to_string()],
    }
}

/// Everything that can go wrong talking to the backend.
///
/// Every failure maps into one of these two cases, so callers never
/// have to deal with transport or decoding errors themselves.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 400 with per-field messages
    #[error("Please correct the validation errors")]
    Validation(FieldErrors),
    /// Any other failure, with a message fit for display
    #[error("{0}")]
    Failure(String),
}

impl ApiError {
    /// Map an unsuccessful response into an error.
    ///
    /// `fallback` is used when the backend didn't provide a `detail`.
    pub fn from_response(status: u16, body: &[u8], fallback: &str) -> Self {
        if status == 400 {
            if let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) {
                return Self::Validation(FieldErrors::from_json_object(object));
            }
        }

        let detail = serde_json::from_slice::<ErrorResponse>(body)
            .ok()
            .and_then(|response| response.detail)
            .filter(|detail| !detail.trim().is_empty());

        tracing::debug!(status, ?detail, "Mapped unsuccessful response");

        Self::Failure(detail.unwrap_or_else(|| fallback.to_string()))
    }

    /// Whether this carries per-field messages
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Per-field messages, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Failure(_) => None,
        }
    }
}
