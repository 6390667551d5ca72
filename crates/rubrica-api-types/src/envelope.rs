use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Where a listing was served from when the cache-aside path is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSource {
    Cache,
    Database,
}

/// One violated field constraint, reported alongside a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Uniform response wrapper returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    // No `default` here: serde already treats a missing `Option` field as
    // `None`, and the attribute would force a `T: Default` bound onto
    // every deserialization site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ListSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            count: None,
            timestamp: Some(OffsetDateTime::now_utc()),
            source: None,
            errors: None,
        }
    }

    /// Success without a payload, for operations that have nothing to return.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            count: None,
            timestamp: Some(OffsetDateTime::now_utc()),
            source: None,
            errors: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_source(mut self, source: ListSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            count: None,
            timestamp: Some(OffsetDateTime::now_utc()),
            source: None,
            errors: None,
        }
    }

    pub fn failure_with_errors(message: impl Into<String>, errors: Vec<FieldViolation>) -> Self {
        let mut envelope = Self::failure(message);
        envelope.errors = Some(errors);
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::User;

    // `User` has no `Default` impl, so this compiles only while the envelope
    // derive stays free of `T: Default` bounds.
    #[test]
    fn envelope_deserializes_payloads_without_default() {
        let body = r#"{
            "success": true,
            "message": "User retrieved successfully",
            "data": {
                "id": "5f9f1b9b8c8d4e0012345abc",
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "isActive": true,
                "roles": ["user"],
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }
        }"#;

        let envelope: Envelope<User> = serde_json::from_str(body).expect("envelope parsed");
        let user = envelope.data.expect("payload present");
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.age, None);
    }

    #[test]
    fn missing_optional_fields_deserialize_as_none() {
        let envelope: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"success": false, "message": "Task not found"}"#)
                .expect("envelope parsed");
        assert!(envelope.data.is_none());
        assert!(envelope.count.is_none());
        assert!(envelope.errors.is_none());
    }
}
