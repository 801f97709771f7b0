use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// Reads a form field the way browsers submit it: strings as-is, numbers and
/// `true` as their text, `null` and `false` as absent.
fn form_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null | Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Body of `POST /api/book-appointment`.
///
/// Every field is optional at the wire level so that a missing field becomes a
/// validation failure rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[serde(default, deserialize_with = "form_value")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    pub doctor: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    pub time_slot: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    pub message: Option<String>,
}

/// Body of `POST /api/contact-us`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "form_value")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    pub message: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub appointment: String,
    pub contact: String,
}
