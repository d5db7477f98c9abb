//! Domain DTOs for the customer API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! The client never owns a `Customer`; values live for one request/response
//! cycle and are rendered straight into the page. Integration tests catch any
//! schema drift between the two crates.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-assigned customer identifier.
///
/// Opaque to the client: the service may send it as a JSON number or a
/// string, and it is only ever echoed back into a path or a render target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for CustomerId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for CustomerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CustomerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => CustomerId(s),
            Raw::Number(n) => CustomerId(n.to_string()),
        })
    }
}

/// A customer record as returned by the API.
///
/// `credit_level` and `valid` are computed by the server and absent from
/// some responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub firstname: String,
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

impl Customer {
    /// First and last name joined with a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Request payload for creating or updating a customer.
///
/// Empty names are sent as-is; the server decides what is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerInput {
    pub firstname: String,
    pub lastname: String,
}

/// Optional filters for a customer search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl SearchQuery {
    /// Build a query from raw form values, dropping empty ones.
    pub fn from_fields(firstname: &str, lastname: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            firstname: non_empty(firstname),
            lastname: non_empty(lastname),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.firstname.is_none() && self.lastname.is_none()
    }
}

/// Acknowledgement of a delete. The service may or may not echo the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAck {
    #[serde(default)]
    pub id: Option<CustomerId>,
}

/// Error envelope carried by non-2xx responses. Every field is optional so a
/// partial or foreign error body still parses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
