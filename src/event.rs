//! Edge request event model
//!
//! Serde types for the `Records[0].cf.request` event shape delivered by the
//! edge platform. Only the first record is decoded; later records are skipped
//! unread. The request keeps every field in its original order and number
//! representation so it serializes back out untouched.

use std::fmt;

use serde::de::{IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Errors raised when an event does not have the expected shape
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event contains no records")]
    NoRecords,
    #[error("invalid event payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to transfer event: {0}")]
    Io(#[from] std::io::Error),
}

impl EventError {
    /// Short error type name reported to invokers
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoRecords => "NoRecords",
            Self::Decode(_) => "InvalidEvent",
            Self::Io(_) => "TransferError",
        }
    }
}

/// Event passed to the function by the edge platform
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CloudFrontEvent {
    /// First entry of `Records`
    #[serde(
        rename = "Records",
        default,
        deserialize_with = "first_record",
        serialize_with = "record_list"
    )]
    pub record: Option<CloudFrontRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CloudFrontRecord {
    pub cf: CloudFrontMessage,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CloudFrontMessage {
    /// Distribution metadata, passed through unread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    pub request: CloudFrontRequest,
}

/// In-flight request descriptor
///
/// Holds the whole request object. `uri` is guaranteed to be a string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct CloudFrontRequest {
    fields: Map<String, Value>,
}

/// Decode the first element of `Records`, skipping the rest unread
fn first_record<'de, D>(deserializer: D) -> Result<Option<CloudFrontRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FirstRecord;

    impl<'de> Visitor<'de> for FirstRecord {
        type Value = Option<CloudFrontRecord>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list of event records")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let first = seq.next_element()?;
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(first)
        }
    }

    deserializer.deserialize_seq(FirstRecord)
}

fn record_list<S>(record: &Option<CloudFrontRecord>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(record.iter())
}

impl CloudFrontEvent {
    /// Decode an event from a JSON payload
    pub fn from_slice(payload: &[u8]) -> Result<Self, EventError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Decode an event from a reader
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, EventError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Request descriptor of the first record
    pub fn first_request(&self) -> Result<&CloudFrontRequest, EventError> {
        self.record
            .as_ref()
            .map(|record| &record.cf.request)
            .ok_or(EventError::NoRecords)
    }
}

impl TryFrom<Map<String, Value>> for CloudFrontRequest {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        match fields.get("uri") {
            Some(Value::String(_)) => Ok(Self { fields }),
            Some(other) => Err(format!("request `uri` must be a string, got {other}")),
            None => Err("missing field `uri`".to_string()),
        }
    }
}

impl From<CloudFrontRequest> for Map<String, Value> {
    fn from(request: CloudFrontRequest) -> Self {
        request.fields
    }
}

impl CloudFrontRequest {
    /// Build a request carrying only a URI
    pub fn new(uri: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("uri".to_string(), Value::String(uri.into()));
        Self { fields }
    }

    pub fn uri(&self) -> &str {
        self.fields
            .get("uri")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Copy of this request with `uri` replaced in place
    #[must_use]
    pub fn with_uri(&self, uri: impl Into<String>) -> Self {
        let mut fields = self.fields.clone();
        fields.insert("uri".to_string(), Value::String(uri.into()));
        Self { fields }
    }

    /// All request fields, `uri` included
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// HTTP method, when the platform supplied one
    pub fn method(&self) -> Option<&str> {
        self.fields.get("method").and_then(Value::as_str)
    }

    /// Client IP, when the platform supplied one
    pub fn client_ip(&self) -> Option<&str> {
        self.fields.get("clientIp").and_then(Value::as_str)
    }
}
