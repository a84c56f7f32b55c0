use serde::Serialize;

use crate::field_value::FieldValue;
use crate::record::{FieldMap, TagMap};

/// A single scalar flattened out of a record's field map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datapoint<'a> {
    pub name: String,
    pub timestamp: i64,
    pub value: &'a FieldValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mark<'a> {
    pub stashid: &'a str,
    pub secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a str>,
    pub timestamp: i64,
    pub tags: &'a TagMap,
    pub datapoints: Vec<Datapoint<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarksEnvelope<'a> {
    pub stashid: &'a str,
    pub marks: Vec<Mark<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventData<'a> {
    pub timestamp: i64,
    pub data: &'a FieldMap,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkEvent<'a> {
    pub stashid: &'a str,
    pub secret: &'a str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a str>,
    pub tags: &'a TagMap,
    pub data: Vec<EventData<'a>>,
}

/// Body of exactly one POST request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Envelope<'a> {
    Marks(MarksEnvelope<'a>),
    Events(BulkEvent<'a>),
}

impl Envelope<'_> {
    /// Number of records carried by this envelope.
    pub fn record_count(&self) -> usize {
        match self {
            Envelope::Marks(envelope) => envelope.marks.len(),
            Envelope::Events(event) => event.data.len(),
        }
    }
}
