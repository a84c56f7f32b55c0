use std::collections::HashMap;
use chrono::{DateTime, Utc};

use crate::field_value::{FieldValue, ToFieldValue};

pub type TagMap = HashMap<String, String>;
pub type FieldMap = HashMap<String, FieldValue>;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// One measurement sample as handed over by the collection agent.
///
/// `fields` is `None` when the agent supplied no field map at all; such
/// records are skipped when a batch is assembled. A default record starts
/// with an empty field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub tags: TagMap,
    pub fields: Option<FieldMap>,
    pub time: DateTime<Utc>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            name: String::new(),
            tags: HashMap::new(),
            fields: Some(HashMap::new()),
            time: DateTime::default(),
        }
    }
}

impl Record {
    pub fn new_with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tags: HashMap::new(),
            fields: Some(HashMap::new()),
            time: Utc::now(),
        }
    }

    pub fn new<I1, I2, K, T, Tz>(name: &str, tags: I1, fields: I2, timestamp: DateTime<Tz>) -> Self
    where
        I1: IntoIterator<Item = (K, String)>,
        I2: IntoIterator<Item = (String, T)>,
        K: Into<String>,
        T: Into<FieldValue>,
        Tz: chrono::TimeZone,
    {
        let tags = tags.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let fields = fields.into_iter().map(|(k, v)| (k, v.into())).collect();
        Self {
            name: name.to_string(),
            tags,
            fields: Some(fields),
            time: timestamp.to_utc(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    pub fn set_timestamp<T>(&mut self, timestamp: DateTime<T>) -> &mut Self
    where
        T: chrono::TimeZone,
    {
        self.time = timestamp.to_utc();
        self
    }

    pub fn set_tag(&mut self, key: &str, value: &str) -> &mut Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get_tag(&self, key: &str) -> Option<&String> {
        self.tags.get(key)
    }

    pub fn remove_tag(&mut self, key: &str) -> &mut Self {
        self.tags.remove(key);
        self
    }

    pub fn get_field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.as_ref().and_then(|fields| fields.get(key))
    }

    /// Sets a field, creating the field map if the record had none.
    /// Values converting to `None` leave the record untouched.
    pub fn set_field<T>(&mut self, key: &str, value: T) -> &mut Self
    where
        T: ToFieldValue,
    {
        if let Some(value) = value.to_field_value() {
            self.fields
                .get_or_insert_with(HashMap::new)
                .insert(key.to_string(), value);
        }
        self
    }

    pub fn remove_field(&mut self, key: &str) -> &mut Self {
        if let Some(fields) = self.fields.as_mut() {
            fields.remove(key);
        }
        self
    }

    pub fn clear_fields(&mut self) -> &mut Self {
        self.fields = None;
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.as_ref().map_or(0, HashMap::len)
    }

    /// Timestamp in milliseconds since the epoch, truncated from nanoseconds.
    pub fn timestamp_millis(&self) -> i64 {
        match self.time.timestamp_nanos_opt() {
            Some(nanos) => nanos / NANOS_PER_MILLI,
            // outside the i64 nanosecond range (before 1677 or after 2262)
            None => self.time.timestamp_millis(),
        }
    }
}

pub trait ToRecord {
    fn to_record(self) -> Record;
}

impl ToRecord for Record {
    fn to_record(self) -> Record {
        self
    }
}
