pub use pulse_core::{Record, ToRecord, FieldValue, Schema, Config, PulseError, Client, ClientBuilder};

#[cfg(feature = "derive")]
pub use pulse_macro::ToRecord;
