mod field_value;
mod record;
mod flatten;
mod envelope;
mod error;
mod options;
mod config;
mod batch_writer;
mod encoder;
mod transport;
mod client;
mod client_builder;

pub use crate::field_value::{FieldValue, ToFieldValue};
pub use crate::record::{FieldMap, Record, TagMap, ToRecord};
pub use crate::flatten::{flatten, normalize_name};
pub use crate::envelope::{BulkEvent, Datapoint, Envelope, EventData, Mark, MarksEnvelope};
pub use crate::encoder::encode;
pub use crate::error::PulseError;
pub use crate::options::Schema;
pub use crate::config::Config;
pub use crate::transport::{HttpTransport, MAX_ERROR_BODY};
pub use crate::client::Client;
pub use crate::client_builder::ClientBuilder;
