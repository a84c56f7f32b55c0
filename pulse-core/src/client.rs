use futures::{StreamExt as _, TryStreamExt as _, stream};

use crate::batch_writer::{BatchSettings, Batcher};
use crate::encoder::encode;
use crate::transport::HttpTransport;
use crate::{ClientBuilder, Config, PulseError, Record, Schema, ToRecord};

#[derive(Debug)]
pub struct Client {
    pub(crate) transport: HttpTransport,

    pub(crate) stashid: String,
    pub(crate) secret: String,
    pub(crate) source: Option<String>,
    pub(crate) schema: Schema,
    pub(crate) max_concurrent_requests: usize,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Validates `config` and creates the HTTP client. Called once per process.
    pub fn connect(config: &Config) -> Result<Self, PulseError> {
        ClientBuilder::from_config(config).build()
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Delivers one batch of records.
    ///
    /// Records without a field map are skipped with a warning. Any encode or
    /// delivery failure fails the whole call; nothing is retried.
    pub async fn write(&self, records: &[Record]) -> Result<(), PulseError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut batcher = Batcher::new(BatchSettings {
            stashid: &self.stashid,
            secret: &self.secret,
            source: self.source.as_deref(),
            schema: self.schema,
        });
        batcher.add_records(records);
        let skipped = batcher.skipped();
        let envelopes = batcher.finalize();
        tracing::debug!(records = records.len(), skipped, requests = envelopes.len(), "batch assembled");

        // Everything is encoded before the first request goes out, so an
        // encode failure never leaves a partially delivered batch.
        let mut payloads = Vec::with_capacity(envelopes.len());
        for envelope in &envelopes {
            payloads.push(encode(envelope).await?);
        }

        if self.max_concurrent_requests <= 1 || payloads.len() <= 1 {
            for payload in payloads {
                self.transport.send(payload).await?;
            }
            return Ok(());
        }

        // Sends run as detached tasks: after the first failure the remaining
        // in-flight requests finish on their own and are not awaited.
        stream::iter(payloads)
            .map(|payload| {
                let transport = self.transport.clone();
                tokio::spawn(async move { transport.send(payload).await })
            })
            .buffer_unordered(self.max_concurrent_requests)
            .map(|joined| -> Result<(), PulseError> { joined? })
            .try_for_each(|()| async { Ok(()) })
            .await
    }

    pub async fn write_records<I, T>(&self, records: I) -> Result<(), PulseError>
    where
        T: ToRecord,
        I: IntoIterator<Item = T>,
    {
        let records: Vec<Record> = records.into_iter().map(ToRecord::to_record).collect();
        self.write(&records).await
    }

    /// Holds nothing beyond the shared HTTP client, which is dropped here.
    pub fn close(self) -> Result<(), PulseError> {
        Ok(())
    }
}
