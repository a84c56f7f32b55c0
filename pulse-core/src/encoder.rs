use async_compression::tokio::write::GzipEncoder;
use tokio::io::AsyncWriteExt as _;

use crate::PulseError;
use crate::envelope::Envelope;

/// Serializes an envelope to JSON and gzips it.
pub async fn encode(envelope: &Envelope<'_>) -> Result<Vec<u8>, PulseError> {
    let json = serde_json::to_vec(envelope)?;
    compress(&json).await
}

pub(crate) async fn compress(buf: &[u8]) -> Result<Vec<u8>, PulseError> {
    let mut encoder = GzipEncoder::new(Vec::with_capacity(buf.len() / 4));
    encoder.write_all(buf).await?;
    encoder.shutdown().await?;
    Ok(encoder.into_inner())
}
