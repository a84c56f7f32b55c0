use crate::envelope::Datapoint;
use crate::record::Record;

/// Replaces every `_` with `.`. Idempotent.
pub fn normalize_name(name: &str) -> String {
    name.replace('_', ".")
}

/// One datapoint per field, named `<normalized record name>_<field key>`.
///
/// Returns `None` when the record has no field map; iteration order of the
/// returned datapoints follows the field map and carries no meaning.
pub fn flatten(record: &Record) -> Option<Vec<Datapoint<'_>>> {
    let fields = record.fields.as_ref()?;
    let prefix = normalize_name(&record.name);
    let timestamp = record.timestamp_millis();

    Some(
        fields
            .iter()
            .map(|(key, value)| Datapoint {
                name: format!("{prefix}_{key}"),
                timestamp,
                value,
            })
            .collect(),
    )
}
