use std::collections::HashMap;

use crate::envelope::{BulkEvent, Envelope, EventData, Mark, MarksEnvelope};
use crate::flatten::{flatten, normalize_name};
use crate::{Record, Schema};

/// Metadata shared by every submission unit of a client.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BatchSettings<'a> {
    pub stashid: &'a str,
    pub secret: &'a str,
    pub source: Option<&'a str>,
    pub schema: Schema,
}

/// Groups borrowed records into request envelopes.
///
/// Under `Schema::Marks` every record becomes one mark of a single envelope.
/// Under `Schema::Events` records are grouped by normalized name, in
/// first-seen order, and each group keeps the tags of its first record.
pub(crate) struct Batcher<'a> {
    settings: BatchSettings<'a>,
    marks: Vec<Mark<'a>>,
    events: Vec<BulkEvent<'a>>,
    event_index: HashMap<String, usize>,
    skipped: usize,
}

impl<'a> Batcher<'a> {
    pub fn new(settings: BatchSettings<'a>) -> Self {
        Batcher {
            settings,
            marks: Vec::new(),
            events: Vec::new(),
            event_index: HashMap::new(),
            skipped: 0,
        }
    }

    pub fn add_record(&mut self, record: &'a Record) {
        match self.settings.schema {
            Schema::Marks => self.add_mark(record),
            Schema::Events => self.add_event(record),
        }
    }

    pub fn add_records<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.add_record(record);
        }
    }

    fn add_mark(&mut self, record: &'a Record) {
        let Some(datapoints) = flatten(record) else {
            self.skip(record);
            return;
        };

        self.marks.push(Mark {
            stashid: self.settings.stashid,
            secret: self.settings.secret,
            source: self.settings.source,
            timestamp: record.timestamp_millis(),
            tags: &record.tags,
            datapoints,
        });
    }

    fn add_event(&mut self, record: &'a Record) {
        let Some(fields) = record.fields.as_ref() else {
            self.skip(record);
            return;
        };

        let data = EventData {
            timestamp: record.timestamp_millis(),
            data: fields,
        };

        let name = normalize_name(&record.name);
        match self.event_index.get(&name) {
            Some(&i) => self.events[i].data.push(data),
            None => {
                self.event_index.insert(name.clone(), self.events.len());
                self.events.push(BulkEvent {
                    stashid: self.settings.stashid,
                    secret: self.settings.secret,
                    name,
                    source: self.settings.source,
                    tags: &record.tags,
                    data: vec![data],
                });
            }
        }
    }

    fn skip(&mut self, record: &Record) {
        self.skipped += 1;
        tracing::warn!(record = %record.name, "record has no field map, skipping");
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finalize(self) -> Vec<Envelope<'a>> {
        match self.settings.schema {
            Schema::Marks if self.marks.is_empty() => Vec::new(),
            Schema::Marks => vec![Envelope::Marks(MarksEnvelope {
                stashid: self.settings.stashid,
                marks: self.marks,
            })],
            Schema::Events => self.events.into_iter().map(Envelope::Events).collect(),
        }
    }
}
