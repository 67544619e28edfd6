//! Candidate extraction, featurisation and supervision orchestration.

pub mod candidates;
pub mod features;
pub mod mention;
pub mod supervision;

use std::sync::Arc;

use tracing::debug;

use crate::{
    data::{dictionaries::Dictionaries, record::InputRecord},
    error::Result,
    nlp::{candidates::CandidateGenerator, mention::OutputRecord, supervision::Supervisor},
};

/// End-to-end processing of one sentence record at a time.
///
/// Holds only the read-only dictionaries, so one pipeline can be shared by
/// any number of workers.
#[derive(Debug, Clone)]
pub struct Pipeline {
    dicts: Arc<Dictionaries>,
}

impl Pipeline {
    pub fn new(dicts: Arc<Dictionaries>) -> Self {
        Self { dicts }
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dicts
    }

    /// Candidates of the record's sentence plus their labelled copies.
    pub fn process(&self, record: &InputRecord) -> Result<Vec<OutputRecord>> {
        let sentence = &record.sentence;
        let candidates = CandidateGenerator::new(&self.dicts).generate(sentence)?;
        let candidate_count = candidates.len();
        let mentions =
            Supervisor::new(&self.dicts).supervise(candidates, sentence, record.acronyms.as_ref());
        debug!(
            doc_id = sentence.doc_id(),
            sent_id = sentence.sent_id(),
            candidates = candidate_count,
            emitted = mentions.len(),
            "processed sentence"
        );
        Ok(mentions.iter().map(|m| m.to_record(sentence)).collect())
    }

    /// Decode and process one input line.
    pub fn process_line(&self, line: &str) -> Result<Vec<OutputRecord>> {
        let record = InputRecord::parse_line(line)?;
        self.process(&record)
    }
}
