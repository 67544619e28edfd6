//! Decoding of tab-separated sentence records.
//!
//! Field order: `doc_id`, `sent_id`, `wordidxs`, `words`, `poses`, `ners`,
//! `lemmas`, `dep_paths`, `dep_parents`, `bounding_boxes`, `acronyms`,
//! `definitions`. List fields are joined with [`LIST_SEPARATOR`];
//! `definitions` is a JSON object keyed `TSV_<i>` by acronym position.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::{
    data::sentence::{Sentence, Token},
    error::{Error, Result},
};

pub const LIST_SEPARATOR: &str = "|^|";
const NULL_FIELD: &str = "\\N";
const REQUIRED_FIELDS: usize = 10;

/// Acronym → lower-cased candidate definitions for one sentence.
pub type AcronymTable = IndexMap<String, IndexSet<String>>;

/// One decoded input line.
#[derive(Debug, Clone)]
pub struct InputRecord {
    pub sentence: Sentence,
    pub acronyms: Option<AcronymTable>,
}

impl InputRecord {
    pub fn parse_line(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(&['\n', '\r'][..]);
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < REQUIRED_FIELDS {
            return Err(Error::malformed(
                "record",
                format!(
                    "expected at least {REQUIRED_FIELDS} tab-separated fields, found {}",
                    fields.len()
                ),
            ));
        }

        let doc_id = fields[0].to_string();
        let sent_id: i64 = fields[1]
            .trim()
            .parse()
            .map_err(|_| Error::malformed("sent_id", format!("`{}` is not an integer", fields[1])))?;
        let offsets = parse_numbers("wordidxs", fields[2])?;
        let words = split_list(fields[3]);
        let n = words.len();
        let poses = column("poses", fields[4], n)?;
        let ners = column("ners", fields[5], n)?;
        let lemmas = column("lemmas", fields[6], n)?;
        let labels = column("dep_paths", fields[7], n)?;
        let parents = parse_numbers("dep_parents", fields[8])?;
        check_len("wordidxs", offsets.len(), n)?;
        check_len("dep_parents", parents.len(), n)?;
        let boxes = if is_null(fields[9]) {
            vec![String::new(); n]
        } else {
            column("bounding_boxes", fields[9], n)?
        };

        let mut tokens = Vec::with_capacity(n);
        let columns = words
            .into_iter()
            .zip(poses)
            .zip(ners)
            .zip(lemmas)
            .zip(labels)
            .zip(boxes)
            .enumerate();
        for (position, (((((word, pos), ner), lemma), label), bounding_box)) in columns {
            tokens.push(Token {
                position,
                offset: offsets[position],
                word,
                lemma,
                pos,
                ner,
                parent: parents[position].checked_sub(1),
                label,
                bounding_box,
            });
        }
        let sentence = Sentence::new(doc_id, sent_id, tokens)?;

        let acronyms = match (fields.get(10), fields.get(11)) {
            (Some(acr), defs) if !is_null(acr) => Some(acronym_table(acr, defs.copied())?),
            _ => None,
        };
        Ok(Self {
            sentence,
            acronyms,
        })
    }
}

fn acronym_table(acronyms: &str, definitions: Option<&str>) -> Result<AcronymTable> {
    let acronyms = split_list(acronyms);
    let raw = definitions
        .filter(|d| !is_null(d))
        .ok_or_else(|| Error::malformed("definitions", "acronyms given without definitions"))?;
    let mut by_marker: HashMap<String, Vec<String>> = serde_json::from_str(raw)
        .map_err(|err| Error::malformed("definitions", err.to_string()))?;

    let mut table = AcronymTable::new();
    for (i, acronym) in acronyms.into_iter().enumerate() {
        let marker = format!("TSV_{i}");
        let defs = by_marker
            .remove(&marker)
            .ok_or_else(|| Error::malformed("definitions", format!("missing key `{marker}`")))?;
        table
            .entry(acronym)
            .or_default()
            .extend(defs.iter().map(|d| d.to_lowercase()));
    }
    Ok(table)
}

fn is_null(field: &str) -> bool {
    field.is_empty() || field == NULL_FIELD
}

fn split_list(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split(LIST_SEPARATOR).map(str::to_string).collect()
}

fn column(name: &'static str, field: &str, expected: usize) -> Result<Vec<String>> {
    let values = split_list(field);
    check_len(name, values.len(), expected)?;
    Ok(values)
}

fn parse_numbers(name: &'static str, field: &str) -> Result<Vec<usize>> {
    split_list(field)
        .iter()
        .map(|value| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::malformed(name, format!("`{value}` is not a non-negative integer")))
        })
        .collect()
}

fn check_len(field: &'static str, found: usize, expected: usize) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(Error::FieldLengthMismatch {
            field,
            expected,
            found,
        })
    }
}

/// Encode a list field the way [`InputRecord::parse_line`] expects it.
pub fn join_list<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
