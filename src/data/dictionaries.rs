//! Static lookup tables shared read-only by every worker.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use indexmap::IndexSet;
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};

pub const GENES_FILE: &str = "genes.tsv";
pub const ENGLISH_FILE: &str = "english.txt";
pub const STOPWORDS_FILE: &str = "stopwords.txt";
pub const LONG_NAMES_FILE: &str = "long_names.tsv";

/// Gene symbols, English vocabulary, stopwords and long gene names.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dictionaries {
    genes: HashMap<String, Vec<String>>,
    english: HashSet<String>,
    stopwords: HashSet<String>,
    long_names: HashSet<String>,
    long_name_symbols: usize,
    longest_gene_phrase: usize,
}

/// Entry counts reported by `genesup dicts`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DictionaryStats {
    pub gene_phrases: usize,
    pub english_words: usize,
    pub stopwords: usize,
    pub long_name_symbols: usize,
    pub long_names: usize,
    pub longest_gene_phrase: usize,
}

impl Dictionaries {
    pub fn builder() -> DictionariesBuilder {
        DictionariesBuilder::default()
    }

    /// Load every table from `dir`. All four files must be present.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut builder = Self::builder();
        for (phrase, id) in read_pairs(&dir.join(GENES_FILE))? {
            builder = builder.gene(phrase, [id]);
        }
        builder = builder
            .english_words(read_lines(&dir.join(ENGLISH_FILE))?)
            .stopwords(read_lines(&dir.join(STOPWORDS_FILE))?);
        for (symbol, name) in read_pairs(&dir.join(LONG_NAMES_FILE))? {
            builder = builder.long_name(symbol, name);
        }
        let dicts = builder.build();
        info!(dir = %dir.display(), stats = ?dicts.stats(), "loaded dictionaries");
        Ok(dicts)
    }

    /// Canonical identifiers for a phrase, in registration order.
    pub fn gene_ids(&self, phrase: &str) -> Option<&[String]> {
        self.genes.get(phrase).map(Vec::as_slice)
    }

    pub fn is_gene(&self, phrase: &str) -> bool {
        self.genes.contains_key(phrase)
    }

    pub fn is_english(&self, word: &str) -> bool {
        self.english.contains(word)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Whether `phrase` is a registered long gene name.
    pub fn is_long_name(&self, phrase: &str) -> bool {
        self.long_names.contains(phrase)
    }

    /// Token count of the longest gene phrase.
    pub fn longest_gene_phrase(&self) -> usize {
        self.longest_gene_phrase
    }

    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            gene_phrases: self.genes.len(),
            english_words: self.english.len(),
            stopwords: self.stopwords.len(),
            long_name_symbols: self.long_name_symbols,
            long_names: self.long_names.len(),
            longest_gene_phrase: self.longest_gene_phrase,
        }
    }
}

/// Incremental construction of [`Dictionaries`], used by the loader and tests.
#[derive(Debug, Default)]
pub struct DictionariesBuilder {
    genes: HashMap<String, IndexSet<String>>,
    english: HashSet<String>,
    stopwords: HashSet<String>,
    long_names: HashMap<String, IndexSet<String>>,
}

impl DictionariesBuilder {
    /// Register `phrase` as a surface form of each identifier in `ids`.
    pub fn gene<I, S>(mut self, phrase: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.genes.entry(phrase.into()).or_default();
        entry.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn english_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.english.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn long_name(mut self, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        self.long_names
            .entry(symbol.into())
            .or_default()
            .insert(name.into());
        self
    }

    pub fn build(self) -> Dictionaries {
        let longest_gene_phrase = self
            .genes
            .keys()
            .map(|phrase| phrase.split_whitespace().count())
            .max()
            .unwrap_or(0);
        Dictionaries {
            genes: self
                .genes
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().collect()))
                .collect(),
            english: self.english,
            stopwords: self.stopwords,
            long_name_symbols: self.long_names.len(),
            long_names: self.long_names.into_values().flatten().collect(),
            longest_gene_phrase,
        }
    }
}

fn open_tsv(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_path(path)
        .map_err(|err| Error::dictionary(path.display().to_string(), err.to_string()))
}

fn read_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    let mut reader = open_tsv(path)?;
    let mut pairs = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|err| Error::dictionary(path.display().to_string(), err.to_string()))?;
        match (record.get(0), record.get(1)) {
            (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => {
                pairs.push((key.to_string(), value.to_string()));
            }
            (Some(""), None) | (None, _) => {}
            _ => {
                return Err(Error::dictionary(
                    path.display().to_string(),
                    format!("row {} needs two tab-separated columns", line + 1),
                ))
            }
        }
    }
    Ok(pairs)
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let mut reader = open_tsv(path)?;
    let mut words = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|err| Error::dictionary(path.display().to_string(), err.to_string()))?;
        if let Some(word) = record.get(0).map(str::trim).filter(|w| !w.is_empty()) {
            words.push(word.to_string());
        }
    }
    Ok(words)
}
