//! Gene mention candidates, their feature sets and serialised output rows.

use std::{fmt, sync::Arc};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{
    data::sentence::{join_words, Sentence, Token},
    error::{Error, Result},
};

/// Raw candidates versus supervision-derived copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MentionKind {
    #[serde(rename = "GENE")]
    Gene,
    #[serde(rename = "GENE_SUP")]
    GeneSup,
}

impl fmt::Display for MentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gene => f.write_str("GENE"),
            Self::GeneSup => f.write_str("GENE_SUP"),
        }
    }
}

/// Set of feature names. Order of insertion is kept for stable output only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(IndexSet<String>);

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the feature was already present.
    pub fn insert(&mut self, feature: impl Into<String>) -> bool {
        self.0.insert(feature.into())
    }

    pub fn remove(&mut self, feature: &str) -> bool {
        self.0.shift_remove(feature)
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.0.contains(feature)
    }

    pub fn starts_with_any(&self, prefix: &str) -> bool {
        self.0.iter().any(|f| f.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Features present both here and in `other`.
    pub fn intersection<'a, I>(&self, other: I) -> FeatureSet
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        self.0
            .iter()
            .filter(|f| other.clone().into_iter().any(|o| o == f.as_str()))
            .cloned()
            .collect()
    }

    /// Features present here but not in `other`.
    pub fn difference<'a, I>(&self, other: I) -> FeatureSet
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        self.0
            .iter()
            .filter(|f| !other.clone().into_iter().any(|o| o == f.as_str()))
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for FeatureSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// A span of tokens borrowed from its sentence, labelled with gene identifiers.
#[derive(Debug, Clone)]
pub struct Mention<'s> {
    kind: MentionKind,
    entity: Arc<str>,
    tokens: &'s [Token],
    pub features: FeatureSet,
    label: Option<bool>,
    pub left_lemma: Option<&'s str>,
    pub right_lemma: Option<&'s str>,
}

impl<'s> Mention<'s> {
    /// A raw `GENE` candidate over a non-empty span.
    pub fn candidate(entity: impl Into<Arc<str>>, tokens: &'s [Token]) -> Result<Self> {
        if tokens.is_empty() {
            return Err(Error::EmptySpan);
        }
        Ok(Self {
            kind: MentionKind::Gene,
            entity: entity.into(),
            tokens,
            features: FeatureSet::new(),
            label: None,
            left_lemma: None,
            right_lemma: None,
        })
    }

    /// A labelled `GENE_SUP` copy sharing this mention's entity and span.
    pub fn supervised(&self, label: bool, features: FeatureSet) -> Mention<'s> {
        Mention {
            kind: MentionKind::GeneSup,
            entity: Arc::clone(&self.entity),
            tokens: self.tokens,
            features,
            label: Some(label),
            left_lemma: self.left_lemma,
            right_lemma: self.right_lemma,
        }
    }

    pub fn kind(&self) -> MentionKind {
        self.kind
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Individual identifiers of an ambiguous entity.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entity.split('|')
    }

    pub fn tokens(&self) -> &'s [Token] {
        self.tokens
    }

    pub fn label(&self) -> Option<bool> {
        self.label
    }

    pub fn first(&self) -> &'s Token {
        &self.tokens[0]
    }

    pub fn last(&self) -> &'s Token {
        &self.tokens[self.tokens.len() - 1]
    }

    pub fn start(&self) -> usize {
        self.first().position
    }

    pub fn end(&self) -> usize {
        self.last().position
    }

    /// Surface words joined by spaces.
    pub fn phrase(&self) -> String {
        join_words(self.tokens)
    }

    pub fn is_single_token(&self) -> bool {
        self.tokens.len() == 1
    }

    pub fn to_record(&self, sentence: &Sentence) -> OutputRecord {
        OutputRecord {
            doc_id: sentence.doc_id().to_string(),
            sent_id: sentence.sent_id(),
            mention_id: format!(
                "{}_{}_{}_{}",
                sentence.doc_id(),
                sentence.sent_id(),
                self.start(),
                self.end()
            ),
            kind: self.kind,
            entity: self.entity.to_string(),
            wordidxs: self.tokens.iter().map(|t| t.position).collect(),
            words: self.tokens.iter().map(|t| t.word.clone()).collect(),
            features: self.features.clone(),
            is_correct: self.label,
        }
    }
}

/// One emitted line of labelled training data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub doc_id: String,
    pub sent_id: i64,
    pub mention_id: String,
    #[serde(rename = "type")]
    pub kind: MentionKind,
    pub entity: String,
    pub wordidxs: Vec<usize>,
    pub words: Vec<String>,
    pub features: FeatureSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl OutputRecord {
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim_end())?)
    }
}
