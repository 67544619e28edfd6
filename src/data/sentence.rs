//! Parsed sentence model and dependency path resolution.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single token with its pre-computed annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 0-based index within the sentence.
    pub position: usize,
    /// Start offset as supplied by the upstream tokenizer.
    pub offset: usize,
    pub word: String,
    pub lemma: String,
    pub pos: String,
    pub ner: String,
    /// Dependency head, `None` for a root.
    pub parent: Option<usize>,
    /// Label of the edge to `parent`.
    pub label: String,
    pub bounding_box: String,
}

/// A sentence owning its tokens. Parent links are validated on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    doc_id: String,
    sent_id: i64,
    tokens: Vec<Token>,
}

impl Sentence {
    /// Build a sentence, rejecting misnumbered tokens, dangling parents and cycles.
    pub fn new(doc_id: impl Into<String>, sent_id: i64, tokens: Vec<Token>) -> Result<Self> {
        let len = tokens.len();
        for (idx, token) in tokens.iter().enumerate() {
            if token.position != idx {
                return Err(Error::malformed(
                    "wordidxs",
                    format!("token {idx} carries position {}", token.position),
                ));
            }
            if let Some(parent) = token.parent {
                if parent >= len {
                    return Err(Error::ParentOutOfRange {
                        token: idx,
                        parent,
                        len,
                    });
                }
            }
        }
        let sentence = Self {
            doc_id: doc_id.into(),
            sent_id,
            tokens,
        };
        for idx in 0..len {
            sentence.ancestors(idx)?;
        }
        Ok(sentence)
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn sent_id(&self) -> i64 {
        self.sent_id
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Surface words joined by single spaces.
    pub fn text(&self) -> String {
        join_words(&self.tokens)
    }

    /// Dependency path between two tokens.
    ///
    /// Labels walked upward from `from` to the lowest common ancestor are
    /// joined with `|`, followed by `@`, followed by the labels walked
    /// downward to `to`. Tokens in disconnected trees meet at a virtual root.
    /// Identical positions give the empty path.
    pub fn dependency_path(&self, from: usize, to: usize) -> Result<String> {
        let len = self.tokens.len();
        for position in [from, to] {
            if position >= len {
                return Err(Error::TokenOutOfRange { position, len });
            }
        }
        if from == to {
            return Ok(String::new());
        }
        let up_chain = self.ancestors(from)?;
        let down_chain = self.ancestors(to)?;

        let meeting = up_chain.iter().enumerate().find_map(|(i, node)| {
            down_chain
                .iter()
                .position(|other| other == node)
                .map(|j| (i, j))
        });
        let (up_len, down_len) = meeting.unwrap_or((up_chain.len(), down_chain.len()));

        let up: Vec<&str> = up_chain[..up_len]
            .iter()
            .map(|&idx| self.tokens[idx].label.as_str())
            .collect();
        let down: Vec<&str> = down_chain[..down_len]
            .iter()
            .rev()
            .map(|&idx| self.tokens[idx].label.as_str())
            .collect();
        Ok(format!("{}@{}", up.join("|"), down.join("|")))
    }

    /// `position` followed by each of its ancestors up to a root.
    fn ancestors(&self, position: usize) -> Result<Vec<usize>> {
        let mut chain = vec![position];
        let mut current = position;
        while let Some(parent) = self.tokens[current].parent {
            if chain.len() > self.tokens.len() {
                return Err(Error::DependencyCycle { token: position });
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }
}

/// Join token surfaces with single spaces.
pub fn join_words(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.word.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
