//! Dictionary-driven discovery of gene mention candidates.

use tracing::debug;

use crate::{
    data::{
        dictionaries::Dictionaries,
        sentence::{join_words, Sentence},
    },
    error::Result,
    nlp::{
        features::{is_all_caps, FeatureExtractor},
        mention::Mention,
    },
};

/// Scans sentences for maximal non-overlapping gene phrases.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'d> {
    dicts: &'d Dictionaries,
    extractor: FeatureExtractor<'d>,
}

impl<'d> CandidateGenerator<'d> {
    pub fn new(dicts: &'d Dictionaries) -> Self {
        Self {
            dicts,
            extractor: FeatureExtractor::new(dicts),
        }
    }

    /// Longest span tried, in tokens. Doubled to allow for interleaved punctuation.
    pub fn max_span(&self) -> usize {
        (self.dicts.longest_gene_phrase() * 2).max(1)
    }

    /// Featurised `GENE` candidates in sentence order.
    pub fn generate<'s>(&self, sentence: &'s Sentence) -> Result<Vec<Mention<'s>>> {
        if !self.has_prose(sentence) {
            debug!(
                doc_id = sentence.doc_id(),
                sent_id = sentence.sent_id(),
                "no English words; skipping sentence"
            );
            return Ok(Vec::new());
        }

        let fold_case = is_all_caps(&sentence.text());
        let tokens = sentence.tokens();
        let max_span = self.max_span();
        let mut used = vec![false; tokens.len()];
        let mut mentions = Vec::new();

        for start in 0..tokens.len() {
            if used[start] {
                continue;
            }
            let longest = max_span.min(tokens.len() - start);
            for end in (start + 1..=start + longest).rev() {
                if used[start..end].iter().any(|&u| u) {
                    continue;
                }
                let span = &tokens[start..end];
                let mut phrase = join_words(span);
                if fold_case {
                    phrase = phrase.to_lowercase();
                }
                if phrase.chars().count() <= 1 {
                    continue;
                }
                let Some(ids) = self.dicts.gene_ids(&phrase) else {
                    continue;
                };
                let mut mention = Mention::candidate(ids.join("|"), span)?;
                self.extractor.extract(&mut mention, sentence)?;
                mentions.push(mention);
                used[start..end].iter_mut().for_each(|u| *u = true);
                break;
            }
        }
        Ok(mentions)
    }

    /// At least one token longer than two characters is an English word.
    fn has_prose(&self, sentence: &Sentence) -> bool {
        sentence.tokens().iter().any(|t| {
            t.word.chars().count() > 2
                && (self.dicts.is_english(&t.word) || self.dicts.is_english(&t.word.to_lowercase()))
        })
    }
}
