//! Linguistic, contextual and shape features for gene mention candidates.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::{
    data::{
        dictionaries::Dictionaries,
        sentence::{Sentence, Token},
    },
    error::Result,
    nlp::mention::{FeatureSet, Mention},
};

pub const IS_LONG_NAME: &str = "IS_LONG_NAME";
pub const IS_YEAR_LEFT: &str = "IS_YEAR_LEFT";
pub const IS_YEAR_RIGHT: &str = "IS_YEAR_RIGHT";
pub const IS_BETWEEN_GENES: &str = "IS_BETWEEN_GENES";
pub const GENE_ON_LEFT: &str = "GENE_ON_LEFT";
pub const GENE_ON_RIGHT: &str = "GENE_ON_RIGHT";
pub const COMES_AFTER: &str = "COMES_AFTER_";
pub const COMES_BEFORE: &str = "COMES_BEFORE_";
pub const COMES_AFTER_PERSON: &str = "COMES_AFTER_PERSON";
pub const COMES_AFTER_ORGANIZATION: &str = "COMES_AFTER_ORGANIZATION";
pub const COMES_BEFORE_LOCATION: &str = "COMES_BEFORE_LOCATION";
pub const APPEARS_MANY_TIMES: &str = "APPEARS_MANY_TIMES_IN_SENTENCE";
pub const IS_LONG_ALPHANUMERIC_MAIN_SYMBOL: &str = "IS_LONG_ALPHANUMERIC_MAIN_SYMBOL";
pub const IS_HYPHENATED_SYMBOL: &str = "IS_HYPHENATED_SYMBOL";
pub const ENDS_WITH_GREEK: &str = "ENDS_WITH_GREEK";

/// Paths this long or longer are ignored by every nearest-token search.
pub const PATH_CEILING: usize = 100;

/// Lemmas that tend to occur near gene mentions.
pub const GENE_KEYWORDS: &[&str] = &[
    "acetylation", "activate", "activation", "adaptor", "agonist", "alignment",
    "allele", "antagonist", "antibody", "antigen", "antigene", "anti-gen",
    "anti-gene", "asynonymous", "backbone", "binding", "biomarker",
    "breakdown", "cancer", "carcinoma", "cdna", "cDNA", "cell", "chromosome",
    "cleavage", "cluster", "cnv", "co-activator", "co-expression",
    "coexpression", "complex", "dd-genotype", "DD-genotype", "deletion",
    "determinant", "dna", "domain", "down-regulation", "downregulation",
    "duplication", "dysfunction", "effector", "enhancer", "enrichment",
    "enzyme", "excision", "expression", "factor", "family", "fibrosarcoma",
    "function", "functionality", "gene", "genotype", "growth", "haplotype",
    "haplotypes", "heterozygous", "hexons", "hexon", "histone", "homologue",
    "homology", "homozygous", "human", "hypermetylation", "hybridization",
    "induce", "inducer", "induction", "inhibitor", "inhibition", "intron",
    "interaction", "isoform", "isoforms", "kinase", "kinesin", "knockdown",
    "knock-down", "knock-out", "knockout", "level", "ligand", "location",
    "locus", "lymphoma", "mammalian", "marker", "methilation", "methylation",
    "modification", "moiety", "molecule", "molecules", "morpheein", "motif",
    "mrna", "mRNA", "mutant", "mutation", "mutations", "nonsynonymous",
    "non-synonymous", "nucleotide", "oligomerization", "oncoprotein",
    "overexpression", "over-expression", "pathway", "peptide",
    "pharmacokinetic", "pharmacodynamic", "pharmacogenetic", "phosphorylation",
    "polymorphism", "proliferation", "promoter", "protein", "protooncogene",
    "proto-oncogene", "pseudogene", "receptor", "receptors", "recruitment",
    "region", "regulator", "release", "repair", "repressor", "resistance",
    "retention", "ribonuclease", "rna", "role", "rrna", "sarcoma", "sequence",
    "sequences", "sequestration", "serum", "signaling", "sirnas", "sirna",
    "siRNA", "siRNAs", "SNP", "SNPs", "staining", "sumoylation", "synonymous",
    "targed", "T-cell", "transducer", "transgene", "translocation",
    "transcribe", "transcript", "transcription", "transporter", "tumor",
    "tumours", "tumour", "variant", "variation", "up-regulation",
    "upregulation", "vivo", "vitro",
];

const ENTITY_TAGS: [&str; 3] = ["ORGANIZATION", "LOCATION", "PERSON"];
const CROWD_TAGS: [&str; 3] = ["PERSON", "ORGANIZATION", "LOCATION"];
const CROWD_THRESHOLD: usize = 4;
const GREEK_SUFFIXES: [&str; 3] = ["alpha", "beta", "gamma"];

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| GENE_KEYWORDS.iter().copied().collect());
static VERB_POS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^VB[A-Z]*$").expect("valid regex"));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid regex"));
static P_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^p[0-9]+$").expect("valid regex"));
static P_TWO_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^p[0-9][0-9]$").expect("valid regex"));

/// The closest sentence token found by [`nearest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nearest<'s> {
    pub token: &'s Token,
    pub path: String,
}

/// Pick the pair with the shortest path below [`PATH_CEILING`].
///
/// Ties keep the earliest pair, so callers must yield pairs in scan order.
pub fn nearest<'s, I>(pairs: I) -> Option<Nearest<'s>>
where
    I: IntoIterator<Item = (&'s Token, String)>,
{
    let mut best: Option<Nearest<'s>> = None;
    for (token, path) in pairs {
        let len = path.chars().count();
        if len >= PATH_CEILING {
            continue;
        }
        if best
            .as_ref()
            .map_or(true, |b| len < b.path.chars().count())
        {
            best = Some(Nearest { token, path });
        }
    }
    best
}

/// Drop person/organisation adjacency once stronger symbol evidence exists.
pub fn retract_entity_context(features: &mut FeatureSet) {
    features.remove(COMES_AFTER_PERSON);
    features.remove(COMES_AFTER_ORGANIZATION);
}

/// Adds features to candidates using the shared dictionaries.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor<'d> {
    dicts: &'d Dictionaries,
}

impl<'d> FeatureExtractor<'d> {
    pub fn new(dicts: &'d Dictionaries) -> Self {
        Self { dicts }
    }

    /// Populate `mention.features` and its neighbour lemmas.
    pub fn extract<'s>(&self, mention: &mut Mention<'s>, sentence: &'s Sentence) -> Result<()> {
        self.verb(mention, sentence)?;
        self.keywords(mention, sentence)?;
        self.other_gene(mention, sentence)?;
        ngrams(mention, sentence);
        self.meaningful_neighbours(mention, sentence);
        let flanks = self.flanking_entities(mention, sentence);
        repetition(mention, sentence);
        if mention.is_single_token() {
            self.symbol_shape(mention, flanks);
        }
        trace!(
            mention = %mention.phrase(),
            features = mention.features.len(),
            "extracted features"
        );
        Ok(())
    }

    fn verb<'s>(&self, mention: &mut Mention<'s>, sentence: &'s Sentence) -> Result<()> {
        let pairs = pair_paths(mention, sentence, |_, t| {
            is_alphabetic(&t.lemma) && VERB_POS.is_match(&t.pos) && t.lemma != "be"
        })?;
        if let Some(found) = nearest(pairs) {
            mention
                .features
                .insert(format!("VERB_[{}]{}", found.token.lemma, found.path));
        }
        Ok(())
    }

    fn keywords<'s>(&self, mention: &mut Mention<'s>, sentence: &'s Sentence) -> Result<()> {
        let pairs = pair_paths(mention, sentence, |_, t| KEYWORDS.contains(t.lemma.as_str()))?;
        for (token, path) in &pairs {
            if path.chars().count() < PATH_CEILING {
                mention
                    .features
                    .insert(format!("KEYWORD_[{}]{}", token.lemma, path));
            }
        }
        if let Some(found) = nearest(pairs) {
            mention.features.insert(format!(
                "EXT_KEYWORD_MIN_[{}]{}",
                found.token.lemma, found.path
            ));
            mention
                .features
                .insert(format!("KEYWORD_MIN_[{}]", found.token.lemma));
        }
        Ok(())
    }

    fn other_gene<'s>(&self, mention: &mut Mention<'s>, sentence: &'s Sentence) -> Result<()> {
        let (start, end) = (mention.start(), mention.end());
        let pairs = pair_paths(mention, sentence, |_, t| {
            !(start..=end).contains(&t.position) && self.dicts.is_gene(&t.word)
        })?;
        if let Some(found) = nearest(pairs) {
            mention
                .features
                .insert(format!("OTHER_GENE_[{}] {}", found.token.lemma, found.path));
        }
        Ok(())
    }

    fn meaningful_neighbours<'s>(&self, mention: &mut Mention<'s>, sentence: &'s Sentence) {
        let tokens = sentence.tokens();
        let left = tokens[..mention.start()]
            .iter()
            .rev()
            .find(|t| !self.is_filler(t));
        let right = tokens[mention.end() + 1..]
            .iter()
            .find(|t| !self.is_filler(t));

        mention.left_lemma = left.map(|t| t.lemma.as_str());
        mention.right_lemma = right.map(|t| t.lemma.as_str());

        if left.is_some_and(|t| is_year(&t.word)) {
            mention.features.insert(IS_YEAR_LEFT);
        }
        if right.is_some_and(|t| is_year(&t.word)) {
            mention.features.insert(IS_YEAR_RIGHT);
        }

        let gene_left = left.is_some_and(|t| self.is_flagged_gene(t));
        let gene_right = right.is_some_and(|t| self.is_flagged_gene(t));
        match (gene_left, gene_right) {
            (true, true) => mention.features.insert(IS_BETWEEN_GENES),
            (true, false) => mention.features.insert(GENE_ON_LEFT),
            (false, true) => mention.features.insert(GENE_ON_RIGHT),
            (false, false) => false,
        };
    }

    /// Punctuation, lower-case stopwords and single characters carry no context.
    fn is_filler(&self, token: &Token) -> bool {
        let gene = self.dicts.is_gene(&token.word);
        let punctuation = !is_alphanumeric(&token.lemma) && !gene;
        let stopword = !is_all_caps(&token.word) && self.dicts.is_stopword(&token.lemma);
        ((punctuation || stopword) && !NUMBER.is_match(&token.word) && !gene)
            || token.lemma.chars().count() == 1
    }

    fn is_flagged_gene(&self, token: &Token) -> bool {
        self.dicts.is_gene(&token.word) && token.word.chars().count() > 3
    }

    /// Emits `COMES_AFTER_*` / `COMES_BEFORE_*` and returns the tags found.
    fn flanking_entities<'s>(
        &self,
        mention: &mut Mention<'s>,
        sentence: &'s Sentence,
    ) -> Flanks<'s> {
        let tokens = sentence.tokens();
        let entity = |t: &&'s Token| {
            ENTITY_TAGS.contains(&t.ner.as_str()) && !self.dicts.is_gene(&t.word)
        };
        let after = tokens[..mention.start()]
            .iter()
            .rev()
            .find(|t| t.lemma != ",")
            .filter(entity)
            .map(|t| t.ner.as_str());
        let before = tokens[mention.end() + 1..]
            .iter()
            .find(|t| t.lemma != ",")
            .filter(entity)
            .map(|t| t.ner.as_str());
        if let Some(tag) = after {
            mention.features.insert(format!("{COMES_AFTER}{tag}"));
        }
        if let Some(tag) = before {
            mention.features.insert(format!("{COMES_BEFORE}{tag}"));
        }
        Flanks { after, before }
    }

    fn symbol_shape(&self, mention: &mut Mention<'_>, flanks: Flanks<'_>) {
        let word = mention.first().word.as_str();
        let len = word.chars().count();
        let entity_is_word = mention.entity_ids().any(|id| id == word);
        let entity_in_dict = mention.entity_ids().any(|id| self.dicts.is_gene(id));
        let features = &mut mention.features;

        if entity_is_word && entity_in_dict && !flanks.both() {
            if is_alphanumeric(word) && !is_alphabetic(word) {
                if len >= 4 {
                    features.insert(IS_LONG_ALPHANUMERIC_MAIN_SYMBOL);
                } else if word.chars().skip(1).collect::<String>().parse::<i64>().is_ok() {
                    features.insert(format!("IS_LETTER_NUMBER_MAIN_SYMBOL_[{word}]"));
                } else {
                    features.insert(format!("IS_SHORT_ALPHANUMERIC_MAIN_SYMBOL_[{word}]"));
                }
            } else if len >= 4 {
                features.insert(format!("IS_LONG_MAIN_SYMBOL_[{word}]"));
                retract_entity_context(features);
            }
        } else if entity_in_dict || self.dicts.is_gene(word) {
            if len > 3 && word.to_lowercase() == word && !P_NUMBER.is_match(word) {
                features.insert(IS_LONG_NAME);
                retract_entity_context(features);
            } else if self.dicts.is_long_name(word) {
                features.insert(IS_LONG_NAME);
                retract_entity_context(features);
            } else if word.contains('-') && !features.contains(COMES_AFTER_PERSON) {
                features.insert(IS_HYPHENATED_SYMBOL);
            } else if ends_with_greek(word) {
                features.insert(ENDS_WITH_GREEK);
            } else if P_TWO_DIGITS.is_match(word) {
                features.insert(format!("IS_PXX_SYMBOL_[{word}]"));
            } else if is_alphanumeric(word) && !is_alphabetic(word) {
                if len >= 4 {
                    features.insert(format!("IS_LONG_ALPHANUMERIC_ALTERN_SYMBOL_[{word}]"));
                }
            } else if len >= 4 {
                features.insert(format!("IS_LONG_ALTERN_SYMBOL_[{word}]"));
            }
        }
    }
}

/// Named-entity tags directly before and after a mention.
#[derive(Debug, Clone, Copy, Default)]
struct Flanks<'s> {
    after: Option<&'s str>,
    before: Option<&'s str>,
}

impl Flanks<'_> {
    fn both(&self) -> bool {
        self.after.is_some() && self.before.is_some()
    }
}

/// Paths from every mention token to every accepted sentence token, in scan order.
fn pair_paths<'s, F>(
    mention: &Mention<'s>,
    sentence: &'s Sentence,
    accept: F,
) -> Result<Vec<(&'s Token, String)>>
where
    F: Fn(&Token, &Token) -> bool,
{
    let mut pairs = Vec::new();
    for source in mention.tokens() {
        for target in sentence.tokens() {
            if accept(source, target) {
                let path = sentence.dependency_path(source.position, target.position)?;
                pairs.push((target, path));
            }
        }
    }
    Ok(pairs)
}

fn ngrams(mention: &mut Mention<'_>, sentence: &Sentence) {
    if let Some(prev) = mention
        .start()
        .checked_sub(1)
        .and_then(|idx| sentence.token(idx))
    {
        mention
            .features
            .insert(format!("NGRAM_LEFT_1_[{}]", prev.lemma));
    }
    if let Some(next) = sentence.token(mention.end() + 1) {
        mention
            .features
            .insert(format!("NGRAM_RIGHT_1_[{}]", next.lemma));
    }
}

fn repetition(mention: &mut Mention<'_>, sentence: &Sentence) {
    if mention.is_single_token() {
        let word = &mention.first().word;
        let count = sentence.tokens().iter().filter(|t| &t.word == word).count();
        if count > CROWD_THRESHOLD {
            mention.features.insert(APPEARS_MANY_TIMES);
        }
    }
    for tag in CROWD_TAGS {
        let count = sentence.tokens().iter().filter(|t| t.lemma == tag).count();
        if count > CROWD_THRESHOLD {
            mention.features.insert(format!("MANY_{tag}_IN_SENTENCE"));
        }
    }
}

/// Integral value strictly between 1950 and 2014.
fn is_year(word: &str) -> bool {
    word.trim()
        .parse::<f64>()
        .is_ok_and(|y| y.round() == y && y > 1950.0 && y < 2014.0)
}

fn ends_with_greek(word: &str) -> bool {
    let folded = word.to_lowercase();
    GREEK_SUFFIXES.iter().any(|suffix| folded.ends_with(suffix))
}

/// Non-empty and made only of letters or digits.
pub fn is_alphanumeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphanumeric)
}

/// Non-empty and made only of letters.
pub fn is_alphabetic(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphabetic)
}

/// Has at least one cased letter and no lower-case one.
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}
