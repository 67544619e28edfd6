//! Distant supervision: ordered heuristic rules that label gene candidates.
//!
//! Rules are tried in [`RULES`] order and the first one that does not abstain
//! decides the labelled copies for that candidate. A rule may amend the
//! original candidate's features, but only when it fires.

use tracing::debug;

use crate::{
    data::{
        dictionaries::Dictionaries,
        record::AcronymTable,
        sentence::{Sentence, Token},
    },
    nlp::{
        features::{
            is_alphabetic, retract_entity_context, COMES_AFTER, COMES_AFTER_PERSON,
            COMES_BEFORE, COMES_BEFORE_LOCATION, IS_LONG_NAME, IS_YEAR_RIGHT,
        },
        mention::{FeatureSet, Mention},
    },
};

pub const IN_CONTRIB_PHRASE: &str = "IN_CONTRIB_PHRASE";
pub const CHROMOSOME_KEYWORD: &str = "EXT_KEYWORD_MIN_[chromosome]@nn";

/// Features that on their own are reliable evidence of a gene mention.
pub const SNOWBALL_FEATURES: &[&str] = &[
    "EXT_KEYWORD_MIN_[gene]@nn",
    "EXT_KEYWORD_MIN_[gene]nn@",
    "EXT_KEYWORD_MIN_[promoter]nn@",
    "EXT_KEYWORD_MIN_[protein]nn@",
    "EXT_KEYWORD_MIN_[protein]@nn",
    "EXT_KEYWORD_MIN_[protein]nn@nn",
    "EXT_KEYWORD_MIN_[protein]nsubj@",
    "EXT_KEYWORD_MIN_[binding]prep_with@",
    "EXT_KEYWORD_MIN_[mrna]nn@",
    "EXT_KEYWORD_MIN_[activation]nn@",
    "EXT_KEYWORD_MIN_[oligomerization]nn@",
    "EXT_KEYWORD_MIN_[methylation]prep_of@",
    "EXT_KEYWORD_MIN_[antibody]nn@",
    "EXT_KEYWORD_MIN_[polymorphism]prep_of@",
    "EXT_KEYWORD_MIN_[gene]appos@",
    "EXT_KEYWORD_MIN_[enzyme]@nn",
    "EXT_KEYWORD_MIN_[phosphorylation]prep_of@",
    "EXT_KEYWORD_MIN_[receptor]@nn",
    "EXT_KEYWORD_MIN_[histone]@nn",
    "EXT_KEYWORD_MIN_[receptor]nn",
    "IS_LONG_ALPHANUMERIC_MAIN_SYMBOL",
    "IS_HYPHENATED_SYMBOL",
    "IS_LONG_NAME",
];

/// Author-contribution and affiliation boilerplate.
const CONTRIBUTION_PREFIXES: &[&str] = &[
    "Performed the experiments :",
    "Wrote the paper :",
    "W'rote the paper :",
    "Wlrote the paper",
    "Contributed reagents",
    "Analyzed the data :",
];
const ADDRESS_PREFIX: &str = "address";

const DOCUMENT_ELEMENTS: &[&str] = &[
    "figure", "table", "figures", "tables", "fig", "fig.", "figs", "figs.", "file", "movie",
];
const INDIVIDUALS: &[&str] = &["individual", "individuals"];
const TYPE_WORDS: &[&str] = &["group", "type", "class", "method"];

/// Verb lemma paired with a word that marks boilerplate when both appear in one feature.
const BOILERPLATE_VERBS: &[(&str, &str)] = &[
    ("VERB_[write]", "paper"),
    ("VERB_[contribute]", "reagent"),
    ("VERB_[perform]", "experiment"),
];

/// Outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Abstain,
    /// One positive copy per feature set.
    Positive(Vec<FeatureSet>),
    /// One negative copy per feature set.
    Negative(Vec<FeatureSet>),
}

impl Verdict {
    fn negative_copy(mention: &Mention<'_>) -> Self {
        Verdict::Negative(vec![mention.features.clone()])
    }

    fn is_abstain(&self) -> bool {
        matches!(self, Verdict::Abstain)
    }

    /// Materialise labelled `GENE_SUP` copies of `original`.
    pub fn into_mentions<'s>(self, original: &Mention<'s>) -> Vec<Mention<'s>> {
        let (label, sets) = match self {
            Verdict::Abstain => return Vec::new(),
            Verdict::Positive(sets) => (true, sets),
            Verdict::Negative(sets) => (false, sets),
        };
        sets.into_iter()
            .map(|features| original.supervised(label, features))
            .collect()
    }
}

/// Supervision heuristics, highest priority first in [`RULES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    LongName,
    ContributionPhrase,
    GeneOntology,
    AfterPercent,
    AfterDocumentElement,
    AfterIndividual,
    RomanNumeralType,
    BeforeEquals,
    BeforeColonNumber,
    BeforeEtAl,
    DnaTriplet,
    RomanTwo,
    Snowball,
    ChromosomeKeyword,
    YearOnRight,
    BetweenEntities,
    PersonThenPunctuation,
    PersonTagged,
    LocationTagged,
    BoilerplateVerb,
    Acronym,
}

pub const RULES: [Rule; 21] = [
    Rule::LongName,
    Rule::ContributionPhrase,
    Rule::GeneOntology,
    Rule::AfterPercent,
    Rule::AfterDocumentElement,
    Rule::AfterIndividual,
    Rule::RomanNumeralType,
    Rule::BeforeEquals,
    Rule::BeforeColonNumber,
    Rule::BeforeEtAl,
    Rule::DnaTriplet,
    Rule::RomanTwo,
    Rule::Snowball,
    Rule::ChromosomeKeyword,
    Rule::YearOnRight,
    Rule::BetweenEntities,
    Rule::PersonThenPunctuation,
    Rule::PersonTagged,
    Rule::LocationTagged,
    Rule::BoilerplateVerb,
    Rule::Acronym,
];

/// Per-sentence inputs shared by every rule.
struct RuleContext<'a, 's> {
    dicts: &'a Dictionaries,
    sentence: &'s Sentence,
    text: &'a str,
    acronyms: Option<&'a AcronymTable>,
}

impl<'s> RuleContext<'_, 's> {
    fn before(&self, mention: &Mention<'_>) -> Option<&'s Token> {
        mention
            .start()
            .checked_sub(1)
            .and_then(|idx| self.sentence.token(idx))
    }

    fn after(&self, mention: &Mention<'_>, distance: usize) -> Option<&'s Token> {
        self.sentence.token(mention.end() + distance)
    }
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::LongName => "long_name",
            Rule::ContributionPhrase => "contribution_phrase",
            Rule::GeneOntology => "gene_ontology",
            Rule::AfterPercent => "after_percent",
            Rule::AfterDocumentElement => "after_document_element",
            Rule::AfterIndividual => "after_individual",
            Rule::RomanNumeralType => "roman_numeral_type",
            Rule::BeforeEquals => "before_equals",
            Rule::BeforeColonNumber => "before_colon_number",
            Rule::BeforeEtAl => "before_et_al",
            Rule::DnaTriplet => "dna_triplet",
            Rule::RomanTwo => "roman_two",
            Rule::Snowball => "snowball",
            Rule::ChromosomeKeyword => "chromosome_keyword",
            Rule::YearOnRight => "year_on_right",
            Rule::BetweenEntities => "between_entities",
            Rule::PersonThenPunctuation => "person_then_punctuation",
            Rule::PersonTagged => "person_tagged",
            Rule::LocationTagged => "location_tagged",
            Rule::BoilerplateVerb => "boilerplate_verb",
            Rule::Acronym => "acronym",
        }
    }

    fn apply(self, mention: &mut Mention<'_>, ctx: &RuleContext<'_, '_>) -> Verdict {
        let first = mention.first();
        let word = first.word.as_str();
        let fires = match self {
            Rule::LongName => {
                if !ctx.dicts.is_long_name(&mention.phrase()) {
                    return Verdict::Abstain;
                }
                retract_entity_context(&mut mention.features);
                let copy = mention.features.clone();
                mention.features.insert(IS_LONG_NAME);
                return Verdict::Positive(vec![copy, FeatureSet::from_iter([IS_LONG_NAME])]);
            }
            Rule::ContributionPhrase => {
                let boilerplate = CONTRIBUTION_PREFIXES
                    .iter()
                    .any(|prefix| ctx.text.starts_with(prefix))
                    || ctx.text.to_lowercase().starts_with(ADDRESS_PREFIX);
                if !boilerplate {
                    return Verdict::Abstain;
                }
                let copy = mention.features.clone();
                mention.features.insert(IN_CONTRIB_PHRASE);
                return Verdict::Negative(vec![copy, FeatureSet::from_iter([IN_CONTRIB_PHRASE])]);
            }
            Rule::GeneOntology => {
                mention.is_single_token()
                    && word == "GO"
                    && ctx.after(mention, 1).is_some_and(|t| t.word == ":")
            }
            Rule::AfterPercent => ctx.before(mention).is_some_and(|t| t.word == "%"),
            Rule::AfterDocumentElement => ctx
                .before(mention)
                .is_some_and(|t| DOCUMENT_ELEMENTS.contains(&t.word.to_lowercase().as_str())),
            Rule::AfterIndividual => {
                ctx.before(mention)
                    .is_some_and(|t| INDIVIDUALS.contains(&t.word.to_lowercase().as_str()))
                    && !is_alphabetic(word)
                    && word.chars().count() <= 4
            }
            Rule::RomanNumeralType => {
                ctx.before(mention)
                    .is_some_and(|t| TYPE_WORDS.contains(&t.lemma.to_lowercase().as_str()))
                    && word.chars().all(|c| c == 'I' || c == 'V')
            }
            Rule::BeforeEquals => ctx.after(mention, 1).is_some_and(|t| t.word == "="),
            Rule::BeforeColonNumber => {
                ctx.after(mention, 1).is_some_and(|t| t.word == ":")
                    && ctx
                        .after(mention, 2)
                        .is_some_and(|t| t.word.trim().parse::<f64>().is_ok())
            }
            Rule::BeforeEtAl => ctx.after(mention, 1).is_some_and(|t| t.word == "et"),
            Rule::DnaTriplet => {
                mention.is_single_token()
                    && is_dna_triplet(word)
                    && (ctx.before(mention).is_some_and(|t| is_dna_triplet(&t.word))
                        || ctx.after(mention, 1).is_some_and(|t| is_dna_triplet(&t.word)))
            }
            Rule::RomanTwo => word == "II",
            Rule::Snowball => {
                let strong = mention.features.intersection(SNOWBALL_FEATURES.iter().copied());
                if strong.is_empty() {
                    return Verdict::Abstain;
                }
                let rest = mention.features.difference(SNOWBALL_FEATURES.iter().copied());
                return Verdict::Positive(vec![rest, strong]);
            }
            Rule::ChromosomeKeyword => mention.features.contains(CHROMOSOME_KEYWORD),
            Rule::YearOnRight => mention.features.contains(IS_YEAR_RIGHT),
            Rule::BetweenEntities => is_sandwiched(&mention.features),
            Rule::PersonThenPunctuation => {
                mention.features.contains(COMES_AFTER_PERSON)
                    && ctx
                        .after(mention, 1)
                        .is_some_and(|t| t.word == "," || t.word == ":")
            }
            Rule::PersonTagged => {
                mention.features.contains(COMES_AFTER_PERSON) && first.ner == "PERSON"
            }
            Rule::LocationTagged => {
                mention.features.contains(COMES_BEFORE_LOCATION) && first.ner == "LOCATION"
            }
            Rule::BoilerplateVerb => {
                let procedure = mention.entity() == "PROC";
                mention.features.iter().any(|f| {
                    (procedure && f.starts_with("VERB_[use]"))
                        || BOILERPLATE_VERBS
                            .iter()
                            .any(|(verb, marker)| f.starts_with(verb) && f.contains(marker))
                })
            }
            Rule::Acronym => return acronym_verdict(mention, ctx),
        };
        if fires {
            Verdict::negative_copy(mention)
        } else {
            Verdict::Abstain
        }
    }
}

/// Labels an acronym by what its registered expansions look like.
fn acronym_verdict(mention: &Mention<'_>, ctx: &RuleContext<'_, '_>) -> Verdict {
    let Some(table) = ctx.acronyms else {
        return Verdict::Abstain;
    };
    if !mention.is_single_token() || ctx.dicts.is_long_name(&mention.phrase()) {
        return Verdict::Abstain;
    }
    let Some(definitions) = table.get(mention.first().word.as_str()) else {
        return Verdict::Abstain;
    };
    if definitions.is_empty() {
        return Verdict::Abstain;
    }
    if definitions.iter().any(|d| ctx.dicts.is_gene(d)) && !is_sandwiched(&mention.features) {
        return Verdict::Positive(vec![mention.features.clone()]);
    }
    if definitions
        .iter()
        .any(|d| d.contains(" gene") || d.contains(" protein"))
    {
        return Verdict::Abstain;
    }
    Verdict::negative_copy(mention)
}

fn is_sandwiched(features: &FeatureSet) -> bool {
    features.starts_with_any(COMES_BEFORE) && features.starts_with_any(COMES_AFTER)
}

fn is_dna_triplet(word: &str) -> bool {
    word.len() == 3 && word.chars().all(|c| matches!(c, 'A' | 'C' | 'G' | 'T'))
}

/// Applies [`RULES`] to the candidates of one sentence.
#[derive(Debug, Clone, Copy)]
pub struct Supervisor<'d> {
    dicts: &'d Dictionaries,
}

impl<'d> Supervisor<'d> {
    pub fn new(dicts: &'d Dictionaries) -> Self {
        Self { dicts }
    }

    /// Each candidate followed by its labelled copies, in candidate order.
    pub fn supervise<'s>(
        &self,
        mentions: Vec<Mention<'s>>,
        sentence: &'s Sentence,
        acronyms: Option<&AcronymTable>,
    ) -> Vec<Mention<'s>> {
        let text = sentence.text();
        let ctx = RuleContext {
            dicts: self.dicts,
            sentence,
            text: &text,
            acronyms,
        };
        let mut output = Vec::with_capacity(mentions.len() * 2);
        for mut mention in mentions {
            let derived = match judge(&mut mention, &ctx) {
                Some((rule, verdict)) => {
                    debug!(
                        rule = rule.name(),
                        mention = %mention.phrase(),
                        entity = mention.entity(),
                        "supervision rule fired"
                    );
                    verdict.into_mentions(&mention)
                }
                None => Vec::new(),
            };
            output.push(mention);
            output.extend(derived);
        }
        output
    }

    /// The first rule that fires for `mention`, if any.
    pub fn judge<'s>(
        &self,
        mention: &mut Mention<'s>,
        sentence: &'s Sentence,
        acronyms: Option<&AcronymTable>,
    ) -> Option<(Rule, Verdict)> {
        let text = sentence.text();
        let ctx = RuleContext {
            dicts: self.dicts,
            sentence,
            text: &text,
            acronyms,
        };
        judge(mention, &ctx)
    }
}

fn judge(mention: &mut Mention<'_>, ctx: &RuleContext<'_, '_>) -> Option<(Rule, Verdict)> {
    RULES.iter().find_map(|&rule| {
        let verdict = rule.apply(mention, ctx);
        (!verdict.is_abstain()).then_some((rule, verdict))
    })
}
