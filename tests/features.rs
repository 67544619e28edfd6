mod common;

use genesup::{
    data::{dictionaries::Dictionaries, sentence::{Sentence, Token}},
    nlp::{
        candidates::CandidateGenerator,
        features::{nearest, FeatureExtractor, PATH_CEILING},
        mention::Mention,
    },
};

fn features_of(mention: &Mention<'_>) -> Vec<String> {
    mention.features.iter().map(str::to_string).collect()
}

#[test]
fn brca1_sentence_gets_keyword_and_verb_context() {
    let dicts = common::dictionaries();
    let sentence = common::sentence(&common::brca1_tokens());
    let mentions = CandidateGenerator::new(&dicts).generate(&sentence).unwrap();
    let mention = &mentions[0];

    assert!(mention.features.contains("VERB_[promote]nn|nsubj@"));
    assert!(mention.features.contains("KEYWORD_[gene]nn@"));
    assert!(mention.features.contains("KEYWORD_[repair]nn|nsubj@dobj"));
    assert!(mention.features.contains("EXT_KEYWORD_MIN_[gene]nn@"));
    assert!(mention.features.contains("KEYWORD_MIN_[gene]"));
    assert!(mention.features.contains("NGRAM_LEFT_1_[the]"));
    assert!(mention.features.contains("NGRAM_RIGHT_1_[gene]"));
    assert!(mention.features.contains("IS_LONG_ALPHANUMERIC_MAIN_SYMBOL"));
    assert_eq!(mention.left_lemma, None);
    assert_eq!(mention.right_lemma, Some("gene"));
}

#[test]
fn p_two_digit_alias_is_flagged() {
    let dicts = common::dictionaries();
    let sentence = common::sentence(&[
        ("The", "the", "DT", "O", 3, "det"),
        ("p53", "p53", "NN", "O", 3, "nn"),
        ("protein", "protein", "NN", "O", 5, "nsubjpass"),
        ("was", "be", "VBD", "O", 5, "auxpass"),
        ("mutated", "mutate", "VBN", "O", 0, "root"),
    ]);
    let mentions = CandidateGenerator::new(&dicts).generate(&sentence).unwrap();
    assert_eq!(mentions.len(), 1);
    let mention = &mentions[0];
    assert_eq!(mention.entity(), "TP53");
    assert!(mention.features.contains("IS_PXX_SYMBOL_[p53]"));
    assert!(mention.features.contains("VERB_[mutate]nn|nsubjpass@"));
    assert!(!mention.features.iter().any(|f| f.starts_with("VERB_[be]")));
}

#[test]
fn long_name_shape_retracts_person_context_and_is_idempotent() {
    let dicts = common::dictionaries();
    let sentence = common::sentence(&[
        ("Smith", "Smith", "NNP", "PERSON", 3, "nn"),
        ("brca1", "brca1", "NN", "O", 3, "nn"),
        ("cells", "cell", "NNS", "O", 0, "root"),
    ]);
    let mut mention = Mention::candidate("BRCA1", &sentence.tokens()[1..2]).unwrap();
    let extractor = FeatureExtractor::new(&dicts);

    extractor.extract(&mut mention, &sentence).unwrap();
    assert!(mention.features.contains("IS_LONG_NAME"));
    assert!(!mention.features.contains("COMES_AFTER_PERSON"));
    let first_pass = mention.features.clone();

    extractor.extract(&mut mention, &sentence).unwrap();
    assert_eq!(mention.features, first_pass);
    assert_eq!(
        mention.features.iter().filter(|f| *f == "IS_LONG_NAME").count(),
        1
    );
}

#[test]
fn main_symbol_after_person_keeps_context_when_short() {
    let dicts = common::dictionaries();
    let sentence = common::sentence(&[
        ("Smith", "Smith", "NNP", "PERSON", 3, "nn"),
        ("ATG", "ATG", "NN", "O", 3, "nn"),
        ("cells", "cell", "NNS", "O", 0, "root"),
    ]);
    let mut mention = Mention::candidate("ATG", &sentence.tokens()[1..2]).unwrap();
    FeatureExtractor::new(&dicts).extract(&mut mention, &sentence).unwrap();
    assert!(mention.features.contains("COMES_AFTER_PERSON"));
    assert!(!mention.features.iter().any(|f| f.starts_with("IS_")));
}

#[test]
fn entity_neighbours_skip_commas_and_genes() {
    let dicts = common::dictionaries();
    let sentence = common::flat(&["the", "ABC", ",", "Boston"]);
    let mut tokens = sentence.tokens().to_vec();
    tokens[3].ner = "LOCATION".into();
    let sentence = Sentence::new("doc1", 7, tokens).unwrap();

    let mut mention = Mention::candidate("ABCA1", &sentence.tokens()[1..2]).unwrap();
    FeatureExtractor::new(&dicts).extract(&mut mention, &sentence).unwrap();
    assert!(mention.features.contains("COMES_BEFORE_LOCATION"));
    assert!(!mention.features.iter().any(|f| f.starts_with("COMES_AFTER_")));
}

#[test]
fn year_and_gene_neighbours() {
    let dicts = Dictionaries::builder()
        .gene("ABC", ["ABCA1"])
        .gene("BRCA1", ["BRCA1"])
        .gene("BRCA2", ["BRCA2"])
        .stopwords(["in", "and"])
        .build();
    let extractor = FeatureExtractor::new(&dicts);

    let sentence = common::flat(&["BRCA1", "and", "ABC", "in", "1999"]);
    let mut mention = Mention::candidate("ABCA1", &sentence.tokens()[2..3]).unwrap();
    extractor.extract(&mut mention, &sentence).unwrap();
    assert!(mention.features.contains("GENE_ON_LEFT"));
    assert!(mention.features.contains("IS_YEAR_RIGHT"));
    assert_eq!(mention.left_lemma, Some("BRCA1"));
    assert_eq!(mention.right_lemma, Some("1999"));

    let sentence = common::flat(&["BRCA1", ",", "ABC", ",", "BRCA2"]);
    let mut mention = Mention::candidate("ABCA1", &sentence.tokens()[2..3]).unwrap();
    extractor.extract(&mut mention, &sentence).unwrap();
    assert!(mention.features.contains("IS_BETWEEN_GENES"));
    assert!(!mention.features.contains("GENE_ON_LEFT"));

    let sentence = common::flat(&["ABC", "in", "2014"]);
    let mut mention = Mention::candidate("ABCA1", &sentence.tokens()[0..1]).unwrap();
    extractor.extract(&mut mention, &sentence).unwrap();
    assert!(!mention.features.contains("IS_YEAR_RIGHT"));
    assert!(mention.features.contains("NGRAM_RIGHT_1_[in]"));
    assert!(!mention.features.iter().any(|f| f.starts_with("NGRAM_LEFT")));
}

#[test]
fn repeated_words_and_crowded_entities() {
    let dicts = common::dictionaries();
    let mut words = vec!["ATG"; 5];
    words.extend(["PERSON"; 5]);
    let sentence = common::flat(&words);
    let mut mention = Mention::candidate("ATG", &sentence.tokens()[0..1]).unwrap();
    FeatureExtractor::new(&dicts).extract(&mut mention, &sentence).unwrap();
    assert!(mention.features.contains("APPEARS_MANY_TIMES_IN_SENTENCE"));
    assert!(mention.features.contains("MANY_PERSON_IN_SENTENCE"));
    assert!(!mention.features.contains("MANY_LOCATION_IN_SENTENCE"));
}

#[test]
fn other_gene_uses_nearest_path() {
    let dicts = common::dictionaries();
    let sentence = common::sentence(&[
        ("ATG", "ATG", "NN", "O", 2, "nsubj"),
        ("binds", "bind", "VBZ", "O", 0, "root"),
        ("BRCA1", "BRCA1", "NN", "O", 2, "dobj"),
        ("and", "and", "CC", "O", 3, "cc"),
        ("p53", "p53", "NN", "O", 3, "conj"),
    ]);
    let mut mention = Mention::candidate("ATG", &sentence.tokens()[0..1]).unwrap();
    FeatureExtractor::new(&dicts).extract(&mut mention, &sentence).unwrap();
    let other: Vec<String> = features_of(&mention)
        .into_iter()
        .filter(|f| f.starts_with("OTHER_GENE_"))
        .collect();
    assert_eq!(other, vec!["OTHER_GENE_[BRCA1] nsubj@dobj".to_string()]);
}

#[test]
fn nearest_prefers_shortest_then_first() {
    let sentence = common::flat(&["a", "b", "c"]);
    let tokens = sentence.tokens();
    let found = nearest([
        (&tokens[0], "xx@".to_string()),
        (&tokens[1], "y@".to_string()),
        (&tokens[2], "z@".to_string()),
    ])
    .unwrap();
    assert_eq!(found.token.position, 1);
    assert_eq!(found.path, "y@");

    assert!(nearest([(&tokens[0], "x".repeat(PATH_CEILING))]).is_none());
    assert!(nearest(Vec::<(&Token, String)>::new()).is_none());
}

#[test]
fn empty_span_is_rejected() {
    let sentence = common::flat(&["ATG"]);
    let err = Mention::candidate("ATG", &sentence.tokens()[..0]).unwrap_err();
    assert!(matches!(err, genesup::Error::EmptySpan));
}
