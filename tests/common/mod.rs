#![allow(dead_code)]

use genesup::data::{
    dictionaries::Dictionaries,
    record::join_list,
    sentence::{Sentence, Token},
};

/// word, lemma, POS, NER, 1-based head (0 = root), edge label.
pub type Tok<'a> = (&'a str, &'a str, &'a str, &'a str, usize, &'a str);

pub fn sentence(tokens: &[Tok<'_>]) -> Sentence {
    let tokens = tokens
        .iter()
        .enumerate()
        .map(|(position, &(word, lemma, pos, ner, head, label))| Token {
            position,
            offset: position,
            word: word.to_string(),
            lemma: lemma.to_string(),
            pos: pos.to_string(),
            ner: ner.to_string(),
            parent: head.checked_sub(1),
            label: label.to_string(),
            bounding_box: String::new(),
        })
        .collect();
    Sentence::new("doc1", 7, tokens).expect("valid sentence")
}

/// Flat sentence: every token hangs off the first one.
pub fn flat(words: &[&str]) -> Sentence {
    let toks: Vec<Tok<'_>> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (*w, *w, "NN", "O", if i == 0 { 0 } else { 1 }, if i == 0 { "root" } else { "dep" }))
        .collect();
    sentence(&toks)
}

/// "The BRCA1 gene promotes repair ."
pub fn brca1_tokens() -> Vec<Tok<'static>> {
    vec![
        ("The", "the", "DT", "O", 3, "det"),
        ("BRCA1", "BRCA1", "NN", "O", 3, "nn"),
        ("gene", "gene", "NN", "O", 4, "nsubj"),
        ("promotes", "promote", "VBZ", "O", 0, "root"),
        ("repair", "repair", "NN", "O", 4, "dobj"),
        (".", ".", ".", "O", 4, "punct"),
    ]
}

pub fn dictionaries() -> Dictionaries {
    Dictionaries::builder()
        .gene("BRCA1", ["BRCA1"])
        .gene("p53", ["TP53"])
        .gene("TP53", ["TP53"])
        .gene("ATG", ["ATG"])
        .gene("II", ["II"])
        .gene("ABC", ["ABCA1"])
        .gene("atp binding cassette", ["ABCA1"])
        .gene("brca1", ["BRCA1"])
        .gene("tumor protein p53", ["TP53"])
        .english_words([
            "The", "the", "gene", "promotes", "repair", "experiments", "paper", "protein",
            "codon", "was", "measured", "levels", "mutated", "cells", "and", "in",
        ])
        .stopwords(["the", "and", "in", "of", "was", "a"])
        .long_name("TP53", "tumor protein p53")
        .build()
}

/// One tab-separated input line in the record format.
pub fn record_line(tokens: &[Tok<'_>], acronyms: Option<(&[&str], &str)>) -> String {
    let words: Vec<&str> = tokens.iter().map(|t| t.0).collect();
    let lemmas: Vec<&str> = tokens.iter().map(|t| t.1).collect();
    let poses: Vec<&str> = tokens.iter().map(|t| t.2).collect();
    let ners: Vec<&str> = tokens.iter().map(|t| t.3).collect();
    let heads: Vec<String> = tokens.iter().map(|t| t.4.to_string()).collect();
    let labels: Vec<&str> = tokens.iter().map(|t| t.5).collect();
    let idxs: Vec<String> = (0..tokens.len()).map(|i| i.to_string()).collect();
    let boxes: Vec<&str> = tokens.iter().map(|_| "box").collect();
    let mut fields = vec![
        "doc1".to_string(),
        "7".to_string(),
        join_list(&idxs),
        join_list(&words),
        join_list(&poses),
        join_list(&ners),
        join_list(&lemmas),
        join_list(&labels),
        join_list(&heads),
        join_list(&boxes),
    ];
    match acronyms {
        Some((acrs, defs)) => {
            fields.push(join_list(acrs));
            fields.push(defs.to_string());
        }
        None => {
            fields.push("\\N".to_string());
            fields.push("\\N".to_string());
        }
    }
    fields.join("\t")
}
