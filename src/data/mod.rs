//! Sentence records, their decoding and the static dictionaries.

pub mod dictionaries;
pub mod record;
pub mod sentence;
