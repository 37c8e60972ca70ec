//! An incremental, generalized suffix index over sequences of integer-coded
//! words. Many independent token sequences share one tree; a query for any
//! substring returns the union of the values attached to every sequence that
//! contains it. This is the indexing core of a word-suggestion lookup
//! service: sequences are tokenized sentences, values are suggestion ids.

pub mod config;
pub mod dictionary;
pub mod suffixtree;
