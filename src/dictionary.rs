use std::collections::HashMap;

use log::trace;

/// An integer identifier standing in for one word of an indexed sentence.
pub type TokenId = u32;

/// A struct to hold the word -> token id mapping for a set of sentences.
/// The suffix tree itself only ever sees token sequences; this dictionary is
/// the boundary that turns raw text into them.
#[derive(Debug, Default, Clone)]
pub struct WordDictionary {
    word_to_index: HashMap<String, TokenId>,
}

pub trait DictionaryOperations {
    fn intern(&mut self, word: &str) -> TokenId;
    fn index_of(&self, word: &str) -> Option<TokenId>;
    fn tokenize(&mut self, text: &str) -> Vec<TokenId>;
    fn tokenize_query(&self, text: &str) -> Option<Vec<TokenId>>;
    fn num_words(&self) -> usize;
}

impl WordDictionary {
    pub fn new() -> WordDictionary {
        WordDictionary::default()
    }
}

impl DictionaryOperations for WordDictionary {
    /// Return the token id for a word, allocating the next free id if the
    /// word has not been seen before. Ids are stable for the lifetime of
    /// the dictionary.
    fn intern(&mut self, word: &str) -> TokenId {
        if let Some(&index) = self.word_to_index.get(word) {
            return index;
        }

        let index = self.word_to_index.len() as TokenId;
        trace!("New word '{}' assigned token {}", word, index);
        self.word_to_index.insert(word.to_string(), index);

        index
    }

    fn index_of(&self, word: &str) -> Option<TokenId> {
        self.word_to_index.get(word).copied()
    }

    /// Split a sentence into words and map each word to its token id,
    /// growing the dictionary as needed. This is the insertion path.
    fn tokenize(&mut self, text: &str) -> Vec<TokenId> {
        text.split_whitespace().map(|word| self.intern(word)).collect()
    }

    /// Split a sentence into words and map each word to its token id without
    /// growing the dictionary. Returns None if any word is unknown, so
    /// callers can tell "nothing matched" apart from "malformed query".
    fn tokenize_query(&self, text: &str) -> Option<Vec<TokenId>> {
        text.split_whitespace().map(|word| self.index_of(word)).collect()
    }

    fn num_words(&self) -> usize {
        self.word_to_index.len()
    }
}
