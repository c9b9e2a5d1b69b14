//! Free keywords left over after the structured rules.

use std::ops::Range;

use super::vocab;
use crate::tokenize;

/// Significant words of `text` that no numeric rule consumed, that are not
/// gearbox/engine vocabulary and not stop words. First occurrence order,
/// no duplicates. Body types ("седан", "кроссовер") stay keywords.
pub fn extract(text: &str, consumed: &[Range<usize>]) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for token in tokenize::words(text) {
        let inside_consumed = consumed
            .iter()
            .any(|span| token.start < span.end && span.start < token.end);
        if inside_consumed
            || tokenize::is_numeric(&token.text)
            || !tokenize::is_significant(&token.text)
            || tokenize::is_stop_word(&token.text)
            || vocab::is_vocabulary_word(&token.text)
            || keywords.contains(&token.text)
        {
            continue;
        }
        keywords.push(token.text);
    }

    keywords
}
