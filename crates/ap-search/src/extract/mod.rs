//! Criteria extraction: free text to `FilterSpec`.
//!
//! Each rule is a pure function over the normalized (lowercased) query.
//! Numeric rules run first and report the byte spans they consumed; those
//! spans are blanked before the next numeric rule runs and are skipped by
//! the keyword tokenizer. So "пробег до 100 тыс" never doubles as a price
//! ceiling and "500к" never becomes a keyword.
//!
//! Order: mileage → year → price → gearbox / engine → keywords.

pub mod keywords;
pub mod mileage;
pub mod price;
pub mod vocab;
pub mod year;

use std::ops::Range;

use ap_protocol::FilterSpec;

use crate::tokenize;

/// Output of a numeric rule: the extracted value and the spans it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome<T> {
    pub value: T,
    pub spans: Vec<Range<usize>>,
}

/// Parse a raw user query into search criteria. Never fails.
pub fn extract(text: &str) -> FilterSpec {
    let text = tokenize::normalize(text);

    let mileage = mileage::extract(&text);
    let mut consumed = mileage.spans;
    let masked = mask(&text, &consumed);

    let year = year::extract(&masked);
    let masked = mask(&masked, &year.spans);
    consumed.extend(year.spans);

    let price = price::extract(&masked);
    consumed.extend(price.spans);

    FilterSpec {
        price: price.value,
        year: year.value,
        mileage: mileage.value,
        gearbox: vocab::gearbox(&text),
        engine: vocab::engine(&text),
        keywords: keywords::extract(&text, &consumed),
    }
}

/// Blank out spans with ASCII spaces of the same byte length, so offsets
/// into the result still line up with the input.
fn mask(text: &str, spans: &[Range<usize>]) -> String {
    let mut out = text.to_string();
    for span in spans {
        out.replace_range(span.clone(), &" ".repeat(span.len()));
    }
    out
}

/// Keep only ASCII digits and parse them. Used for grouped numbers like "1 500 000".
pub(crate) fn parse_digits(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
