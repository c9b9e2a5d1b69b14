//! Year clauses: "от 2019", "до 2022", "2018-2020".

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

use ap_protocol::NumericRange;

use super::RuleOutcome;

// A trailing scale marker ("2000к", "1.9 млн") makes the number a price.
const SCALE: &str = r"(?P<scale>(?:[.,]\d+)?\s*(?:тыс\w*|k|к|млн\w*|миллион\w*|mn|m|м)\b)?";

static RE_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:от|с|после|from|after|since)\s*(\d+){SCALE}")).unwrap()
});

static RE_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:до|по|to|until|before)\s*(\d+){SCALE}")).unwrap()
});

static RE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(\d+)\s*(?:-|–|—)\s*(\d+){SCALE}")).unwrap()
});

#[derive(Debug, Clone, Copy)]
enum Clause {
    From(u64),
    To(u64),
    Between(u64, u64),
}

/// Extract a year range. Clauses apply in text order; a later clause
/// overwrites the bound an earlier one set.
pub fn extract(text: &str) -> RuleOutcome<NumericRange> {
    let mut found: Vec<(Range<usize>, Clause)> = Vec::new();

    for caps in RE_FROM.captures_iter(text) {
        if let Some(y) = year_clause(&caps, 1) {
            found.push((caps.get(0).map_or(0..0, |m| m.range()), Clause::From(y)));
        }
    }
    for caps in RE_TO.captures_iter(text) {
        if let Some(y) = year_clause(&caps, 1) {
            found.push((caps.get(0).map_or(0..0, |m| m.range()), Clause::To(y)));
        }
    }
    for caps in RE_RANGE.captures_iter(text) {
        if let (Some(a), Some(b)) = (as_year(&caps[1]), year_clause(&caps, 2)) {
            found.push((
                caps.get(0).map_or(0..0, |m| m.range()),
                Clause::Between(a, b),
            ));
        }
    }

    found.sort_by_key(|(span, _)| span.start);

    let mut range = NumericRange::unbounded();
    for (_, clause) in &found {
        match *clause {
            Clause::From(y) => range.min = y,
            Clause::To(y) => range.max = y,
            Clause::Between(a, b) => {
                range.min = a;
                range.max = b;
            }
        }
    }

    RuleOutcome {
        value: range,
        spans: found.into_iter().map(|(span, _)| span).collect(),
    }
}

/// The year in group `idx`, unless the clause ends in a scale marker.
fn year_clause(caps: &Captures<'_>, idx: usize) -> Option<u64> {
    if caps.name("scale").is_some() {
        return None;
    }
    as_year(&caps[idx])
}

/// A model year is exactly four digits, 19xx or 20xx.
fn as_year(digits: &str) -> Option<u64> {
    if digits.len() != 4 || !(digits.starts_with("19") || digits.starts_with("20")) {
        return None;
    }
    digits.parse().ok()
}
