//! Mileage clauses: "пробег 30-60", "mileage 30 to 60", "пробег до 100 тыс", "до 80к км".

use regex::Regex;
use std::sync::LazyLock;

use ap_protocol::NumericRange;

use super::{RuleOutcome, parse_digits};

// "пробег от 30 до 60 тыс", "mileage 30-60k"
static RE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:пробег\w*|mileage)\s*(?:от|from)?\s*(\d{1,3}(?:[ \u{a0}]\d{3})+|\d+)\s*(?:-|–|—|до|to)\s*(\d{1,3}(?:[ \u{a0}]\d{3})+|\d+)(?:\s*(?:тыс\w*|k|к)\b)?(?:\s*(?:км|km)\b)?",
    )
    .unwrap()
});

// "пробег до 100 тыс", "mileage under 50k", "до 80к км"
static RE_UP_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?:пробег\w*|mileage)\s*(?:до|up\s+to|under)\s*(\d{1,3}(?:[ \u{a0}]\d{3})+|\d+)(?:\s*(?:тыс\w*|k|к)\b)?|\bдо\s*(\d{1,3}(?:[ \u{a0}]\d{3})+|\d+)\s*(?:тыс\w*|k|к)?\s*(?:км|km)\b)(?:\s*(?:км|km)\b)?",
    )
    .unwrap()
});

/// Extract a mileage range in km. A range clause wins over an up-to clause.
pub fn extract(text: &str) -> RuleOutcome<NumericRange> {
    if let Some(caps) = RE_RANGE.captures(text)
        && let (Some(lo), Some(hi)) = (parse_digits(&caps[1]), parse_digits(&caps[2]))
    {
        return RuleOutcome {
            value: NumericRange::new(thousands(lo), thousands(hi)),
            spans: vec![caps.get(0).map_or(0..0, |m| m.range())],
        };
    }

    if let Some(caps) = RE_UP_TO.captures(text)
        && let Some(n) = caps.get(1).or_else(|| caps.get(2))
        && let Some(n) = parse_digits(n.as_str())
    {
        return RuleOutcome {
            value: NumericRange::new(0, thousands(n)),
            spans: vec![caps.get(0).map_or(0..0, |m| m.range())],
        };
    }

    RuleOutcome {
        value: NumericRange::unbounded(),
        spans: Vec::new(),
    }
}

/// Numbers under 1000 are thousands of km; larger ones are already km.
fn thousands(n: u64) -> u64 {
    if n < 1000 { n.saturating_mul(1000) } else { n }
}
