//! Price tokens: "500к", "1.5 млн", "от 1 до 2 млн", "900000", "1 500 000".

use regex::Regex;
use std::sync::LazyLock;

use ap_protocol::NumericRange;

use super::{RuleOutcome, parse_digits};

// Alternatives, tried left to right at each position:
//   1. two numbers sharing one scale marker: "от 1 до 2 млн" needs the
//      leading "от"/"from", a dashed pair ("1-2 млн") does not
//   2. a number with a scale marker ("500к", "1,5 млн")
//   3. a bare, already-scaled number ending in 000 ("900000", "1 500 000")
static RE_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:(?:(?:от|from)\s*(?P<lo>\d+(?:[.,]\d+)?)\s*(?:-|–|—|до|to)|(?P<dlo>\d+(?:[.,]\d+)?)\s*(?:-|–|—))\s*(?P<hi>(?P<hinum>\d+(?:[.,]\d+)?)\s*(?P<runit>тыс\w*|k|к|млн\w*|миллион\w*|mn|m|м))|(?P<num>\d+(?:[.,]\d+)?)\s*(?P<unit>тыс\w*|k|к|млн\w*|миллион\w*|mn|m|м)|(?P<bare>\d{1,3}(?:[ \u{a0},.]\d{3})+|\d+000))\b",
    )
    .unwrap()
});

/// Collect price figures left to right. One figure is a ceiling; with two
/// or more, the first two sorted ascending become the range.
pub fn extract(text: &str) -> RuleOutcome<NumericRange> {
    let mut prices: Vec<u64> = Vec::new();
    let mut spans = Vec::new();

    for caps in RE_PRICE.captures_iter(text) {
        let before = prices.len();
        let mut span = caps.get(0).map(|m| m.range());
        if let (Some(lo), Some(hi), Some(hinum), Some(unit)) = (
            caps.name("lo").or(caps.name("dlo")),
            caps.name("hi"),
            caps.name("hinum"),
            caps.name("runit"),
        ) {
            let scale = multiplier(unit.as_str());
            let hi_value = scaled(hinum.as_str(), scale);
            match (decimal(lo.as_str()), decimal(hinum.as_str())) {
                // "5-2 млн" is not a range; only the marked figure counts.
                (Some(l), Some(h)) if l > h => {
                    prices.extend(hi_value);
                    span = Some(hi.range());
                }
                _ => {
                    prices.extend(scaled(lo.as_str(), scale));
                    prices.extend(hi_value);
                }
            }
        } else if let (Some(num), Some(unit)) = (caps.name("num"), caps.name("unit")) {
            prices.extend(scaled(num.as_str(), multiplier(unit.as_str())));
        } else if let Some(bare) = caps.name("bare")
            && !looks_like_year(bare.as_str())
        {
            prices.extend(parse_digits(bare.as_str()));
        }
        if prices.len() > before
            && let Some(span) = span
        {
            spans.push(span);
        }
    }

    let value = match prices.as_slice() {
        [] => NumericRange::unbounded(),
        [only] => NumericRange::new(0, *only),
        [a, b, ..] => NumericRange::new(*a.min(b), *a.max(b)),
    };

    RuleOutcome { value, spans }
}

/// "2000" on its own is a model year, not a price.
fn looks_like_year(s: &str) -> bool {
    s.len() == 4 && (s.starts_with("19") || s.starts_with("20"))
}

fn multiplier(unit: &str) -> u64 {
    if unit.starts_with("тыс") || unit == "k" || unit == "к" {
        1_000
    } else {
        1_000_000
    }
}

fn decimal(number: &str) -> Option<f64> {
    number
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Apply a scale marker to a possibly fractional number ("1,5" × 1e6).
fn scaled(number: &str, scale: u64) -> Option<u64> {
    let value = decimal(number)?;
    // `as` saturates, so absurdly large figures clamp instead of wrapping.
    Some((value * scale as f64).round() as u64)
}
