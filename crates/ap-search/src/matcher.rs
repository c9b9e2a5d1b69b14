//! Record matcher: one record against one `FilterSpec`.
//!
//! Predicates run cheapest-first and short-circuit. Every field is parsed
//! fail-closed: when a bound is set and the record's cell cannot be read
//! as a number, the record is rejected rather than erroring.

use ap_protocol::{FilterSpec, NumericRange, Record, RecordField};

use crate::extract::parse_digits;

/// True when `record` satisfies every criterion in `spec`.
pub fn matches(record: &Record, spec: &FilterSpec) -> bool {
    within(record.field(RecordField::Price), &spec.price, None)
        && within(record.field(RecordField::Year), &spec.year, None)
        && within(record.field(RecordField::Mileage), &spec.mileage, Some(0))
        && vocabulary_ok(record, RecordField::Gearbox, spec.gearbox.map(|g| g.terms()))
        && vocabulary_ok(record, RecordField::Engine, spec.engine.map(|e| e.terms()))
        && keywords_ok(record, &spec.keywords)
}

/// Numeric bound check. An unbounded range accepts anything, including
/// unreadable cells; otherwise the cell must parse. `absent` is the value
/// assumed when the record has no such column.
fn within(cell: Option<&str>, range: &NumericRange, absent: Option<u64>) -> bool {
    if range.is_unbounded() {
        return true;
    }
    let value = match cell {
        Some(text) => parse_digits(text),
        None => absent,
    };
    if value.is_none() {
        tracing::debug!(cell = ?cell, "unreadable numeric cell, record excluded");
    }
    value.is_some_and(|v| range.contains(v))
}

fn vocabulary_ok(record: &Record, field: RecordField, terms: Option<&[&str]>) -> bool {
    let Some(terms) = terms else {
        return true;
    };
    let Some(cell) = record.field(field) else {
        return false;
    };
    let cell = cell.to_lowercase();
    terms.iter().any(|t| cell.contains(t))
}

/// Every keyword must occur in brand + model + body. Price, year and other
/// numeric columns are deliberately left out of the haystack.
fn keywords_ok(record: &Record, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let haystack = format!(
        "{} {} {}",
        record.field_or_empty(RecordField::Brand),
        record.field_or_empty(RecordField::Model),
        record.field_or_empty(RecordField::Body),
    )
    .to_lowercase();
    keywords.iter().all(|k| haystack.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_protocol::{EngineType, Gearbox};

    fn car(pairs: &[(&str, &str)]) -> Record {
        Record::from_pairs(pairs.iter().copied())
    }

    fn spec_price_max(max: u64) -> FilterSpec {
        FilterSpec {
            price: NumericRange::new(0, max),
            ..Default::default()
        }
    }

    #[test]
    fn default_spec_matches_anything() {
        assert!(matches(&car(&[]), &FilterSpec::default()));
        assert!(matches(&car(&[("Цена", "договорная")]), &FilterSpec::default()));
    }

    #[test]
    fn price_ceiling() {
        let spec = spec_price_max(500_000);
        assert!(matches(&car(&[("Price", "450000")]), &spec));
        assert!(matches(&car(&[("Цена", "450 000 ₽")]), &spec));
        assert!(!matches(&car(&[("Price", "600000")]), &spec));
    }

    #[test]
    fn non_numeric_price_fails_closed() {
        let spec = spec_price_max(500_000);
        assert!(!matches(&car(&[("Price", "по запросу")]), &spec));
        assert!(!matches(&car(&[("Brand", "BMW")]), &spec));
    }

    #[test]
    fn non_numeric_year_fails_closed() {
        let spec = FilterSpec {
            year: NumericRange::new(2019, NumericRange::UNBOUNDED),
            ..Default::default()
        };
        assert!(matches(&car(&[("Год", "2020")]), &spec));
        assert!(!matches(&car(&[("Год", "2018")]), &spec));
        assert!(!matches(&car(&[("Год", "новый")]), &spec));
    }

    #[test]
    fn missing_mileage_counts_as_zero() {
        let spec = FilterSpec {
            mileage: NumericRange::new(0, 50_000),
            ..Default::default()
        };
        assert!(matches(&car(&[("Brand", "Kia")]), &spec));
        assert!(matches(&car(&[("Пробег", "45 000 км")]), &spec));
        assert!(!matches(&car(&[("Пробег", "120000")]), &spec));
        assert!(!matches(&car(&[("Пробег", "неизвестен")]), &spec));
    }

    #[test]
    fn inverted_bounds_match_nothing() {
        let spec = FilterSpec {
            price: NumericRange::new(300_000, 100_000),
            ..Default::default()
        };
        for price in ["100000", "200000", "300000"] {
            assert!(!matches(&car(&[("Price", price)]), &spec));
        }
    }

    #[test]
    fn gearbox_matches_russian_cell() {
        let spec = FilterSpec {
            gearbox: Some(Gearbox::Automatic),
            ..Default::default()
        };
        assert!(matches(&car(&[("КПП", "Автомат")]), &spec));
        assert!(matches(&car(&[("Transmission", "Automatic")]), &spec));
        assert!(!matches(&car(&[("КПП", "Механика")]), &spec));
        assert!(!matches(&car(&[("Brand", "BMW")]), &spec));
    }

    #[test]
    fn engine_matches_cell() {
        let spec = FilterSpec {
            engine: Some(EngineType::Diesel),
            ..Default::default()
        };
        assert!(matches(&car(&[("Двигатель", "2.0 дизель")]), &spec));
        assert!(!matches(&car(&[("Двигатель", "бензин")]), &spec));
        assert!(!matches(&car(&[]), &spec));
    }

    #[test]
    fn keywords_search_brand_model_body_only() {
        let spec = FilterSpec {
            keywords: vec!["bmw".into(), "x1".into()],
            ..Default::default()
        };
        assert!(matches(&car(&[("Марка", "BMW"), ("Модель", "X1")]), &spec));
        assert!(!matches(&car(&[("Марка", "BMW"), ("Модель", "X3")]), &spec));

        let numeric = FilterSpec {
            keywords: vec!["450".into()],
            ..Default::default()
        };
        assert!(!matches(
            &car(&[("Марка", "BMW"), ("Цена", "450000")]),
            &numeric
        ));
    }

    #[test]
    fn body_type_keyword() {
        let spec = FilterSpec {
            keywords: vec!["седан".into()],
            ..Default::default()
        };
        assert!(matches(
            &car(&[("Марка", "Kia"), ("Модель", "Rio"), ("Кузов", "Седан")]),
            &spec
        ));
    }
}
