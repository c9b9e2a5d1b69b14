use serde::{Deserialize, Serialize};

/// Inclusive numeric bounds. `u64::MAX` stands for "no upper bound".
///
/// `min > max` is representable on purpose: such a range contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: u64,
    pub max: u64,
}

impl NumericRange {
    pub const UNBOUNDED: u64 = u64::MAX;

    pub const fn unbounded() -> Self {
        Self {
            min: 0,
            max: Self::UNBOUNDED,
        }
    }

    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// True when neither bound has been narrowed.
    pub fn is_unbounded(&self) -> bool {
        self.min == 0 && self.max == Self::UNBOUNDED
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for NumericRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Transmission type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gearbox {
    Automatic,
    Manual,
    #[serde(rename = "CVT")]
    Cvt,
}

impl Gearbox {
    pub const ALL: [Gearbox; 3] = [Self::Automatic, Self::Manual, Self::Cvt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
            Self::Cvt => "CVT",
        }
    }

    /// Lowercase substrings that identify this gearbox in text or in a sheet cell.
    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            Self::Automatic => &["автомат", "акпп", "automatic"],
            Self::Manual => &["механик", "мкпп", "ручн", "manual"],
            Self::Cvt => &["вариатор", "cvt"],
        }
    }
}

/// Engine / fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
}

impl EngineType {
    pub const ALL: [EngineType; 4] = [
        Self::Gasoline,
        Self::Diesel,
        Self::Hybrid,
        Self::Electric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gasoline => "gasoline",
            Self::Diesel => "diesel",
            Self::Hybrid => "hybrid",
            Self::Electric => "electric",
        }
    }

    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            Self::Gasoline => &["бензин", "gasoline", "petrol"],
            Self::Diesel => &["дизел", "diesel"],
            Self::Hybrid => &["гибрид", "hybrid"],
            Self::Electric => &["электр", "electric"],
        }
    }
}

/// Structured search criteria extracted from one free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub price: NumericRange,
    #[serde(default)]
    pub year: NumericRange,
    #[serde(default)]
    pub mileage: NumericRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gearbox: Option<Gearbox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineType>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl FilterSpec {
    /// True when extraction found no signal at all.
    pub fn is_empty(&self) -> bool {
        self.price.is_unbounded()
            && self.year.is_unbounded()
            && self.mileage.is_unbounded()
            && self.gearbox.is_none()
            && self.engine.is_none()
            && self.keywords.is_empty()
    }
}

/// How a query is evaluated against the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Every query token must appear somewhere in the record.
    FreeText,
    /// Extracted criteria (price, year, mileage, gearbox, engine, keywords).
    Structured,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreeText => "free_text",
            Self::Structured => "structured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_unbounded() {
        let r = NumericRange::default();
        assert!(r.is_unbounded());
        assert!(r.contains(0));
        assert!(r.contains(u64::MAX));
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let r = NumericRange::new(300, 100);
        assert!(!r.contains(100));
        assert!(!r.contains(200));
        assert!(!r.contains(300));
    }

    #[test]
    fn default_spec_is_empty() {
        assert!(FilterSpec::default().is_empty());
        let spec = FilterSpec {
            gearbox: Some(Gearbox::Manual),
            ..Default::default()
        };
        assert!(!spec.is_empty());
    }

    #[test]
    fn gearbox_serialization() {
        assert_eq!(
            serde_json::to_string(&Gearbox::Automatic).unwrap(),
            r#""automatic""#
        );
        assert_eq!(serde_json::to_string(&Gearbox::Cvt).unwrap(), r#""CVT""#);
    }

    #[test]
    fn search_mode_from_config_string() {
        let mode: SearchMode = serde_json::from_str(r#""free_text""#).unwrap();
        assert_eq!(mode, SearchMode::FreeText);
        assert_eq!(SearchMode::Structured.as_str(), "structured");
    }
}
