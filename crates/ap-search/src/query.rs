//! Query engine: capped, source-ordered search over a fetched record set.

use ap_protocol::{FilterSpec, Record, SearchMode};

use crate::extract::extract;
use crate::matcher::matches;
use crate::tokenize;

/// Runs structured or free-text queries with a result cap.
///
/// Results are the first `cap` matching records in source order. Iteration
/// stops once the cap is reached, so later matches are never returned.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine {
    cap: usize,
}

impl QueryEngine {
    pub const DEFAULT_CAP: usize = 3;

    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Dispatch on `mode`.
    pub fn run<'a>(&self, mode: SearchMode, text: &str, records: &'a [Record]) -> Vec<&'a Record> {
        match mode {
            SearchMode::FreeText => self.free_text(text, records),
            SearchMode::Structured => self.structured(text, records),
        }
    }

    /// Extract criteria from `text` and match records against them.
    pub fn structured<'a>(&self, text: &str, records: &'a [Record]) -> Vec<&'a Record> {
        let spec = extract(text);
        self.with_spec(&spec, records)
    }

    /// Match records against already-extracted criteria.
    pub fn with_spec<'a>(&self, spec: &FilterSpec, records: &'a [Record]) -> Vec<&'a Record> {
        let found: Vec<&Record> = records
            .iter()
            .filter(|r| matches(r, spec))
            .take(self.cap)
            .collect();
        tracing::debug!(
            mode = "structured",
            scanned = records.len(),
            match_count = found.len(),
            gearbox = spec.gearbox.map(|g| g.as_str()),
            engine = spec.engine.map(|e| e.as_str()),
            keywords = ?spec.keywords,
            "query evaluated"
        );
        found
    }

    /// Every query term must occur somewhere in the record's values.
    /// A query with no usable terms matches nothing.
    pub fn free_text<'a>(&self, text: &str, records: &'a [Record]) -> Vec<&'a Record> {
        let terms = tokenize::query_terms(text);
        if terms.is_empty() {
            return Vec::new();
        }
        let found: Vec<&Record> = records
            .iter()
            .filter(|r| {
                let flat = r.flattened_lowercase();
                terms.iter().all(|t| flat.contains(t.as_str()))
            })
            .take(self.cap)
            .collect();
        tracing::debug!(
            mode = "free_text",
            scanned = records.len(),
            match_count = found.len(),
            "query evaluated"
        );
        found
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAP)
    }
}

/// Structured query with an explicit cap.
pub fn query<'a>(raw_text: &str, records: &'a [Record], cap: usize) -> Vec<&'a Record> {
    QueryEngine::new(cap).structured(raw_text, records)
}
