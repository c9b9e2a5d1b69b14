//! Mock record source for testing: serves a fixed inventory.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use ap_protocol::Record;

use crate::error::{SheetError, SheetResult};
use crate::source::RecordSource;

/// Serves pre-loaded records, or fails every fetch when built with
/// [`MockRecordSource::unavailable`].
pub struct MockRecordSource {
    records: Vec<Record>,
    available: bool,
    fetches: AtomicUsize,
}

impl MockRecordSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            available: true,
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source whose backing store is down.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    /// Number of `fetch_all` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// A small dealership inventory with Russian headers.
    pub fn with_sample_inventory() -> Self {
        const HEADER: [&str; 10] = [
            "ID", "Марка", "Модель", "Год", "Цена", "Пробег", "КПП", "Двигатель", "Кузов", "Цвет",
        ];
        let rows: [[&str; 10]; 6] = [
            ["101", "Kia", "Rio", "2019", "1 150 000", "68 000 км", "Автомат", "Бензин 1.6", "Седан", "Белый"],
            ["102", "Hyundai", "Solaris", "2017", "890 000", "95 000 км", "Механика", "Бензин 1.4", "Седан", "Серый"],
            ["103", "Toyota", "RAV4", "2021", "3 200 000", "32 000 км", "Вариатор", "Бензин 2.0", "Кроссовер", "Чёрный"],
            ["104", "BMW", "X1", "2018", "2 350 000", "74 000 км", "Автомат", "Дизель 2.0", "Кроссовер", "Синий"],
            ["105", "Skoda", "Octavia", "2020", "1 890 000", "51 000 км", "Автомат", "Бензин 1.4", "Лифтбек", "Белый"],
            ["106", "Toyota", "Camry", "2022", "3 650 000", "18 000 км", "Автомат", "Гибрид 2.5", "Седан", "Чёрный"],
        ];
        Self::new(
            rows.iter()
                .map(|row| Record::from_pairs(HEADER.iter().copied().zip(row.iter().copied())))
                .collect(),
        )
    }
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn fetch_all(&self) -> SheetResult<Vec<Record>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if !self.available {
            return Err(SheetError::SourceUnavailable("mock source offline".into()));
        }
        Ok(self.records.clone())
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}
