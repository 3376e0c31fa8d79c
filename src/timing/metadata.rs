//! Учет измеренных длительностей аудио
//!
//! Метаданные аудио приходят в произвольном порядке, потому что каждый
//! ресурс загружается независимо. Трекер сообщает, когда метаданные
//! всех загружаемых сегментов получены.

use std::collections::{BTreeMap, BTreeSet};

/// Измеренные длительности аудио по индексам сегментов (секунды)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasuredDurations {
    durations: BTreeMap<usize, f64>,
}

impl MeasuredDurations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, segment_index: usize, duration: f64) {
        self.durations.insert(segment_index, duration);
    }

    /// Длительность сегмента, если она конечна и положительна
    pub fn get(&self, segment_index: usize) -> Option<f64> {
        self.durations
            .get(&segment_index)
            .copied()
            .filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Количество сегментов с пригодной измеренной длительностью
    pub fn usable_count(&self) -> usize {
        self.durations.keys().filter(|&&i| self.get(i).is_some()).count()
    }

    pub fn clear(&mut self) {
        self.durations.clear();
    }
}

/// Трекер получения метаданных для набора аудиоклипов
#[derive(Debug, Clone, Default)]
pub struct MetadataTracker {
    /// Сегменты, для которых ожидаются метаданные
    expected: BTreeSet<usize>,
    /// Сегменты, метаданные которых уже получены
    observed: BTreeSet<usize>,
    durations: MeasuredDurations,
}

impl MetadataTracker {
    /// Начать ожидание метаданных для указанных сегментов
    pub fn new(expected: impl IntoIterator<Item = usize>) -> Self {
        Self {
            expected: expected.into_iter().collect(),
            observed: BTreeSet::new(),
            durations: MeasuredDurations::new(),
        }
    }

    /// Зафиксировать метаданные сегмента
    ///
    /// Возвращает `true`, если после этого получены метаданные всех
    /// ожидаемых сегментов. Повторные события для сегмента допустимы.
    pub fn record(&mut self, segment_index: usize, duration: f64) -> bool {
        if !self.expected.contains(&segment_index) {
            log::debug!("Ignoring metadata for unexpected segment {}", segment_index);
            return false;
        }

        self.durations.insert(segment_index, duration);
        self.observed.insert(segment_index);
        self.all_loaded()
    }

    pub fn all_loaded(&self) -> bool {
        self.expected.is_subset(&self.observed)
    }

    pub fn loaded_count(&self) -> usize {
        self.observed.len()
    }

    pub fn expected_count(&self) -> usize {
        self.expected.len()
    }

    pub fn durations(&self) -> &MeasuredDurations {
        &self.durations
    }
}
