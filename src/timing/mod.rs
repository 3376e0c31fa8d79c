//! Модуль для расчета временных интервалов фраз
//!
//! Тайминги пересчитываются целиком, когда становятся известны
//! реальные длительности аудио сегментов.

pub mod estimator;
pub mod metadata;

pub use estimator::{estimate_segment_duration, estimate_timings, find_active_timing};
pub use metadata::{MeasuredDurations, MetadataTracker};
