//! Модуль воспроизведения
//!
//! Автомат воспроизведения последовательности сегментов, синхронизация
//! подсветки фраз с часами аудио и показатели прогресса.

pub mod controller;
pub mod highlight;
pub mod progress;
pub mod state;

pub use controller::PlaybackController;
pub use highlight::{FrameRequest, HighlightSynchronizer};
pub use progress::{format_time, overall_fraction, ProgressReadout};
pub use state::{PlaybackSession, PlaybackState};
