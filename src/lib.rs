//! Основной файл библиотеки phrase-sync
//!
//! Библиотека разбивает текст сегментов (оригинал и перевод) на фразы,
//! оценивает временные интервалы фраз по длительности аудио и управляет
//! последовательным воспроизведением аудио сегментов с подсветкой текущей
//! фразы в двух текстовых панелях и синхронной прокруткой.

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod media;
pub mod model;
pub mod notification;
pub mod panel;
pub mod phrase;
pub mod playback;
pub mod timing;

pub use crate::config::PhraseSyncConfig;
pub use crate::driver::{run_session, spawn_session, SessionCommand};
pub use crate::error::{PhraseSyncError, Result};
pub use crate::events::{EventReporter, PlaybackEvent, PlaybackObserver};
pub use crate::media::{
    AudioClip, ClipHandle, MediaBackend, MediaEvent, SimulatedBackend, SimulatedClip,
};
pub use crate::model::{
    AudioGenerationResult, DocumentId, Phrase, Segment, Timing, TranslationResult,
};
pub use crate::panel::{MemoryPanel, PanelSide, TextPanel};
pub use crate::playback::{PlaybackController, PlaybackState, ProgressReadout};

/// Публичный API для удобного использования
///
/// Разбирает ответ сервиса генерации аудио и возвращает контроллер с
/// загруженными сегментами.
pub fn open_generation_result(
    json: &str,
    config: PhraseSyncConfig,
    backend: Box<dyn MediaBackend>,
    original: Box<dyn TextPanel>,
    translated: Box<dyn TextPanel>,
) -> Result<PlaybackController> {
    let result = AudioGenerationResult::from_json(json)?;
    let mut controller = PlaybackController::new(config, backend, original, translated)?;
    controller.load_generation(result);
    Ok(controller)
}
