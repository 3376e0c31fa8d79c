//! Модуль обработки ошибок библиотеки phrase-sync
//!
//! Ошибки возвращают только загрузка конфигурации, разбор ответов внешнего
//! сервиса и измерение длительности аудио. Управление воспроизведением
//! деградирует до безопасного состояния и не поднимает ошибки наверх.

use thiserror::Error;

/// Ошибки библиотеки phrase-sync
#[derive(Debug, Error)]
pub enum PhraseSyncError {
    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ошибка конфигурации
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Недопустимая скорость воспроизведения
    #[error("Invalid playback rate: {0}")]
    InvalidPlaybackRate(f64),

    /// Не удалось определить длительность аудиофайла
    #[error("Audio probe error: {0}")]
    AudioProbe(String),

    /// Другая ошибка
    #[error("Other error: {0}")]
    Other(String),
}

impl From<&str> for PhraseSyncError {
    fn from(s: &str) -> Self {
        PhraseSyncError::Other(s.to_string())
    }
}

impl From<String> for PhraseSyncError {
    fn from(s: String) -> Self {
        PhraseSyncError::Other(s)
    }
}

/// Тип Result для библиотеки phrase-sync
pub type Result<T> = std::result::Result<T, PhraseSyncError>;
