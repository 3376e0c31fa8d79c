//! Модуль конфигурации библиотеки phrase-sync
//!
//! Этот модуль содержит настройки разбиения на фразы, оценки таймингов,
//! синхронной прокрутки и цикла анимационных кадров.

use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{PhraseSyncError, Result};

/// Размер фразы по умолчанию (в словах)
pub const DEFAULT_WORDS_PER_PHRASE: usize = 4;

/// Скорость чтения для оценки длительности (слов в минуту)
pub const DEFAULT_WORDS_PER_MINUTE: f64 = 120.0;

/// Конфигурация библиотеки
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhraseSyncConfig {
    /// Количество слов в одной фразе
    pub words_per_phrase: usize,
    /// Скорость чтения, используемая пока длительность аудио неизвестна
    pub words_per_minute: f64,
    /// Окно подавления "эха" после зеркальной прокрутки (мс)
    pub scroll_echo_cooldown_ms: u64,
    /// Начальная скорость воспроизведения
    pub default_playback_rate: f64,
    /// Интервал анимационных кадров для асинхронного цикла (мс)
    pub frame_interval_ms: u64,
}

impl Default for PhraseSyncConfig {
    fn default() -> Self {
        Self {
            words_per_phrase: DEFAULT_WORDS_PER_PHRASE,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            scroll_echo_cooldown_ms: 50,
            default_playback_rate: 1.0,
            frame_interval_ms: 16, // ~60 кадров в секунду
        }
    }
}

impl PhraseSyncConfig {
    /// Проверить корректность настроек
    pub fn validate(&self) -> Result<()> {
        if self.words_per_phrase == 0 {
            return Err(PhraseSyncError::Configuration(
                "words_per_phrase must be at least 1".to_string(),
            ));
        }
        if !self.words_per_minute.is_finite() || self.words_per_minute <= 0.0 {
            return Err(PhraseSyncError::Configuration(format!(
                "words_per_minute must be a positive number, got {}",
                self.words_per_minute
            )));
        }
        if !self.default_playback_rate.is_finite() || self.default_playback_rate <= 0.0 {
            return Err(PhraseSyncError::Configuration(format!(
                "default_playback_rate must be a positive number, got {}",
                self.default_playback_rate
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(PhraseSyncError::Configuration(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Разобрать конфигурацию из JSON-строки
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Загрузить конфигурацию из JSON-файла
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    pub fn scroll_echo_cooldown(&self) -> Duration {
        Duration::from_millis(self.scroll_echo_cooldown_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}
