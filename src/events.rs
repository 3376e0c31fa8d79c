//! Модуль событий воспроизведения
//!
//! Этот модуль предоставляет реализацию паттерна Observer: контроллер
//! воспроизведения сообщает наблюдателям о смене состояния, подсветке
//! фраз, пересчете таймингов и прогрессе.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::playback::progress::ProgressReadout;
use crate::playback::state::PlaybackState;

/// Событие воспроизведения
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Загружен новый набор сегментов
    SessionLoaded {
        session_id: Uuid,
        epoch: u64,
        segments: usize,
        phrases: usize,
        playable: usize,
    },
    /// Смена состояния автомата воспроизведения
    StateChanged { from: PlaybackState, to: PlaybackState },
    /// Подсвечена фраза в обеих панелях
    PhraseHighlighted { phrase_index: usize, segment_index: usize },
    /// Подсветка снята в обеих панелях
    HighlightsCleared,
    /// Тайминги пересчитаны с измеренными длительностями
    TimingsRecomputed { entries: usize, measured_segments: usize },
    /// Прогресс воспроизведения
    Progress(ProgressReadout),
    /// Изменена скорость воспроизведения
    SpeedChanged { rate: f64 },
    /// Последовательность сегментов доиграна до конца
    Finished,
}

impl PlaybackEvent {
    /// Короткое имя события
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionLoaded { .. } => "session_loaded",
            Self::StateChanged { .. } => "state_changed",
            Self::PhraseHighlighted { .. } => "phrase_highlighted",
            Self::HighlightsCleared => "highlights_cleared",
            Self::TimingsRecomputed { .. } => "timings_recomputed",
            Self::Progress(_) => "progress",
            Self::SpeedChanged { .. } => "speed_changed",
            Self::Finished => "finished",
        }
    }
}

/// Трейт для наблюдателя, получающего события воспроизведения
pub trait PlaybackObserver: Send + Sync {
    /// Метод, вызываемый при каждом событии
    fn on_playback_event(&self, event: &PlaybackEvent);
}

/// Рассылка событий наблюдателям
pub struct EventReporter {
    /// Наблюдатели по идентификаторам (порядок рассылки - порядок добавления)
    observers: RwLock<BTreeMap<usize, Box<dyn PlaybackObserver>>>,
    /// Счетчик для генерации уникальных идентификаторов наблюдателей
    next_id: AtomicUsize,
}

impl EventReporter {
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(BTreeMap::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    /// Добавить наблюдателя
    ///
    /// Возвращает идентификатор, по которому наблюдателя можно удалить.
    pub fn add_observer(&self, observer: Box<dyn PlaybackObserver>) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.observers.write().insert(id, observer);
        id
    }

    /// Удалить наблюдателя по идентификатору
    pub fn remove_observer(&self, id: usize) -> Option<Box<dyn PlaybackObserver>> {
        self.observers.write().remove(&id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Уведомить всех наблюдателей
    pub fn notify(&self, event: PlaybackEvent) {
        let observers = self.observers.read();
        for observer in observers.values() {
            observer.on_playback_event(&event);
        }
    }
}

impl Default for EventReporter {
    fn default() -> Self {
        Self::new()
    }
}
