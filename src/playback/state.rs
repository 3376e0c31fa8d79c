//! Состояние сессии воспроизведения

use std::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Состояние автомата воспроизведения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "segment", rename_all = "snake_case")]
pub enum PlaybackState {
    /// Ничего не играет
    Idle,
    /// Играет аудио сегмента
    Playing(usize),
    /// Аудио сегмента остановлено без сброса позиции
    Paused(usize),
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing(_))
    }

    /// Сегмент, к которому относится состояние
    pub fn segment(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Playing(i) | Self::Paused(i) => Some(*i),
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Playing(i) => write!(f, "Playing({})", i),
            Self::Paused(i) => write!(f, "Paused({})", i),
        }
    }
}

/// Контекст сессии воспроизведения
///
/// Эпоха увеличивается при каждой замене набора сегментов. Запланированные
/// кадры подсветки запоминают эпоху и отменяются, если она изменилась.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    id: Uuid,
    epoch: u64,
    pub(crate) state: PlaybackState,
    pub(crate) current_segment_index: usize,
    pub(crate) current_phrase_index: Option<usize>,
    pub(crate) playback_rate: f64,
}

impl PlaybackSession {
    pub fn new(playback_rate: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch: 0,
            state: PlaybackState::Idle,
            current_segment_index: 0,
            current_phrase_index: None,
            playback_rate,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn current_segment_index(&self) -> usize {
        self.current_segment_index
    }

    /// Подсвеченная фраза; `None` - подсветки нет
    pub fn current_phrase_index(&self) -> Option<usize> {
        self.current_phrase_index
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Начать новую эпоху данных
    pub(crate) fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Вернуть сессию в начальное состояние (скорость сохраняется)
    pub(crate) fn reset(&mut self) {
        self.state = PlaybackState::Idle;
        self.current_segment_index = 0;
        self.current_phrase_index = None;
    }
}
