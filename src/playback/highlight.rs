//! Синхронизация подсветки с часами воспроизведения
//!
//! Цикл подсветки - это цепочка запросов кадров. Каждый запрос помнит
//! сегмент и эпоху, для которых он запланирован; на кадре запрос
//! выполняется только если сегмент все еще играет в той же эпохе, и только
//! тогда планирует следующий кадр. Явного токена отмены нет.

use crate::model::Timing;
use crate::timing::find_active_timing;
use super::state::{PlaybackSession, PlaybackState};

/// Запрос на обработку следующего кадра
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub segment_index: usize,
    pub epoch: u64,
}

impl FrameRequest {
    /// Актуален ли запрос для текущего состояния сессии
    pub fn is_current(&self, session: &PlaybackSession) -> bool {
        self.epoch == session.epoch()
            && session.state() == PlaybackState::Playing(self.segment_index)
    }
}

/// Планировщик кадров подсветки
#[derive(Debug, Default)]
pub struct HighlightSynchronizer {
    pending: Vec<FrameRequest>,
}

impl HighlightSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запланировать кадр; одинаковые запросы не дублируются
    pub fn schedule(&mut self, request: FrameRequest) -> bool {
        if self.pending.contains(&request) {
            return false;
        }
        self.pending.push(request);
        true
    }

    /// Забрать запросы текущего кадра
    pub fn take_due(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Фраза, которую нужно подсветить в момент `current_time`
    ///
    /// `None`, если подходящего интервала нет или фраза уже подсвечена:
    /// тогда подсветка остается прежней.
    pub fn next_phrase(
        timings: &[Timing],
        segment_index: usize,
        current_time: f64,
        current_phrase: Option<usize>,
    ) -> Option<usize> {
        find_active_timing(timings, segment_index, current_time)
            .map(|timing| timing.phrase_index)
            .filter(|&phrase_index| Some(phrase_index) != current_phrase)
    }
}
