//! Оценка временных интервалов фраз
//!
//! Длительность сегмента берется из измеренной длительности аудио, а если
//! она неизвестна - оценивается по скорости чтения. Длительность делится
//! поровну между фразами сегмента без учета количества слов во фразе.

use crate::model::{Phrase, Segment, Timing};
use crate::phrase::word_count;
use super::metadata::MeasuredDurations;

/// Длительность сегмента в секундах
pub fn estimate_segment_duration(
    segment: &Segment,
    measured: Option<f64>,
    words_per_minute: f64,
) -> f64 {
    match measured {
        Some(duration) if duration.is_finite() && duration > 0.0 => duration,
        _ => word_count(&segment.text) as f64 / words_per_minute * 60.0,
    }
}

/// Рассчитать тайминги всех фраз
///
/// Сегменты без фраз и без аудио не дают записей. Результат полностью
/// определяется входными данными, поэтому повторный вызов безопасен.
pub fn estimate_timings(
    phrases: &[Phrase],
    segments: &[Segment],
    durations: &MeasuredDurations,
    words_per_minute: f64,
) -> Vec<Timing> {
    let mut timings = Vec::with_capacity(phrases.len());

    // Фразы одного сегмента идут подряд
    let mut start = 0;
    while start < phrases.len() {
        let segment_index = phrases[start].segment_index;
        let end = phrases[start..]
            .iter()
            .position(|p| p.segment_index != segment_index)
            .map_or(phrases.len(), |offset| start + offset);
        let group = &phrases[start..end];
        start = end;

        let segment = match segments.get(segment_index) {
            Some(segment) if segment.has_audio() => segment,
            _ => continue,
        };

        let segment_duration =
            estimate_segment_duration(segment, durations.get(segment_index), words_per_minute);
        let phrase_duration = segment_duration / group.len() as f64;

        for phrase in group {
            let position = phrase.phrase_index_in_segment as f64;
            timings.push(Timing {
                phrase_index: phrase.id,
                segment_index,
                start_time: position * phrase_duration,
                // Конец совпадает с началом следующей фразы бит в бит
                end_time: (position + 1.0) * phrase_duration,
                duration: phrase_duration,
            });
        }
    }

    timings
}

/// Найти фразу, звучащую в момент `current_time` активного сегмента
pub fn find_active_timing(
    timings: &[Timing],
    segment_index: usize,
    current_time: f64,
) -> Option<&Timing> {
    timings
        .iter()
        .find(|t| t.segment_index == segment_index && t.contains(current_time))
}
