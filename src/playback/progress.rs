//! Показатели прогресса воспроизведения
//!
//! Общий прогресс считает все сегменты равными по весу независимо от их
//! реальной длительности: `segment / total + (time / duration) / total`.
//! Это приближение, а не точная временная шкала.

use serde::{Deserialize, Serialize};

/// Снимок прогресса для отображения
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReadout {
    /// Доля пройденного по всей последовательности сегментов, `[0, 1]`
    pub fraction: f64,
    pub segment_index: usize,
    /// Текущее время внутри активного сегмента
    pub current_time: f64,
    /// Длительность активного сегмента, если известна
    pub total_time: Option<f64>,
    pub current_label: String,
    pub total_label: String,
}

impl ProgressReadout {
    pub fn new(
        segment_index: usize,
        total_segments: usize,
        current_time: f64,
        duration: Option<f64>,
    ) -> Self {
        Self {
            fraction: overall_fraction(segment_index, total_segments, current_time, duration),
            segment_index,
            current_time,
            total_time: duration,
            current_label: format_time(current_time),
            total_label: duration.map(format_time).unwrap_or_else(|| format_time(0.0)),
        }
    }
}

/// Доля пройденного по всей последовательности
pub fn overall_fraction(
    segment_index: usize,
    total_segments: usize,
    current_time: f64,
    duration: Option<f64>,
) -> f64 {
    if total_segments == 0 {
        return 0.0;
    }

    let total = total_segments as f64;
    let within_segment = match duration {
        Some(d) if d.is_finite() && d > 0.0 && current_time.is_finite() => {
            (current_time / d).clamp(0.0, 1.0)
        }
        _ => 0.0,
    };
    (segment_index as f64 / total + within_segment / total).clamp(0.0, 1.0)
}

/// Время в формате `m:ss`
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(5.9), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(754.2), "12:34");
    }

    #[test]
    fn test_segments_are_weighted_equally() {
        // Сегменты 10 с и 90 с весят одинаково: середина первого - это 25%,
        // хотя по реальному времени прошло лишь 5 из 100 секунд
        assert_eq!(overall_fraction(0, 2, 5.0, Some(10.0)), 0.25);
        assert_eq!(overall_fraction(1, 2, 45.0, Some(90.0)), 0.75);
    }

    #[test]
    fn test_unknown_duration_counts_only_finished_segments() {
        assert_eq!(overall_fraction(2, 4, 3.0, None), 0.5);
        assert_eq!(overall_fraction(0, 0, 3.0, Some(1.0)), 0.0);
        assert_eq!(overall_fraction(3, 4, 10.0, Some(5.0)), 1.0);
    }

    #[test]
    fn test_readout_labels() {
        let readout = ProgressReadout::new(1, 4, 61.0, Some(125.0));
        assert_eq!(readout.current_label, "1:01");
        assert_eq!(readout.total_label, "2:05");
        assert!((readout.fraction - (0.25 + 61.0 / 125.0 / 4.0)).abs() < 1e-12);

        let readout = ProgressReadout::new(0, 1, 0.0, None);
        assert_eq!(readout.total_label, "0:00");
        assert_eq!(readout.total_time, None);
    }
}
