//! Аудиоклипы и источники клипов

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use crate::model::Segment;

/// Трейт аудиоклипа одного сегмента (аналог медиаэлемента)
pub trait AudioClip: Send {
    /// Запустить или продолжить воспроизведение
    fn play(&mut self);
    /// Остановить часы клипа без сброса позиции
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    /// Текущая позиция в секундах
    fn current_time(&self) -> f64;
    fn seek(&mut self, seconds: f64);
    /// Длительность, если метаданные уже загружены
    fn duration(&self) -> Option<f64>;
    fn set_playback_rate(&mut self, rate: f64);
    fn playback_rate(&self) -> f64;
}

/// Источник аудиоклипов для сегментов
pub trait MediaBackend: Send {
    /// Открыть клип сегмента; `None` - у сегмента нет воспроизводимого аудио
    fn open(&mut self, segment_index: usize, segment: &Segment) -> Option<Box<dyn AudioClip>>;
}

/// Событие медиа, о котором сообщает хост
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Метаданные загружены, длительность известна
    MetadataLoaded { duration: f64 },
    /// Время воспроизведения продвинулось
    TimeUpdate,
    /// Воспроизведение дошло до конца
    Ended,
}

/// Идентификатор клипа для хоста
///
/// Эпоха совпадает с эпохой сессии на момент загрузки сегментов; события
/// клипов прежней эпохи контроллер игнорирует.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipHandle {
    pub epoch: u64,
    pub segment_index: usize,
}

/// Результат продвижения часов симулированного клипа
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipTick {
    /// Клип не играет
    Idle,
    /// Время продвинулось
    Advanced,
    /// Клип дошел до конца
    Ended,
}

#[derive(Debug)]
struct ClipState {
    duration: Option<f64>,
    position: f64,
    playing: bool,
    rate: f64,
}

/// Клип без реального вывода звука: часы продвигаются вызовом `advance`
///
/// Клон разделяет состояние с оригиналом.
#[derive(Debug, Clone)]
pub struct SimulatedClip {
    state: Arc<Mutex<ClipState>>,
}

impl SimulatedClip {
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClipState {
                duration,
                position: 0.0,
                playing: false,
                rate: 1.0,
            })),
        }
    }

    /// Сделать длительность известной (загрузка метаданных)
    pub fn load_metadata(&self, duration: f64) {
        self.state.lock().duration = Some(duration);
    }

    /// Продвинуть часы на `elapsed` секунд реального времени с учетом скорости
    pub fn advance(&self, elapsed: f64) -> ClipTick {
        let mut state = self.state.lock();
        if !state.playing {
            return ClipTick::Idle;
        }

        state.position += elapsed * state.rate;
        match state.duration {
            Some(duration) if state.position >= duration => {
                state.position = duration;
                state.playing = false;
                ClipTick::Ended
            }
            _ => ClipTick::Advanced,
        }
    }
}

impl AudioClip for SimulatedClip {
    fn play(&mut self) {
        let mut state = self.state.lock();
        // Клип, доигравший до конца, начинается сначала
        if matches!(state.duration, Some(duration) if state.position >= duration) {
            state.position = 0.0;
        }
        state.playing = true;
    }

    fn pause(&mut self) {
        self.state.lock().playing = false;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn current_time(&self) -> f64 {
        self.state.lock().position
    }

    fn seek(&mut self, seconds: f64) {
        let mut state = self.state.lock();
        let upper = state.duration.unwrap_or(f64::MAX);
        state.position = seconds.clamp(0.0, upper);
    }

    fn duration(&self) -> Option<f64> {
        self.state.lock().duration
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.state.lock().rate = rate;
    }

    fn playback_rate(&self) -> f64 {
        self.state.lock().rate
    }
}

/// Источник симулированных клипов
///
/// Клипы сопоставляются ссылкам на аудио заранее; при включенном
/// измерении файлов неизвестная ссылка трактуется как путь к файлу,
/// длительность которого измеряется.
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    clips: HashMap<String, SimulatedClip>,
    probe_files: bool,
    opened: Vec<(usize, SimulatedClip)>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зарегистрировать клип для ссылки на аудио
    pub fn with_clip(mut self, audio_ref: impl Into<String>, clip: SimulatedClip) -> Self {
        self.clips.insert(audio_ref.into(), clip);
        self
    }

    /// Измерять длительность файлов для незарегистрированных ссылок
    pub fn probing_files(mut self) -> Self {
        self.probe_files = true;
        self
    }

    /// Забрать клипы, выданные контроллеру, с индексами сегментов
    ///
    /// Список копится между загрузками, пока его не заберут.
    pub fn take_opened(&mut self) -> Vec<(usize, SimulatedClip)> {
        std::mem::take(&mut self.opened)
    }
}

impl MediaBackend for SimulatedBackend {
    fn open(&mut self, segment_index: usize, segment: &Segment) -> Option<Box<dyn AudioClip>> {
        let audio_ref = segment.audio_ref.as_deref()?;

        let clip = if let Some(clip) = self.clips.get(audio_ref) {
            clip.clone()
        } else if self.probe_files {
            match super::probe::probe_duration(Path::new(audio_ref)) {
                Ok(duration) => SimulatedClip::new(Some(duration)),
                Err(e) => {
                    log::warn!("Segment {}: cannot open audio {}: {}", segment_index, audio_ref, e);
                    return None;
                }
            }
        } else {
            log::warn!("Segment {}: no clip registered for {}", segment_index, audio_ref);
            return None;
        };

        self.opened.push((segment_index, clip.clone()));
        Some(Box::new(clip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_clock_honors_rate_and_end() {
        let clip = SimulatedClip::new(Some(2.0));
        let mut handle: Box<dyn AudioClip> = Box::new(clip.clone());

        assert_eq!(clip.advance(1.0), ClipTick::Idle);
        handle.play();
        handle.set_playback_rate(2.0);
        assert_eq!(clip.advance(0.5), ClipTick::Advanced);
        assert_eq!(handle.current_time(), 1.0);

        handle.pause();
        assert_eq!(clip.advance(10.0), ClipTick::Idle);
        assert_eq!(handle.current_time(), 1.0);

        handle.play();
        assert_eq!(clip.advance(0.75), ClipTick::Ended);
        assert_eq!(handle.current_time(), 2.0);
        assert!(!handle.is_playing());

        // Повторный запуск после конца начинается с нуля
        handle.play();
        assert_eq!(handle.current_time(), 0.0);
    }

    #[test]
    fn test_backend_maps_references() {
        let mut backend =
            SimulatedBackend::new().with_clip("a.mp3", SimulatedClip::new(Some(1.0)));

        assert!(backend.open(0, &Segment::new("x", "y", "a.mp3")).is_some());
        assert!(backend.open(1, &Segment::new("x", "y", "missing.mp3")).is_none());
        assert!(backend.open(2, &Segment::without_audio("x", "y")).is_none());

        let opened = backend.take_opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].0, 0);
        assert!(backend.take_opened().is_empty());

        // Без изъятия клипы разных загрузок накапливаются
        backend.open(0, &Segment::new("x", "y", "a.mp3"));
        backend.open(0, &Segment::new("x", "y", "a.mp3"));
        assert_eq!(backend.take_opened().len(), 2);
    }
}
