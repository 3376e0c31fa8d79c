//! Контроллер воспроизведения
//!
//! Владеет сессией, сегментами, фразами, таймингами, клипами и панелями.
//! Хост передает в него команды пользователя, события медиа, анимационные
//! кадры и события прокрутки; все изменения состояния идут через контроллер.

use std::time::Instant;

use crate::config::PhraseSyncConfig;
use crate::error::{PhraseSyncError, Result};
use crate::events::{EventReporter, PlaybackEvent, PlaybackObserver};
use crate::media::{AudioClip, ClipHandle, MediaBackend, MediaEvent};
use crate::model::{AudioGenerationResult, Phrase, Segment, Timing};
use crate::panel::{DualPanels, PanelSide, ScrollCoupler, TextPanel};
use crate::phrase::build_phrases;
use crate::timing::{estimate_timings, MetadataTracker};

use super::highlight::{FrameRequest, HighlightSynchronizer};
use super::progress::ProgressReadout;
use super::state::{PlaybackSession, PlaybackState};

/// Контроллер синхронного воспроизведения двух панелей
pub struct PlaybackController {
    config: PhraseSyncConfig,
    session: PlaybackSession,
    segments: Vec<Segment>,
    phrases: Vec<Phrase>,
    timings: Vec<Timing>,
    /// Клипы по индексам сегментов; `None` - сегмент не воспроизводится
    clips: Vec<Option<Box<dyn AudioClip>>>,
    metadata: MetadataTracker,
    backend: Box<dyn MediaBackend>,
    panels: DualPanels,
    highlighter: HighlightSynchronizer,
    scroll: ScrollCoupler,
    reporter: EventReporter,
}

impl PlaybackController {
    /// Создать контроллер
    ///
    /// Конфигурация проверяется здесь, дальше контроллер на нее полагается.
    pub fn new(
        config: PhraseSyncConfig,
        backend: Box<dyn MediaBackend>,
        original: Box<dyn TextPanel>,
        translated: Box<dyn TextPanel>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            session: PlaybackSession::new(config.default_playback_rate),
            scroll: ScrollCoupler::new(config.scroll_echo_cooldown()),
            config,
            segments: Vec::new(),
            phrases: Vec::new(),
            timings: Vec::new(),
            clips: Vec::new(),
            metadata: MetadataTracker::default(),
            backend,
            panels: DualPanels::new(original, translated),
            highlighter: HighlightSynchronizer::new(),
            reporter: EventReporter::new(),
        })
    }

    /// Добавить наблюдателя событий
    pub fn add_observer(&self, observer: Box<dyn PlaybackObserver>) -> usize {
        self.reporter.add_observer(observer)
    }

    /// Удалить наблюдателя событий
    pub fn remove_observer(&self, id: usize) -> bool {
        self.reporter.remove_observer(id).is_some()
    }

    pub fn config(&self) -> &PhraseSyncConfig {
        &self.config
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    pub fn epoch(&self) -> u64 {
        self.session.epoch()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn timings(&self) -> &[Timing] {
        &self.timings
    }

    /// Есть ли у сегмента клип
    pub fn is_playable(&self, segment_index: usize) -> bool {
        matches!(self.clips.get(segment_index), Some(Some(_)))
    }

    pub fn playable_count(&self) -> usize {
        self.clips.iter().filter(|c| c.is_some()).count()
    }

    /// Идентификатор клипа сегмента в текущей эпохе
    pub fn clip_handle(&self, segment_index: usize) -> Option<ClipHandle> {
        self.is_playable(segment_index).then(|| ClipHandle {
            epoch: self.session.epoch(),
            segment_index,
        })
    }

    /// Количество запланированных кадров подсветки
    pub fn pending_frames(&self) -> usize {
        self.highlighter.pending_count()
    }

    /// Загрузить новый набор сегментов
    ///
    /// Текущее воспроизведение останавливается, начинается новая эпоха;
    /// кадры и события медиа прежней эпохи больше ни на что не влияют.
    /// Возвращает идентификаторы открытых клипов.
    pub fn load(&mut self, segments: Vec<Segment>) -> Vec<ClipHandle> {
        for clip in self.clips.iter_mut().flatten() {
            clip.pause();
            clip.seek(0.0);
        }

        let previous = self.session.state();
        let had_highlight = self.session.current_phrase_index().is_some();
        let epoch = self.session.advance_epoch();
        self.session.reset();

        let rate = self.session.playback_rate();
        let backend = &mut self.backend;
        self.clips = segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                if let Some(error) = &segment.error {
                    log::warn!("Segment {} failed to generate audio: {}", index, error);
                }
                if !segment.has_audio() {
                    return None;
                }
                // Бэкенд может вернуть уже игравший клип для той же ссылки
                backend.open(index, segment).map(|mut clip| {
                    clip.seek(0.0);
                    clip.set_playback_rate(rate);
                    clip
                })
            })
            .collect();

        // Длительности, известные сразу, учитываются без ожидания событий
        self.metadata = MetadataTracker::new(
            self.clips.iter().enumerate().filter(|(_, c)| c.is_some()).map(|(i, _)| i),
        );
        for (index, clip) in self.clips.iter().enumerate() {
            if let Some(duration) = clip.as_ref().and_then(|c| c.duration()) {
                self.metadata.record(index, duration);
            }
        }

        self.phrases = match build_phrases(&segments, self.config.words_per_phrase) {
            Ok(phrases) => phrases,
            Err(e) => {
                log::error!("Failed to build phrases: {}", e);
                Vec::new()
            }
        };
        self.segments = segments;
        self.timings = estimate_timings(
            &self.phrases,
            &self.segments,
            self.metadata.durations(),
            self.config.words_per_minute,
        );

        self.panels.clear_highlights();
        self.panels.render(&self.phrases);
        self.scroll.reset();

        let playable = self.playable_count();
        log::info!(
            "Loaded {} segments ({} playable), {} phrases, epoch {}",
            self.segments.len(),
            playable,
            self.phrases.len(),
            epoch
        );

        if previous != PlaybackState::Idle {
            self.reporter.notify(PlaybackEvent::StateChanged {
                from: previous,
                to: PlaybackState::Idle,
            });
        }
        if had_highlight {
            self.reporter.notify(PlaybackEvent::HighlightsCleared);
        }
        self.reporter.notify(PlaybackEvent::SessionLoaded {
            session_id: self.session.id(),
            epoch,
            segments: self.segments.len(),
            phrases: self.phrases.len(),
            playable,
        });

        (0..self.clips.len()).filter_map(|i| self.clip_handle(i)).collect()
    }

    /// Загрузить результат генерации аудио
    pub fn load_generation(&mut self, result: AudioGenerationResult) -> Vec<ClipHandle> {
        log::info!(
            "Loading document {} ({}, {} segments)",
            result.document_id,
            result.language.as_deref().unwrap_or("unknown language"),
            result.segments.len()
        );
        self.load(result.segments)
    }

    /// Сбросить содержимое: пустой набор сегментов
    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// Запустить или продолжить воспроизведение
    ///
    /// Возвращает `false`, если воспроизводить нечего или уже играет.
    pub fn play(&mut self) -> bool {
        match self.session.state() {
            PlaybackState::Playing(_) => false,
            PlaybackState::Paused(index) => {
                if let Some(clip) = self.clip_mut(index) {
                    clip.play();
                }
                self.transition(PlaybackState::Playing(index));
                self.request_frame(index);
                true
            }
            PlaybackState::Idle => {
                let start = self
                    .next_playable_from(self.session.current_segment_index())
                    .or_else(|| self.next_playable_from(0));
                match start {
                    Some(index) => {
                        self.start_segment(index);
                        true
                    }
                    None => {
                        log::debug!("Nothing to play");
                        false
                    }
                }
            }
        }
    }

    /// Приостановить воспроизведение с сохранением позиции
    pub fn pause(&mut self) -> bool {
        match self.session.state() {
            PlaybackState::Playing(index) => {
                if let Some(clip) = self.clip_mut(index) {
                    clip.pause();
                }
                self.transition(PlaybackState::Paused(index));
                true
            }
            _ => false,
        }
    }

    /// Переключение воспроизведения и паузы
    pub fn toggle(&mut self) -> bool {
        if self.session.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Установить скорость воспроизведения для всех клипов
    pub fn set_speed(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PhraseSyncError::InvalidPlaybackRate(rate));
        }

        self.session.playback_rate = rate;
        for clip in self.clips.iter_mut().flatten() {
            clip.set_playback_rate(rate);
        }
        log::debug!("Playback rate set to {}", rate);
        self.reporter.notify(PlaybackEvent::SpeedChanged { rate });
        Ok(())
    }

    /// Перейти к фразе
    ///
    /// Воспроизведение сегмента фразы начинается с начала сегмента, фраза
    /// подсвечивается сразу. Недопустимый номер фразы ничего не меняет.
    pub fn seek_to_phrase(&mut self, phrase_index: usize) -> bool {
        let target = match self.phrases.get(phrase_index) {
            Some(phrase) => phrase.segment_index,
            None => {
                log::debug!("Ignoring seek to unknown phrase {}", phrase_index);
                return false;
            }
        };

        match self.session.state() {
            PlaybackState::Playing(current) => {
                if let Some(clip) = self.clip_mut(current) {
                    clip.pause();
                    clip.seek(0.0);
                }
                self.session.current_segment_index = target;
                self.set_highlight(phrase_index);
                match self.next_playable_from(target) {
                    Some(index) => self.start_segment(index),
                    None => self.finish(),
                }
            }
            PlaybackState::Paused(current) => {
                if let Some(clip) = self.clip_mut(current) {
                    clip.seek(0.0);
                }
                self.session.current_segment_index = target;
                self.set_highlight(phrase_index);
                if self.is_playable(target) {
                    self.transition(PlaybackState::Paused(target));
                } else {
                    self.transition(PlaybackState::Idle);
                }
            }
            PlaybackState::Idle => {
                self.session.current_segment_index = target;
                self.set_highlight(phrase_index);
            }
        }

        log::debug!("Seeked to phrase {} (segment {})", phrase_index, target);
        true
    }

    /// Обработать событие медиа от хоста
    pub fn on_media_event(&mut self, handle: ClipHandle, event: MediaEvent) {
        if handle.epoch != self.session.epoch() {
            log::trace!(
                "Ignoring {:?} for segment {} from stale epoch {}",
                event,
                handle.segment_index,
                handle.epoch
            );
            return;
        }

        match event {
            MediaEvent::MetadataLoaded { duration } => {
                if self.metadata.record(handle.segment_index, duration) {
                    self.recompute_timings();
                }
            }
            MediaEvent::TimeUpdate => {
                if handle.segment_index == self.session.current_segment_index() {
                    if let Some(readout) = self.progress() {
                        self.reporter.notify(PlaybackEvent::Progress(readout));
                    }
                }
            }
            MediaEvent::Ended => self.on_segment_ended(handle.segment_index),
        }
    }

    /// Обработать анимационный кадр
    ///
    /// Возвращает количество обработанных актуальных запросов.
    pub fn on_animation_frame(&mut self) -> usize {
        let mut processed = 0;
        for request in self.highlighter.take_due() {
            if !request.is_current(&self.session) {
                log::trace!(
                    "Dropping frame for segment {} of epoch {}",
                    request.segment_index,
                    request.epoch
                );
                continue;
            }

            let current_time = match self.clip(request.segment_index) {
                Some(clip) => clip.current_time(),
                None => continue,
            };
            if let Some(phrase_index) = HighlightSynchronizer::next_phrase(
                &self.timings,
                request.segment_index,
                current_time,
                self.session.current_phrase_index(),
            ) {
                self.set_highlight(phrase_index);
            }

            self.highlighter.schedule(request);
            processed += 1;
        }
        processed
    }

    /// Пользователь прокрутил панель
    ///
    /// Возвращает `true`, если прокрутка перенесена во вторую панель.
    pub fn on_panel_scrolled(&mut self, side: PanelSide, now: Instant) -> bool {
        let (source, target) = self.panels.source_and_target(side);
        self.scroll.mirror(source, target, now)
    }

    /// Прогресс активного сегмента
    pub fn progress(&self) -> Option<ProgressReadout> {
        let index = self.session.current_segment_index();
        let clip = self.clip(index)?;
        Some(ProgressReadout::new(
            index,
            self.segments.len(),
            clip.current_time(),
            clip.duration(),
        ))
    }

    /// Пересчитать тайминги с учетом измеренных длительностей
    pub fn recompute_timings(&mut self) {
        self.timings = estimate_timings(
            &self.phrases,
            &self.segments,
            self.metadata.durations(),
            self.config.words_per_minute,
        );
        let measured_segments = self.metadata.durations().usable_count();
        log::info!(
            "Recomputed {} phrase timings ({} measured segments)",
            self.timings.len(),
            measured_segments
        );
        self.reporter.notify(PlaybackEvent::TimingsRecomputed {
            entries: self.timings.len(),
            measured_segments,
        });
    }

    fn on_segment_ended(&mut self, index: usize) {
        if self.session.state() != PlaybackState::Playing(index) {
            log::debug!("Ignoring end of inactive segment {}", index);
            return;
        }

        if let Some(clip) = self.clip_mut(index) {
            clip.seek(0.0);
        }
        match self.next_playable_from(index + 1) {
            Some(next) => self.start_segment(next),
            None => self.finish(),
        }
    }

    fn start_segment(&mut self, index: usize) {
        self.session.current_segment_index = index;
        if let Some(clip) = self.clip_mut(index) {
            clip.play();
        }
        self.transition(PlaybackState::Playing(index));
        self.request_frame(index);
    }

    /// Последовательность закончилась: подсветка снимается, позиция сбрасывается
    fn finish(&mut self) {
        self.transition(PlaybackState::Idle);
        self.session.current_segment_index = 0;
        self.session.current_phrase_index = None;
        self.panels.clear_highlights();
        log::info!("Playback finished");
        self.reporter.notify(PlaybackEvent::HighlightsCleared);
        self.reporter.notify(PlaybackEvent::Finished);
    }

    fn set_highlight(&mut self, phrase_index: usize) {
        let segment_index = match self.phrases.get(phrase_index) {
            Some(phrase) => phrase.segment_index,
            None => return,
        };
        self.session.current_phrase_index = Some(phrase_index);
        self.panels.highlight(phrase_index);
        self.reporter.notify(PlaybackEvent::PhraseHighlighted {
            phrase_index,
            segment_index,
        });
    }

    fn transition(&mut self, to: PlaybackState) {
        let from = self.session.state();
        if from == to {
            return;
        }
        self.session.state = to;
        log::debug!("Playback state {} -> {}", from, to);
        self.reporter.notify(PlaybackEvent::StateChanged { from, to });
    }

    fn request_frame(&mut self, segment_index: usize) {
        self.highlighter.schedule(FrameRequest {
            segment_index,
            epoch: self.session.epoch(),
        });
    }

    fn next_playable_from(&self, start: usize) -> Option<usize> {
        (start..self.clips.len()).find(|&i| self.is_playable(i))
    }

    fn clip(&self, index: usize) -> Option<&dyn AudioClip> {
        self.clips.get(index).and_then(|c| c.as_deref())
    }

    fn clip_mut(&mut self, index: usize) -> Option<&mut Box<dyn AudioClip>> {
        self.clips.get_mut(index).and_then(|c| c.as_mut())
    }
}
