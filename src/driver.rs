//! Асинхронный цикл сессии воспроизведения
//!
//! Контроллер живет в одной задаче Tokio: команды хоста приходят через
//! канал, анимационные кадры генерирует таймер. Так все изменения
//! состояния сессии выполняются последовательно.

use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::media::{ClipHandle, MediaEvent};
use crate::model::{AudioGenerationResult, Segment};
use crate::panel::PanelSide;
use crate::playback::PlaybackController;

/// Команда для сессии воспроизведения
#[derive(Debug, Clone)]
pub enum SessionCommand {
    Load(Vec<Segment>),
    LoadGeneration(AudioGenerationResult),
    Clear,
    Play,
    Pause,
    Toggle,
    SetSpeed(f64),
    SeekToPhrase(usize),
    /// Событие медиа от клипа
    Media { handle: ClipHandle, event: MediaEvent },
    /// Пользователь прокрутил панель
    PanelScrolled(PanelSide),
    /// Завершить цикл и вернуть контроллер
    Shutdown,
}

/// Применить команду к контроллеру
pub fn apply_command(controller: &mut PlaybackController, command: SessionCommand) {
    match command {
        SessionCommand::Load(segments) => {
            controller.load(segments);
        }
        SessionCommand::LoadGeneration(result) => {
            controller.load_generation(result);
        }
        SessionCommand::Clear => controller.clear(),
        SessionCommand::Play => {
            controller.play();
        }
        SessionCommand::Pause => {
            controller.pause();
        }
        SessionCommand::Toggle => {
            controller.toggle();
        }
        SessionCommand::SetSpeed(rate) => {
            if let Err(e) = controller.set_speed(rate) {
                log::warn!("Rejected speed change: {}", e);
            }
        }
        SessionCommand::SeekToPhrase(index) => {
            controller.seek_to_phrase(index);
        }
        SessionCommand::Media { handle, event } => controller.on_media_event(handle, event),
        SessionCommand::PanelScrolled(side) => {
            controller.on_panel_scrolled(side, Instant::now());
        }
        SessionCommand::Shutdown => {}
    }
}

/// Цикл сессии: команды и кадры до `Shutdown` или закрытия канала
pub async fn run_session(
    mut controller: PlaybackController,
    mut commands: mpsc::Receiver<SessionCommand>,
    frame_interval: Duration,
) -> PlaybackController {
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    log::info!("Playback session {} started", controller.session().id());

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(SessionCommand::Shutdown) | None => break,
                Some(command) => {
                    log::trace!("Session command: {:?}", command);
                    apply_command(&mut controller, command);
                }
            },
            _ = frames.tick() => {
                controller.on_animation_frame();
            }
        }
    }

    log::info!("Playback session {} stopped", controller.session().id());
    controller
}

/// Запустить цикл сессии в отдельной задаче
pub fn spawn_session(
    controller: PlaybackController,
) -> (mpsc::Sender<SessionCommand>, JoinHandle<PlaybackController>) {
    let (tx, rx) = mpsc::channel(64);
    let frame_interval = controller.config().frame_interval();
    let handle = tokio::spawn(run_session(controller, rx, frame_interval));
    (tx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhraseSyncConfig;
    use crate::events::PlaybackEvent;
    use crate::media::{SimulatedBackend, SimulatedClip};
    use crate::notification::ChannelObserver;
    use crate::panel::MemoryPanel;
    use crate::playback::PlaybackState;

    fn controller(clip: SimulatedClip) -> PlaybackController {
        let backend = SimulatedBackend::new().with_clip("0.mp3", clip);
        let config = PhraseSyncConfig {
            frame_interval_ms: 1,
            ..PhraseSyncConfig::default()
        };
        PlaybackController::new(
            config,
            Box::new(backend),
            Box::new(MemoryPanel::new(PanelSide::Original)),
            Box::new(MemoryPanel::new(PanelSide::Translated)),
        )
        .unwrap()
    }

    async fn wait_for(rx: &mut mpsc::Receiver<PlaybackEvent>, name: &str) -> PlaybackEvent {
        let wait = async {
            loop {
                match rx.recv().await {
                    Some(event) if event.name() == name => return event,
                    Some(_) => continue,
                    None => panic!("event channel closed while waiting for {}", name),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for event")
    }

    #[tokio::test]
    async fn test_session_highlights_and_finishes() {
        let controller = controller(SimulatedClip::new(Some(1.0)));
        let (event_tx, mut event_rx) = mpsc::channel(256);
        controller.add_observer(Box::new(ChannelObserver::new(event_tx)));

        let (tx, handle) = spawn_session(controller);
        tx.send(SessionCommand::Load(vec![Segment::new("a b c d e", "uno dos", "0.mp3")]))
            .await
            .unwrap();
        let loaded = wait_for(&mut event_rx, "session_loaded").await;
        let epoch = match loaded {
            PlaybackEvent::SessionLoaded { epoch, .. } => epoch,
            other => panic!("unexpected event {:?}", other),
        };

        tx.send(SessionCommand::Play).await.unwrap();
        // Кадры идут по таймеру: первая фраза подсвечивается без участия хоста
        assert_eq!(
            wait_for(&mut event_rx, "phrase_highlighted").await,
            PlaybackEvent::PhraseHighlighted { phrase_index: 0, segment_index: 0 }
        );

        let clip = ClipHandle { epoch, segment_index: 0 };
        tx.send(SessionCommand::Media { handle: clip, event: MediaEvent::Ended })
            .await
            .unwrap();
        wait_for(&mut event_rx, "finished").await;

        tx.send(SessionCommand::Shutdown).await.unwrap();
        let controller = handle.await.unwrap();
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_session_stops_when_channel_closes() {
        let (tx, rx) = mpsc::channel(4);
        let controller = controller(SimulatedClip::new(Some(1.0)));

        let controller = tokio_test::block_on(async move {
            tx.send(SessionCommand::SetSpeed(-1.0)).await.unwrap();
            tx.send(SessionCommand::SetSpeed(1.25)).await.unwrap();
            drop(tx);
            run_session(controller, rx, Duration::from_millis(1)).await
        });

        // Недопустимая скорость отклонена, допустимая применена
        assert_eq!(controller.session().playback_rate(), 1.25);
    }
}
