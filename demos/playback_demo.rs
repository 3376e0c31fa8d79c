//! Пример синхронного воспроизведения с подсветкой фраз
//!
//! Аудио симулируется: отдельная задача продвигает часы клипов и сообщает
//! сессии о событиях медиа так, как это делал бы настоящий плеер.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use phrase_sync::media::ClipTick;
use phrase_sync::notification::{ChannelObserver, CompositeObserver, LogObserver};
use phrase_sync::{
    spawn_session, AudioGenerationResult, ClipHandle, MediaEvent, MemoryPanel, PanelSide,
    PhraseSyncConfig, PlaybackController, PlaybackEvent, SessionCommand, SimulatedBackend,
    SimulatedClip,
};

const RESPONSE: &str = r#"{
    "document_id": "demo-document",
    "language": "en",
    "segment_type": "sentence",
    "total_segments": 3,
    "segments": [
        {"text": "The quick brown fox jumps over the lazy dog", "original_text": "El rápido zorro marrón salta sobre el perro perezoso", "audio_path": "demo/seg_0.mp3"},
        {"text": "Nobody generated audio for this one", "original_text": "Nadie generó audio para este", "audio_path": null, "error": "rate limited"},
        {"text": "And then everyone went home", "original_text": "Y luego todos se fueron a casa", "audio_path": "demo/seg_2.mp3"}
    ]
}"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Инициализируем логирование
    env_logger::init();

    let result =
        AudioGenerationResult::from_json(RESPONSE).context("Failed to parse service response")?;

    // Длительность первого клипа неизвестна до "загрузки метаданных"
    let first = SimulatedClip::new(None);
    let second = SimulatedClip::new(Some(1.5));
    let backend = SimulatedBackend::new()
        .with_clip("demo/seg_0.mp3", first.clone())
        .with_clip("demo/seg_2.mp3", second.clone());

    let original = MemoryPanel::new(PanelSide::Original);
    let translated = MemoryPanel::new(PanelSide::Translated);
    let config = PhraseSyncConfig {
        words_per_phrase: 3,
        ..PhraseSyncConfig::default()
    };
    let controller = PlaybackController::new(
        config,
        Box::new(backend),
        Box::new(original.clone()),
        Box::new(translated.clone()),
    )?;

    let (event_tx, mut event_rx) = mpsc::channel(1024);
    let mut observers = CompositeObserver::new();
    observers.add_observer(Box::new(LogObserver::with_prefix("[demo] ")));
    observers.add_observer(Box::new(ChannelObserver::new(event_tx)));
    controller.add_observer(Box::new(observers));

    let (commands, session) = spawn_session(controller);
    commands.send(SessionCommand::LoadGeneration(result)).await?;

    let epoch = loop {
        match event_rx.recv().await {
            Some(PlaybackEvent::SessionLoaded { epoch, .. }) => break epoch,
            Some(_) => continue,
            None => anyhow::bail!("session stopped before loading"),
        }
    };
    let clips = [(0, first.clone()), (2, second.clone())];

    // Метаданные первого клипа приходят позже, тайминги пересчитываются
    first.load_metadata(2.4);
    commands
        .send(SessionCommand::Media {
            handle: ClipHandle { epoch, segment_index: 0 },
            event: MediaEvent::MetadataLoaded { duration: 2.4 },
        })
        .await?;
    commands.send(SessionCommand::SetSpeed(1.5)).await?;
    commands.send(SessionCommand::Play).await?;

    // Симулятор плеера: часы клипов и события медиа
    let player_commands = commands.clone();
    let player = tokio::spawn(async move {
        let step = Duration::from_millis(20);
        loop {
            tokio::time::sleep(step).await;
            for (segment_index, clip) in &clips {
                let handle = ClipHandle { epoch, segment_index: *segment_index };
                let event = match clip.advance(step.as_secs_f64()) {
                    ClipTick::Idle => continue,
                    ClipTick::Advanced => MediaEvent::TimeUpdate,
                    ClipTick::Ended => MediaEvent::Ended,
                };
                if player_commands.send(SessionCommand::Media { handle, event }).await.is_err() {
                    return;
                }
            }
        }
    });

    let mut highlighted = Vec::new();
    while let Some(event) = event_rx.recv().await {
        match event {
            PlaybackEvent::PhraseHighlighted { phrase_index, .. } => {
                highlighted.push(phrase_index);
                println!(
                    "phrase {:>2} | original: {:?} | translated: {:?}",
                    phrase_index,
                    original.active(),
                    translated.active()
                );
            }
            PlaybackEvent::Progress(readout) => {
                log::debug!(
                    "{:.0}% {} / {}",
                    readout.fraction * 100.0,
                    readout.current_label,
                    readout.total_label
                );
            }
            PlaybackEvent::Finished => break,
            _ => {}
        }
    }

    player.abort();
    commands.send(SessionCommand::Shutdown).await?;
    let controller = session.await.context("Session task failed")?;

    println!("Highlighted phrases: {:?}", highlighted);
    println!("Final state: {}", controller.state());
    Ok(())
}
