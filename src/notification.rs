//! Модуль для реализации системы уведомлений
//!
//! Этот модуль предоставляет конкретные реализации наблюдателей для
//! событий воспроизведения.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use crate::events::{PlaybackEvent, PlaybackObserver};

/// Наблюдатель, пишущий события в лог
pub struct LogObserver {
    /// Префикс сообщений (опционально)
    prefix: Option<String>,
}

impl LogObserver {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackObserver for LogObserver {
    fn on_playback_event(&self, event: &PlaybackEvent) {
        let prefix = self.prefix.as_deref().unwrap_or("");
        match event {
            // Прогресс приходит на каждое обновление времени
            PlaybackEvent::Progress(readout) => log::trace!(
                "{}progress {:.1}% ({} / {})",
                prefix,
                readout.fraction * 100.0,
                readout.current_label,
                readout.total_label
            ),
            PlaybackEvent::PhraseHighlighted { phrase_index, segment_index } => {
                log::debug!("{}phrase {} (segment {})", prefix, phrase_index, segment_index)
            }
            other => log::info!("{}{:?}", prefix, other),
        }
    }
}

/// Наблюдатель, сохраняющий события в памяти
///
/// Клон разделяет историю с оригиналом.
#[derive(Clone, Default)]
pub struct MemoryObserver {
    history: Arc<Mutex<Vec<PlaybackEvent>>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Получить историю событий
    pub fn history(&self) -> Vec<PlaybackEvent> {
        self.history.lock().clone()
    }

    /// События с указанным именем
    pub fn named(&self, name: &str) -> Vec<PlaybackEvent> {
        self.history
            .lock()
            .iter()
            .filter(|e| e.name() == name)
            .cloned()
            .collect()
    }

    /// Очистить историю
    pub fn clear_history(&self) {
        self.history.lock().clear();
    }
}

impl PlaybackObserver for MemoryObserver {
    fn on_playback_event(&self, event: &PlaybackEvent) {
        self.history.lock().push(event.clone());
    }
}

/// Наблюдатель, записывающий события в файл (JSON по строке на событие)
pub struct FileObserver {
    /// Путь к файлу
    file_path: PathBuf,
}

impl FileObserver {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl PlaybackObserver for FileObserver {
    fn on_playback_event(&self, event: &PlaybackEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Failed to serialize playback event: {}", e);
                return;
            }
        };
        let log_entry = format!(
            "[{}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            payload
        );

        // Открываем файл в режиме добавления
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
        {
            Ok(mut file) => {
                if let Err(e) = file.write_all(log_entry.as_bytes()) {
                    log::error!("Failed to write event log {}: {}", self.file_path.display(), e);
                }
            }
            Err(e) => log::error!("Failed to open event log {}: {}", self.file_path.display(), e),
        }
    }
}

/// Наблюдатель, отправляющий события через канал Tokio
///
/// Отправка не блокирует: при переполненном канале событие теряется.
pub struct ChannelObserver {
    sender: mpsc::Sender<PlaybackEvent>,
}

impl ChannelObserver {
    pub fn new(sender: mpsc::Sender<PlaybackEvent>) -> Self {
        Self { sender }
    }
}

impl PlaybackObserver for ChannelObserver {
    fn on_playback_event(&self, event: &PlaybackEvent) {
        if let Err(e) = self.sender.try_send(event.clone()) {
            log::warn!("Dropped playback event {}: {}", event.name(), e);
        }
    }
}

/// Наблюдатель, вызывающий функцию обратного вызова
pub struct CallbackObserver<F>
where
    F: Fn(&PlaybackEvent) + Send + Sync + 'static,
{
    callback: F,
}

impl<F> CallbackObserver<F>
where
    F: Fn(&PlaybackEvent) + Send + Sync + 'static,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> PlaybackObserver for CallbackObserver<F>
where
    F: Fn(&PlaybackEvent) + Send + Sync + 'static,
{
    fn on_playback_event(&self, event: &PlaybackEvent) {
        (self.callback)(event);
    }
}

/// Комбинированный наблюдатель, объединяющий несколько наблюдателей
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Box<dyn PlaybackObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&mut self, observer: Box<dyn PlaybackObserver>) {
        self.observers.push(observer);
    }
}

impl PlaybackObserver for CompositeObserver {
    fn on_playback_event(&self, event: &PlaybackEvent) {
        for observer in &self.observers {
            observer.on_playback_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_memory_observer_filters_by_name() {
        let observer = MemoryObserver::new();
        let view = observer.clone();
        observer.on_playback_event(&PlaybackEvent::Finished);
        observer.on_playback_event(&PlaybackEvent::SpeedChanged { rate: 1.5 });

        assert_eq!(view.history().len(), 2);
        assert_eq!(view.named("speed_changed"), vec![PlaybackEvent::SpeedChanged { rate: 1.5 }]);
        view.clear_history();
        assert!(observer.history().is_empty());
    }

    #[test]
    fn test_composite_and_callback_observers() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let mut composite = CompositeObserver::new();
        composite.add_observer(Box::new(CallbackObserver::new(move |_event: &PlaybackEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        })));
        let memory = MemoryObserver::new();
        composite.add_observer(Box::new(memory.clone()));
        composite.add_observer(Box::new(LogObserver::with_prefix("[test] ")));

        composite.on_playback_event(&PlaybackEvent::HighlightsCleared);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(memory.history(), vec![PlaybackEvent::HighlightsCleared]);
    }

    #[test]
    fn test_file_observer_appends_json_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("events.log");
        let observer = FileObserver::new(&path);

        observer.on_playback_event(&PlaybackEvent::PhraseHighlighted {
            phrase_index: 2,
            segment_index: 0,
        });
        observer.on_playback_event(&PlaybackEvent::Finished);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""event":"phrase_highlighted""#));
        assert!(lines[1].ends_with(r#"{"event":"finished"}"#));
    }

    #[tokio::test]
    async fn test_channel_observer_forwards_events() {
        let (tx, mut rx) = mpsc::channel(4);
        let observer = ChannelObserver::new(tx);

        observer.on_playback_event(&PlaybackEvent::SpeedChanged { rate: 2.0 });
        let received = rx.recv().await.unwrap();
        assert_eq!(received, PlaybackEvent::SpeedChanged { rate: 2.0 });
    }

    #[test]
    fn test_channel_observer_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let observer = ChannelObserver::new(tx);

        observer.on_playback_event(&PlaybackEvent::Finished);
        observer.on_playback_event(&PlaybackEvent::HighlightsCleared);

        assert_eq!(rx.try_recv().unwrap(), PlaybackEvent::Finished);
        assert!(rx.try_recv().is_err());
    }
}
