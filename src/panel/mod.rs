//! Модуль текстовых панелей
//!
//! Панель - абстракция над конкретной технологией отображения: она рисует
//! фразы одного языка, подсвечивает активную фразу и сообщает положение
//! прокрутки. Логика таймингов и воспроизведения зависит только от трейта.

pub mod scroll;

use std::fmt;
use std::sync::Arc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use crate::model::Phrase;

pub use scroll::{scroll_fraction, ScrollCoupler};

/// Сторона (язык) панели
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelSide {
    /// Исходный текст
    Original,
    /// Перевод
    Translated,
}

impl PanelSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Translated => "translated",
        }
    }
}

impl fmt::Display for PanelSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Трейт текстовой панели
pub trait TextPanel: Send {
    /// Язык панели
    fn side(&self) -> PanelSide;

    /// Отрисовать фразы; фразы с пустым текстом для этой стороны пропускаются,
    /// маркеры адресуются номером фразы
    fn render(&mut self, phrases: &[Phrase]);

    /// Подсветить фразу и прокрутить ее в центр видимой области
    ///
    /// Возвращает `false`, если у фразы нет маркера в этой панели.
    fn highlight(&mut self, phrase_index: usize) -> bool;

    /// Снять все отметки подсветки
    fn clear_highlights(&mut self);

    /// Доля прокрутки `scrollTop / (scrollHeight - clientHeight)`
    fn scroll_fraction(&self) -> f64;

    /// Установить прокрутку по доле собственного диапазона
    fn set_scroll_fraction(&mut self, fraction: f64);
}

/// Пара панелей: оригинал и перевод
pub struct DualPanels {
    original: Box<dyn TextPanel>,
    translated: Box<dyn TextPanel>,
}

impl DualPanels {
    pub fn new(original: Box<dyn TextPanel>, translated: Box<dyn TextPanel>) -> Self {
        if original.side() != PanelSide::Original || translated.side() != PanelSide::Translated {
            log::warn!(
                "Panels attached in unexpected order: {} / {}",
                original.side(),
                translated.side()
            );
        }
        Self { original, translated }
    }

    pub fn render(&mut self, phrases: &[Phrase]) {
        self.original.render(phrases);
        self.translated.render(phrases);
    }

    /// Снять прежнюю подсветку и подсветить фразу в обеих панелях
    pub fn highlight(&mut self, phrase_index: usize) {
        for panel in [&mut self.original, &mut self.translated] {
            panel.clear_highlights();
            if !panel.highlight(phrase_index) {
                log::trace!("Phrase {} has no marker in {} panel", phrase_index, panel.side());
            }
        }
    }

    pub fn clear_highlights(&mut self) {
        self.original.clear_highlights();
        self.translated.clear_highlights();
    }

    /// Панель-источник прокрутки и панель, в которую она зеркалируется
    pub fn source_and_target(&mut self, source: PanelSide) -> (&dyn TextPanel, &mut dyn TextPanel) {
        match source {
            PanelSide::Original => (self.original.as_ref(), self.translated.as_mut()),
            PanelSide::Translated => (self.translated.as_ref(), self.original.as_mut()),
        }
    }
}

/// Состояние панели в памяти
#[derive(Debug, Clone)]
pub struct PanelState {
    pub side: PanelSide,
    /// Отрисованные маркеры: номер фразы и текст
    pub markers: Vec<(usize, String)>,
    /// Подсвеченная фраза
    pub active: Option<usize>,
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    /// Высота одного маркера
    pub marker_height: f64,
    /// Сколько раз панель перерисовывалась
    pub render_count: usize,
    /// История фраз, прокрученных в центр
    pub centered: Vec<usize>,
}

/// Панель без графического интерфейса
///
/// Клон разделяет состояние с оригиналом, поэтому хост может наблюдать за
/// панелью после передачи ее контроллеру.
#[derive(Debug, Clone)]
pub struct MemoryPanel {
    state: Arc<Mutex<PanelState>>,
}

impl MemoryPanel {
    pub fn new(side: PanelSide) -> Self {
        Self::with_geometry(side, 400.0, 24.0)
    }

    /// Панель с заданной высотой видимой области и высотой маркера
    pub fn with_geometry(side: PanelSide, client_height: f64, marker_height: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(PanelState {
                side,
                markers: Vec::new(),
                active: None,
                scroll_top: 0.0,
                scroll_height: client_height,
                client_height,
                marker_height,
                render_count: 0,
                centered: Vec::new(),
            })),
        }
    }

    /// Снимок состояния панели
    pub fn snapshot(&self) -> PanelState {
        self.state.lock().clone()
    }

    pub fn active(&self) -> Option<usize> {
        self.state.lock().active
    }

    pub fn scroll_top(&self) -> f64 {
        self.state.lock().scroll_top
    }

    /// Прокрутка пользователем
    pub fn scroll_to(&self, scroll_top: f64) {
        let mut state = self.state.lock();
        let max_scroll = (state.scroll_height - state.client_height).max(0.0);
        state.scroll_top = scroll_top.clamp(0.0, max_scroll);
    }
}

impl TextPanel for MemoryPanel {
    fn side(&self) -> PanelSide {
        self.state.lock().side
    }

    fn render(&mut self, phrases: &[Phrase]) {
        let mut state = self.state.lock();
        let side = state.side;
        state.markers = phrases
            .iter()
            .filter(|p| !p.text_for(side).is_empty())
            .map(|p| (p.id, p.text_for(side).to_string()))
            .collect();
        state.active = None;
        state.scroll_top = 0.0;
        state.scroll_height =
            (state.markers.len() as f64 * state.marker_height).max(state.client_height);
        state.render_count += 1;
        state.centered.clear();
    }

    fn highlight(&mut self, phrase_index: usize) -> bool {
        let mut state = self.state.lock();
        let position = match state.markers.iter().position(|(id, _)| *id == phrase_index) {
            Some(position) => position,
            None => return false,
        };

        state.active = Some(phrase_index);
        let marker_center = (position as f64 + 0.5) * state.marker_height;
        let max_scroll = (state.scroll_height - state.client_height).max(0.0);
        state.scroll_top = (marker_center - state.client_height / 2.0).clamp(0.0, max_scroll);
        state.centered.push(phrase_index);
        true
    }

    fn clear_highlights(&mut self) {
        self.state.lock().active = None;
    }

    fn scroll_fraction(&self) -> f64 {
        let state = self.state.lock();
        scroll_fraction(state.scroll_top, state.scroll_height, state.client_height)
    }

    fn set_scroll_fraction(&mut self, fraction: f64) {
        let mut state = self.state.lock();
        let max_scroll = (state.scroll_height - state.client_height).max(0.0);
        state.scroll_top = fraction.clamp(0.0, 1.0) * max_scroll;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;
    use crate::phrase::build_phrases;

    fn phrases() -> Vec<Phrase> {
        let segments = vec![
            Segment::new("one two three", "uno dos tres cuatro cinco", "0.mp3"),
            Segment::new("four five six seven eight", "seis", "1.mp3"),
        ];
        build_phrases(&segments, 4).unwrap()
    }

    #[test]
    fn test_render_skips_empty_text() {
        let mut original = MemoryPanel::new(PanelSide::Original);
        let mut translated = MemoryPanel::new(PanelSide::Translated);
        let phrases = phrases();
        original.render(&phrases);
        translated.render(&phrases);

        let ids: Vec<usize> = original.snapshot().markers.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        // Фраза 1 есть только в оригинале, фраза 3 - только в переводе
        let ids: Vec<usize> = translated.snapshot().markers.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
        assert_eq!(original.snapshot().markers[1].1, "cinco");
    }

    #[test]
    fn test_highlight_addresses_markers_by_phrase_number() {
        let mut translated = MemoryPanel::new(PanelSide::Translated);
        translated.render(&phrases());

        assert!(!translated.highlight(1));
        assert_eq!(translated.active(), None);
        assert!(translated.highlight(3));
        assert_eq!(translated.active(), Some(3));
        translated.clear_highlights();
        assert_eq!(translated.active(), None);
    }

    #[test]
    fn test_highlight_centers_marker() {
        let mut panel = MemoryPanel::with_geometry(PanelSide::Original, 100.0, 10.0);
        let segments: Vec<Segment> = (0..50)
            .map(|i| Segment::new("x", format!("w{}", i), format!("{}.mp3", i)))
            .collect();
        panel.render(&build_phrases(&segments, 4).unwrap());

        assert!(panel.highlight(20));
        // Центр маркера 20 на 205, половина видимой области 50
        assert_eq!(panel.scroll_top(), 155.0);
        assert!(panel.highlight(0));
        assert_eq!(panel.scroll_top(), 0.0);
        assert!(panel.highlight(49));
        assert_eq!(panel.scroll_top(), 400.0);
        assert_eq!(panel.snapshot().centered, vec![20, 0, 49]);
    }

    #[test]
    fn test_dual_panels_move_highlight() {
        let original = MemoryPanel::new(PanelSide::Original);
        let translated = MemoryPanel::new(PanelSide::Translated);
        let mut panels = DualPanels::new(Box::new(original.clone()), Box::new(translated.clone()));
        panels.render(&phrases());

        panels.highlight(0);
        assert_eq!(original.active(), Some(0));
        assert_eq!(translated.active(), Some(0));

        panels.highlight(1);
        assert_eq!(original.active(), Some(1));
        assert_eq!(translated.active(), None);

        panels.clear_highlights();
        assert_eq!(original.active(), None);
    }
}
