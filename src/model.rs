//! Модель данных: сегменты, фразы и тайминги
//!
//! Сегменты приходят от внешнего сервиса перевода/TTS и не изменяются.
//! Фразы и тайминги являются производными данными и пересчитываются
//! целиком при любой замене сегментов или измеренных длительностей.

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::panel::PanelSide;

/// Идентификатор документа во внешнем сервисе (непрозрачный токен)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Результат перевода документа
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TranslationResult {
    /// Исходный текст
    #[serde(default)]
    pub original_text: String,
    /// Переведенный текст
    #[serde(default, alias = "full_text")]
    pub translated_text: String,
}

/// Сегмент уровня предложения с опциональной ссылкой на аудио
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    /// Переведенный текст (его озвучивает аудио)
    #[serde(default)]
    pub text: String,
    /// Текст на исходном языке
    #[serde(default)]
    pub original_text: String,
    /// Ссылка на аудио; отсутствует, если синтез для сегмента не удался
    #[serde(default, rename = "audio_path", alias = "audio_ref")]
    pub audio_ref: Option<String>,
    /// Идентификатор сегмента во внешнем сервисе
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<u64>,
    /// Ошибка синтеза, сообщенная сервисом
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Segment {
    /// Создать сегмент с аудио
    pub fn new(
        text: impl Into<String>,
        original_text: impl Into<String>,
        audio_ref: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            original_text: original_text.into(),
            audio_ref: Some(audio_ref.into()),
            ..Self::default()
        }
    }

    /// Создать сегмент без аудио
    pub fn without_audio(text: impl Into<String>, original_text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            original_text: original_text.into(),
            ..Self::default()
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio_ref.as_deref().map_or(false, |r| !r.trim().is_empty())
    }

    /// Имя аудиофайла (последний компонент пути, любые разделители)
    pub fn audio_file_name(&self) -> Option<&str> {
        let audio_ref = self.audio_ref.as_deref()?;
        audio_ref
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .filter(|name| !name.is_empty())
    }
}

/// Ответ сервиса на генерацию аудио по сегментам
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioGenerationResult {
    pub document_id: DocumentId,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub segment_type: Option<String>,
    #[serde(default)]
    pub total_segments: usize,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl AudioGenerationResult {
    /// Разобрать ответ сервиса из JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let result: Self = serde_json::from_str(json)?;
        if result.total_segments != result.segments.len() {
            log::warn!(
                "Service reported {} segments but sent {}",
                result.total_segments,
                result.segments.len()
            );
        }
        Ok(result)
    }

    /// URL аудиофайла сегмента на сервере
    pub fn audio_url(&self, base_url: &str, segment: &Segment) -> Option<String> {
        let file_name = segment.audio_file_name()?;
        Some(format!(
            "{}/tts/audio/{}/{}",
            base_url.trim_end_matches('/'),
            self.document_id,
            file_name
        ))
    }
}

/// Фраза: небольшая группа слов, единица подсветки
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// Глобальный номер фразы (совпадает с позицией в списке)
    pub id: usize,
    /// Индекс сегмента-владельца
    pub segment_index: usize,
    /// Позиция среди фраз того же сегмента
    pub phrase_index_in_segment: usize,
    /// Переведенный текст фразы (может быть пустым)
    pub translated_text: String,
    /// Исходный текст фразы (может быть пустым)
    pub original_text: String,
}

impl Phrase {
    /// Текст фразы для указанной панели
    pub fn text_for(&self, side: PanelSide) -> &str {
        match side {
            PanelSide::Original => &self.original_text,
            PanelSide::Translated => &self.translated_text,
        }
    }
}

/// Временной интервал фразы внутри аудио ее сегмента, `[start, end)` в секундах
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub phrase_index: usize,
    pub segment_index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
}

impl Timing {
    /// Попадает ли момент времени в полуоткрытый интервал
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE_RESPONSE: &str = r#"{
        "success": true,
        "document_id": "doc_42",
        "language": "es",
        "segment_type": "sentence",
        "total_segments": 2,
        "segments": [
            {
                "success": true,
                "audio_path": "output\\audio\\doc_42\\segment_0.mp3",
                "language": "es",
                "service": "gtts",
                "file_size": 1024,
                "duration": null,
                "segment_id": 0,
                "start_char": 0,
                "end_char": 12,
                "text": "Hola mundo.",
                "original_text": "Hello world."
            },
            {
                "segment_id": 1,
                "error": "gTTS error: timeout",
                "text": "Adios."
            }
        ]
    }"#;

    #[test]
    fn test_parse_service_response() {
        let result = AudioGenerationResult::from_json(SERVICE_RESPONSE).unwrap();
        assert_eq!(result.document_id, DocumentId::new("doc_42"));
        assert_eq!(result.segments.len(), 2);

        let first = &result.segments[0];
        assert!(first.has_audio());
        assert_eq!(first.original_text, "Hello world.");
        assert_eq!(first.audio_file_name(), Some("segment_0.mp3"));

        let second = &result.segments[1];
        assert!(!second.has_audio());
        assert_eq!(second.original_text, "");
        assert_eq!(second.error.as_deref(), Some("gTTS error: timeout"));
    }

    #[test]
    fn test_audio_url() {
        let result = AudioGenerationResult::from_json(SERVICE_RESPONSE).unwrap();
        let url = result.audio_url("http://localhost:5000/api/", &result.segments[0]);
        assert_eq!(
            url.as_deref(),
            Some("http://localhost:5000/api/tts/audio/doc_42/segment_0.mp3")
        );
        assert_eq!(result.audio_url("http://localhost:5000/api", &result.segments[1]), None);
    }

    #[test]
    fn test_translation_result_accepts_full_text() {
        let result: TranslationResult =
            serde_json::from_str(r#"{ "original_text": "a b", "full_text": "c d" }"#).unwrap();
        assert_eq!(result.translated_text, "c d");
    }

    #[test]
    fn test_timing_interval_is_half_open() {
        let timing = Timing {
            phrase_index: 0,
            segment_index: 0,
            start_time: 1.0,
            end_time: 2.0,
            duration: 1.0,
        };
        assert!(timing.contains(1.0));
        assert!(timing.contains(1.999));
        assert!(!timing.contains(2.0));
        assert!(!timing.contains(0.5));
    }
}
