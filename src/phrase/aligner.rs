//! Выравнивание фраз исходного и переведенного текста
//!
//! Выравнивание приблизительное: i-я группа слов перевода ставится в пару
//! к i-й группе слов оригинала. Это визуальное сопоставление по позиции,
//! а не семантическое. Более короткая сторона дополняется пустыми строками.

use crate::error::Result;
use crate::model::{Phrase, Segment};
use super::splitter::split_into_phrases;

/// Построить плоский список фраз для всех сегментов
///
/// Номера фраз идут подряд через границы сегментов, начиная с нуля.
pub fn build_phrases(segments: &[Segment], group_size: usize) -> Result<Vec<Phrase>> {
    let mut phrases = Vec::new();

    for (segment_index, segment) in segments.iter().enumerate() {
        let mut translated = split_into_phrases(&segment.text, group_size)?.into_iter();
        let mut original = split_into_phrases(&segment.original_text, group_size)?.into_iter();

        let mut phrase_index_in_segment = 0;
        loop {
            let (translated_text, original_text) = match (translated.next(), original.next()) {
                (None, None) => break,
                (t, o) => (t.unwrap_or_default(), o.unwrap_or_default()),
            };

            phrases.push(Phrase {
                id: phrases.len(),
                segment_index,
                phrase_index_in_segment,
                translated_text,
                original_text,
            });
            phrase_index_in_segment += 1;
        }
    }

    log::debug!("Built {} phrases for {} segments", phrases.len(), segments.len());
    Ok(phrases)
}
