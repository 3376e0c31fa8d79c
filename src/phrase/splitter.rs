//! Разбиение текста на группы слов фиксированного размера

use crate::error::{PhraseSyncError, Result};

/// Разбить текст на фразы по `group_size` слов
///
/// Слова разделяются любыми последовательностями пробельных символов,
/// последняя фраза может быть короче. Пустой текст дает пустой список.
/// `group_size == 0` - ошибка конфигурации.
pub fn split_into_phrases(text: &str, group_size: usize) -> Result<Vec<String>> {
    if group_size == 0 {
        return Err(PhraseSyncError::Configuration(
            "phrase group size must be at least 1".to_string(),
        ));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    Ok(words.chunks(group_size).map(|chunk| chunk.join(" ")).collect())
}

/// Количество слов в тексте
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
