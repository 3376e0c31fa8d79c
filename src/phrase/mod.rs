//! Модуль для разбиения текста сегментов на фразы
//!
//! Фразы - единица подсветки: группы из нескольких слов, выровненные
//! между исходным и переведенным текстом.

pub mod splitter;
pub mod aligner;

pub use splitter::{split_into_phrases, word_count};
pub use aligner::build_phrases;
