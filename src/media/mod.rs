//! Модуль для работы с аудиоклипами сегментов
//!
//! Контроллер воспроизведения работает с аудио через трейт `AudioClip`,
//! а хост сообщает о событиях медиа (метаданные, ход времени, конец).

pub mod clip;
pub mod probe;

pub use clip::{
    AudioClip, ClipHandle, ClipTick, MediaBackend, MediaEvent, SimulatedBackend, SimulatedClip,
};
pub use probe::probe_duration;
