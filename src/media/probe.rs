//! Измерение длительности аудиофайлов
//!
//! Длительность берется из параметров кодека трека по умолчанию: число
//! кадров, переведенное через временную базу (или частоту дискретизации).

use std::fs::File;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use crate::error::{PhraseSyncError, Result};

/// Длительность аудиофайла в секундах
pub fn probe_duration<P: AsRef<Path>>(path: P) -> Result<f64> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| PhraseSyncError::AudioProbe(format!("{}: {}", path.display(), e)))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| PhraseSyncError::AudioProbe(format!("{}: no audio track", path.display())))?;
    let params = &track.codec_params;

    let n_frames = params
        .n_frames
        .ok_or_else(|| {
            PhraseSyncError::AudioProbe(format!("{}: unknown frame count", path.display()))
        })?;

    let duration = if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(n_frames);
        time.seconds as f64 + time.frac
    } else if let Some(sample_rate) = params.sample_rate {
        n_frames as f64 / sample_rate as f64
    } else {
        return Err(PhraseSyncError::AudioProbe(format!(
            "{}: unknown time base",
            path.display()
        )));
    };

    log::debug!("Probed {}: {:.3}s", path.display(), duration);
    Ok(duration)
}
