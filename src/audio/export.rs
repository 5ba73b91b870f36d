//! Offline rendering of cue buffers to WAV files.

use std::path::{Path, PathBuf};

use log::info;

use super::player::Cue;
use super::tones::ToneBank;
use crate::error::AudioError;
use crate::params::SessionConfig;

/// Write mono 16-bit PCM
pub fn write_wav(path: &Path, samples: &[i16], sample_rate_hz: u32) -> Result<(), AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate_hz,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Render the inhale, exhale and success cues for `config` into `dir`
///
/// Sweeps too short to be audible are skipped. Returns the written paths.
pub fn export_cues(
    dir: &Path,
    config: &SessionConfig,
    tones: &mut ToneBank,
) -> Result<Vec<PathBuf>, AudioError> {
    std::fs::create_dir_all(dir)?;
    let sample_rate = tones.config().sample_rate_hz;

    let cues = [
        ("inhale.wav", Cue::Inhale { duration_s: config.inhale_s }),
        ("exhale.wav", Cue::Exhale { duration_s: config.exhale_s }),
        ("success.wav", Cue::Success),
    ];

    let mut written = Vec::new();
    for (name, cue) in cues {
        let Some(samples) = tones.buffer_for(cue) else {
            info!("Skipping {} (phase too short)", name);
            continue;
        };
        let path = dir.join(name);
        write_wav(&path, &samples, sample_rate)?;
        info!("Wrote {} ({} samples)", path.display(), samples.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ToneConfig;

    fn read_wav(path: &Path) -> (hound::WavSpec, Vec<i16>) {
        let mut reader = hound::WavReader::open(path).unwrap();
        let spec = reader.spec();
        let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        (spec, samples)
    }

    #[test]
    fn test_export_default_cues() {
        let dir = tempfile::tempdir().unwrap();
        let mut tones = ToneBank::new(ToneConfig::default()).unwrap();

        let written = export_cues(dir.path(), &SessionConfig::default(), &mut tones).unwrap();
        assert_eq!(written.len(), 3);

        let (spec, inhale) = read_wav(&dir.path().join("inhale.wav"));
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(inhale.len(), 176_400);

        let (_, exhale) = read_wav(&dir.path().join("exhale.wav"));
        assert_eq!(exhale.len(), 264_600);

        // Exported data matches the buffer the player would use
        let cached = tones.buffer_for(Cue::Exhale { duration_s: 6.0 }).unwrap();
        assert_eq!(&cached[..], &exhale[..]);

        let (_, success) = read_wav(&dir.path().join("success.wav"));
        assert_eq!(success.len(), 16_758);
    }

    #[test]
    fn test_export_skips_empty_phase() {
        let dir = tempfile::tempdir().unwrap();
        let mut tones = ToneBank::new(ToneConfig::default()).unwrap();
        let config = SessionConfig {
            exhale_s: 0.0,
            ..SessionConfig::default()
        };

        let written = export_cues(dir.path(), &config, &mut tones).unwrap();
        assert_eq!(written.len(), 2);
        assert!(!dir.path().join("exhale.wav").exists());
    }
}
