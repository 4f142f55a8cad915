//! Embedded metadata extraction using symphonia

use std::fs::File;
use std::path::Path;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, StandardTagKey, Tag};
use symphonia::core::probe::Hint;

use crate::error::LibraryResult;

/// Tags and duration read from a media container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
}

/// Probe a media file and read its embedded tags and duration
///
/// This is blocking I/O; async callers should run it on the blocking pool.
///
/// # Errors
/// Returns `LibraryError::Metadata` if the container cannot be probed and
/// `LibraryError::Io` if the file cannot be opened.
pub fn read_metadata(path: &Path) -> LibraryResult<EmbeddedMetadata> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    // Tags may live ahead of the container (e.g. ID3v2) or inside it
    let mut tags: Vec<Tag> = Vec::new();
    if let Some(metadata) = probed.metadata.get() {
        if let Some(revision) = metadata.current() {
            tags.extend(revision.tags().iter().cloned());
        }
    }
    if let Some(revision) = probed.format.metadata().current() {
        tags.extend(revision.tags().iter().cloned());
    }

    let duration = probed.format.default_track().and_then(|track| {
        let params = &track.codec_params;
        let n_frames = params.n_frames?;
        match (params.time_base, params.sample_rate) {
            (Some(time_base), _) => {
                let time = time_base.calc_time(n_frames);
                Some(time.seconds as f64 + time.frac)
            }
            (None, Some(sample_rate)) if sample_rate > 0 => {
                Some(n_frames as f64 / sample_rate as f64)
            }
            _ => None,
        }
    });

    Ok(EmbeddedMetadata {
        title: find_tag(&tags, &[StandardTagKey::TrackTitle]),
        artist: find_tag(&tags, &[StandardTagKey::Artist, StandardTagKey::AlbumArtist]),
        album: find_tag(&tags, &[StandardTagKey::Album]),
        duration,
    })
}

/// First non-empty tag value matching one of `keys`, in key order
fn find_tag(tags: &[Tag], keys: &[StandardTagKey]) -> Option<String> {
    keys.iter().find_map(|key| {
        tags.iter()
            .filter(|tag| tag.std_key == Some(*key))
            // RIFF INFO strings carry their NUL terminator and padding
            .map(|tag| {
                tag.value
                    .to_string()
                    .trim_matches(|c: char| c.is_whitespace() || c == '\0')
                    .to_string()
            })
            .find(|value| !value.is_empty())
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::LibraryError;

    /// Build a PCM WAV file: 16-bit mono at the given rate
    pub(crate) fn wav_bytes(sample_rate: u32, frames: u32) -> Vec<u8> {
        let data_len = frames * 2;
        let mut buf = Vec::with_capacity(44 + data_len as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_len).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&sample_rate.to_le_bytes());
        buf.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_len.to_le_bytes());
        buf.resize(44 + data_len as usize, 0);
        buf
    }

    /// Like `wav_bytes`, with a `LIST/INFO` chunk ahead of `data`
    pub(crate) fn tagged_wav_bytes(sample_rate: u32, frames: u32, tags: &[(&[u8; 4], &str)]) -> Vec<u8> {
        let mut info = b"INFO".to_vec();
        for (id, value) in tags {
            let mut text = value.as_bytes().to_vec();
            text.push(0);
            if text.len() % 2 == 1 {
                text.push(0);
            }
            info.extend_from_slice(*id);
            info.extend_from_slice(&(text.len() as u32).to_le_bytes());
            info.extend_from_slice(&text);
        }

        let plain = wav_bytes(sample_rate, frames);
        let (head, data) = plain.split_at(36);

        let mut buf = head.to_vec();
        buf.extend_from_slice(b"LIST");
        buf.extend_from_slice(&(info.len() as u32).to_le_bytes());
        buf.extend_from_slice(&info);
        buf.extend_from_slice(data);

        let riff_len = (buf.len() - 8) as u32;
        buf[4..8].copy_from_slice(&riff_len.to_le_bytes());
        buf
    }

    #[test]
    fn test_read_info_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.wav");
        let bytes = tagged_wav_bytes(
            8000,
            8000,
            &[
                (b"INAM", "Real Title"),
                (b"IART", "Some Artist"),
                (b"IPRD", "Some Album"),
            ],
        );
        std::fs::write(&path, bytes).unwrap();

        let metadata = read_metadata(&path).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Real Title"));
        assert_eq!(metadata.artist.as_deref(), Some("Some Artist"));
        assert_eq!(metadata.album.as_deref(), Some("Some Album"));
        assert!((metadata.duration.unwrap() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_read_wav_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        std::fs::write(&path, wav_bytes(8000, 16000)).unwrap();

        let metadata = read_metadata(&path).unwrap();
        let duration = metadata.duration.expect("duration");
        assert!((duration - 2.0).abs() < 0.01, "duration was {}", duration);
        assert_eq!(metadata.title, None);
    }

    #[test]
    fn test_read_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        std::fs::write(&path, b"this is not really audio data at all".repeat(64)).unwrap();

        let result = read_metadata(&path);
        assert!(matches!(result, Err(LibraryError::Metadata(_))), "{:?}", result);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_metadata(&dir.path().join("missing.mp3"));
        assert!(matches!(result, Err(LibraryError::Io(_))));
    }
}
