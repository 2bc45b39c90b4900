//! MP3 to PCM WAV through an external `lame` binary
//!
//! The renderer only reads PCM WAV. For MP3 input, `lame` first re-encodes the
//! file as a low-rate mono MP3 (one pass per rendered channel, the other side
//! attenuated for stereo) and then decodes it to a 16-bit WAV stream.
//! Intermediate files live in a temporary directory that is removed when the
//! returned [`TranscodedStreams`] is dropped.

use crate::{Result, WaveformError};
use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Binary looked up on `PATH` by default
pub const DEFAULT_LAME: &str = "lame";

/// Gain applied to the suppressed side when isolating one channel
const SUPPRESSED_SIDE_SCALE: &str = "0.1";

/// Which part of the source a stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPick {
    /// Full downmix
    Mono,
    /// Left channel, right attenuated
    Left,
    /// Right channel, left attenuated
    Right,
}

impl ChannelPick {
    fn file_stem(self) -> &'static str {
        match self {
            ChannelPick::Mono => "mono",
            ChannelPick::Left => "left",
            ChannelPick::Right => "right",
        }
    }
}

/// PCM WAV streams produced for one render
#[derive(Debug)]
pub struct TranscodedStreams {
    _dir: TempDir,
    paths: Vec<PathBuf>,
}

impl TranscodedStreams {
    /// WAV files in channel order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Whether `data` starts like MPEG audio (ID3v2 tag or frame sync)
pub fn looks_like_mpeg_audio(data: &[u8]) -> bool {
    match data {
        [b'I', b'D', b'3', ..] => true,
        [0xFF, second, ..] => second & 0xE0 == 0xE0,
        _ => false,
    }
}

/// Reject files that are not MPEG audio before spawning the encoder
pub fn check_mpeg_audio<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut head = Vec::with_capacity(3);
    File::open(path)
        .map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?
        .take(3)
        .read_to_end(&mut head)?;

    if looks_like_mpeg_audio(&head) {
        Ok(())
    } else {
        Err(WaveformError::Transcode(format!(
            "'{}' does not look like MPEG audio",
            path.display()
        )))
    }
}

/// Runs `lame` to produce the per-channel WAV streams
#[derive(Debug, Clone)]
pub struct LameTranscoder {
    binary: PathBuf,
}

impl Default for LameTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LameTranscoder {
    /// Use `lame` from `PATH`
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_LAME)
    }

    /// Use a specific encoder binary
    pub fn with_binary<P: Into<PathBuf>>(binary: P) -> Self {
        LameTranscoder {
            binary: binary.into(),
        }
    }

    /// Encoder binary
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Arguments of the re-encode pass
    pub fn encode_args(&self, input: &Path, output: &Path, pick: ChannelPick) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![input.into()];
        match pick {
            ChannelPick::Mono => {}
            ChannelPick::Left => args.extend(["--scale-r", SUPPRESSED_SIDE_SCALE].map(OsString::from)),
            ChannelPick::Right => args.extend(["--scale-l", SUPPRESSED_SIDE_SCALE].map(OsString::from)),
        }
        args.extend(
            ["-m", "m", "-S", "-f", "-b", "16", "--resample", "8"].map(OsString::from),
        );
        args.push(output.into());
        args
    }

    /// Arguments of the decode pass
    pub fn decode_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-S", "--decode"].map(OsString::from).to_vec();
        args.push(input.into());
        args.push(output.into());
        args
    }

    /// Produce one WAV stream (mono) or two (left, right) from an MP3 file
    pub fn transcode<P: AsRef<Path>>(&self, input: P, stereo: bool) -> Result<TranscodedStreams> {
        let input = input.as_ref();
        check_mpeg_audio(input)?;

        let dir = tempfile::Builder::new().prefix("wavepng-").tempdir()?;
        let picks: &[ChannelPick] = if stereo {
            &[ChannelPick::Left, ChannelPick::Right]
        } else {
            &[ChannelPick::Mono]
        };

        let mut paths = Vec::with_capacity(picks.len());
        for &pick in picks {
            let reencoded = dir.path().join(format!("{}.mp3", pick.file_stem()));
            let wav = dir.path().join(format!("{}.wav", pick.file_stem()));

            log::debug!("transcoding {} ({:?}) -> {}", input.display(), pick, wav.display());
            self.run(&self.encode_args(input, &reencoded, pick))?;
            self.run(&self.decode_args(&reencoded, &wav))?;
            paths.push(wav);
        }

        Ok(TranscodedStreams { _dir: dir, paths })
    }

    fn run(&self, args: &[OsString]) -> Result<()> {
        let output = Command::new(&self.binary).args(args).output().map_err(|e| {
            WaveformError::Transcode(format!(
                "failed to run '{}': {}",
                self.binary.display(),
                e
            ))
        })?;

        if !output.status.success() {
            return Err(WaveformError::Transcode(format!(
                "'{}' exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}
