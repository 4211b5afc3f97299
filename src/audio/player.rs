//! Audio output and clip playback

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, mixer::Mixer};

use crate::session::{EventQueue, GameEvent};

use super::cues::CueBank;

/// Plays gameplay cues through the default output device.
pub struct AudioPlayer {
    /// The output stream (must be kept alive).
    _stream: OutputStream,
    mixer: Mixer,
    clips: HashMap<String, Arc<[u8]>>,
    bank: CueBank,
    master_volume: f32,
}

impl AudioPlayer {
    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available.
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::from_default_device()
            .map_err(|_| AudioError::NoDevice)?
            .open_stream()
            .map_err(|_| AudioError::NoDevice)?;
        let mixer = stream.mixer().clone();

        Ok(Self {
            _stream: stream,
            mixer,
            clips: HashMap::new(),
            bank: CueBank::new(),
            master_volume: 1.0,
        })
    }

    /// Load a clip from a file and keep it under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load_clip(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), AudioError> {
        let bytes: Arc<[u8]> =
            Arc::from(fs::read(path).map_err(|e| AudioError::IoError(e.to_string()))?);
        self.load_clip_bytes(name, bytes)
    }

    /// Keep already-loaded bytes as a clip under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not decode as audio.
    pub fn load_clip_bytes(
        &mut self,
        name: impl Into<String>,
        bytes: Arc<[u8]>,
    ) -> Result<(), AudioError> {
        // Decode once up front so a bad asset fails at load time, not
        // mid-game.
        Decoder::new(Cursor::new(Arc::clone(&bytes)))
            .map_err(|e| AudioError::DecodeError(e.to_string()))?;
        self.clips.insert(name.into(), bytes);
        Ok(())
    }

    /// Register a loaded clip as a variant of a gameplay cue.
    pub fn add_cue_variant(&mut self, cue: impl Into<String>, clip: impl Into<String>) {
        self.bank.add_variant(cue, clip);
    }

    /// Set the master volume (0.0 = silent).
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.max(0.0);
    }

    /// Play every `PlaySound` event readable this frame.
    pub fn process(&mut self, events: &EventQueue, rng: &mut impl Rng) {
        for event in events.iter() {
            if let GameEvent::PlaySound { name, volume } = event {
                self.play_cue(name, *volume, rng);
            }
        }
    }

    /// Resolve and fire one cue.
    pub fn play_cue(&mut self, cue: &str, volume: f32, rng: &mut impl Rng) {
        let Some(clip) = self.bank.resolve(cue, rng) else {
            log::debug!("no clip registered for cue '{cue}'");
            return;
        };
        let Some(bytes) = self.clips.get(clip) else {
            log::warn!("cue '{cue}' resolved to unloaded clip '{clip}'");
            return;
        };

        match Decoder::new(Cursor::new(Arc::clone(bytes))) {
            Ok(source) => {
                let sink = Sink::connect_new(&self.mixer);
                sink.set_volume(volume.clamp(0.0, 1.0) * self.master_volume);
                sink.append(source);
                sink.play();
                sink.detach();
            }
            Err(e) => log::warn!("clip '{clip}' failed to decode: {e}"),
        }
    }
}

impl std::fmt::Debug for AudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPlayer")
            .field("clip_count", &self.clips.len())
            .field("master_volume", &self.master_volume)
            .finish()
    }
}

/// Errors that can occur during audio operations.
#[derive(Debug, Clone)]
pub enum AudioError {
    /// IO error reading a clip.
    IoError(String),
    /// Clip bytes did not decode as audio.
    DecodeError(String),
    /// No audio output device available.
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
            Self::NoDevice => write!(f, "No audio output device available"),
        }
    }
}

impl std::error::Error for AudioError {}
