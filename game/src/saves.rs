//! Whole-game snapshots on disk.
//!
//! One JSON file per save under a single directory, named after the local
//! time it was written. The random generator travels with the state so a
//! loaded game continues the exact same sequence.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use shared::SAVE_FORMAT_VERSION;
use sim::GameState;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SAVE_DIR: &str = "saves";

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode the game state")]
    Encode(#[source] serde_json::Error),
    #[error("{path} is not a readable save file")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("save format version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("no saved games found")]
    NoSaves,
    #[error("there is no save number {0}")]
    UnknownSave(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: GameState,
    pub rng: ChaCha8Rng,
}

/// Just enough of a save to check it before decoding the rest
#[derive(Deserialize)]
struct Header {
    version: u32,
}

impl SaveData {
    pub fn new(state: GameState, rng: ChaCha8Rng) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            saved_at: Utc::now(),
            state,
            rng,
        }
    }

    pub fn encode(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(SaveError::Encode)
    }

    /// Parse a save, refusing other format versions before touching the body
    pub fn decode(text: &str, path: &Path) -> Result<Self, SaveError> {
        let decode_error = |source| SaveError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let header: Header = serde_json::from_str(text).map_err(decode_error)?;
        if header.version != SAVE_FORMAT_VERSION {
            return Err(SaveError::Version {
                found: header.version,
                expected: SAVE_FORMAT_VERSION,
            });
        }
        serde_json::from_str(text).map_err(decode_error)
    }
}

/// A save file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    pub path: PathBuf,
    /// Parsed from the file name; None for files renamed by hand
    pub written: Option<NaiveDateTime>,
    /// 1 for the first save in a second, then the `_N` suffix
    pub sequence: u32,
}

impl SaveEntry {
    pub fn label(&self) -> String {
        match self.written {
            Some(stamp) => stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self
                .path
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().into_owned()),
        }
    }
}

pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save(&self, data: &SaveData) -> Result<PathBuf, SaveError> {
        self.save_at(data, Local::now().naive_local())
    }

    fn save_at(&self, data: &SaveData, now: NaiveDateTime) -> Result<PathBuf, SaveError> {
        fs::create_dir_all(&self.dir).map_err(|source| SaveError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let stamp = now.format(STAMP_FORMAT).to_string();
        let mut path = self.dir.join(format!("save_{}.json", stamp));
        let mut n = 2;
        while path.exists() {
            path = self.dir.join(format!("save_{}_{}.json", stamp, n));
            n += 1;
        }

        let text = data.encode()?;
        fs::write(&path, text).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), day = data.state.day, "game saved");
        Ok(path)
    }

    /// Save files, newest first. A missing directory is simply empty.
    pub fn list(&self) -> Result<Vec<SaveEntry>, SaveError> {
        let reader = match fs::read_dir(&self.dir) {
            Ok(reader) => reader,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SaveError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|source| SaveError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with("save_") || !name.ends_with(".json") {
                continue;
            }
            let (written, sequence) = parse_name(&name);
            entries.push(SaveEntry {
                written,
                sequence,
                path: entry.path(),
            });
        }
        entries.sort_by(|a, b| {
            (b.written, b.sequence)
                .cmp(&(a.written, a.sequence))
                .then_with(|| b.path.cmp(&a.path))
        });
        Ok(entries)
    }

    /// Load the `index`th entry of [`SaveStore::list`]
    pub fn load(&self, index: usize) -> Result<SaveData, SaveError> {
        let entries = self.list()?;
        if entries.is_empty() {
            return Err(SaveError::NoSaves);
        }
        let entry = entries.get(index).ok_or(SaveError::UnknownSave(index + 1))?;

        let text = fs::read_to_string(&entry.path).map_err(|source| SaveError::Io {
            path: entry.path.clone(),
            source,
        })?;
        let data = SaveData::decode(&text, &entry.path)?;
        tracing::info!(path = %entry.path.display(), day = data.state.day, "game loaded");
        Ok(data)
    }
}

/// Timestamp and collision suffix of `save_<stamp>[_N].json`
fn parse_name(file_name: &str) -> (Option<NaiveDateTime>, u32) {
    let Some(body) = file_name
        .strip_prefix("save_")
        .and_then(|n| n.strip_suffix(".json"))
    else {
        return (None, 1);
    };
    let written = body
        .get(..15)
        .and_then(|stamp| NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok());
    let sequence = body
        .get(15..)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|n| n.parse().ok())
        .unwrap_or(1);
    (written, sequence)
}
