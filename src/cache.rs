use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::config_directory;
use crate::domain::ticket::TicketKind;
use crate::error::{AppError, AppResult};

const CACHE_FILE_NAME: &str = "rejected_drafts.json";
const CACHE_LIMIT: usize = 32;

#[derive(Default, Serialize, Deserialize)]
struct CacheFile {
    entries: Vec<StashedDraft>,
}

/// Form values cleared by a reset after the server rejected them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashedDraft {
    pub key: String,
    pub kind: String,
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl StashedDraft {
    pub fn kind(&self) -> Option<TicketKind> {
        match self.kind.as_str() {
            "project" => Some(TicketKind::Project),
            "support" => Some(TicketKind::Support),
            _ => None,
        }
    }

    pub fn title(&self) -> &str {
        self.values.get("title").map(String::as_str).unwrap_or("")
    }
}

pub struct DraftCache {
    file_path: PathBuf,
    file: CacheFile,
}

impl DraftCache {
    pub fn load() -> AppResult<Self> {
        Self::load_from(config_directory()?.join(CACHE_FILE_NAME))
    }

    pub fn load_from(path: PathBuf) -> AppResult<Self> {
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<CacheFile>(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid draft cache: {err}")))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => CacheFile::default(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path,
            file,
        })
    }

    pub fn entries(&self) -> &[StashedDraft] {
        &self.file.entries
    }

    /// Looks a draft up by its key or any unambiguous prefix of it.
    pub fn find(&self, key_prefix: &str) -> Option<&StashedDraft> {
        let mut matches = self
            .file
            .entries
            .iter()
            .filter(|entry| !key_prefix.is_empty() && entry.key.starts_with(key_prefix));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Some(entry),
            _ => None,
        }
    }

    /// Stores a draft, replacing an identical earlier one. Returns its key.
    pub fn stash(
        &mut self,
        kind: TicketKind,
        values: BTreeMap<String, String>,
        reason: Option<String>,
    ) -> String {
        let key = Self::compute_key(kind, &values);
        self.file.entries.retain(|entry| entry.key != key);
        self.file.entries.push(StashedDraft {
            key: key.clone(),
            kind: kind.as_str().to_string(),
            values,
            reason,
        });

        if self.file.entries.len() > CACHE_LIMIT {
            let overflow = self.file.entries.len() - CACHE_LIMIT;
            self.file.entries.drain(0..overflow);
        }
        debug!(%key, "draft stashed");
        key
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.file.entries.len();
        self.file.entries.retain(|entry| entry.key != key);
        before != self.file.entries.len()
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.file)
            .map_err(|err| AppError::Configuration(format!("failed to write draft cache: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }

    pub fn compute_key(kind: TicketKind, values: &BTreeMap<String, String>) -> String {
        let mut hasher = Hasher::new();
        hasher.update(kind.as_str().as_bytes());
        for (name, value) in values {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
            hasher.update(value.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize().to_hex().to_string()
    }
}
