//! File-backed session storage
//!
//! Each session is a single JSON document under the sessions directory, named
//! after the session id. Separate processes that share a session id see the
//! same items, the way page loads inside one browser tab share session storage.
//! Ending the session deletes the document.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::constants::{APP_ROOT_DIR, SESSION_FILE_EXTENSION, SESSIONS_DIR};
use crate::session::storage::SessionStore;

/// On-disk representation of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: BTreeMap<String, String>,
}

impl SessionDocument {
    fn new(session_id: &str) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.to_string(),
            created_at: now,
            updated_at: now,
            items: BTreeMap::new(),
        }
    }
}

/// Session storage persisted to `<sessions_dir>/<session_id>.json`
#[derive(Debug)]
pub struct FileSessionStore {
    sessions_dir: PathBuf,
    document: SessionDocument,
}

/// Validate that a session id is safe for use as a file name
fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        bail!("Session id cannot be empty");
    }

    if !session_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        bail!(
            "Invalid session id '{}': only alphanumeric, underscore, and dash are allowed",
            session_id
        );
    }

    Ok(())
}

impl FileSessionStore {
    /// Default sessions directory (`~/.storefront-search/sessions`)
    pub fn default_sessions_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .context("Failed to get home directory")?
            .join(APP_ROOT_DIR)
            .join(SESSIONS_DIR))
    }

    /// Open an existing session or start a new one
    ///
    /// Without a session id a fresh one is generated. A session document that
    /// cannot be parsed is discarded and the session starts empty.
    pub fn open(sessions_dir: Option<PathBuf>, session_id: Option<&str>) -> Result<Self> {
        let sessions_dir = match sessions_dir {
            Some(dir) => dir,
            None => Self::default_sessions_dir()?,
        };
        fs::create_dir_all(&sessions_dir).with_context(|| {
            format!(
                "Failed to create sessions directory: {}",
                sessions_dir.display()
            )
        })?;

        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().simple().to_string(),
        };
        validate_session_id(&session_id)?;

        let path = Self::document_path(&sessions_dir, &session_id);
        let document = if path.exists() {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session file: {}", path.display()))?;
            match serde_json::from_str::<SessionDocument>(&json) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!(
                        "Discarding unreadable session file {}: {}",
                        path.display(),
                        e
                    );
                    SessionDocument::new(&session_id)
                }
            }
        } else {
            tracing::debug!("Starting new session {}", session_id);
            SessionDocument::new(&session_id)
        };

        Ok(Self {
            sessions_dir,
            document,
        })
    }

    fn document_path(sessions_dir: &Path, session_id: &str) -> PathBuf {
        sessions_dir.join(format!("{session_id}.{SESSION_FILE_EXTENSION}"))
    }

    pub fn session_id(&self) -> &str {
        &self.document.session_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.document.created_at
    }

    /// Path of the session document
    pub fn path(&self) -> PathBuf {
        Self::document_path(&self.sessions_dir, &self.document.session_id)
    }

    /// Write the document through a temporary file so readers never see a partial write
    fn persist(&mut self) -> Result<()> {
        self.document.updated_at = Utc::now();
        let json = serde_json::to_string_pretty(&self.document)?;
        let path = self.path();
        let temp_path = path.with_extension(format!(
            "{SESSION_FILE_EXTENSION}.{}.tmp",
            std::process::id()
        ));
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write session file: {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace session file: {}", path.display()))?;
        Ok(())
    }

    /// End the session, deleting its document
    pub fn end(self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
        }
        tracing::info!("Ended session {}", self.document.session_id);
        Ok(())
    }

    /// Remove session documents not updated within `max_age`
    ///
    /// Returns the ids of the removed sessions. Unreadable documents are
    /// judged by their file modification time.
    pub fn prune_expired(sessions_dir: &Path, max_age: chrono::Duration) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        if !sessions_dir.exists() {
            return Ok(removed);
        }

        let cutoff = Utc::now() - max_age;
        for entry in fs::read_dir(sessions_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SESSION_FILE_EXTENSION) {
                continue;
            }

            let updated_at = fs::read_to_string(&path)
                .ok()
                .and_then(|json| serde_json::from_str::<SessionDocument>(&json).ok())
                .map(|document| document.updated_at)
                .or_else(|| {
                    entry
                        .metadata()
                        .and_then(|m| m.modified())
                        .map(DateTime::<Utc>::from)
                        .ok()
                });

            if matches!(updated_at, Some(updated_at) if updated_at < cutoff) {
                fs::remove_file(&path).with_context(|| {
                    format!("Failed to remove expired session: {}", path.display())
                })?;
                if let Some(stem) = path.file_stem() {
                    removed.push(stem.to_string_lossy().to_string());
                }
            }
        }

        Ok(removed)
    }
}

impl SessionStore for FileSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.document.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self
            .document
            .items
            .insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            // Keep memory in line with what is on disk
            match previous {
                Some(previous) => self.document.items.insert(key.to_string(), previous),
                None => self.document.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if let Some(previous) = self.document.items.remove(key) {
            if let Err(e) = self.persist() {
                self.document.items.insert(key.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }
}
