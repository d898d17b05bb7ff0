use crate::types::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persisted mapping from blog name to feed URL, backed by a flat JSON
/// file that is rewritten in full on every mutation. The blog name is the
/// unique key; adding under an existing name overwrites the URL.
pub struct BlogRegistry {
    path: PathBuf,
    blogs: HashMap<String, String>,
}

impl BlogRegistry {
    /// Load the registry from `path`. A missing or unreadable file is not
    /// an error: the registry starts empty and the file is created on the
    /// first mutation.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let blogs = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(blogs) => blogs,
                Err(e) => {
                    warn!("Registry file {} is not valid JSON ({}), starting empty", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) => {
                debug!("Could not read registry file {} ({}), starting empty", path.display(), e);
                HashMap::new()
            }
        };

        debug!("Loaded {} blogs from {}", blogs.len(), path.display());
        Self { path, blogs }
    }

    pub fn list(&self) -> &HashMap<String, String> {
        &self.blogs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.blogs.get(name).map(|url| url.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.blogs.is_empty()
    }

    /// Insert or overwrite the entry for `name` and persist the full
    /// mapping. No URL validation happens here: a bad URL surfaces later
    /// as a fetch error. A persist failure rolls the insertion back so the
    /// in-memory map never diverges from disk.
    pub fn add(&mut self, name: &str, url: &str) -> Result<()> {
        let previous = self.blogs.insert(name.to_string(), url.to_string());

        if let Err(e) = self.persist() {
            match previous {
                Some(old_url) => {
                    self.blogs.insert(name.to_string(), old_url);
                }
                None => {
                    self.blogs.remove(name);
                }
            }
            return Err(e);
        }

        info!("Added blog '{}' -> {}", name, url);
        Ok(())
    }

    /// Delete the entry for `name` if present (a no-op otherwise) and
    /// persist. Returns whether an entry was actually removed so callers
    /// can report the no-op case. Rolls back on persist failure, like
    /// [`add`](Self::add).
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let previous = self.blogs.remove(name);

        if let Err(e) = self.persist() {
            if let Some(url) = previous {
                self.blogs.insert(name.to_string(), url);
            }
            return Err(e);
        }

        if previous.is_some() {
            info!("Removed blog '{}'", name);
        } else {
            debug!("Blog '{}' was not registered, nothing to remove", name);
        }
        Ok(previous.is_some())
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.blogs)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
