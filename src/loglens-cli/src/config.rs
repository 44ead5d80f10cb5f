//! Profile store: named server endpoints with basic-auth credentials,
//! kept in a TOML file under the user's config directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One server endpoint with its credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// On-disk profile store. `default` names the profile used when no
/// `--profile` is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl ProfileStore {
    /// Path of the store file: `<config dir>/loglens/profiles.toml`.
    pub fn path() -> anyhow::Result<PathBuf> {
        let dir = dirs::config_dir().context("could not determine the user config directory")?;
        Ok(dir.join("loglens").join("profiles.toml"))
    }

    /// Load the store, or an empty one if the file does not exist yet.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Persist the store, creating the parent directory if needed.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Insert or replace a profile. The first profile ever added becomes
    /// the default; `make_default` forces it for later ones.
    pub fn upsert(&mut self, name: &str, profile: Profile, make_default: bool) {
        if make_default || self.default.is_none() {
            self.default = Some(name.to_string());
        }
        self.profiles.insert(name.to_string(), profile);
    }

    /// Remove a profile. Clears the default if it pointed at it.
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.profiles.remove(name).is_some();
        if removed && self.default.as_deref() == Some(name) {
            self.default = None;
        }
        removed
    }

    /// Resolve the profile to use: the explicit name if given, else the
    /// configured default.
    pub fn select<'a>(&'a self, name: Option<&'a str>) -> anyhow::Result<(&'a str, &'a Profile)> {
        let name = match name {
            Some(n) => n,
            None => self.default.as_deref().context(
                "no profile selected; pass --profile or set one with `loglens profile default`",
            )?,
        };
        let profile = self
            .profiles
            .get(name)
            .with_context(|| format!("unknown profile '{name}'; run `loglens profile list`"))?;
        Ok((name, profile))
    }
}
