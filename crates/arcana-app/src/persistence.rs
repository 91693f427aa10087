//! Profile persistence over a string-keyed JSON store.
//!
//! Each profile field lives under its own key. Reads never fail: a missing
//! or malformed value falls back to its default and is logged.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use arcana_core::state::{OwnedUnit, Profile, TeamMember};
use arcana_core::types::{BannerId, NodeId};

pub const KEY_INVENTORY: &str = "inventory";
pub const KEY_TEAM: &str = "team";
pub const KEY_BANNER: &str = "banner";
pub const KEY_NODE: &str = "nodeId";
pub const KEY_SHARDS: &str = "shards";
pub const KEY_DAILY: &str = "daily";
pub const KEY_BACKUP: &str = "backup";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn save(&mut self, key: &str, value: Value) -> Result<(), PersistError>;
    fn load(&self, key: &str) -> Option<Value>;
}

/// Typed read of `key`, or `default` when absent or malformed.
pub fn load_or<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    let Some(value) = store.load(key) else {
        return default;
    };
    match serde_json::from_value(value) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(target: "arcana::persist", key, error = %err, "persist.malformed");
            default
        }
    }
}

fn save_typed<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    store.save(key, serde_json::to_value(value)?)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&mut self, key: &str, value: Value) -> Result<(), PersistError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn load(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn save(&mut self, key: &str, value: Value) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(key);
        let json = serde_json::to_string_pretty(&value)?;
        fs::write(&path, json).map_err(|source| PersistError::Io { path, source })
    }

    fn load(&self, key: &str) -> Option<Value> {
        let path = self.path(key);
        let json = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&json) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(
                    target: "arcana::persist",
                    path = %path.display(),
                    error = %err,
                    "persist.unreadable"
                );
                None
            }
        }
    }
}

pub fn save_profile(store: &mut dyn KeyValueStore, profile: &Profile) -> Result<(), PersistError> {
    save_typed(store, KEY_INVENTORY, &profile.inventory)?;
    save_typed(store, KEY_TEAM, &profile.team)?;
    save_typed(store, KEY_BANNER, &profile.banner)?;
    save_typed(store, KEY_NODE, &profile.node)?;
    save_typed(store, KEY_SHARDS, &profile.shards)?;
    save_typed(store, KEY_DAILY, &profile.last_daily)?;
    tracing::debug!(
        target: "arcana::persist",
        inventory = profile.inventory.len(),
        shards = profile.shards,
        "profile.saved"
    );
    Ok(())
}

/// Read every profile key, taking missing fields from `defaults`.
pub fn load_profile(store: &dyn KeyValueStore, defaults: Profile) -> Profile {
    Profile {
        inventory: load_or(store, KEY_INVENTORY, defaults.inventory),
        team: load_or(store, KEY_TEAM, defaults.team),
        banner: load_or(store, KEY_BANNER, defaults.banner),
        node: load_or(store, KEY_NODE, defaults.node),
        shards: load_or(store, KEY_SHARDS, defaults.shards),
        last_daily: load_or(store, KEY_DAILY, defaults.last_daily),
    }
}

/// Snapshot of the profile kept under the backup key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Backup {
    #[serde(default)]
    inventory: Vec<OwnedUnit>,
    #[serde(default)]
    team: Vec<TeamMember>,
    #[serde(default)]
    node_id: Option<NodeId>,
    #[serde(default, alias = "bannerId")]
    banner: Option<BannerId>,
    #[serde(default, alias = "currency")]
    shards: u32,
}

pub fn backup_profile(store: &mut dyn KeyValueStore, profile: &Profile) -> Result<(), PersistError> {
    let backup = Backup {
        inventory: profile.inventory.clone(),
        team: profile.team.clone(),
        node_id: Some(profile.node.clone()),
        banner: Some(profile.banner.clone()),
        shards: profile.shards,
    };
    save_typed(store, KEY_BACKUP, &backup)
}

/// Restore the backup over `profile`. Absent fields reset to empty, the
/// start node, the standard banner and zero shards. Returns false when no
/// backup exists.
pub fn restore_backup(store: &dyn KeyValueStore, profile: &mut Profile) -> bool {
    let Some(backup) = load_or::<Option<Backup>>(store, KEY_BACKUP, None) else {
        return false;
    };
    let defaults = Profile::default();
    profile.inventory = backup.inventory;
    profile.team = backup.team;
    profile.node = backup.node_id.unwrap_or(defaults.node);
    profile.banner = backup.banner.unwrap_or(defaults.banner);
    profile.shards = backup.shards;
    tracing::info!(target: "arcana::persist", shards = profile.shards, "profile.restored");
    true
}
