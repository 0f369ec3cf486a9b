//! Configuration discovery and effective settings resolution.
//!
//! Modsync reads `modsync.toml|yaml|yml` from the working directory (or the
//! closest ancestor) and merges it with CLI flags.
//! Defaults:
//! - `store_root`: the directory holding the config file (or `.`)
//! - `output`: `human`
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `modsync.toml|yaml`.
pub struct ModsyncConfig {
    pub store_root: Option<String>,
    pub community: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub store_root: PathBuf,
    pub community: Option<String>,
    pub output: String,
}

/// Walk upward from `start` to find the directory holding a modsync config
/// file. Stops when a config file or a `.git` directory is found.
pub fn detect_config_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("modsync.toml").exists()
            || cur.join("modsync.yaml").exists()
            || cur.join("modsync.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(parent) => cur = parent,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ModsyncConfig` from `modsync.toml` or `modsync.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<ModsyncConfig> {
    let toml_path = root.join("modsync.toml");
    if toml_path.exists() {
        let raw = fs::read_to_string(&toml_path).ok()?;
        let cfg: ModsyncConfig = toml::from_str(&raw).ok()?;
        return Some(cfg);
    }
    for yml in ["modsync.yaml", "modsync.yml"] {
        let path = root.join(yml);
        if path.exists() {
            let raw = fs::read_to_string(&path).ok()?;
            let cfg: ModsyncConfig = serde_yaml::from_str(&raw).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_store_root: Option<&str>,
    cli_community: Option<&str>,
    cli_output: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_store_root.unwrap_or("."));
    let config_root = detect_config_root(&start);
    let cfg = load_config(&config_root).unwrap_or_default();

    let store_root = match cli_store_root {
        Some(path) => PathBuf::from(path),
        None => match cfg.store_root.as_ref() {
            Some(rel) => config_root.join(rel),
            None => config_root,
        },
    };

    let community = cli_community.map(|s| s.to_string()).or(cfg.community);

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    Effective {
        store_root,
        community,
        output,
    }
}
