use std::{
    fs::{create_dir_all, read_to_string, write},
    path::Path,
    time::Duration,
};

use anyhow::{Context, Result};
use indicatif::ProgressStyle;
use serde::{de::DeserializeOwned, Serialize};
use ureq::{Agent, AgentBuilder};

use crate::config::Config;

pub fn agent(config: &Config) -> Agent {
    AgentBuilder::new()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}

pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {human_pos}/{human_len} {percent}% ({eta})")
        .expect("hardcoded")
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    write_file(path, output)
}

pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Loads the checkpoint at `path` if one exists (and `fresh` is not set),
/// otherwise runs `f`, which is responsible for writing it.
pub fn checkpoint<T, F>(path: &Path, fresh: bool, f: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> Result<T>,
{
    if !fresh && path.exists() {
        log::info!("Reusing {}", path.display());
        return read_json(path);
    }
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_prefers_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/value.json");
        write_json(&path, &vec![1, 2, 3]).unwrap();

        let value: Vec<u32> = checkpoint(&path, false, || panic!("should not recompute")).unwrap();
        assert_eq!(value, vec![1, 2, 3]);

        let value: Vec<u32> = checkpoint(&path, true, || Ok(vec![4])).unwrap();
        assert_eq!(value, vec![4]);
    }

    #[test]
    fn json_ends_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        write_json(&path, &["a"]).unwrap();
        assert!(read_to_string(&path).unwrap().ends_with("]\n"));
    }
}
