use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tree::Channel;

#[derive(Serialize)]
pub struct Manifest<'a> {
    pub generated_at: DateTime<Utc>,
    pub channel: &'a Channel,
}

pub fn write_manifest(path: &Path, channel: &Channel) -> Result<()> {
    let manifest = Manifest {
        generated_at: Utc::now(),
        channel,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
