//! Frame snapshot helpers for render regression tests.
//!
//! Tests hash rendered RGBA frames and compare them against golden files.
//! Missing goldens are written on first run; `RETROCADE_UPDATE_GOLDENS=1`
//! rewrites them in place.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

pub fn update_goldens_enabled() -> bool {
    std::env::var("RETROCADE_UPDATE_GOLDENS")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, width: u32, height: u32, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            width,
            height,
            hashes,
        }
    }
}

pub fn load_golden(path: impl AsRef<Path>) -> io::Result<FrameHashGolden> {
    let raw = fs::read_to_string(path.as_ref())?;
    serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn save_golden(path: impl AsRef<Path>, golden: &FrameHashGolden) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(golden)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

/// Compare against the golden at `path`, writing it when absent or when
/// updates are enabled.
pub fn assert_or_update_golden(
    path: impl AsRef<Path>,
    golden: &FrameHashGolden,
    update: bool,
) -> io::Result<()> {
    let path = path.as_ref();

    if update || !path.exists() {
        save_golden(path, golden)?;
        eprintln!("wrote golden: {}", path.display());
        return Ok(());
    }

    let expected = load_golden(path)?;
    if expected != *golden {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "frame hashes differ from golden at {} (set RETROCADE_UPDATE_GOLDENS=1 to rewrite)",
                path.display()
            ),
        ));
    }

    Ok(())
}
