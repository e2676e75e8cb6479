//! Size-based rotation of the log file

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Zoned;

use crate::logger::config::RotationPolicy;
use crate::logger::error::LoggerError;

/// Decides when the live log file rolls over and prunes old generations
pub struct RotationManager {
    policy: RotationPolicy,
}

impl RotationManager {
    pub fn new(policy: RotationPolicy) -> Self {
        Self { policy }
    }

    pub fn should_rotate(&self, current_file_size: u64) -> bool {
        current_file_size >= self.policy.max_bytes
    }

    /// Move the live file aside and drop generations beyond `keep`
    pub fn rotate(&self, current_path: &Path) -> Result<(), LoggerError> {
        if current_path.exists() {
            let rotated_path = rotated_path(current_path);
            fs::rename(current_path, &rotated_path)?;
        }
        self.cleanup_old_files(current_path)
    }

    fn cleanup_old_files(&self, base_path: &Path) -> Result<(), LoggerError> {
        let parent = match base_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let stem = base_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| LoggerError::rotation("log path has no file name"))?;
        let prefix = format!("{}.", stem);

        let mut rotated: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path != base_path
                    && path
                        .file_name()
                        .map(|name| name.to_string_lossy().starts_with(&prefix))
                        .unwrap_or(false)
            })
            .collect();

        // Oldest first
        rotated.sort_by_key(|path| fs::metadata(path).and_then(|m| m.modified()).ok());

        let excess = rotated.len().saturating_sub(self.policy.keep);
        for oldest in rotated.iter().take(excess) {
            fs::remove_file(oldest)?;
        }

        Ok(())
    }
}

/// `relay.log` becomes `relay.20260101_120000.log`
fn rotated_path(base_path: &Path) -> PathBuf {
    let timestamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();
    let stem = base_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base_path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, timestamp, ext.to_string_lossy()),
        None => format!("{}.{}", stem, timestamp),
    };

    let mut candidate = base_path.with_file_name(&name);
    // Two rotations inside the same second
    let mut n = 1;
    while candidate.exists() {
        candidate = base_path.with_file_name(format!("{}.{}", name, n));
        n += 1;
    }
    candidate
}
