//! Skip-status file protocol.
//!
//! The `check` stage writes [`SKIPPED_STATUS`] to the status file when no
//! build is needed; the later `build` stage reads it back and exits early.
//! Absence of the file, or any other content, means the build proceeds.
//! There is no locking: one writer, then one reader.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::decision::BuildDecision;

/// Exact file content written when the image build is skipped.
pub const SKIPPED_STATUS: &str = "Skipped";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipStatus {
    Skipped,
    Proceed,
}

impl SkipStatus {
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Write the skip marker, creating parent directories as needed.
pub fn write_skipped(path: &Path) -> Result<(), StatusError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StatusError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, SKIPPED_STATUS).map_err(|e| StatusError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Persist a decision. Only [`BuildDecision::Skip`] touches the file.
pub fn record(path: &Path, decision: BuildDecision) -> Result<(), StatusError> {
    match decision {
        BuildDecision::Skip => write_skipped(path),
        BuildDecision::Build => Ok(()),
    }
}

/// Read the status left by an earlier stage. The file is not removed.
pub fn read_status(path: &Path) -> Result<SkipStatus, StatusError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes == SKIPPED_STATUS.as_bytes() => Ok(SkipStatus::Skipped),
        Ok(_) => Ok(SkipStatus::Proceed),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no status file found");
            Ok(SkipStatus::Proceed)
        }
        Err(e) => Err(StatusError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("failed to write status file {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read status file {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
