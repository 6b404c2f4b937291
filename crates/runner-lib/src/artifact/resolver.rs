//! Latest-artifact discovery by file modification time

use super::codec::decode_artifact;
use crate::error::{PipelineError, Result};
use crate::models::ModelArtifact;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// File name prefix of model artifacts
pub const DEFAULT_ARTIFACT_PREFIX: &str = "cars_pipe_";

/// File extension of model artifacts
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "model";

/// An artifact file eligible for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCandidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Finds and deserializes the most recent model artifact of a directory.
///
/// Candidates are files named `<prefix>*.<extension>` directly under the
/// directory. The one with the greatest modification time wins; on a tie
/// the first one in directory enumeration order is kept, which is
/// filesystem-dependent.
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    prefix: String,
    extension: String,
}

impl Default for ArtifactResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT_PREFIX, DEFAULT_ARTIFACT_EXTENSION)
    }
}

impl ArtifactResolver {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    /// Whether a file name matches `<prefix>*.<extension>`
    pub fn matches(&self, file_name: &str) -> bool {
        let suffix = format!(".{}", self.extension);
        file_name.len() >= self.prefix.len() + suffix.len()
            && file_name.starts_with(&self.prefix)
            && file_name.ends_with(&suffix)
    }

    /// List matching files with their modification times
    pub fn candidates(&self, dir: &Path) -> Result<Vec<ArtifactCandidate>> {
        let entries = fs::read_dir(dir).map_err(|e| PipelineError::NoArtifactFound {
            dir: dir.to_path_buf(),
            source: Some(e),
        })?;

        let mut candidates = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| self.matches(name))
                .unwrap_or(false);
            if !matches || !path.is_file() {
                continue;
            }

            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(modified) => candidates.push(ArtifactCandidate { path, modified }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping artifact without modification time");
                }
            }
        }

        debug!(dir = %dir.display(), count = candidates.len(), "Found model artifact candidates");
        Ok(candidates)
    }

    /// Select and deserialize the latest artifact under `dir`
    pub fn resolve(&self, dir: &Path) -> Result<ModelArtifact> {
        let candidates = self.candidates(dir)?;
        let latest = select_latest(&candidates).ok_or_else(|| PipelineError::NoArtifactFound {
            dir: dir.to_path_buf(),
            source: None,
        })?;
        self.load(latest)
    }

    /// Read and deserialize one candidate
    pub fn load(&self, candidate: &ArtifactCandidate) -> Result<ModelArtifact> {
        let path = &candidate.path;
        let corrupt = |reason: String| PipelineError::ArtifactCorrupt {
            path: path.clone(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| corrupt(format!("failed to read file: {e}")))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let predictor = decode_artifact(&bytes, base_dir).map_err(|e| corrupt(format!("{e:#}")))?;

        let artifact = ModelArtifact {
            path: path.clone(),
            modified: DateTime::<Utc>::from(candidate.modified),
            checksum: compute_checksum(&bytes),
            size_bytes: bytes.len(),
            predictor,
        };

        info!(
            path = %artifact.path.display(),
            modified = %artifact.modified.to_rfc3339(),
            checksum = %artifact.checksum,
            size = artifact.size_bytes,
            kind = artifact.predictor.kind(),
            version = ?artifact.predictor.version(),
            "Model loaded"
        );

        Ok(artifact)
    }
}

/// Candidate with the greatest modification time, first one on ties
pub fn select_latest(candidates: &[ArtifactCandidate]) -> Option<&ArtifactCandidate> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(current) if current.modified >= candidate.modified => Some(current),
        _ => Some(candidate),
    })
}

/// Compute SHA256 checksum of data
fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
