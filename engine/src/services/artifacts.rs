//! Artifact Store
//!
//! File layout per circuit variant:
//!
//! ```text
//! <ARTIFACT_DIR>/<variant>/
//!   input.json               structured prover input
//!   proof.json               Groth16 proof (snarkjs layout)
//!   public.json              public signals (decimal strings)
//!   verification_key.json    verification key (snarkjs layout)
//!   proving_key.bin          arkworks compressed proving key
//!   opening.json             explicit opening record
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::CircuitVariant;

/// Paths of every artifact for one circuit variant
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(root: impl AsRef<Path>, variant: CircuitVariant) -> Self {
        Self {
            dir: root.as_ref().join(variant.name()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn input(&self) -> PathBuf {
        self.dir.join("input.json")
    }

    pub fn proof(&self) -> PathBuf {
        self.dir.join("proof.json")
    }

    pub fn public(&self) -> PathBuf {
        self.dir.join("public.json")
    }

    pub fn verification_key(&self) -> PathBuf {
        self.dir.join("verification_key.json")
    }

    pub fn proving_key(&self) -> PathBuf {
        self.dir.join("proving_key.bin")
    }

    pub fn opening(&self) -> PathBuf {
        self.dir.join("opening.json")
    }

    pub fn ensure_dir(&self) -> EngineResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> EngineError {
    if e.kind() == ErrorKind::NotFound {
        EngineError::MissingArtifact {
            path: path.to_path_buf(),
        }
    } else {
        EngineError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    }
}

/// Read and deserialize JSON from a file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let json = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&json).map_err(|e| EngineError::Artifact {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write JSON data to a file with pretty formatting
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> EngineResult<()> {
    let json = serde_json::to_string_pretty(data).map_err(|e| EngineError::Artifact {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    fs::write(path, json).map_err(|e| io_error(path, e))?;
    tracing::debug!(path = %path.display(), "Artifact written");
    Ok(())
}

pub fn read_bytes(path: &Path) -> EngineResult<Vec<u8>> {
    fs::read(path).map_err(|e| io_error(path, e))
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> EngineResult<()> {
    fs::write(path, bytes).map_err(|e| io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldElement;
    use crate::types::PublicSignals;

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("zk-pedersen-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_layout() {
        let paths = ArtifactPaths::new("generated", CircuitVariant::HashSum { arity: 3 });
        assert_eq!(paths.public(), PathBuf::from("generated/hash-sum/public.json"));
        assert_eq!(paths.proving_key(), PathBuf::from("generated/hash-sum/proving_key.bin"));
    }

    #[test]
    fn test_json_round_trip() {
        let root = temp_root("json");
        let paths = ArtifactPaths::new(&root, CircuitVariant::Pedersen);
        paths.ensure_dir().unwrap();

        let signals = PublicSignals(vec![FieldElement::from(11u64)]);
        write_json(&paths.public(), &signals).unwrap();
        let back: PublicSignals = read_json(&paths.public()).unwrap();
        assert_eq!(back, signals);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_missing_file_is_missing_artifact() {
        let err = read_json::<PublicSignals>(Path::new("/nonexistent/public.json")).unwrap_err();
        assert!(matches!(err, EngineError::MissingArtifact { .. }));
    }

    #[test]
    fn test_garbage_is_artifact_error() {
        let root = temp_root("garbage");
        fs::create_dir_all(&root).unwrap();
        let path = root.join("public.json");
        fs::write(&path, "not json").unwrap();

        let err = read_json::<PublicSignals>(&path).unwrap_err();
        assert!(matches!(err, EngineError::Artifact { .. }));

        fs::remove_dir_all(&root).ok();
    }
}
