//! Persisted index: a bincode container plus a JSONL metadata sidecar
//!
//! Both files share a stem (`<stem>.idx`, `<stem>.jsonl`). The container
//! records the SHA-256 of the sidecar it was written with, so a sidecar
//! that changed or was left behind by an interrupted rebuild is rejected
//! at load time.

use ccbot_core::{Chunk, ChunkMetadata, Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::flat::FlatIndex;

pub const FORMAT_VERSION: u32 = 1;

/// The two artifact paths for a stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    pub index: PathBuf,
    pub sidecar: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(stem: P) -> Self {
        let with_ext = |ext: &str| {
            let mut s: OsString = stem.as_ref().as_os_str().to_owned();
            s.push(ext);
            PathBuf::from(s)
        };
        Self {
            index: with_ext(".idx"),
            sidecar: with_ext(".jsonl"),
        }
    }

    pub fn exist(&self) -> bool {
        self.index.exists() && self.sidecar.exists()
    }
}

/// On-disk index body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexContainer {
    pub format_version: u32,
    pub model: String,
    pub dim: usize,
    pub count: usize,
    pub texts: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
    /// Hex SHA-256 of the sidecar bytes
    pub sidecar_sha256: String,
}

/// Leading field of every container version
#[derive(Deserialize)]
struct ContainerHeader {
    format_version: u32,
}

/// One sidecar line: `{"id": i, ...metadata}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidecarLine {
    pub id: usize,
    #[serde(flatten)]
    pub metadata: ChunkMetadata,
}

/// A loaded, validated index
#[derive(Debug)]
pub struct IndexStore {
    paths: IndexPaths,
    model: String,
    texts: Vec<String>,
    metadata: Vec<ChunkMetadata>,
    index: FlatIndex,
}

fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn misaligned(msg: impl Into<String>) -> Error {
    Error::IndexAlignment(msg.into())
}

impl IndexStore {
    /// Write both artifacts for `chunks` and their `vectors`.
    ///
    /// Each file is written to a temporary file in the target directory and
    /// renamed into place only once both are fully written.
    pub fn save<P: AsRef<Path>>(
        stem: P,
        model: &str,
        chunks: &[Chunk],
        vectors: Vec<Vec<f32>>,
    ) -> Result<IndexPaths> {
        if chunks.len() != vectors.len() {
            return Err(misaligned(format!(
                "{} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }
        let dim = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(i) = vectors.iter().position(|v| v.len() != dim) {
            return Err(misaligned(format!("vector {} has a different dimension", i)));
        }

        let paths = IndexPaths::new(stem);
        let dir = paths
            .index
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        fs::create_dir_all(&dir)?;

        let mut sidecar = Vec::new();
        for (id, chunk) in chunks.iter().enumerate() {
            let line = SidecarLine {
                id,
                metadata: chunk.metadata.clone(),
            };
            serde_json::to_writer(&mut sidecar, &line)?;
            sidecar.push(b'\n');
        }

        let container = IndexContainer {
            format_version: FORMAT_VERSION,
            model: model.to_string(),
            dim,
            count: chunks.len(),
            texts: chunks.iter().map(|c| c.text.clone()).collect(),
            vectors,
            sidecar_sha256: fingerprint(&sidecar),
        };
        let encoded = bincode::serialize(&container).map_err(|e| Error::Encode(e.to_string()))?;

        let mut sidecar_tmp = NamedTempFile::new_in(&dir)?;
        sidecar_tmp.write_all(&sidecar)?;
        sidecar_tmp.as_file().sync_all()?;

        let mut index_tmp = NamedTempFile::new_in(&dir)?;
        index_tmp.write_all(&encoded)?;
        index_tmp.as_file().sync_all()?;

        sidecar_tmp
            .persist(&paths.sidecar)
            .map_err(|e| Error::Io(e.error))?;
        index_tmp
            .persist(&paths.index)
            .map_err(|e| Error::Io(e.error))?;

        info!(
            "wrote index {} ({} entries, dim {}, model {})",
            paths.index.display(),
            container.count,
            dim,
            model
        );
        Ok(paths)
    }

    /// Load and cross-check both artifacts
    pub fn load<P: AsRef<Path>>(stem: P) -> Result<Self> {
        let paths = IndexPaths::new(stem);

        let encoded = fs::read(&paths.index).map_err(|e| Error::from_io(e, &paths.index))?;
        let sidecar = fs::read(&paths.sidecar).map_err(|e| Error::from_io(e, &paths.sidecar))?;

        let header: ContainerHeader = bincode::deserialize(&encoded)
            .map_err(|e| misaligned(format!("unreadable index header: {}", e)))?;
        if header.format_version != FORMAT_VERSION {
            return Err(misaligned(format!(
                "unsupported index format version {} (expected {})",
                header.format_version, FORMAT_VERSION
            )));
        }
        let container: IndexContainer = bincode::deserialize(&encoded)
            .map_err(|e| misaligned(format!("unreadable index body: {}", e)))?;

        if fingerprint(&sidecar) != container.sidecar_sha256 {
            return Err(misaligned(format!(
                "{} does not match the sidecar recorded in {}",
                paths.sidecar.display(),
                paths.index.display()
            )));
        }

        let sidecar = String::from_utf8(sidecar)
            .map_err(|e| misaligned(format!("sidecar is not UTF-8: {}", e)))?;
        let mut metadata = Vec::with_capacity(container.count);
        for (position, line) in sidecar.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let entry: SidecarLine = serde_json::from_str(line)
                .map_err(|e| misaligned(format!("sidecar line {}: {}", position + 1, e)))?;
            if entry.id != position {
                return Err(misaligned(format!(
                    "sidecar line {} carries id {}",
                    position + 1,
                    entry.id
                )));
            }
            metadata.push(entry.metadata);
        }

        if metadata.len() != container.count
            || container.texts.len() != container.count
            || container.vectors.len() != container.count
        {
            return Err(misaligned(format!(
                "entry count {}: {} sidecar lines, {} texts, {} vectors",
                container.count,
                metadata.len(),
                container.texts.len(),
                container.vectors.len()
            )));
        }

        let index = FlatIndex::from_vectors(&container.vectors)?;
        if container.count > 0 && index.dim() != container.dim {
            return Err(misaligned(format!(
                "vectors have dimension {}, header says {}",
                index.dim(),
                container.dim
            )));
        }

        debug!(
            "loaded {} entries from {}",
            container.count,
            paths.index.display()
        );
        Ok(Self {
            paths,
            model: container.model,
            texts: container.texts,
            metadata,
            index,
        })
    }

    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// Chunk at `position`, rebuilt from the container text and sidecar
    pub fn chunk(&self, position: usize) -> Option<Chunk> {
        Some(Chunk {
            text: self.texts.get(position)?.clone(),
            metadata: self.metadata.get(position)?.clone(),
        })
    }
}
