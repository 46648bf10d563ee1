//! Chunk artifacts: one JSON object per line

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::Chunk;

/// A fully written chunk artifact waiting to replace its target.
///
/// Dropping it without [`StagedChunks::commit`] removes the temporary file and
/// leaves whatever was at the target untouched.
pub struct StagedChunks {
    tmp: NamedTempFile,
    target: PathBuf,
    count: usize,
}

impl StagedChunks {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staged file over the target
    pub fn commit(self) -> Result<PathBuf> {
        self.tmp
            .persist(&self.target)
            .map_err(|e| Error::Io(e.error))?;
        info!("wrote {} chunks to {}", self.count, self.target.display());
        Ok(self.target)
    }
}

/// Write chunks as JSONL to a temporary file next to `path`
pub fn stage_chunks<P: AsRef<Path>>(path: P, chunks: &[Chunk]) -> Result<StagedChunks> {
    let target = path.as_ref().to_path_buf();
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let tmp = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(tmp.as_file());
    for chunk in chunks {
        serde_json::to_writer(&mut writer, chunk)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    drop(writer);
    tmp.as_file().sync_all()?;

    Ok(StagedChunks {
        tmp,
        target,
        count: chunks.len(),
    })
}

/// Write chunks as JSONL, creating the parent directory if needed.
///
/// The previous artifact stays in place until the new one is complete.
pub fn write_chunks<P: AsRef<Path>>(path: P, chunks: &[Chunk]) -> Result<()> {
    stage_chunks(path, chunks)?.commit()?;
    Ok(())
}

/// Read a JSONL chunk artifact; blank lines are ignored
pub fn read_chunks<P: AsRef<Path>>(path: P) -> Result<Vec<Chunk>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::from_io(e, path))?;

    let mut chunks = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let chunk: Chunk = serde_json::from_str(&line).map_err(|e| Error::MalformedRow {
            line: idx as u64 + 1,
            reason: e.to_string(),
        })?;
        chunks.push(chunk);
    }
    Ok(chunks)
}
