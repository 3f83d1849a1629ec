//! Append-only line-delimited JSON log of blocks on disk (§4.3).
//!
//! One block per line; no compaction, no checkpointing, no fsync
//! discipline. A crash between writes loses at most the last mint.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::blockchain::Block;

pub struct BlockLog {
    path: PathBuf,
}

impl BlockLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BlockLog { path: path.into() }
    }

    /// Appends one canonical-JSON line. Mode 0644 on first creation.
    pub fn append(&self, block: &Block) -> io::Result<()> {
        let mut file = self.open_for_append()?;
        let line = serde_json::to_string(block)?;
        writeln!(file, "{line}")
    }

    #[cfg(unix)]
    fn open_for_append(&self) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .mode(0o644)
            .open(&self.path)
    }

    #[cfg(not(unix))]
    fn open_for_append(&self) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(&self.path)
    }

    /// Decodes the file stream-wise into an ordered chain. Returns
    /// `Ok(vec![])` if the file doesn't exist yet (§4.3: first run).
    pub fn load(&self) -> io::Result<Vec<Block>> {
        if !Path::new(&self.path).exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut blocks = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let block: Block = serde_json::from_str(&line)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            blocks.push(block);
        }
        Ok(blocks)
    }
}
