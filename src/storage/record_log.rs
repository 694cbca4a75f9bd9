//! An append-only log of length-prefixed byte records, with full-file
//! replay for crash recovery and whole-file rewrite for compaction.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A durable append-only record log, or an in-memory stand-in when no path
/// is configured (anonymous models, `in_memory_only` stores).
pub struct RecordLog {
    path: Option<PathBuf>,
    file: Option<File>,
}

impl RecordLog {
    /// Opens (creating if necessary) the log at `path`. `None` produces a
    /// purely in-memory log that is never written to disk.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(
                OpenOptions::new()
                    .create(true)
                    .read(true)
                    .append(true)
                    .open(p)
                    .map_err(|e| Error::Storage(format!("opening {}: {e}", p.display())))?,
            ),
            None => None,
        };
        Ok(RecordLog {
            path: path.map(Path::to_path_buf),
            file,
        })
    }

    /// True if this log is backed by a file on disk.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }

    /// Appends one record, flushing it to disk immediately. A record
    /// written with `append` is durable once this call returns `Ok`.
    pub fn append(&mut self, record: &[u8]) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        let len = u32::try_from(record.len())
            .map_err(|_| Error::Storage("record too large for log".to_string()))?;
        let mut w = BufWriter::new(file);
        w.write_all(&len.to_le_bytes())?;
        w.write_all(record)?;
        w.flush()?;
        w.get_ref().sync_data()?;
        Ok(())
    }

    /// Replays every well-formed record from the start of the log, in
    /// append order. A truncated final record (the tail of a write that
    /// never completed, e.g. due to a crash) is silently dropped rather
    /// than reported as corruption.
    ///
    /// # Errors
    ///
    /// Returns `Error::Corrupted` if a length prefix is read but the
    /// recorded length is absurd (exceeds the remaining file size even
    /// accounting for a plausible partial write) — this can only happen if
    /// the file was modified by something other than this log.
    pub fn replay(&self) -> Result<Vec<Vec<u8>>> {
        let Some(file) = self.file.as_ref() else {
            return Ok(Vec::new());
        };
        let mut file = file.try_clone()?;
        file.seek(SeekFrom::Start(0))?;
        let mut reader = BufReader::new(file);
        let mut records = Vec::new();
        loop {
            let mut len_buf = [0u8; 4];
            match read_exact_or_eof(&mut reader, &mut len_buf)? {
                ReadOutcome::Eof => break,
                ReadOutcome::Partial => break,
                ReadOutcome::Full => {}
            }
            let len = u32::from_le_bytes(len_buf) as usize;
            let mut buf = vec![0u8; len];
            match read_exact_or_eof(&mut reader, &mut buf)? {
                ReadOutcome::Full => records.push(buf),
                ReadOutcome::Eof | ReadOutcome::Partial => break,
            }
        }
        Ok(records)
    }

    /// Rewrites the log to contain exactly `records`, in order, discarding
    /// history. Used for model-index compaction and for node/triple-store
    /// reverse-index snapshots.
    pub fn compact<'a>(&mut self, records: impl Iterator<Item = &'a [u8]>) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let tmp_path = path.with_extension("tmp");
        {
            let tmp = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            let mut w = BufWriter::new(&tmp);
            for record in records {
                let len = u32::try_from(record.len())
                    .map_err(|_| Error::Storage("record too large for log".to_string()))?;
                w.write_all(&len.to_le_bytes())?;
                w.write_all(record)?;
            }
            w.flush()?;
            tmp.sync_all()?;
        }
        std::fs::rename(&tmp_path, path)?;
        self.file = Some(
            OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(path)?,
        );
        Ok(())
    }

    /// Deletes the backing file, if any. Used when closing an empty named
    /// model.
    pub fn delete(&mut self) -> Result<()> {
        self.file = None;
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(_) if !path.exists() => Ok(()),
                Err(e) => Err(Error::Io(e)),
            }?;
        }
        Ok(())
    }
}

enum ReadOutcome {
    Full,
    Partial,
    Eof,
}

fn read_exact_or_eof<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => {
                return Ok(if filled == 0 {
                    ReadOutcome::Eof
                } else {
                    ReadOutcome::Partial
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(ReadOutcome::Full)
}

#[cfg(test)]
#[path = "record_log_tests.rs"]
mod tests;
