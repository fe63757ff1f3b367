//! Record sinks
//!
//! A sink receives the record stream of one window and persists it. The
//! production sink writes gzip-compressed newline-delimited JSON, one file
//! per window named after the window label.

use crate::adapters::sumologic::RecordStream;
use crate::domain::{LogRecord, Result, SumoError};
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures::TryStreamExt;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Records buffered between the stream and the file writer
const WRITE_BUFFER: usize = 1024;

/// Destination for the records of one window
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Consume `records` completely and return how many were written
    ///
    /// # Errors
    ///
    /// Returns the first stream error, or an I/O error from the destination.
    async fn write(&self, label: &str, records: RecordStream<'_>) -> Result<u64>;
}

/// Writes each window to `<dir>/<label>` as gzip NDJSON
#[derive(Debug, Clone)]
pub struct GzipJsonSink {
    dir: PathBuf,
}

impl GzipJsonSink {
    /// Create the sink, creating `dir` if needed
    ///
    /// # Errors
    ///
    /// Returns [`SumoError::Configuration`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            SumoError::Configuration(format!(
                "Failed to create output directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for a window label
    pub fn path_for(&self, label: &str) -> PathBuf {
        self.dir.join(label)
    }

    /// Where a window is written before it is complete
    pub fn partial_path_for(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{label}.partial"))
    }
}

#[async_trait]
impl RecordSink for GzipJsonSink {
    async fn write(&self, label: &str, mut records: RecordStream<'_>) -> Result<u64> {
        let path = self.path_for(label);
        let partial = self.partial_path_for(label);

        // Compression and file I/O run on the blocking pool
        let (tx, rx) = mpsc::channel::<LogRecord>(WRITE_BUFFER);
        let writer = tokio::task::spawn_blocking({
            let partial = partial.clone();
            move || write_gzip(&partial, rx)
        });

        let streamed = forward(&mut records, &tx).await;
        drop(tx);
        let written = writer
            .await
            .map_err(|e| SumoError::Io(format!("Export writer for {label} failed: {e}")))?;

        match (streamed, written) {
            (Ok(()), Ok(written)) => {
                fs::rename(&partial, &path).map_err(|e| {
                    SumoError::Io(format!("Failed to move {} into place: {e}", path.display()))
                })?;
                tracing::debug!(path = %path.display(), records = written, "Wrote export file");
                Ok(written)
            }
            (Err(e), _) | (Ok(()), Err(e)) => {
                if let Err(remove) = fs::remove_file(&partial) {
                    if remove.kind() != ErrorKind::NotFound {
                        tracing::warn!(
                            path = %partial.display(),
                            error = %remove,
                            "Failed to remove incomplete export file"
                        );
                    }
                }
                Err(e)
            }
        }
    }
}

/// Hand every record to the writer until the stream ends or fails
async fn forward(records: &mut RecordStream<'_>, tx: &mpsc::Sender<LogRecord>) -> Result<()> {
    while let Some(record) = records.try_next().await? {
        if tx.send(record).await.is_err() {
            // The writer stopped early and reports its own error
            break;
        }
    }
    Ok(())
}

fn write_gzip(path: &Path, mut rx: mpsc::Receiver<LogRecord>) -> Result<u64> {
    let file = File::create(path)
        .map_err(|e| SumoError::Io(format!("Failed to create {}: {e}", path.display())))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

    let mut written: u64 = 0;
    while let Some(record) = rx.blocking_recv() {
        serde_json::to_writer(&mut encoder, &record)?;
        encoder.write_all(b"\n")?;
        written += 1;
    }

    encoder.finish()?.flush()?;
    Ok(written)
}
