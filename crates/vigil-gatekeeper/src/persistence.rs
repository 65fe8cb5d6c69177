//! Anomaly log: one JSON object per line, rotated hourly.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::Receiver;
use tracing::{error, info};

use crate::shard::AnomalyOutput;

const WRITE_BUFFER: usize = 128 * 1024;

/// `anomalies_<YYYYMMDDHH>.jsonl` inside `dir`.
pub fn log_path(dir: &Path, hour: &str) -> PathBuf {
    dir.join(format!("anomalies_{}.jsonl", hour))
}

fn current_hour() -> String {
    chrono::Utc::now().format("%Y%m%d%H").to_string()
}

fn open_log(dir: &Path, hour: &str) -> std::io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(dir, hour))?;
    Ok(BufWriter::with_capacity(WRITE_BUFFER, file))
}

pub struct PersistenceManager;

impl PersistenceManager {
    /// Write anomalies until every sender is dropped, then flush.
    pub fn spawn(
        rx: Receiver<AnomalyOutput>,
        dir: PathBuf,
    ) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("vigil-persistence".into())
            .spawn(move || {
                let mut hour = current_hour();
                let mut writer = open_or_log(&dir, &hour);
                info!(dir = %dir.display(), "Persistence manager active.");

                while let Ok(anomaly) = rx.recv() {
                    let now_hour = current_hour();
                    if now_hour != hour {
                        if let Some(w) = writer.as_mut() {
                            let _ = w.flush();
                        }
                        hour = now_hour;
                        writer = open_or_log(&dir, &hour);
                    }

                    let Some(w) = writer.as_mut() else {
                        continue;
                    };
                    let line = match serde_json::to_string(&anomaly) {
                        Ok(line) => line,
                        Err(e) => {
                            error!(error = %e, "Failed to serialise anomaly");
                            continue;
                        }
                    };
                    if let Err(e) = writeln!(w, "{}", line) {
                        error!(error = %e, "Failed to write anomaly log");
                    }
                }

                if let Some(mut w) = writer {
                    let _ = w.flush();
                }
                info!("Persistence manager stopped.");
            })
    }
}

fn open_or_log(dir: &Path, hour: &str) -> Option<BufWriter<File>> {
    match open_log(dir, hour) {
        Ok(writer) => Some(writer),
        Err(e) => {
            error!(path = %log_path(dir, hour).display(), error = %e, "Cannot open anomaly log");
            None
        }
    }
}
