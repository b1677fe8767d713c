use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use walkdir::WalkDir;

use crate::raw_file_backend::BackendStats;

const LOG_PREFIX: &str = "session-";
const LOG_SUFFIX: &str = ".jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub session_id: String,
    pub timestamp: String,
    pub summary: ReportSummary,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub store: BackendStats,
}

/// Structured JSON-lines diagnostics shared by the backend and the CLI.
#[derive(Clone)]
pub struct DiagnosticLogger {
    log_dir: Option<PathBuf>,
    log_file: Arc<Mutex<Option<BufWriter<File>>>>,
    session_id: String,
    entries: Arc<Mutex<Vec<LogEntry>>>,
    error_count: Arc<Mutex<usize>>,
    warning_count: Arc<Mutex<usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

impl DiagnosticLogger {
    /// Log to `session-<id>.jsonl` under `log_dir`.
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let session_id = Utc::now().format("%Y%m%d-%H%M%S%.3f").to_string();
        let log_file_path = log_dir.join(format!("{}{}{}", LOG_PREFIX, session_id, LOG_SUFFIX));

        let log_file = BufWriter::new(
            File::create(&log_file_path)
                .with_context(|| format!("Failed to create log file: {:?}", log_file_path))?,
        );

        Ok(DiagnosticLogger {
            log_dir: Some(log_dir.to_path_buf()),
            log_file: Arc::new(Mutex::new(Some(log_file))),
            session_id,
            entries: Arc::new(Mutex::new(Vec::new())),
            error_count: Arc::new(Mutex::new(0)),
            warning_count: Arc::new(Mutex::new(0)),
        })
    }

    pub fn in_memory() -> Self {
        DiagnosticLogger {
            log_dir: None,
            log_file: Arc::new(Mutex::new(None)),
            session_id: Utc::now().format("%Y%m%d-%H%M%S%.3f").to_string(),
            entries: Arc::new(Mutex::new(Vec::new())),
            error_count: Arc::new(Mutex::new(0)),
            warning_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>, context: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: now(),
            level,
            message: message.into(),
            context,
        };

        match level {
            LogLevel::Error => *lock(&self.error_count) += 1,
            LogLevel::Warning => *lock(&self.warning_count) += 1,
            LogLevel::Info => {}
        }

        if let Some(ref mut file) = *lock(&self.log_file) {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", json);
            }
        }

        lock(&self.entries).push(entry);
    }

    pub fn info(&self, message: impl Into<String>, context: Option<serde_json::Value>) {
        self.log(LogLevel::Info, message, context);
    }

    pub fn warning(&self, message: impl Into<String>, context: Option<serde_json::Value>) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: impl Into<String>, context: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, context);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        lock(&self.entries).clone()
    }

    pub fn error_count(&self) -> usize {
        *lock(&self.error_count)
    }

    pub fn warning_count(&self) -> usize {
        *lock(&self.warning_count)
    }

    pub fn generate_report(&self, stats: BackendStats) -> Result<DiagnosticReport> {
        if let Some(ref mut file) = *lock(&self.log_file) {
            file.flush()
                .context("Failed to flush log file before generating report")?;
        }

        Ok(DiagnosticReport {
            session_id: self.session_id.clone(),
            timestamp: now(),
            summary: ReportSummary {
                errors: self.error_count(),
                warnings: self.warning_count(),
                store: stats,
            },
            entries: self.entries(),
        })
    }

    /// Delete all but the newest `max_sessions` session logs.
    pub fn rotate_logs(&self, max_sessions: usize) -> Result<()> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(());
        };

        let mut session_files: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
        for entry in WalkDir::new(log_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if let Some(file_name) = entry.file_name().to_str() {
                if file_name.starts_with(LOG_PREFIX) && file_name.ends_with(LOG_SUFFIX) {
                    if let Ok(metadata) = entry.metadata() {
                        if let Ok(modified) = metadata.modified() {
                            session_files.push((entry.path().to_path_buf(), modified.into()));
                        }
                    }
                }
            }
        }

        if session_files.len() > max_sessions {
            session_files.sort_by(|a, b| a.1.cmp(&b.1));

            let to_delete = session_files.len() - max_sessions;
            for (path, _) in session_files.iter().take(to_delete) {
                fs::remove_file(path)
                    .with_context(|| format!("Failed to delete old log file: {:?}", path))?;
            }
        }

        Ok(())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Drop for DiagnosticLogger {
    fn drop(&mut self) {
        if let Some(ref mut file) = *lock(&self.log_file) {
            let _ = file.flush();
        }
    }
}
