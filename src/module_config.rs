use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::canon;
use crate::error::ConfigError;

/// Driver name that selects [`crate::raw_file_backend::RawFileBackend`].
pub const RAW_FILES_DRIVER: &str = "RawFiles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Latin1,
}

impl TextEncoding {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "utf8" => Some(TextEncoding::Utf8),
            "latin1" | "iso88591" => Some(TextEncoding::Latin1),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "Latin-1",
        }
    }
}

/// The part of a SWORD-style `.conf` module description that the
/// backend needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    pub driver: String,
    pub data_path: String,
    pub versification: String,
    pub description: Option<String>,
    pub encoding: TextEncoding,
    /// Reported only; no codec is applied.
    pub compress_type: Option<String>,
    /// Every key/value pair in file order, repeated keys included.
    pub entries: Vec<(String, String)>,
}

impl ModuleConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut name: Option<String> = None;
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut pending: Option<(usize, String)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;

            // A trailing backslash continues the value on the next line.
            let (start_line, line) = match pending.take() {
                Some((start, mut joined)) => {
                    joined.push_str(raw.trim());
                    (start, joined)
                }
                None => (line_no, raw.trim().to_string()),
            };
            if let Some(stripped) = line.strip_suffix('\\') {
                pending = Some((start_line, stripped.to_string()));
                continue;
            }

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                let section = line
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| ConfigError::Malformed {
                        line: start_line,
                        reason: format!("bad section header {:?}", line),
                    })?;
                if name.is_some() {
                    return Err(ConfigError::Malformed {
                        line: start_line,
                        reason: "more than one module section".to_string(),
                    });
                }
                name = Some(section.to_string());
                continue;
            }

            if name.is_none() {
                return Err(ConfigError::MissingSection);
            }
            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Malformed {
                line: start_line,
                reason: format!("expected Key=Value, got {:?}", line),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::Malformed {
                    line: start_line,
                    reason: "empty key".to_string(),
                });
            }
            entries.push((key.to_string(), value.trim().to_string()));
        }

        if let Some((start, _)) = pending {
            return Err(ConfigError::Malformed {
                line: start,
                reason: "continuation at end of file".to_string(),
            });
        }

        let name = name.ok_or(ConfigError::MissingSection)?;
        let get = |key: &str| -> Option<String> {
            entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.clone())
        };

        let driver = get("ModDrv").ok_or_else(|| ConfigError::MissingKey {
            module: name.clone(),
            key: "ModDrv",
        })?;
        let data_path = get("DataPath").ok_or_else(|| ConfigError::MissingKey {
            module: name.clone(),
            key: "DataPath",
        })?;
        let encoding = match get("Encoding") {
            Some(value) => TextEncoding::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                module: name.clone(),
                key: "Encoding",
                value,
            })?,
            None => TextEncoding::default(),
        };

        Ok(ModuleConfig {
            versification: get("Versification").unwrap_or_else(|| canon::KJV.to_string()),
            description: get("Description"),
            compress_type: get("CompressType"),
            name,
            driver,
            data_path,
            encoding,
            entries,
        })
    }

    /// Every `*.conf` under `dir`, in path order.
    pub fn discover(dir: &Path) -> Result<Vec<(PathBuf, ModuleConfig)>, ConfigError> {
        let mut found = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory loop"));
                ConfigError::Io { path, source }
            })?;
            let is_conf = entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("conf"));
            if is_conf {
                found.push((entry.path().to_path_buf(), Self::load(entry.path())?));
            }
        }
        Ok(found)
    }

    /// First value of `key`, compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_raw_files(&self) -> bool {
        self.driver.eq_ignore_ascii_case(RAW_FILES_DRIVER)
    }

    /// `DataPath` resolved against the module library root.
    pub fn resolve_data_path(&self, root: &Path) -> PathBuf {
        let relative = self.data_path.trim_start_matches("./").trim_start_matches('/');
        root.join(relative)
    }
}
