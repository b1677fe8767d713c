use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::canon;
use crate::error::BackendError;
use crate::file_io::{atomic_replace, read_exact_at_offset, write_all_at_offset};
use crate::index_slot::{decode_index, encode_index, IndexSlot};
use crate::logger::DiagnosticLogger;
use crate::module_config::{ModuleConfig, TextEncoding};
use crate::registry::ReferenceSystemRegistry;
use crate::verse::{cross_versification, same_system, Verse};
use crate::versification::{Testament, Versification};

const TESTAMENTS: [Testament; 2] = [Testament::Old, Testament::New];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub installed: bool,
    pub stored: usize,
    pub empty: usize,
    pub corrupt: usize,
    /// Appends since activation.
    pub appends: u64,
    /// Aliases created since activation.
    pub aliases: u64,
    pub data_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStats {
    pub old_testament: SegmentStats,
    pub new_testament: SegmentStats,
}

struct SegmentFiles {
    idx_path: PathBuf,
    dat_path: PathBuf,
    data: File,
    data_len: u64,
    slots: Vec<IndexSlot>,
    appends: u64,
    aliases: u64,
    dirty: bool,
}

enum Segment {
    /// Neither `.idx` nor `.dat` exists: a partial install.
    Absent,
    Present(SegmentFiles),
}

struct ActiveStore {
    old: Segment,
    new: Segment,
}

impl ActiveStore {
    fn segment(&self, testament: Testament) -> &Segment {
        match testament {
            Testament::Old => &self.old,
            Testament::New => &self.new,
        }
    }

    fn segment_mut(&mut self, testament: Testament) -> &mut Segment {
        match testament {
            Testament::Old => &mut self.old,
            Testament::New => &mut self.new,
        }
    }
}

enum BackendState {
    Inactive,
    Active(ActiveStore),
}

/// Verse text stored per testament as an index file of fixed-size
/// `(offset, length)` records, one per verse, pointing into an
/// append-only data file.
///
/// Opening the files is deferred to the first access. Readers share the
/// state lock and use positioned reads; every mutation takes it
/// exclusively, which also serializes appends to the data files.
pub struct RawFileBackend {
    data_path: PathBuf,
    v11n: Arc<Versification>,
    encoding: TextEncoding,
    logger: Option<Arc<DiagnosticLogger>>,
    state: RwLock<BackendState>,
}

/// Where one verse lives: its testament and its zero-based slot.
#[derive(Debug, Clone, Copy)]
struct SlotAddress {
    testament: Testament,
    slot: usize,
}

fn segment_paths(data_path: &Path, testament: Testament) -> (PathBuf, PathBuf) {
    let name = testament.short_name();
    (
        data_path.join(format!("{}.idx", name)),
        data_path.join(format!("{}.dat", name)),
    )
}

impl RawFileBackend {
    pub fn new(data_path: impl Into<PathBuf>, v11n: Arc<Versification>) -> Self {
        RawFileBackend {
            data_path: data_path.into(),
            v11n,
            encoding: TextEncoding::default(),
            logger: None,
            state: RwLock::new(BackendState::Inactive),
        }
    }

    /// Backend for a module description, with `DataPath` resolved against
    /// the library `root` and the versification taken from `registry`.
    pub fn from_config(
        config: &ModuleConfig,
        root: &Path,
        registry: &ReferenceSystemRegistry,
    ) -> Result<Self, BackendError> {
        if !config.is_raw_files() {
            return Err(BackendError::UnsupportedDriver(config.driver.clone()));
        }
        let v11n = canon::lookup(registry, &config.versification)?;
        let mut backend = RawFileBackend::new(config.resolve_data_path(root), v11n);
        backend.encoding = config.encoding;
        Ok(backend)
    }

    pub fn with_logger(mut self, logger: Arc<DiagnosticLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn read_state(&self) -> RwLockReadGuard<'_, BackendState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, BackendState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn info(&self, message: &str, context: serde_json::Value) {
        if let Some(logger) = &self.logger {
            logger.info(message, Some(context));
        }
    }

    fn warning(&self, message: &str, context: serde_json::Value) {
        if let Some(logger) = &self.logger {
            logger.warning(message, Some(context));
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(*self.read_state(), BackendState::Active(_))
    }

    /// Open both segments now instead of on first access.
    pub fn activate(&self) -> Result<(), BackendError> {
        let mut state = self.write_state();
        self.ensure_active(&mut state)?;
        Ok(())
    }

    /// Close the files. Index changes not yet flushed are dropped.
    pub fn deactivate(&self) {
        let mut state = self.write_state();
        if let BackendState::Active(store) = &*state {
            let unflushed = TESTAMENTS.iter().any(|t| match store.segment(*t) {
                Segment::Present(files) => files.dirty,
                Segment::Absent => false,
            });
            if unflushed {
                self.warning(
                    "Deactivating with unflushed index changes",
                    json!({ "data_path": self.data_path }),
                );
            }
        }
        *state = BackendState::Inactive;
    }

    fn ensure_active<'a>(
        &self,
        state: &'a mut BackendState,
    ) -> Result<&'a mut ActiveStore, BackendError> {
        if let BackendState::Inactive = state {
            let old = self.open_segment(Testament::Old)?;
            let new = self.open_segment(Testament::New)?;
            *state = BackendState::Active(ActiveStore { old, new });
            self.info("Activated store", json!({ "data_path": self.data_path }));
        }
        match state {
            BackendState::Active(store) => Ok(store),
            BackendState::Inactive => Err(BackendError::io(
                &self.data_path,
                io::Error::new(io::ErrorKind::Other, "store failed to activate"),
            )),
        }
    }

    fn open_segment(&self, testament: Testament) -> Result<Segment, BackendError> {
        let (idx_path, dat_path) = segment_paths(&self.data_path, testament);
        match (idx_path.exists(), dat_path.exists()) {
            (false, false) => return Ok(Segment::Absent),
            (true, false) => {
                return Err(BackendError::io(
                    &dat_path,
                    io::Error::new(io::ErrorKind::NotFound, "data file missing next to index"),
                ))
            }
            (false, true) => {
                return Err(BackendError::io(
                    &idx_path,
                    io::Error::new(io::ErrorKind::NotFound, "index file missing next to data"),
                ))
            }
            (true, true) => {}
        }

        let data = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&dat_path)
            .map_err(|e| BackendError::io(&dat_path, e))?;
        let data_len = data
            .metadata()
            .map_err(|e| BackendError::io(&dat_path, e))?
            .len();
        let bytes = fs::read(&idx_path).map_err(|e| BackendError::io(&idx_path, e))?;

        let expected = self.v11n.testament_verse_count(testament) as usize;
        let (slots, extra) = decode_index(&bytes, expected, data_len);
        if extra > 0 {
            self.warning(
                "Index is longer than the versification needs",
                json!({ "index": idx_path, "extra_bytes": extra }),
            );
        }
        for (slot, entry) in slots.iter().enumerate() {
            if let IndexSlot::Corrupt { reason, .. } = entry {
                self.warning(
                    "Corrupt index slot",
                    json!({
                        "index": idx_path,
                        "slot": slot,
                        "verse": self.describe(testament, slot),
                        "reason": reason,
                    }),
                );
            }
        }

        Ok(Segment::Present(SegmentFiles {
            idx_path,
            dat_path,
            data,
            data_len,
            slots,
            appends: 0,
            aliases: 0,
            dirty: false,
        }))
    }

    fn address(&self, verse: &Verse) -> Result<SlotAddress, BackendError> {
        if !same_system(&self.v11n, verse.versification()) {
            return Err(cross_versification(&self.v11n, verse.versification()).into());
        }
        let testament = self.v11n.testament_of(verse.ordinal())?;
        let slot = self.v11n.testament_ordinal(verse.ordinal())? as usize - 1;
        Ok(SlotAddress { testament, slot })
    }

    fn describe(&self, testament: Testament, slot: usize) -> String {
        let ordinal = match testament {
            Testament::Old => slot as u32 + 1,
            Testament::New => self.v11n.testament_verse_count(Testament::Old) + slot as u32 + 1,
        };
        match Verse::from_ordinal(&self.v11n, ordinal) {
            Ok(verse) => verse.to_string(),
            Err(_) => format!("{} slot {}", testament.short_name(), slot),
        }
    }

    /// Run `read` against the active store under the shared lock,
    /// activating first when needed.
    fn with_active<R>(
        &self,
        read: impl Fn(&ActiveStore) -> Result<R, BackendError>,
    ) -> Result<R, BackendError> {
        loop {
            {
                let state = self.read_state();
                if let BackendState::Active(store) = &*state {
                    return read(store);
                }
            }
            self.activate()?;
        }
    }

    fn read_slot(files: &SegmentFiles, slot: usize, verse: &Verse) -> Result<Vec<u8>, BackendError> {
        match &files.slots[slot] {
            IndexSlot::Empty => Err(BackendError::NotFound(verse.to_string())),
            IndexSlot::Corrupt { reason, .. } => Err(BackendError::Corrupt {
                verse: verse.to_string(),
                reason: reason.clone(),
            }),
            IndexSlot::Text { offset, len } => {
                let mut buf = vec![0u8; *len as usize];
                read_exact_at_offset(&files.data, &mut buf, *offset)
                    .map_err(|e| BackendError::io(&files.dat_path, e))?;
                Ok(buf)
            }
        }
    }

    pub fn get_raw_text(&self, verse: &Verse) -> Result<Vec<u8>, BackendError> {
        let at = self.address(verse)?;
        self.with_active(|store| match store.segment(at.testament) {
            Segment::Absent => Err(BackendError::NotFound(verse.to_string())),
            Segment::Present(files) => Self::read_slot(files, at.slot, verse),
        })
    }

    /// Stored text decoded with the module encoding.
    pub fn get_text(&self, verse: &Verse) -> Result<String, BackendError> {
        let raw = self.get_raw_text(verse)?;
        match self.encoding {
            TextEncoding::Utf8 => String::from_utf8(raw).map_err(|_| BackendError::InvalidEncoding {
                verse: verse.to_string(),
                encoding: self.encoding.label().to_string(),
            }),
            TextEncoding::Latin1 => Ok(raw.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Whether text is stored for `verse`. A corrupt slot is an error.
    pub fn contains(&self, verse: &Verse) -> Result<bool, BackendError> {
        let at = self.address(verse)?;
        self.with_active(|store| match store.segment(at.testament) {
            Segment::Absent => Ok(false),
            Segment::Present(files) => match &files.slots[at.slot] {
                IndexSlot::Empty => Ok(false),
                IndexSlot::Text { .. } => Ok(true),
                IndexSlot::Corrupt { reason, .. } => Err(BackendError::Corrupt {
                    verse: verse.to_string(),
                    reason: reason.clone(),
                }),
            },
        })
    }

    fn present_mut<'a>(
        &self,
        store: &'a mut ActiveStore,
        testament: Testament,
    ) -> Result<&'a mut SegmentFiles, BackendError> {
        match store.segment_mut(testament) {
            Segment::Present(files) => Ok(files),
            Segment::Absent => Err(BackendError::MissingSegment {
                testament: testament.short_name(),
                path: self.data_path.clone(),
            }),
        }
    }

    /// Append `text` to the data file and point the verse at it. The
    /// index reaches disk on [`flush`](Self::flush).
    pub fn set_raw_text(&self, verse: &Verse, text: &[u8]) -> Result<(), BackendError> {
        let at = self.address(verse)?;
        let len = u32::try_from(text.len())
            .ok()
            .filter(|len| *len <= i32::MAX as u32)
            .ok_or_else(|| {
                BackendError::io(
                    &self.data_path,
                    io::Error::new(io::ErrorKind::InvalidInput, "text too large for an index record"),
                )
            })?;

        let mut state = self.write_state();
        let store = self.ensure_active(&mut state)?;
        let files = self.present_mut(store, at.testament)?;

        let offset = files.data_len;
        write_all_at_offset(&files.data, text, offset)
            .map_err(|e| BackendError::io(&files.dat_path, e))?;
        files.data_len += u64::from(len);
        files.slots[at.slot] = IndexSlot::Text { offset, len };
        files.appends += 1;
        files.dirty = true;
        Ok(())
    }

    /// Make `alias` share the stored text of `canonical` without writing
    /// any data.
    pub fn set_alias(&self, alias: &Verse, canonical: &Verse) -> Result<(), BackendError> {
        let to = self.address(alias)?;
        let from = self.address(canonical)?;
        if to.testament != from.testament {
            return Err(BackendError::CrossTestamentAlias {
                alias: alias.to_string(),
                canonical: canonical.to_string(),
            });
        }

        let mut state = self.write_state();
        let store = self.ensure_active(&mut state)?;
        let files = match store.segment_mut(from.testament) {
            Segment::Present(files) => files,
            Segment::Absent => return Err(BackendError::NotFound(canonical.to_string())),
        };

        let source = match &files.slots[from.slot] {
            IndexSlot::Empty => return Err(BackendError::NotFound(canonical.to_string())),
            IndexSlot::Corrupt { reason, .. } => {
                return Err(BackendError::Corrupt {
                    verse: canonical.to_string(),
                    reason: reason.clone(),
                })
            }
            text @ IndexSlot::Text { .. } => text.clone(),
        };
        files.slots[to.slot] = source;
        files.aliases += 1;
        files.dirty = true;
        Ok(())
    }

    /// Persist every changed index with one atomic replace each, then sync
    /// the data files.
    pub fn flush(&self) -> Result<(), BackendError> {
        let mut state = self.write_state();
        let BackendState::Active(store) = &mut *state else {
            return Ok(());
        };

        for testament in TESTAMENTS {
            if let Segment::Present(files) = store.segment_mut(testament) {
                if files.dirty {
                    atomic_replace(&files.idx_path, &encode_index(&files.slots))
                        .map_err(|e| BackendError::io(&files.idx_path, e))?;
                    files.dirty = false;
                }
                files
                    .data
                    .sync_all()
                    .map_err(|e| BackendError::io(&files.dat_path, e))?;
            }
        }

        drop(state);
        self.info("Flushed store", json!({ "data_path": self.data_path }));
        Ok(())
    }

    /// Lay out an empty store: one all-empty index per testament, sized
    /// by the versification, and zero-length data files. Existing
    /// contents are discarded.
    pub fn create(&self) -> Result<(), BackendError> {
        let mut state = self.write_state();
        *state = BackendState::Inactive;

        fs::create_dir_all(&self.data_path).map_err(|e| BackendError::io(&self.data_path, e))?;
        for testament in TESTAMENTS {
            let (idx_path, dat_path) = segment_paths(&self.data_path, testament);
            let slots = vec![IndexSlot::Empty; self.v11n.testament_verse_count(testament) as usize];
            atomic_replace(&idx_path, &encode_index(&slots)).map_err(|e| BackendError::io(&idx_path, e))?;
            File::create(&dat_path).map_err(|e| BackendError::io(&dat_path, e))?;
        }

        self.info(
            "Created store",
            json!({
                "data_path": self.data_path,
                "versification": self.v11n.name(),
                "verses": self.v11n.total_verse_count(),
            }),
        );
        self.ensure_active(&mut state)?;
        Ok(())
    }

    pub fn stats(&self) -> Result<BackendStats, BackendError> {
        self.with_active(|store| {
            let segment = |testament| match store.segment(testament) {
                Segment::Absent => SegmentStats::default(),
                Segment::Present(files) => {
                    let mut stats = SegmentStats {
                        installed: true,
                        appends: files.appends,
                        aliases: files.aliases,
                        data_bytes: files.data_len,
                        ..SegmentStats::default()
                    };
                    for slot in &files.slots {
                        match slot {
                            IndexSlot::Empty => stats.empty += 1,
                            IndexSlot::Text { .. } => stats.stored += 1,
                            IndexSlot::Corrupt { .. } => stats.corrupt += 1,
                        }
                    }
                    stats
                }
            };
            Ok(BackendStats {
                old_testament: segment(Testament::Old),
                new_testament: segment(Testament::New),
            })
        })
    }
}

impl std::fmt::Debug for RawFileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFileBackend")
            .field("data_path", &self.data_path)
            .field("versification", &self.v11n.name())
            .field("active", &self.is_active())
            .finish()
    }
}
