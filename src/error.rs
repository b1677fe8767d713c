use std::path::PathBuf;

use crate::bible_book::BibleBook;

/// Failures resolving a book/chapter/verse or an ordinal.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("{book} {chapter}:{verse} is out of range (max {max})")]
    OutOfRange {
        book: BibleBook,
        chapter: u16,
        verse: u16,
        /// The bound that was violated: chapters in the book when the
        /// chapter is bad, verses in the chapter otherwise.
        max: u16,
    },

    #[error("ordinal {ordinal} is out of bounds (1..={max})")]
    OrdinalOutOfBounds { ordinal: u32, max: u32 },

    #[error("cannot mix versifications {left} and {right}")]
    CrossVersification { left: String, right: String },

    #[error("{book} is not part of the {versification} versification")]
    BookNotInVersification { book: BibleBook, versification: String },

    #[error("unknown versification: {0}")]
    UnknownVersification(String),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Malformed versification tables or overrides.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("{versification}: {books} books but {rows} verse tables in the {testament}")]
    TableLength {
        versification: String,
        testament: &'static str,
        books: usize,
        rows: usize,
    },

    #[error("{versification}: table for {book} must start with the 0 sentinel")]
    MissingSentinel { versification: String, book: BibleBook },

    #[error("{versification}: {book} has no chapters")]
    NoChapters { versification: String, book: BibleBook },

    #[error("{versification}: {book} {chapter} has no verses")]
    EmptyChapter {
        versification: String,
        book: BibleBook,
        chapter: u16,
    },

    #[error("{versification}: {book} is listed more than once")]
    DuplicateBook { versification: String, book: BibleBook },

    #[error("{versification}: {book} {chapter} cannot be overridden, the base has no such chapter")]
    BadOverride {
        versification: String,
        book: BibleBook,
        chapter: u16,
    },

    #[error("{versification}: too many verses for a u32 ordinal")]
    Overflow { versification: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("range end {end} comes before start {start}")]
    Inverted { start: String, end: String },

    #[error("cannot mix versifications {left} and {right}")]
    CrossVersification { left: String, right: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown book {name:?}{}", suggestion_suffix(.suggestion))]
    UnknownBook {
        name: String,
        suggestion: Option<BibleBook>,
    },

    #[error("verse out of range: {0}")]
    VerseOutOfRange(#[from] AddressError),

    #[error("malformed reference {token:?}: {reason}")]
    MalformedRange { token: String, reason: String },

    #[error("empty reference")]
    Empty,

    #[error("reference pattern failed to compile: {0}")]
    Pattern(String),
}

fn suggestion_suffix(suggestion: &Option<BibleBook>) -> String {
    match suggestion {
        Some(book) => format!(", did you mean {}?", book.name()),
        None => String::new(),
    }
}

impl From<RangeError> for ParseError {
    fn from(err: RangeError) -> Self {
        match err {
            RangeError::Inverted { start, end } => ParseError::MalformedRange {
                token: format!("{}-{}", start, end),
                reason: "range is inverted".to_string(),
            },
            RangeError::CrossVersification { left, right } => {
                ParseError::VerseOutOfRange(AddressError::CrossVersification { left, right })
            }
        }
    }
}

/// Errors from `.conf` module descriptions.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("i/o error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no [Module] section header found")]
    MissingSection,

    #[error("module {module}: required key {key} is missing")]
    MissingKey { module: String, key: &'static str },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("module {module}: {key}={value} is not supported")]
    InvalidValue {
        module: String,
        key: &'static str,
        value: String,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("no text stored for {0}")]
    NotFound(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt index slot for {verse}: {reason}")]
    Corrupt { verse: String, reason: String },

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("cannot alias {alias} to {canonical}: they are stored in different testaments")]
    CrossTestamentAlias { alias: String, canonical: String },

    #[error("the {testament} segment is not installed under {path}")]
    MissingSegment { testament: &'static str, path: PathBuf },

    #[error("unsupported module driver: {0}")]
    UnsupportedDriver(String),

    #[error("text of {verse} is not valid {encoding}")]
    InvalidEncoding { verse: String, encoding: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BackendError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BackendError::Io {
            path: path.into(),
            source,
        }
    }

    /// Only transient I/O failures are worth retrying; everything else is
    /// a property of the request or of the stored data.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Io { source, .. } => !matches!(
                source.kind(),
                std::io::ErrorKind::NotFound
                    | std::io::ErrorKind::PermissionDenied
                    | std::io::ErrorKind::InvalidInput
                    | std::io::ErrorKind::InvalidData
                    | std::io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}
