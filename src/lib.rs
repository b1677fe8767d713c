//! Verse addressing, passage arithmetic and a raw-file verse text store.
//!
//! A [`Versification`] maps every `(book, chapter, verse)` of a reference
//! system onto a dense ordinal. [`Verse`], [`VerseRange`], [`Passage`] and
//! [`PassageTally`] are built on those ordinals, and [`RawFileBackend`]
//! stores one text slot per ordinal on disk.

pub mod bible_book;
pub mod canon;
pub mod error;
mod file_io;
mod index_slot;
pub mod logger;
pub mod module_config;
pub mod passage;
pub mod passage_tally;
pub mod raw_file_backend;
pub mod reference_parser;
pub mod registry;
pub mod verse;
pub mod versification;

#[cfg(test)]
mod passage_property_tests;

pub use bible_book::BibleBook;
pub use error::{AddressError, BackendError, ConfigError, DefinitionError, ParseError, RangeError};
pub use index_slot::RECORD_SIZE;
pub use logger::{DiagnosticLogger, LogLevel};
pub use module_config::{ModuleConfig, TextEncoding};
pub use passage::Passage;
pub use passage_tally::{PassageTally, TallyOrder};
pub use raw_file_backend::{BackendStats, RawFileBackend, SegmentStats};
pub use reference_parser::ReferenceParser;
pub use registry::ReferenceSystemRegistry;
pub use verse::{RestrictionType, Verse, VerseRange};
pub use versification::{Testament, VerseCountOverride, Versification};
