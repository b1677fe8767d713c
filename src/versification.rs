use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bible_book::BibleBook;
use crate::error::{AddressError, DefinitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Testament {
    Old,
    New,
}

impl Testament {
    pub fn short_name(self) -> &'static str {
        match self {
            Testament::Old => "ot",
            Testament::New => "nt",
        }
    }
}

impl fmt::Display for Testament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Testament::Old => f.write_str("Old Testament"),
            Testament::New => f.write_str("New Testament"),
        }
    }
}

/// Replaces the verse count of one chapter when deriving a versification
/// from a base system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseCountOverride {
    pub book: BibleBook,
    pub chapter: u16,
    pub verses: u16,
}

/// A named addressing scheme: the ordered books and the verse count of
/// every chapter, with precomputed offsets so that a reference maps to a
/// dense ordinal in `1..=total_verse_count()` and back.
#[derive(Clone)]
pub struct Versification {
    name: String,
    books: Vec<BibleBook>,
    ot_book_count: usize,
    /// Per book position: `[0, verses in ch 1, verses in ch 2, ...]`.
    last_verse: Vec<Vec<u16>>,
    /// Per book position: `[book start, ordinal before ch 1 v 1, ...]`.
    chapter_starts: Vec<Vec<u32>>,
    /// Ordinal just before the first verse of each book.
    book_starts: Vec<u32>,
    positions: Vec<Option<usize>>,
    ot_verse_count: u32,
    total: u32,
}

impl Versification {
    pub fn new<R: AsRef<[u16]>>(
        name: impl Into<String>,
        books_ot: &[BibleBook],
        books_nt: &[BibleBook],
        last_verse_ot: &[R],
        last_verse_nt: &[R],
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        check_table_length(&name, "Old Testament", books_ot.len(), last_verse_ot.len())?;
        check_table_length(&name, "New Testament", books_nt.len(), last_verse_nt.len())?;

        let books: Vec<BibleBook> = books_ot.iter().chain(books_nt).copied().collect();
        let rows: Vec<Vec<u16>> = last_verse_ot
            .iter()
            .chain(last_verse_nt)
            .map(|row| row.as_ref().to_vec())
            .collect();

        Self::from_tables(name, books, books_ot.len(), rows)
    }

    /// Copy `base` under a new name, replacing individual chapter counts.
    pub fn derive(
        base: &Versification,
        name: impl Into<String>,
        overrides: &[VerseCountOverride],
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        let mut rows = base.last_verse.clone();

        for o in overrides {
            let slot = base
                .book_position(o.book)
                .and_then(|pos| rows[pos].get_mut(o.chapter as usize))
                .filter(|_| o.chapter > 0);
            match slot {
                Some(count) => *count = o.verses,
                None => {
                    return Err(DefinitionError::BadOverride {
                        versification: name,
                        book: o.book,
                        chapter: o.chapter,
                    })
                }
            }
        }

        Self::from_tables(name, base.books.clone(), base.ot_book_count, rows)
    }

    fn from_tables(
        name: String,
        books: Vec<BibleBook>,
        ot_book_count: usize,
        last_verse: Vec<Vec<u16>>,
    ) -> Result<Self, DefinitionError> {
        let mut positions = vec![None; BibleBook::COUNT];
        let mut chapter_starts = Vec::with_capacity(books.len());
        let mut book_starts = Vec::with_capacity(books.len());
        let mut ordinal: u32 = 0;
        let mut ot_verse_count = 0;

        for (pos, (book, row)) in books.iter().zip(&last_verse).enumerate() {
            if positions[book.code() as usize].replace(pos).is_some() {
                return Err(DefinitionError::DuplicateBook {
                    versification: name,
                    book: *book,
                });
            }
            match row.first() {
                Some(0) => {}
                _ => {
                    return Err(DefinitionError::MissingSentinel {
                        versification: name,
                        book: *book,
                    })
                }
            }
            if row.len() < 2 {
                return Err(DefinitionError::NoChapters {
                    versification: name,
                    book: *book,
                });
            }
            if pos == ot_book_count {
                ot_verse_count = ordinal;
            }

            book_starts.push(ordinal);
            let mut starts = Vec::with_capacity(row.len());
            starts.push(ordinal);
            for (chapter, &verses) in row.iter().enumerate().skip(1) {
                if verses == 0 {
                    return Err(DefinitionError::EmptyChapter {
                        versification: name,
                        book: *book,
                        chapter: chapter as u16,
                    });
                }
                starts.push(ordinal);
                ordinal = match ordinal.checked_add(u32::from(verses)) {
                    Some(next) => next,
                    None => return Err(DefinitionError::Overflow { versification: name }),
                };
            }
            chapter_starts.push(starts);
        }
        if ot_book_count == books.len() {
            ot_verse_count = ordinal;
        }

        Ok(Self {
            name,
            books,
            ot_book_count,
            last_verse,
            chapter_starts,
            book_starts,
            positions,
            ot_verse_count,
            total: ordinal,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Books in canonical order, Old Testament first.
    pub fn books(&self) -> &[BibleBook] {
        &self.books
    }

    pub fn books_in(&self, testament: Testament) -> &[BibleBook] {
        match testament {
            Testament::Old => &self.books[..self.ot_book_count],
            Testament::New => &self.books[self.ot_book_count..],
        }
    }

    pub fn contains_book(&self, book: BibleBook) -> bool {
        self.book_position(book).is_some()
    }

    /// Zero-based position of `book` in this system's order.
    pub fn book_position(&self, book: BibleBook) -> Option<usize> {
        self.positions[book.code() as usize]
    }

    pub fn book_testament(&self, book: BibleBook) -> Option<Testament> {
        self.book_position(book).map(|pos| {
            if pos < self.ot_book_count {
                Testament::Old
            } else {
                Testament::New
            }
        })
    }

    pub fn chapters_in_book(&self, book: BibleBook) -> u16 {
        match self.book_position(book) {
            Some(pos) => (self.last_verse[pos].len() - 1) as u16,
            None => 0,
        }
    }

    pub fn verses_in_chapter(&self, book: BibleBook, chapter: u16) -> u16 {
        if chapter == 0 {
            return 0;
        }
        self.book_position(book)
            .and_then(|pos| self.last_verse[pos].get(chapter as usize).copied())
            .unwrap_or(0)
    }

    pub fn total_verse_count(&self) -> u32 {
        self.total
    }

    pub fn testament_verse_count(&self, testament: Testament) -> u32 {
        match testament {
            Testament::Old => self.ot_verse_count,
            Testament::New => self.total - self.ot_verse_count,
        }
    }

    fn position_of(&self, book: BibleBook) -> Result<usize, AddressError> {
        self.book_position(book)
            .ok_or_else(|| AddressError::BookNotInVersification {
                book,
                versification: self.name.clone(),
            })
    }

    pub fn ordinal(&self, book: BibleBook, chapter: u16, verse: u16) -> Result<u32, AddressError> {
        let pos = self.position_of(book)?;
        let row = &self.last_verse[pos];
        let chapters = (row.len() - 1) as u16;
        if chapter == 0 || chapter > chapters {
            return Err(AddressError::OutOfRange {
                book,
                chapter,
                verse,
                max: chapters,
            });
        }
        let verses = row[chapter as usize];
        if verse == 0 || verse > verses {
            return Err(AddressError::OutOfRange {
                book,
                chapter,
                verse,
                max: verses,
            });
        }
        Ok(self.chapter_starts[pos][chapter as usize] + u32::from(verse))
    }

    pub fn validate(&self, book: BibleBook, chapter: u16, verse: u16) -> Result<(), AddressError> {
        self.ordinal(book, chapter, verse).map(|_| ())
    }

    fn check_ordinal(&self, ordinal: u32) -> Result<(), AddressError> {
        if ordinal == 0 || ordinal > self.total {
            return Err(AddressError::OrdinalOutOfBounds {
                ordinal,
                max: self.total,
            });
        }
        Ok(())
    }

    /// (book position, chapter, verse) of a checked ordinal.
    fn locate(&self, ordinal: u32) -> (usize, u16, u16) {
        let pos = self.book_starts.partition_point(|&start| start < ordinal) - 1;
        let starts = &self.chapter_starts[pos];
        let chapter = starts[1..].partition_point(|&start| start < ordinal);
        let verse = ordinal - starts[chapter];
        (pos, chapter as u16, verse as u16)
    }

    pub fn from_ordinal(&self, ordinal: u32) -> Result<(BibleBook, u16, u16), AddressError> {
        self.check_ordinal(ordinal)?;
        let (pos, chapter, verse) = self.locate(ordinal);
        Ok((self.books[pos], chapter, verse))
    }

    /// Reference of an ordinal already known to be in `1..=total`.
    pub(crate) fn reference_at(&self, ordinal: u32) -> (BibleBook, u16, u16) {
        let (pos, chapter, verse) = self.locate(ordinal);
        (self.books[pos], chapter, verse)
    }

    pub fn testament_of(&self, ordinal: u32) -> Result<Testament, AddressError> {
        self.check_ordinal(ordinal)?;
        if ordinal <= self.ot_verse_count {
            Ok(Testament::Old)
        } else {
            Ok(Testament::New)
        }
    }

    /// 1-based position of `ordinal` within its own testament.
    pub fn testament_ordinal(&self, ordinal: u32) -> Result<u32, AddressError> {
        match self.testament_of(ordinal)? {
            Testament::Old => Ok(ordinal),
            Testament::New => Ok(ordinal - self.ot_verse_count),
        }
    }

    /// Move forward by `n` verses, stopping at the last verse.
    pub fn add(&self, ordinal: u32, n: u32) -> u32 {
        ordinal.saturating_add(n).min(self.total)
    }

    /// Move back by `n` verses, stopping at the first verse.
    pub fn subtract(&self, ordinal: u32, n: u32) -> u32 {
        ordinal.saturating_sub(n).max(1).min(self.total)
    }

    /// Normalize an overflowing reference forward: Gen 1:32 becomes
    /// Gen 2:1, Gen 51:1 becomes Exod 1:1. Chapter or verse 0 is read as 1.
    /// Anything past the end of the canon clamps to its last verse.
    pub fn patch(
        &self,
        book: BibleBook,
        chapter: u16,
        verse: u16,
    ) -> Result<(BibleBook, u16, u16), AddressError> {
        let mut pos = self.position_of(book)?;
        let mut chapter = u32::from(chapter.max(1));
        let mut verse = u32::from(verse.max(1));
        let last = self.books.len() - 1;

        loop {
            let chapters = (self.last_verse[pos].len() - 1) as u32;
            if chapter <= chapters {
                break;
            }
            if pos == last {
                return self.from_ordinal(self.total);
            }
            chapter -= chapters;
            pos += 1;
        }

        loop {
            let verses = u32::from(self.last_verse[pos][chapter as usize]);
            if verse <= verses {
                break;
            }
            verse -= verses;
            chapter += 1;
            if chapter as usize >= self.last_verse[pos].len() {
                if pos == last {
                    return self.from_ordinal(self.total);
                }
                pos += 1;
                chapter = 1;
            }
        }

        Ok((self.books[pos], chapter as u16, verse as u16))
    }

    pub fn first_ordinal_in_chapter(&self, book: BibleBook, chapter: u16) -> Result<u32, AddressError> {
        self.ordinal(book, chapter, 1)
    }

    pub fn last_ordinal_in_chapter(&self, book: BibleBook, chapter: u16) -> Result<u32, AddressError> {
        let verses = self.verses_in_chapter(book, chapter);
        self.ordinal(book, chapter, verses)
    }

    pub fn first_ordinal_in_book(&self, book: BibleBook) -> Result<u32, AddressError> {
        let pos = self.position_of(book)?;
        Ok(self.book_starts[pos] + 1)
    }

    pub fn last_ordinal_in_book(&self, book: BibleBook) -> Result<u32, AddressError> {
        let pos = self.position_of(book)?;
        Ok(match self.book_starts.get(pos + 1) {
            Some(next) => *next,
            None => self.total,
        })
    }

    /// First and last ordinal of the chapter holding a valid `ordinal`.
    pub(crate) fn chapter_span(&self, ordinal: u32) -> (u32, u32) {
        let (pos, chapter, _) = self.locate(ordinal);
        let start = self.chapter_starts[pos][chapter as usize];
        let verses = u32::from(self.last_verse[pos][chapter as usize]);
        (start + 1, start + verses)
    }

    /// First and last ordinal of the book holding a valid `ordinal`.
    pub(crate) fn book_span(&self, ordinal: u32) -> (u32, u32) {
        let (pos, _, _) = self.locate(ordinal);
        let end = match self.book_starts.get(pos + 1) {
            Some(next) => *next,
            None => self.total,
        };
        (self.book_starts[pos] + 1, end)
    }

    /// Same system: equal name, book order and verse tables.
    pub fn is_same(&self, other: &Versification) -> bool {
        std::ptr::eq(self, other)
            || (self.name == other.name
                && self.ot_book_count == other.ot_book_count
                && self.books == other.books
                && self.last_verse == other.last_verse)
    }
}

fn check_table_length(
    name: &str,
    testament: &'static str,
    books: usize,
    rows: usize,
) -> Result<(), DefinitionError> {
    if books != rows {
        return Err(DefinitionError::TableLength {
            versification: name.to_string(),
            testament,
            books,
            rows,
        });
    }
    Ok(())
}

impl PartialEq for Versification {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for Versification {}

impl fmt::Debug for Versification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Versification")
            .field("name", &self.name)
            .field("books", &self.books.len())
            .field("verses", &self.total)
            .finish()
    }
}

impl fmt::Display for Versification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
