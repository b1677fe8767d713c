use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::bible_book::BibleBook;
use crate::error::{AddressError, RangeError};
use crate::versification::Versification;

pub(crate) fn same_system(a: &Arc<Versification>, b: &Arc<Versification>) -> bool {
    Arc::ptr_eq(a, b) || a.is_same(b)
}

pub(crate) fn cross_versification(a: &Versification, b: &Versification) -> AddressError {
    AddressError::CrossVersification {
        left: a.name().to_string(),
        right: b.name().to_string(),
    }
}

/// A single addressed verse, bound to the versification it was resolved in.
#[derive(Clone)]
pub struct Verse {
    v11n: Arc<Versification>,
    book: BibleBook,
    chapter: u16,
    verse: u16,
    ordinal: u32,
}

impl Verse {
    pub fn new(
        v11n: &Arc<Versification>,
        book: BibleBook,
        chapter: u16,
        verse: u16,
    ) -> Result<Self, AddressError> {
        let ordinal = v11n.ordinal(book, chapter, verse)?;
        Ok(Self {
            v11n: v11n.clone(),
            book,
            chapter,
            verse,
            ordinal,
        })
    }

    pub fn from_ordinal(v11n: &Arc<Versification>, ordinal: u32) -> Result<Self, AddressError> {
        let (book, chapter, verse) = v11n.from_ordinal(ordinal)?;
        Ok(Self {
            v11n: v11n.clone(),
            book,
            chapter,
            verse,
            ordinal,
        })
    }

    /// For ordinals already checked against `v11n`.
    pub(crate) fn at(v11n: &Arc<Versification>, ordinal: u32) -> Self {
        let (book, chapter, verse) = v11n.reference_at(ordinal);
        Self {
            v11n: v11n.clone(),
            book,
            chapter,
            verse,
            ordinal,
        }
    }

    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }

    pub fn book(&self) -> BibleBook {
        self.book
    }

    pub fn chapter(&self) -> u16 {
        self.chapter
    }

    pub fn verse(&self) -> u16 {
        self.verse
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn osis_id(&self) -> String {
        format!("{}.{}.{}", self.book.osis(), self.chapter, self.verse)
    }

    pub fn try_cmp(&self, other: &Verse) -> Result<Ordering, AddressError> {
        if !same_system(&self.v11n, &other.v11n) {
            return Err(cross_versification(&self.v11n, &other.v11n));
        }
        Ok(self.ordinal.cmp(&other.ordinal))
    }
}

impl PartialEq for Verse {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal && same_system(&self.v11n, &other.v11n)
    }
}

impl Eq for Verse {}

impl PartialOrd for Verse {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl Hash for Verse {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.v11n.name().hash(state);
        self.ordinal.hash(state);
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book.osis(), self.chapter, self.verse)
    }
}

impl fmt::Debug for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Verse({} {}, #{})", self.v11n.name(), self, self.ordinal)
    }
}

/// Where a range may be cut when it is split or grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestrictionType {
    #[default]
    None,
    Chapter,
    Book,
}

impl RestrictionType {
    /// Bounds of the unit holding `ordinal`, or the whole canon for `None`.
    pub(crate) fn span(self, v11n: &Versification, ordinal: u32) -> (u32, u32) {
        match self {
            RestrictionType::None => (1, v11n.total_verse_count()),
            RestrictionType::Chapter => v11n.chapter_span(ordinal),
            RestrictionType::Book => v11n.book_span(ordinal),
        }
    }
}

/// A contiguous run of verses, `start <= end`, in one versification.
#[derive(Clone)]
pub struct VerseRange {
    v11n: Arc<Versification>,
    start: u32,
    end: u32,
}

impl VerseRange {
    pub fn new(start: &Verse, end: &Verse) -> Result<Self, RangeError> {
        if !same_system(&start.v11n, &end.v11n) {
            return Err(RangeError::CrossVersification {
                left: start.v11n.name().to_string(),
                right: end.v11n.name().to_string(),
            });
        }
        if end.ordinal < start.ordinal {
            return Err(RangeError::Inverted {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self {
            v11n: start.v11n.clone(),
            start: start.ordinal,
            end: end.ordinal,
        })
    }

    pub fn single(verse: &Verse) -> Self {
        Self {
            v11n: verse.v11n.clone(),
            start: verse.ordinal,
            end: verse.ordinal,
        }
    }

    /// Whole book, or whole chapter when `chapter` is given.
    pub fn whole(
        v11n: &Arc<Versification>,
        book: BibleBook,
        chapter: Option<u16>,
    ) -> Result<Self, AddressError> {
        let (start, end) = match chapter {
            Some(chapter) => (
                v11n.first_ordinal_in_chapter(book, chapter)?,
                v11n.last_ordinal_in_chapter(book, chapter)?,
            ),
            None => (v11n.first_ordinal_in_book(book)?, v11n.last_ordinal_in_book(book)?),
        };
        Ok(Self::from_checked(v11n, start, end))
    }

    /// Ordinals already checked against `v11n` with `start <= end`.
    pub(crate) fn from_checked(v11n: &Arc<Versification>, start: u32, end: u32) -> Self {
        debug_assert!(1 <= start && start <= end && end <= v11n.total_verse_count());
        Self {
            v11n: v11n.clone(),
            start,
            end,
        }
    }

    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }

    pub fn start(&self) -> Verse {
        Verse::at(&self.v11n, self.start)
    }

    pub fn end(&self) -> Verse {
        Verse::at(&self.v11n, self.end)
    }

    pub fn start_ordinal(&self) -> u32 {
        self.start
    }

    pub fn end_ordinal(&self) -> u32 {
        self.end
    }

    pub fn verse_count(&self) -> u32 {
        self.end - self.start + 1
    }

    fn compatible(&self, other: &VerseRange) -> bool {
        same_system(&self.v11n, &other.v11n)
    }

    pub fn contains(&self, verse: &Verse) -> bool {
        same_system(&self.v11n, &verse.v11n) && self.start <= verse.ordinal && verse.ordinal <= self.end
    }

    pub fn contains_range(&self, other: &VerseRange) -> bool {
        self.compatible(other) && self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &VerseRange) -> bool {
        self.compatible(other) && self.start <= other.end && other.start <= self.end
    }

    pub fn adjacent_to(&self, other: &VerseRange) -> bool {
        self.compatible(other) && (self.end + 1 == other.start || other.end + 1 == self.start)
    }

    /// Union of two ranges that overlap or touch.
    pub fn merge(&self, other: &VerseRange) -> Option<VerseRange> {
        if !(self.overlaps(other) || self.adjacent_to(other)) {
            return None;
        }
        Some(Self::from_checked(
            &self.v11n,
            self.start.min(other.start),
            self.end.max(other.end),
        ))
    }

    pub fn intersection(&self, other: &VerseRange) -> Option<VerseRange> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self::from_checked(
            &self.v11n,
            self.start.max(other.start),
            self.end.min(other.end),
        ))
    }

    /// `self` minus `other`: zero, one or two pieces.
    pub fn remainder(&self, other: &VerseRange) -> Vec<VerseRange> {
        if !self.overlaps(other) {
            return vec![self.clone()];
        }
        let mut pieces = Vec::with_capacity(2);
        if self.start < other.start {
            pieces.push(Self::from_checked(&self.v11n, self.start, other.start - 1));
        }
        if other.end < self.end {
            pieces.push(Self::from_checked(&self.v11n, other.end + 1, self.end));
        }
        pieces
    }

    /// Cut at every chapter or book boundary the range crosses.
    pub fn restrict(&self, restriction: RestrictionType) -> Vec<VerseRange> {
        if restriction == RestrictionType::None {
            return vec![self.clone()];
        }
        let mut pieces = Vec::new();
        let mut start = self.start;
        while start <= self.end {
            let (_, unit_end) = restriction.span(&self.v11n, start);
            let end = unit_end.min(self.end);
            pieces.push(Self::from_checked(&self.v11n, start, end));
            start = end + 1;
        }
        pieces
    }

    pub fn chapter_count(&self) -> usize {
        self.restrict(RestrictionType::Chapter).len()
    }

    pub fn book_count(&self) -> usize {
        self.restrict(RestrictionType::Book).len()
    }

    pub fn is_whole_chapter(&self) -> bool {
        self.v11n.chapter_span(self.start) == (self.start, self.end)
    }

    pub fn is_whole_book(&self) -> bool {
        self.v11n.book_span(self.start) == (self.start, self.end)
    }

    fn spans_whole(&self, unit: RestrictionType) -> bool {
        unit.span(&self.v11n, self.start).0 == self.start && unit.span(&self.v11n, self.end).1 == self.end
    }

    /// Grow by `by` verses on each side without leaving the unit that
    /// holds each end.
    pub fn blur(&self, by: u32, restriction: RestrictionType) -> VerseRange {
        let (floor, _) = restriction.span(&self.v11n, self.start);
        let (_, ceiling) = restriction.span(&self.v11n, self.end);
        let start = self.start.saturating_sub(by).max(floor);
        let end = self.end.saturating_add(by).min(ceiling);
        Self::from_checked(&self.v11n, start, end)
    }

    pub fn verses(&self) -> impl Iterator<Item = Verse> + '_ {
        (self.start..=self.end).map(move |ordinal| Verse::at(&self.v11n, ordinal))
    }

    /// `Gen.1.1-Gen.1.5`, `Gen.1-Gen.3`, `Gen`.
    pub fn osis_ref(&self) -> String {
        let start = self.start();
        let end = self.end();
        if self.spans_whole(RestrictionType::Book) {
            if start.book == end.book {
                return start.book.osis().to_string();
            }
            return format!("{}-{}", start.book.osis(), end.book.osis());
        }
        if self.spans_whole(RestrictionType::Chapter) {
            let first = format!("{}.{}", start.book.osis(), start.chapter);
            if start.book == end.book && start.chapter == end.chapter {
                return first;
            }
            return format!("{}-{}.{}", first, end.book.osis(), end.chapter);
        }
        if self.start == self.end {
            return start.osis_id();
        }
        format!("{}-{}", start.osis_id(), end.osis_id())
    }

    /// Append the shortest human form of this range given what the
    /// previous range left in context, returning the new context.
    pub(crate) fn render(&self, out: &mut String, previous: Option<RefContext>) -> RefContext {
        let start = self.start();
        let end = self.end();
        let level = if self.spans_whole(RestrictionType::Book) {
            RefLevel::Book
        } else if self.spans_whole(RestrictionType::Chapter) {
            RefLevel::Chapter
        } else {
            RefLevel::Verse
        };
        let same_book = previous.map_or(false, |p| p.book == start.book);

        match level {
            RefLevel::Book => {
                out.push_str(start.book.osis());
                if end.book != start.book {
                    out.push('-');
                    out.push_str(end.book.osis());
                }
            }
            RefLevel::Chapter => {
                let bare = same_book && previous.map_or(false, |p| p.level != RefLevel::Verse);
                if !bare {
                    out.push_str(start.book.osis());
                    out.push(' ');
                }
                out.push_str(&start.chapter.to_string());
                if end.book != start.book {
                    out.push_str(&format!("-{} {}", end.book.osis(), end.chapter));
                } else if end.chapter != start.chapter {
                    out.push_str(&format!("-{}", end.chapter));
                }
            }
            RefLevel::Verse => {
                let same_chapter = same_book
                    && previous.map_or(false, |p| p.level == RefLevel::Verse && p.chapter == start.chapter);
                if same_chapter {
                    out.push_str(&start.verse.to_string());
                } else if same_book {
                    out.push_str(&format!("{}:{}", start.chapter, start.verse));
                } else {
                    out.push_str(&format!("{} {}:{}", start.book.osis(), start.chapter, start.verse));
                }
                if end.book != start.book {
                    out.push_str(&format!("-{} {}:{}", end.book.osis(), end.chapter, end.verse));
                } else if end.chapter != start.chapter {
                    out.push_str(&format!("-{}:{}", end.chapter, end.verse));
                } else if end.verse != start.verse {
                    out.push_str(&format!("-{}", end.verse));
                }
            }
        }

        RefContext {
            book: end.book,
            chapter: end.chapter,
            level,
        }
    }
}

/// How specific the last written or parsed reference side was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefLevel {
    Book,
    Chapter,
    Verse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RefContext {
    pub(crate) book: BibleBook,
    pub(crate) chapter: u16,
    pub(crate) level: RefLevel,
}

impl PartialEq for VerseRange {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.compatible(other)
    }
}

impl Eq for VerseRange {}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, None);
        f.write_str(&out)
    }
}

impl fmt::Debug for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerseRange({} {}, #{}..=#{})", self.v11n.name(), self, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon;

    fn kjv() -> Arc<Versification> {
        Arc::new(canon::versification("KJV").unwrap())
    }

    fn verse(v11n: &Arc<Versification>, book: BibleBook, chapter: u16, verse: u16) -> Verse {
        Verse::new(v11n, book, chapter, verse).unwrap()
    }

    fn range(v11n: &Arc<Versification>, from: (BibleBook, u16, u16), to: (BibleBook, u16, u16)) -> VerseRange {
        VerseRange::new(&verse(v11n, from.0, from.1, from.2), &verse(v11n, to.0, to.1, to.2)).unwrap()
    }

    #[test]
    fn test_verse_basics() {
        let v = kjv();
        let gen = verse(&v, BibleBook::Gen, 1, 1);
        assert_eq!(gen.ordinal(), 1);
        assert_eq!(gen.osis_id(), "Gen.1.1");
        assert_eq!(gen.to_string(), "Gen 1:1");
        let rev = Verse::from_ordinal(&v, 31102).unwrap();
        assert_eq!((rev.book(), rev.chapter(), rev.verse()), (BibleBook::Rev, 22, 21));
        assert!(gen < rev);
    }

    #[test]
    fn test_verse_cross_versification() {
        let kjv = kjv();
        let nrsv = Arc::new(canon::versification("NRSV").unwrap());
        let a = verse(&kjv, BibleBook::Gen, 1, 1);
        let b = verse(&nrsv, BibleBook::Gen, 1, 1);
        assert_ne!(a, b);
        assert_eq!(a.partial_cmp(&b), None);
        assert!(matches!(a.try_cmp(&b), Err(AddressError::CrossVersification { .. })));

        let other_kjv = kjv.clone();
        assert_eq!(a, verse(&other_kjv, BibleBook::Gen, 1, 1));
        let rebuilt = Arc::new(canon::versification("KJV").unwrap());
        assert_eq!(a, verse(&rebuilt, BibleBook::Gen, 1, 1));
    }

    #[test]
    fn test_range_new_guards() {
        let kjv = kjv();
        let nrsv = Arc::new(canon::versification("NRSV").unwrap());
        let a = verse(&kjv, BibleBook::Gen, 1, 1);
        let b = verse(&nrsv, BibleBook::Gen, 1, 5);
        assert!(matches!(
            VerseRange::new(&a, &b),
            Err(RangeError::CrossVersification { .. })
        ));
        let c = verse(&kjv, BibleBook::Gen, 1, 5);
        assert!(matches!(VerseRange::new(&c, &a), Err(RangeError::Inverted { .. })));
        assert_eq!(VerseRange::new(&a, &c).unwrap().verse_count(), 5);
    }

    #[test]
    fn test_merge_overlapping_and_adjacent() {
        let v = kjv();
        let a = range(&v, (BibleBook::Gen, 1, 1), (BibleBook::Gen, 1, 5));
        let b = range(&v, (BibleBook::Gen, 1, 6), (BibleBook::Gen, 1, 9));
        let c = range(&v, (BibleBook::Gen, 1, 3), (BibleBook::Gen, 1, 7));
        let far = range(&v, (BibleBook::Gen, 1, 11), (BibleBook::Gen, 1, 12));

        let ab = a.merge(&b).unwrap();
        assert_eq!((ab.start_ordinal(), ab.end_ordinal()), (1, 9));
        assert_eq!(b.merge(&a), Some(ab));
        assert_eq!(a.merge(&c).unwrap().end_ordinal(), 7);
        assert_eq!(a.merge(&far), None);
    }

    #[test]
    fn test_intersection_and_remainder() {
        let v = kjv();
        let whole = range(&v, (BibleBook::Gen, 1, 1), (BibleBook::Gen, 1, 10));
        let middle = range(&v, (BibleBook::Gen, 1, 4), (BibleBook::Gen, 1, 6));
        assert_eq!(whole.intersection(&middle), Some(middle.clone()));

        let pieces = whole.remainder(&middle);
        assert_eq!(pieces.len(), 2);
        assert_eq!((pieces[0].start_ordinal(), pieces[0].end_ordinal()), (1, 3));
        assert_eq!((pieces[1].start_ordinal(), pieces[1].end_ordinal()), (7, 10));
        assert!(middle.remainder(&whole).is_empty());
    }

    #[test]
    fn test_restrict_splits_on_boundaries() {
        let v = kjv();
        let r = range(&v, (BibleBook::Gen, 1, 30), (BibleBook::Gen, 3, 2));
        assert_eq!(r.restrict(RestrictionType::None).len(), 1);
        let chapters = r.restrict(RestrictionType::Chapter);
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].to_string(), "Gen 1:30-31");
        assert_eq!(chapters[1].to_string(), "Gen 2");
        assert_eq!(chapters[2].to_string(), "Gen 3:1-2");
        assert_eq!(r.chapter_count(), 3);

        let books = range(&v, (BibleBook::Gen, 50, 1), (BibleBook::Exod, 1, 1));
        assert_eq!(books.book_count(), 2);
    }

    #[test]
    fn test_whole_units() {
        let v = kjv();
        let ch = VerseRange::whole(&v, BibleBook::Gen, Some(2)).unwrap();
        assert!(ch.is_whole_chapter());
        assert!(!ch.is_whole_book());
        let jude = VerseRange::whole(&v, BibleBook::Jude, None).unwrap();
        assert!(jude.is_whole_chapter());
        assert!(jude.is_whole_book());
        assert_eq!(jude.to_string(), "Jude");
    }

    #[test]
    fn test_blur_respects_restriction() {
        let v = kjv();
        let r = range(&v, (BibleBook::Gen, 1, 30), (BibleBook::Gen, 1, 31));
        assert_eq!(r.blur(3, RestrictionType::Chapter).to_string(), "Gen 1:27-31");
        assert_eq!(r.blur(3, RestrictionType::None).to_string(), "Gen 1:27-2:3");
        let first = range(&v, (BibleBook::Gen, 1, 1), (BibleBook::Gen, 1, 1));
        assert_eq!(first.blur(5, RestrictionType::None).start_ordinal(), 1);
    }

    #[test]
    fn test_display_and_osis() {
        let v = kjv();
        let r = range(&v, (BibleBook::Gen, 1, 1), (BibleBook::Gen, 1, 5));
        assert_eq!(r.to_string(), "Gen 1:1-5");
        assert_eq!(r.osis_ref(), "Gen.1.1-Gen.1.5");
        let chapters = range(&v, (BibleBook::Gen, 1, 1), (BibleBook::Gen, 3, 24));
        assert_eq!(chapters.to_string(), "Gen 1-3");
        assert_eq!(chapters.osis_ref(), "Gen.1-Gen.3");
        let cross = range(&v, (BibleBook::Gen, 50, 26), (BibleBook::Exod, 1, 2));
        assert_eq!(cross.to_string(), "Gen 50:26-Exod 1:2");
        let books = VerseRange::whole(&v, BibleBook::Gen, None)
            .unwrap()
            .merge(&VerseRange::whole(&v, BibleBook::Exod, None).unwrap())
            .unwrap();
        assert_eq!(books.to_string(), "Gen-Exod");
        assert_eq!(books.osis_ref(), "Gen-Exod");
    }

    #[test]
    fn test_verses_iterator() {
        let v = kjv();
        let r = range(&v, (BibleBook::Gen, 1, 30), (BibleBook::Gen, 2, 1));
        let ids: Vec<String> = r.verses().map(|v| v.osis_id()).collect();
        assert_eq!(ids, vec!["Gen.1.30", "Gen.1.31", "Gen.2.1"]);
    }
}
