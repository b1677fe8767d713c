use std::fmt;
use std::sync::Arc;

use crate::error::{ParseError, RangeError};
use crate::reference_parser::ReferenceParser;
use crate::verse::{same_system, RefContext, RestrictionType, Verse, VerseRange};
use crate::versification::Versification;

/// An ordered set of verses stored as disjoint, non-adjacent ranges sorted
/// by start. Every operation works on ranges, never on single verses.
#[derive(Clone)]
pub struct Passage {
    v11n: Arc<Versification>,
    ranges: Vec<VerseRange>,
}

impl Passage {
    pub fn new(v11n: &Arc<Versification>) -> Self {
        Self {
            v11n: v11n.clone(),
            ranges: Vec::new(),
        }
    }

    pub fn from_range(range: VerseRange) -> Self {
        Self {
            v11n: range.versification().clone(),
            ranges: vec![range],
        }
    }

    pub fn parse(text: &str, v11n: &Arc<Versification>) -> Result<Self, ParseError> {
        ReferenceParser::shared()?.parse(text, v11n)
    }

    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }

    pub fn ranges(&self) -> &[VerseRange] {
        &self.ranges
    }

    pub fn ranges_restricted(&self, restriction: RestrictionType) -> Vec<VerseRange> {
        self.ranges
            .iter()
            .flat_map(|range| range.restrict(restriction))
            .collect()
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn verse_count(&self) -> u32 {
        self.ranges.iter().map(VerseRange::verse_count).sum()
    }

    pub fn verses(&self) -> impl Iterator<Item = Verse> + '_ {
        self.ranges.iter().flat_map(|range| range.verses())
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    fn check_system(&self, v11n: &Arc<Versification>) -> Result<(), RangeError> {
        if same_system(&self.v11n, v11n) {
            return Ok(());
        }
        Err(RangeError::CrossVersification {
            left: self.v11n.name().to_string(),
            right: v11n.name().to_string(),
        })
    }

    /// Insert `range`, folding in every neighbour it overlaps or touches.
    pub fn add(&mut self, range: &VerseRange) -> Result<(), RangeError> {
        self.check_system(range.versification())?;
        self.insert(range.start_ordinal(), range.end_ordinal());
        Ok(())
    }

    /// Merge `start..=end`, ordinals of this passage's own versification.
    pub(crate) fn insert(&mut self, start: u32, end: u32) {
        let lo = self.ranges.partition_point(|r| r.end_ordinal() + 1 < start);
        let mut hi = lo;
        let (mut start, mut end) = (start, end);
        while hi < self.ranges.len() && self.ranges[hi].start_ordinal() <= end + 1 {
            start = start.min(self.ranges[hi].start_ordinal());
            end = end.max(self.ranges[hi].end_ordinal());
            hi += 1;
        }

        let merged = VerseRange::from_checked(&self.v11n, start, end);
        self.ranges.splice(lo..hi, std::iter::once(merged));
    }

    /// Take `range` out, splitting the ranges it cuts into.
    pub fn remove(&mut self, range: &VerseRange) -> Result<(), RangeError> {
        self.check_system(range.versification())?;

        let lo = self
            .ranges
            .partition_point(|r| r.end_ordinal() < range.start_ordinal());
        let mut hi = lo;
        let mut survivors = Vec::with_capacity(2);
        while hi < self.ranges.len() && self.ranges[hi].start_ordinal() <= range.end_ordinal() {
            survivors.extend(self.ranges[hi].remainder(range));
            hi += 1;
        }

        self.ranges.splice(lo..hi, survivors);
        Ok(())
    }

    pub fn contains(&self, verse: &Verse) -> bool {
        if !same_system(&self.v11n, verse.versification()) {
            return false;
        }
        let ordinal = verse.ordinal();
        let idx = self.ranges.partition_point(|r| r.end_ordinal() < ordinal);
        self.ranges
            .get(idx)
            .map_or(false, |r| r.start_ordinal() <= ordinal)
    }

    pub fn contains_range(&self, range: &VerseRange) -> bool {
        if !same_system(&self.v11n, range.versification()) {
            return false;
        }
        let idx = self
            .ranges
            .partition_point(|r| r.end_ordinal() < range.start_ordinal());
        self.ranges.get(idx).map_or(false, |r| r.contains_range(range))
    }

    pub fn union(&self, other: &Passage) -> Result<Passage, RangeError> {
        self.check_system(&other.v11n)?;

        let mut merged: Vec<VerseRange> = Vec::with_capacity(self.ranges.len() + other.ranges.len());
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() || j < other.ranges.len() {
            let next = match (self.ranges.get(i), other.ranges.get(j)) {
                (Some(a), Some(b)) if a.start_ordinal() <= b.start_ordinal() => {
                    i += 1;
                    a
                }
                (_, Some(b)) => {
                    j += 1;
                    b
                }
                (Some(a), None) => {
                    i += 1;
                    a
                }
                (None, None) => break,
            };
            match merged.last_mut() {
                Some(last) if last.end_ordinal() + 1 >= next.start_ordinal() => {
                    if next.end_ordinal() > last.end_ordinal() {
                        *last = VerseRange::from_checked(&self.v11n, last.start_ordinal(), next.end_ordinal());
                    }
                }
                _ => merged.push(VerseRange::from_checked(
                    &self.v11n,
                    next.start_ordinal(),
                    next.end_ordinal(),
                )),
            }
        }

        Ok(Passage {
            v11n: self.v11n.clone(),
            ranges: merged,
        })
    }

    pub fn intersect(&self, other: &Passage) -> Result<Passage, RangeError> {
        self.check_system(&other.v11n)?;

        let mut kept = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let a = &self.ranges[i];
            let b = &other.ranges[j];
            let start = a.start_ordinal().max(b.start_ordinal());
            let end = a.end_ordinal().min(b.end_ordinal());
            if start <= end {
                kept.push(VerseRange::from_checked(&self.v11n, start, end));
            }
            if a.end_ordinal() < b.end_ordinal() {
                i += 1;
            } else {
                j += 1;
            }
        }

        Ok(Passage {
            v11n: self.v11n.clone(),
            ranges: kept,
        })
    }

    /// Keep only the verses also in `other`.
    pub fn retain_all(&mut self, other: &Passage) -> Result<(), RangeError> {
        let kept = self.intersect(other)?;
        self.ranges = kept.ranges;
        Ok(())
    }

    pub fn difference(&self, other: &Passage) -> Result<Passage, RangeError> {
        self.check_system(&other.v11n)?;

        let mut kept = Vec::new();
        let mut j = 0;
        for range in &self.ranges {
            while j < other.ranges.len() && other.ranges[j].end_ordinal() < range.start_ordinal() {
                j += 1;
            }
            let mut start = range.start_ordinal();
            let mut k = j;
            while k < other.ranges.len() && other.ranges[k].start_ordinal() <= range.end_ordinal() {
                let cut = &other.ranges[k];
                if cut.start_ordinal() > start {
                    kept.push(VerseRange::from_checked(&self.v11n, start, cut.start_ordinal() - 1));
                }
                start = start.max(cut.end_ordinal() + 1);
                k += 1;
            }
            if start <= range.end_ordinal() {
                kept.push(VerseRange::from_checked(&self.v11n, start, range.end_ordinal()));
            }
        }

        Ok(Passage {
            v11n: self.v11n.clone(),
            ranges: kept,
        })
    }

    pub fn remove_all(&mut self, other: &Passage) -> Result<(), RangeError> {
        let kept = self.difference(other)?;
        self.ranges = kept.ranges;
        Ok(())
    }

    /// Widen every range by `by` verses each way, within `restriction`.
    pub fn blur(&mut self, by: u32, restriction: RestrictionType) {
        let blurred: Vec<VerseRange> = self
            .ranges
            .iter()
            .map(|range| range.blur(by, restriction))
            .collect();
        self.ranges.clear();
        for range in &blurred {
            self.insert(range.start_ordinal(), range.end_ordinal());
        }
    }

    /// Keep the first `count` verses; the rest is returned, or `None` when
    /// nothing had to go.
    pub fn trim_verses(&mut self, count: u32) -> Option<Passage> {
        let mut remaining = count;
        let mut split_at = None;
        for (idx, range) in self.ranges.iter().enumerate() {
            if range.verse_count() > remaining {
                split_at = Some(idx);
                break;
            }
            remaining -= range.verse_count();
        }
        let idx = split_at?;

        let mut rest = self.ranges.split_off(idx);
        if remaining > 0 {
            let first = &rest[0];
            let cut = first.start_ordinal() + remaining;
            self.ranges
                .push(VerseRange::from_checked(&self.v11n, first.start_ordinal(), cut - 1));
            rest[0] = VerseRange::from_checked(&self.v11n, cut, first.end_ordinal());
        }

        Some(Passage {
            v11n: self.v11n.clone(),
            ranges: rest,
        })
    }

    /// Keep the first `count` ranges as seen through `restriction`; the
    /// rest is returned, or `None` when nothing had to go.
    pub fn trim_ranges(&mut self, count: usize, restriction: RestrictionType) -> Option<Passage> {
        let pieces = self.ranges_restricted(restriction);
        if pieces.len() <= count {
            return None;
        }

        let mut kept = Passage::new(&self.v11n);
        let mut rest = Passage::new(&self.v11n);
        for (idx, piece) in pieces.iter().enumerate() {
            let target = if idx < count { &mut kept } else { &mut rest };
            target.insert(piece.start_ordinal(), piece.end_ordinal());
        }
        self.ranges = kept.ranges;
        Some(rest)
    }

    /// Human form, e.g. `Gen 1:1-5, 8, 3:2`. Parses back to the same passage.
    pub fn display(&self) -> String {
        let mut out = String::new();
        let mut context: Option<RefContext> = None;
        for (idx, range) in self.ranges.iter().enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            context = Some(range.render(&mut out, context));
        }
        out
    }

    /// Space separated OSIS references.
    pub fn osis_ref(&self) -> String {
        self.ranges
            .iter()
            .map(VerseRange::osis_ref)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PartialEq for Passage {
    fn eq(&self, other: &Self) -> bool {
        same_system(&self.v11n, &other.v11n) && self.ranges == other.ranges
    }
}

impl Eq for Passage {}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl fmt::Debug for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passage({} {:?})", self.v11n.name(), self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bible_book::BibleBook;
    use crate::canon;

    fn kjv() -> Arc<Versification> {
        Arc::new(canon::versification("KJV").unwrap())
    }

    fn p(v11n: &Arc<Versification>, text: &str) -> Passage {
        Passage::parse(text, v11n).unwrap()
    }

    fn r(v11n: &Arc<Versification>, start: u32, end: u32) -> VerseRange {
        VerseRange::new(
            &Verse::from_ordinal(v11n, start).unwrap(),
            &Verse::from_ordinal(v11n, end).unwrap(),
        )
        .unwrap()
    }

    fn spans(passage: &Passage) -> Vec<(u32, u32)> {
        passage
            .ranges()
            .iter()
            .map(|r| (r.start_ordinal(), r.end_ordinal()))
            .collect()
    }

    #[test]
    fn test_add_merges_neighbours() {
        let v = kjv();
        let mut passage = Passage::new(&v);
        passage.add(&r(&v, 10, 12)).unwrap();
        passage.add(&r(&v, 1, 3)).unwrap();
        passage.add(&r(&v, 20, 25)).unwrap();
        assert_eq!(spans(&passage), vec![(1, 3), (10, 12), (20, 25)]);

        passage.add(&r(&v, 4, 9)).unwrap();
        assert_eq!(spans(&passage), vec![(1, 12), (20, 25)]);

        passage.add(&r(&v, 11, 30)).unwrap();
        assert_eq!(spans(&passage), vec![(1, 30)]);
        assert_eq!(passage.verse_count(), 30);
    }

    #[test]
    fn test_add_is_idempotent() {
        let v = kjv();
        let mut passage = p(&v, "Gen 1:1-5, 8");
        let before = passage.clone();
        passage.add(&r(&v, 2, 4)).unwrap();
        passage.add(&r(&v, 8, 8)).unwrap();
        assert_eq!(passage, before);
    }

    #[test]
    fn test_remove_splits() {
        let v = kjv();
        let mut passage = Passage::from_range(r(&v, 1, 10));
        passage.remove(&r(&v, 4, 6)).unwrap();
        assert_eq!(spans(&passage), vec![(1, 3), (7, 10)]);
        passage.remove(&r(&v, 1, 3)).unwrap();
        assert_eq!(spans(&passage), vec![(7, 10)]);
        passage.remove(&r(&v, 5, 20)).unwrap();
        assert!(passage.is_empty());
    }

    #[test]
    fn test_cross_versification_rejected() {
        let kjv = kjv();
        let nrsv = Arc::new(canon::versification("NRSV").unwrap());
        let mut passage = Passage::new(&kjv);
        let foreign = r(&nrsv, 1, 2);
        assert!(matches!(
            passage.add(&foreign),
            Err(RangeError::CrossVersification { .. })
        ));
        assert!(passage.union(&Passage::new(&nrsv)).is_err());
        assert!(!passage.contains(&Verse::from_ordinal(&nrsv, 1).unwrap()));
    }

    #[test]
    fn test_contains() {
        let v = kjv();
        let passage = p(&v, "Gen 1:1-5, 8");
        let verse = |n| Verse::new(&v, BibleBook::Gen, 1, n).unwrap();
        assert!(passage.contains(&verse(1)));
        assert!(passage.contains(&verse(5)));
        assert!(!passage.contains(&verse(6)));
        assert!(passage.contains(&verse(8)));
        assert!(!passage.contains(&verse(9)));
        assert!(passage.contains_range(&r(&v, 2, 4)));
        assert!(!passage.contains_range(&r(&v, 4, 8)));
    }

    #[test]
    fn test_set_algebra() {
        let v = kjv();
        let a = Passage::from_range(r(&v, 1, 10));
        let mut b = Passage::from_range(r(&v, 5, 15));
        b.add(&r(&v, 30, 31)).unwrap();

        assert_eq!(spans(&a.union(&b).unwrap()), vec![(1, 15), (30, 31)]);
        assert_eq!(spans(&a.intersect(&b).unwrap()), vec![(5, 10)]);
        assert_eq!(spans(&a.difference(&b).unwrap()), vec![(1, 4)]);
        assert_eq!(spans(&b.difference(&a).unwrap()), vec![(11, 15), (30, 31)]);

        let mut c = a.clone();
        c.retain_all(&b).unwrap();
        assert_eq!(spans(&c), vec![(5, 10)]);

        let mut d = b.clone();
        d.remove_all(&a).unwrap();
        assert_eq!(spans(&d), vec![(11, 15), (30, 31)]);

        assert_eq!(a.union(&b).unwrap().intersect(&a).unwrap(), a);
    }

    #[test]
    fn test_union_merges_adjacent_across_sides() {
        let v = kjv();
        let a = Passage::from_range(r(&v, 1, 3));
        let b = Passage::from_range(r(&v, 4, 6));
        assert_eq!(spans(&a.union(&b).unwrap()), vec![(1, 6)]);
    }

    #[test]
    fn test_difference_with_many_cuts() {
        let v = kjv();
        let a = Passage::from_range(r(&v, 1, 20));
        let mut cuts = Passage::new(&v);
        cuts.add(&r(&v, 2, 3)).unwrap();
        cuts.add(&r(&v, 6, 6)).unwrap();
        cuts.add(&r(&v, 18, 25)).unwrap();
        assert_eq!(
            spans(&a.difference(&cuts).unwrap()),
            vec![(1, 1), (4, 5), (7, 17)]
        );
    }

    #[test]
    fn test_display_round_trips() {
        let v = kjv();
        for text in [
            "Gen 1:1-5, 8",
            "Gen 1, 3",
            "Gen 1-3, 5:2",
            "Gen 1:1, 3:5-7, 10",
            "Gen 1:5-2:3, 6",
            "Gen 50:26-Exod 1:2",
            "Gen-Exod, Rev 22:21",
            "Jude",
            "Ps 23, 1Cor 13:4-7",
        ] {
            let passage = p(&v, text);
            assert_eq!(passage.display(), text);
            assert_eq!(p(&v, &passage.display()), passage);
        }
    }

    #[test]
    fn test_display_writes_book_before_chapter_after_verses() {
        let v = kjv();
        let mut passage = p(&v, "Gen 1:1");
        passage.add(&VerseRange::whole(&v, BibleBook::Gen, Some(3)).unwrap()).unwrap();
        assert_eq!(passage.display(), "Gen 1:1, Gen 3");
        assert_eq!(p(&v, &passage.display()), passage);
    }

    #[test]
    fn test_osis_ref() {
        let v = kjv();
        assert_eq!(p(&v, "Gen 1:1-5, 8").osis_ref(), "Gen.1.1-Gen.1.5 Gen.1.8");
        assert_eq!(p(&v, "Gen 2").osis_ref(), "Gen.2");
    }

    #[test]
    fn test_restricted_ranges_and_trim() {
        let v = kjv();
        let mut passage = p(&v, "Gen 1:30-2:2, 5:1");
        assert_eq!(passage.ranges_restricted(RestrictionType::Chapter).len(), 3);

        let rest = passage.trim_verses(3).unwrap();
        assert_eq!(passage.display(), "Gen 1:30-2:1");
        assert_eq!(rest.display(), "Gen 2:2, 5:1");
        assert!(passage.trim_verses(10).is_none());

        let mut passage = p(&v, "Gen 1:30-2:2, 5:1");
        let rest = passage.trim_ranges(1, RestrictionType::Chapter).unwrap();
        assert_eq!(passage.display(), "Gen 1:30-31");
        assert_eq!(rest.display(), "Gen 2:1-2, 5:1");
    }

    #[test]
    fn test_blur() {
        let v = kjv();
        let mut passage = p(&v, "Gen 1:5, 1:9");
        passage.blur(2, RestrictionType::Chapter);
        assert_eq!(passage.display(), "Gen 1:3-11");

        let mut edge = p(&v, "Gen 1:31");
        edge.blur(2, RestrictionType::Chapter);
        assert_eq!(edge.display(), "Gen 1:29-31");
    }

    #[test]
    fn test_trimmed_and_blurred_pieces_fold_back_together() {
        let v = kjv();
        let mut passage = p(&v, "Gen 1:30-2:2, 5:1");
        let rest = passage.trim_ranges(2, RestrictionType::Chapter).unwrap();
        assert_eq!(spans(&passage), vec![(30, 33)]);
        assert_eq!(rest.display(), "Gen 5:1");

        let mut passage = p(&v, "Gen 1:2, 1:6, 1:10");
        passage.blur(1, RestrictionType::None);
        assert_eq!(spans(&passage), vec![(1, 3), (5, 7), (9, 11)]);
        passage.blur(1, RestrictionType::None);
        assert_eq!(spans(&passage), vec![(1, 12)]);

        let mut direct = Passage::new(&v);
        direct.insert(5, 7);
        direct.insert(1, 3);
        direct.insert(4, 4);
        assert_eq!(spans(&direct), vec![(1, 7)]);
    }

    #[test]
    fn test_verses_iterator_and_clear() {
        let v = kjv();
        let mut passage = p(&v, "Gen 1:1-2, 4");
        let ids: Vec<String> = passage.verses().map(|v| v.osis_id()).collect();
        assert_eq!(ids, vec!["Gen.1.1", "Gen.1.2", "Gen.1.4"]);
        passage.clear();
        assert!(passage.is_empty());
        assert_eq!(passage.verse_count(), 0);
    }
}
