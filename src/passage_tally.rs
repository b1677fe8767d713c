use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AddressError;
use crate::passage::Passage;
use crate::verse::{cross_versification, same_system, RestrictionType, Verse, VerseRange};
use crate::versification::Versification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TallyOrder {
    #[default]
    Biblical,
    /// Highest score first, ties in canonical order.
    Score,
    /// Highest score first, ties in the order verses were first recorded.
    Discovery,
}

#[derive(Debug, Clone, Copy)]
struct Tally {
    score: f64,
    first_seen: u64,
}

/// Scores accumulated per verse, e.g. search hits, ranked into passages.
#[derive(Debug, Clone)]
pub struct PassageTally {
    v11n: Arc<Versification>,
    tallies: HashMap<u32, Tally>,
    next_seen: u64,
}

impl PassageTally {
    pub fn new(v11n: &Arc<Versification>) -> Self {
        Self {
            v11n: v11n.clone(),
            tallies: HashMap::new(),
            next_seen: 0,
        }
    }

    pub fn versification(&self) -> &Arc<Versification> {
        &self.v11n
    }

    fn check_system(&self, v11n: &Arc<Versification>) -> Result<(), AddressError> {
        if same_system(&self.v11n, v11n) {
            Ok(())
        } else {
            Err(cross_versification(&self.v11n, v11n))
        }
    }

    fn bump(&mut self, ordinal: u32, weight: f64) {
        let next_seen = &mut self.next_seen;
        let tally = self.tallies.entry(ordinal).or_insert_with(|| {
            let first_seen = *next_seen;
            *next_seen += 1;
            Tally {
                score: 0.0,
                first_seen,
            }
        });
        tally.score += weight;
    }

    pub fn record(&mut self, verse: &Verse, weight: f64) -> Result<(), AddressError> {
        self.check_system(verse.versification())?;
        self.bump(verse.ordinal(), weight);
        Ok(())
    }

    pub fn record_range(&mut self, range: &VerseRange, weight: f64) -> Result<(), AddressError> {
        self.check_system(range.versification())?;
        for ordinal in range.start_ordinal()..=range.end_ordinal() {
            self.bump(ordinal, weight);
        }
        Ok(())
    }

    /// Accumulated score, 0 for verses never recorded.
    pub fn tally_of(&self, verse: &Verse) -> f64 {
        if !same_system(&self.v11n, verse.versification()) {
            return 0.0;
        }
        self.tallies.get(&verse.ordinal()).map_or(0.0, |t| t.score)
    }

    pub fn remove(&mut self, verse: &Verse) -> Option<f64> {
        if !same_system(&self.v11n, verse.versification()) {
            return None;
        }
        self.tallies.remove(&verse.ordinal()).map(|t| t.score)
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.tallies.values().map(|t| t.score).sum()
    }

    pub fn max_score(&self) -> f64 {
        self.tallies
            .values()
            .map(|t| t.score)
            .fold(0.0, f64::max)
    }

    fn sorted(&self, order: TallyOrder) -> Vec<(u32, Tally)> {
        let mut entries: Vec<(u32, Tally)> = self.tallies.iter().map(|(o, t)| (*o, *t)).collect();
        match order {
            TallyOrder::Biblical => entries.sort_by_key(|(ordinal, _)| *ordinal),
            TallyOrder::Score => entries.sort_by(|(ao, at), (bo, bt)| {
                bt.score.total_cmp(&at.score).then(ao.cmp(bo))
            }),
            TallyOrder::Discovery => entries.sort_by(|(_, at), (_, bt)| {
                bt.score
                    .total_cmp(&at.score)
                    .then(at.first_seen.cmp(&bt.first_seen))
            }),
        }
        entries
    }

    pub fn ranked(&self, order: TallyOrder) -> Vec<(Verse, f64)> {
        self.sorted(order)
            .into_iter()
            .map(|(ordinal, tally)| (Verse::at(&self.v11n, ordinal), tally.score))
            .collect()
    }

    /// The `n` best scoring verses folded into a passage.
    pub fn top_n(&self, n: usize) -> Passage {
        let mut passage = Passage::new(&self.v11n);
        for (ordinal, _) in self.sorted(TallyOrder::Score).into_iter().take(n) {
            passage.insert(ordinal, ordinal);
        }
        passage
    }

    /// Every tallied verse, regardless of score.
    pub fn to_passage(&self) -> Passage {
        self.top_n(self.tallies.len())
    }

    /// Give every tallied verse the same score of 1.
    pub fn flatten(&mut self) {
        for tally in self.tallies.values_mut() {
            tally.score = 1.0;
        }
    }

    /// Spread each score over `by` verses either side, fading by one per
    /// verse of distance and never crossing `restriction`.
    pub fn blur(&mut self, by: u32, restriction: RestrictionType) {
        let old = self.sorted(TallyOrder::Biblical);
        self.tallies.clear();
        self.next_seen = 0;

        for (ordinal, tally) in old {
            let (floor, ceiling) = restriction.span(&self.v11n, ordinal);
            let from = ordinal.saturating_sub(by).max(floor);
            let to = ordinal.saturating_add(by).min(ceiling);
            for target in from..=to {
                let distance = f64::from(target.abs_diff(ordinal));
                self.bump(target, tally.score + f64::from(by) - distance);
            }
        }
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

    fn gen(v: &Arc<Versification>, chapter: u16, verse: u16) -> Verse {
        Verse::new(v, BibleBook::Gen, chapter, verse).unwrap()
    }

    #[test]
    fn test_record_accumulates() {
        let v = kjv();
        let mut tally = PassageTally::new(&v);
        tally.record(&gen(&v, 1, 3), 1.0).unwrap();
        tally.record(&gen(&v, 1, 3), 2.5).unwrap();
        tally.record(&gen(&v, 1, 1), 1.0).unwrap();
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.tally_of(&gen(&v, 1, 3)), 3.5);
        assert_eq!(tally.tally_of(&gen(&v, 1, 2)), 0.0);
        assert_eq!(tally.total(), 4.5);
        assert_eq!(tally.max_score(), 3.5);
    }

    #[test]
    fn test_top_n_by_score_then_ordinal() {
        let v = kjv();
        let mut tally = PassageTally::new(&v);
        tally.record(&gen(&v, 1, 9), 1.0).unwrap();
        tally.record(&gen(&v, 1, 5), 3.0).unwrap();
        tally.record(&gen(&v, 1, 7), 1.0).unwrap();
        tally.record(&gen(&v, 1, 6), 2.0).unwrap();

        assert_eq!(tally.top_n(2).display(), "Gen 1:5-6");
        assert_eq!(tally.top_n(3).display(), "Gen 1:5-7");
        assert_eq!(tally.top_n(10).verse_count(), 4);
        assert!(tally.top_n(0).is_empty());
    }

    #[test]
    fn test_ranked_orders() {
        let v = kjv();
        let mut tally = PassageTally::new(&v);
        tally.record(&gen(&v, 2, 1), 1.0).unwrap();
        tally.record(&gen(&v, 1, 1), 1.0).unwrap();
        tally.record(&gen(&v, 3, 1), 5.0).unwrap();

        let ids = |order| -> Vec<String> {
            tally.ranked(order).into_iter().map(|(v, _)| v.osis_id()).collect()
        };
        assert_eq!(ids(TallyOrder::Biblical), vec!["Gen.1.1", "Gen.2.1", "Gen.3.1"]);
        assert_eq!(ids(TallyOrder::Score), vec!["Gen.3.1", "Gen.1.1", "Gen.2.1"]);
        assert_eq!(ids(TallyOrder::Discovery), vec!["Gen.3.1", "Gen.2.1", "Gen.1.1"]);
    }

    #[test]
    fn test_record_range_and_remove() {
        let v = kjv();
        let mut tally = PassageTally::new(&v);
        let range = VerseRange::new(&gen(&v, 1, 1), &gen(&v, 1, 4)).unwrap();
        tally.record_range(&range, 2.0).unwrap();
        assert_eq!(tally.len(), 4);
        assert_eq!(tally.remove(&gen(&v, 1, 2)), Some(2.0));
        assert_eq!(tally.remove(&gen(&v, 1, 2)), None);
        assert_eq!(tally.to_passage().display(), "Gen 1:1, 3-4");
    }

    #[test]
    fn test_cross_versification_rejected() {
        let v = kjv();
        let nrsv = Arc::new(canon::versification("NRSV").unwrap());
        let mut tally = PassageTally::new(&v);
        assert!(matches!(
            tally.record(&gen(&nrsv, 1, 1), 1.0),
            Err(AddressError::CrossVersification { .. })
        ));
        assert!(tally.is_empty());
    }

    #[test]
    fn test_flatten() {
        let v = kjv();
        let mut tally = PassageTally::new(&v);
        tally.record(&gen(&v, 1, 1), 4.0).unwrap();
        tally.record(&gen(&v, 1, 2), 2.0).unwrap();
        tally.flatten();
        assert_eq!(tally.total(), 2.0);
    }

    #[test]
    fn test_blur_spreads_within_chapter() {
        let v = kjv();
        let mut tally = PassageTally::new(&v);
        tally.record(&gen(&v, 1, 31), 1.0).unwrap();
        tally.blur(2, RestrictionType::Chapter);

        assert_eq!(tally.len(), 3);
        assert_eq!(tally.tally_of(&gen(&v, 1, 31)), 3.0);
        assert_eq!(tally.tally_of(&gen(&v, 1, 30)), 2.0);
        assert_eq!(tally.tally_of(&gen(&v, 1, 29)), 1.0);
        assert_eq!(tally.tally_of(&gen(&v, 2, 1)), 0.0);

        let mut open = PassageTally::new(&v);
        open.record(&gen(&v, 1, 31), 1.0).unwrap();
        open.blur(1, RestrictionType::None);
        assert_eq!(open.tally_of(&gen(&v, 2, 1)), 1.0);
    }
}
