use crate::canon;
use crate::passage::Passage;
use crate::registry::ReferenceSystemRegistry;
use crate::verse::{Verse, VerseRange};
use crate::versification::Versification;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

// Genesis 1 through the middle of Genesis 15 in KJV.
const WINDOW: u32 = 400;

fn kjv() -> Arc<Versification> {
    canon::lookup(ReferenceSystemRegistry::global(), canon::KJV).unwrap()
}

/// `(lo, hi, snap)` where snap widens the range to whole chapters (1)
/// or whole books (2).
fn shaped_range(v11n: &Arc<Versification>, a: u32, b: u32, snap: u8) -> VerseRange {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let (lo, hi) = match snap {
        1 => (v11n.chapter_span(lo).0, v11n.chapter_span(hi).1),
        2 => (v11n.book_span(lo).0, v11n.book_span(hi).1),
        _ => (lo, hi),
    };
    VerseRange::from_checked(v11n, lo, hi)
}

fn passage_of(v11n: &Arc<Versification>, spans: &[(u32, u32)]) -> Passage {
    let mut passage = Passage::new(v11n);
    for &(a, b) in spans {
        passage.add(&shaped_range(v11n, a, b, 0)).unwrap();
    }
    passage
}

fn ordinals(passage: &Passage) -> BTreeSet<u32> {
    passage.verses().map(|v| v.ordinal()).collect()
}

fn span_set(a: u32, b: u32) -> BTreeSet<u32> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (lo..=hi).collect()
}

fn assert_normalized(passage: &Passage) {
    for range in passage.ranges() {
        assert!(range.start_ordinal() <= range.end_ordinal());
    }
    for pair in passage.ranges().windows(2) {
        assert!(
            pair[0].end_ordinal() + 1 < pair[1].start_ordinal(),
            "{:?} and {:?} should have been merged",
            pair[0],
            pair[1]
        );
    }
}

fn spans() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((1..=WINDOW, 1..=WINDOW), 0..8)
}

proptest! {
    #[test]
    fn prop_add_is_idempotent(existing in spans(), a in 1..=WINDOW, b in 1..=WINDOW) {
        let v11n = kjv();
        let mut passage = passage_of(&v11n, &existing);
        let range = shaped_range(&v11n, a, b, 0);

        passage.add(&range).unwrap();
        let once = passage.clone();
        passage.add(&range).unwrap();
        prop_assert_eq!(passage, once);
    }

    #[test]
    fn prop_add_remove_matches_verse_set(
        ops in prop::collection::vec((any::<bool>(), 1..=WINDOW, 1..=WINDOW), 0..24)
    ) {
        let v11n = kjv();
        let mut passage = Passage::new(&v11n);
        let mut model = BTreeSet::new();

        for (adding, a, b) in ops {
            let range = shaped_range(&v11n, a, b, 0);
            if adding {
                passage.add(&range).unwrap();
                model.extend(span_set(a, b));
            } else {
                passage.remove(&range).unwrap();
                for ordinal in span_set(a, b) {
                    model.remove(&ordinal);
                }
            }
            assert_normalized(&passage);
        }

        prop_assert_eq!(ordinals(&passage), model.clone());
        prop_assert_eq!(passage.verse_count() as usize, model.len());
        for ordinal in 1..=WINDOW {
            let verse = Verse::from_ordinal(&v11n, ordinal).unwrap();
            prop_assert_eq!(passage.contains(&verse), model.contains(&ordinal));
        }
    }

    #[test]
    fn prop_set_operations_match_verse_sets(left in spans(), right in spans()) {
        let v11n = kjv();
        let a = passage_of(&v11n, &left);
        let b = passage_of(&v11n, &right);
        let set_a = ordinals(&a);
        let set_b = ordinals(&b);

        let union = a.union(&b).unwrap();
        let intersection = a.intersect(&b).unwrap();
        let difference = a.difference(&b).unwrap();
        assert_normalized(&union);
        assert_normalized(&intersection);
        assert_normalized(&difference);

        prop_assert_eq!(ordinals(&union), set_a.union(&set_b).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(
            ordinals(&intersection),
            set_a.intersection(&set_b).copied().collect::<BTreeSet<_>>()
        );
        prop_assert_eq!(
            ordinals(&difference),
            set_a.difference(&set_b).copied().collect::<BTreeSet<_>>()
        );

        prop_assert_eq!(union.intersect(&a).unwrap(), a.clone());

        let mut retained = a.clone();
        retained.retain_all(&b).unwrap();
        prop_assert_eq!(retained, intersection);
        let mut removed = a.clone();
        removed.remove_all(&b).unwrap();
        prop_assert_eq!(removed, difference);
    }

    #[test]
    fn prop_display_parses_back(
        shapes in prop::collection::vec((1u32..=31102, 0u32..200, 0u8..3), 1..6)
    ) {
        let v11n = kjv();
        let mut passage = Passage::new(&v11n);
        for (start, len, snap) in shapes {
            let end = (start + len).min(v11n.total_verse_count());
            passage.add(&shaped_range(&v11n, start, end, snap)).unwrap();
        }

        let text = passage.display();
        let parsed = Passage::parse(&text, &v11n);
        prop_assert!(parsed.is_ok(), "{:?} failed to parse: {:?}", text, parsed);
        prop_assert_eq!(parsed.unwrap(), passage, "{}", text);
    }

    #[test]
    fn prop_kjv_ordinals_round_trip(ordinal in 1u32..=31102) {
        let v11n = kjv();
        let (book, chapter, verse) = v11n.from_ordinal(ordinal).unwrap();
        prop_assert_eq!(v11n.ordinal(book, chapter, verse).unwrap(), ordinal);

        let testament_ordinal = v11n.testament_ordinal(ordinal).unwrap();
        let offset = match v11n.testament_of(ordinal).unwrap() {
            crate::versification::Testament::Old => 0,
            crate::versification::Testament::New => 23145,
        };
        prop_assert_eq!(testament_ordinal + offset, ordinal);
    }
}
