use serde::{Deserialize, Serialize};
use std::fmt;
use strsim::normalized_levenshtein;

/// Identity of a canonical book. Ordering and chapter data live in a
/// [`crate::versification::Versification`]; the discriminant is only a
/// stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BibleBook {
    Gen,
    Exod,
    Lev,
    Num,
    Deut,
    Josh,
    Judg,
    Ruth,
    Sam1,
    Sam2,
    Kgs1,
    Kgs2,
    Chr1,
    Chr2,
    Ezra,
    Neh,
    Esth,
    Job,
    Ps,
    Prov,
    Eccl,
    Song,
    Isa,
    Jer,
    Lam,
    Ezek,
    Dan,
    Hos,
    Joel,
    Amos,
    Obad,
    Jonah,
    Mic,
    Nah,
    Hab,
    Zeph,
    Hag,
    Zech,
    Mal,
    Matt,
    Mark,
    Luke,
    John,
    Acts,
    Rom,
    Cor1,
    Cor2,
    Gal,
    Eph,
    Phil,
    Col,
    Thess1,
    Thess2,
    Tim1,
    Tim2,
    Titus,
    Phlm,
    Heb,
    Jas,
    Pet1,
    Pet2,
    John1,
    John2,
    John3,
    Jude,
    Rev,
    Tob,
    Jdt,
    AddEsth,
    Wis,
    Sir,
    Bar,
    EpJer,
    PrAzar,
    Sus,
    Bel,
    Macc1,
    Macc2,
    Macc3,
    Macc4,
    PrMan,
    Esd1,
    Esd2,
    Odes,
    PssSol,
    En1,
}

struct BookInfo {
    osis: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
}

// Indexed by discriminant. Aliases are stored already normalized.
const BOOK_INFO: [BookInfo; BibleBook::COUNT] = [
    BookInfo { osis: "Gen", name: "Genesis", aliases: &["gn", "ge"] },
    BookInfo { osis: "Exod", name: "Exodus", aliases: &["ex", "exo"] },
    BookInfo { osis: "Lev", name: "Leviticus", aliases: &["lv"] },
    BookInfo { osis: "Num", name: "Numbers", aliases: &["nm", "nb"] },
    BookInfo { osis: "Deut", name: "Deuteronomy", aliases: &["dt"] },
    BookInfo { osis: "Josh", name: "Joshua", aliases: &["jos", "jsh"] },
    BookInfo { osis: "Judg", name: "Judges", aliases: &["jdg", "jg", "jdgs"] },
    BookInfo { osis: "Ruth", name: "Ruth", aliases: &["rth", "ru"] },
    BookInfo { osis: "1Sam", name: "1 Samuel", aliases: &["1sa", "1sm"] },
    BookInfo { osis: "2Sam", name: "2 Samuel", aliases: &["2sa", "2sm"] },
    BookInfo { osis: "1Kgs", name: "1 Kings", aliases: &["1ki", "1kin"] },
    BookInfo { osis: "2Kgs", name: "2 Kings", aliases: &["2ki", "2kin"] },
    BookInfo { osis: "1Chr", name: "1 Chronicles", aliases: &["1ch", "1chron"] },
    BookInfo { osis: "2Chr", name: "2 Chronicles", aliases: &["2ch", "2chron"] },
    BookInfo { osis: "Ezra", name: "Ezra", aliases: &["ezr"] },
    BookInfo { osis: "Neh", name: "Nehemiah", aliases: &["ne"] },
    BookInfo { osis: "Esth", name: "Esther", aliases: &["es"] },
    BookInfo { osis: "Job", name: "Job", aliases: &["jb"] },
    BookInfo { osis: "Ps", name: "Psalms", aliases: &["psalm", "psa", "pss", "psm"] },
    BookInfo { osis: "Prov", name: "Proverbs", aliases: &["pr", "prv"] },
    BookInfo { osis: "Eccl", name: "Ecclesiastes", aliases: &["ecc", "qoh", "qoheleth"] },
    BookInfo {
        osis: "Song",
        name: "Song of Solomon",
        aliases: &["songofsongs", "sos", "canticles", "canticleofcanticles"],
    },
    BookInfo { osis: "Isa", name: "Isaiah", aliases: &["is"] },
    BookInfo { osis: "Jer", name: "Jeremiah", aliases: &["je", "jr"] },
    BookInfo { osis: "Lam", name: "Lamentations", aliases: &["la"] },
    BookInfo { osis: "Ezek", name: "Ezekiel", aliases: &["eze", "ezk"] },
    BookInfo { osis: "Dan", name: "Daniel", aliases: &["dn", "da"] },
    BookInfo { osis: "Hos", name: "Hosea", aliases: &["ho"] },
    BookInfo { osis: "Joel", name: "Joel", aliases: &["jl"] },
    BookInfo { osis: "Amos", name: "Amos", aliases: &["am"] },
    BookInfo { osis: "Obad", name: "Obadiah", aliases: &["ob"] },
    BookInfo { osis: "Jonah", name: "Jonah", aliases: &["jnh", "jon"] },
    BookInfo { osis: "Mic", name: "Micah", aliases: &["mc"] },
    BookInfo { osis: "Nah", name: "Nahum", aliases: &["na"] },
    BookInfo { osis: "Hab", name: "Habakkuk", aliases: &["hb"] },
    BookInfo { osis: "Zeph", name: "Zephaniah", aliases: &["zep", "zp"] },
    BookInfo { osis: "Hag", name: "Haggai", aliases: &["hg"] },
    BookInfo { osis: "Zech", name: "Zechariah", aliases: &["zec", "zc"] },
    BookInfo { osis: "Mal", name: "Malachi", aliases: &["ml"] },
    BookInfo { osis: "Matt", name: "Matthew", aliases: &["mt"] },
    BookInfo { osis: "Mark", name: "Mark", aliases: &["mk", "mrk"] },
    BookInfo { osis: "Luke", name: "Luke", aliases: &["lk", "luk"] },
    BookInfo { osis: "John", name: "John", aliases: &["jn", "jhn"] },
    BookInfo { osis: "Acts", name: "Acts", aliases: &["ac"] },
    BookInfo { osis: "Rom", name: "Romans", aliases: &["ro", "rm"] },
    BookInfo { osis: "1Cor", name: "1 Corinthians", aliases: &["1co"] },
    BookInfo { osis: "2Cor", name: "2 Corinthians", aliases: &["2co"] },
    BookInfo { osis: "Gal", name: "Galatians", aliases: &["ga"] },
    BookInfo { osis: "Eph", name: "Ephesians", aliases: &["ephes"] },
    BookInfo { osis: "Phil", name: "Philippians", aliases: &["php", "pp"] },
    BookInfo { osis: "Col", name: "Colossians", aliases: &["co"] },
    BookInfo { osis: "1Thess", name: "1 Thessalonians", aliases: &["1th", "1thes"] },
    BookInfo { osis: "2Thess", name: "2 Thessalonians", aliases: &["2th", "2thes"] },
    BookInfo { osis: "1Tim", name: "1 Timothy", aliases: &["1ti", "1tm"] },
    BookInfo { osis: "2Tim", name: "2 Timothy", aliases: &["2ti", "2tm"] },
    BookInfo { osis: "Titus", name: "Titus", aliases: &["tit"] },
    BookInfo { osis: "Phlm", name: "Philemon", aliases: &["phm", "philem"] },
    BookInfo { osis: "Heb", name: "Hebrews", aliases: &["he"] },
    BookInfo { osis: "Jas", name: "James", aliases: &["jm"] },
    BookInfo { osis: "1Pet", name: "1 Peter", aliases: &["1pe", "1pt"] },
    BookInfo { osis: "2Pet", name: "2 Peter", aliases: &["2pe", "2pt"] },
    BookInfo { osis: "1John", name: "1 John", aliases: &["1jn", "1jo", "1jhn"] },
    BookInfo { osis: "2John", name: "2 John", aliases: &["2jn", "2jo", "2jhn"] },
    BookInfo { osis: "3John", name: "3 John", aliases: &["3jn", "3jo", "3jhn"] },
    BookInfo { osis: "Jude", name: "Jude", aliases: &["jud", "jd"] },
    BookInfo {
        osis: "Rev",
        name: "Revelation",
        aliases: &["revelations", "apocalypse", "rv", "re"],
    },
    BookInfo { osis: "Tob", name: "Tobit", aliases: &["tb"] },
    BookInfo { osis: "Jdt", name: "Judith", aliases: &["jdth"] },
    BookInfo { osis: "AddEsth", name: "Additions to Esther", aliases: &["esthgr", "greekesther"] },
    BookInfo { osis: "Wis", name: "Wisdom", aliases: &["wisdomofsolomon", "ws"] },
    BookInfo { osis: "Sir", name: "Sirach", aliases: &["ecclesiasticus", "ecclus"] },
    BookInfo { osis: "Bar", name: "Baruch", aliases: &[] },
    BookInfo { osis: "EpJer", name: "Epistle of Jeremiah", aliases: &["letterofjeremiah"] },
    BookInfo {
        osis: "PrAzar",
        name: "Prayer of Azariah",
        aliases: &["songofthethreeyouths", "songofthreechildren"],
    },
    BookInfo { osis: "Sus", name: "Susanna", aliases: &[] },
    BookInfo { osis: "Bel", name: "Bel and the Dragon", aliases: &[] },
    BookInfo { osis: "1Macc", name: "1 Maccabees", aliases: &["1ma", "1mac"] },
    BookInfo { osis: "2Macc", name: "2 Maccabees", aliases: &["2ma", "2mac"] },
    BookInfo { osis: "3Macc", name: "3 Maccabees", aliases: &["3ma", "3mac"] },
    BookInfo { osis: "4Macc", name: "4 Maccabees", aliases: &["4ma", "4mac"] },
    BookInfo { osis: "PrMan", name: "Prayer of Manasseh", aliases: &["prayerofmanasses"] },
    BookInfo { osis: "1Esd", name: "1 Esdras", aliases: &[] },
    BookInfo { osis: "2Esd", name: "2 Esdras", aliases: &[] },
    BookInfo { osis: "Odes", name: "Odes", aliases: &[] },
    BookInfo { osis: "PssSol", name: "Psalms of Solomon", aliases: &["pssol"] },
    BookInfo { osis: "1En", name: "1 Enoch", aliases: &[] },
];

const SUGGESTION_THRESHOLD: f64 = 0.5;

impl BibleBook {
    pub const COUNT: usize = BibleBook::En1 as usize + 1;

    pub const ALL: [BibleBook; BibleBook::COUNT] = [
        BibleBook::Gen,
        BibleBook::Exod,
        BibleBook::Lev,
        BibleBook::Num,
        BibleBook::Deut,
        BibleBook::Josh,
        BibleBook::Judg,
        BibleBook::Ruth,
        BibleBook::Sam1,
        BibleBook::Sam2,
        BibleBook::Kgs1,
        BibleBook::Kgs2,
        BibleBook::Chr1,
        BibleBook::Chr2,
        BibleBook::Ezra,
        BibleBook::Neh,
        BibleBook::Esth,
        BibleBook::Job,
        BibleBook::Ps,
        BibleBook::Prov,
        BibleBook::Eccl,
        BibleBook::Song,
        BibleBook::Isa,
        BibleBook::Jer,
        BibleBook::Lam,
        BibleBook::Ezek,
        BibleBook::Dan,
        BibleBook::Hos,
        BibleBook::Joel,
        BibleBook::Amos,
        BibleBook::Obad,
        BibleBook::Jonah,
        BibleBook::Mic,
        BibleBook::Nah,
        BibleBook::Hab,
        BibleBook::Zeph,
        BibleBook::Hag,
        BibleBook::Zech,
        BibleBook::Mal,
        BibleBook::Matt,
        BibleBook::Mark,
        BibleBook::Luke,
        BibleBook::John,
        BibleBook::Acts,
        BibleBook::Rom,
        BibleBook::Cor1,
        BibleBook::Cor2,
        BibleBook::Gal,
        BibleBook::Eph,
        BibleBook::Phil,
        BibleBook::Col,
        BibleBook::Thess1,
        BibleBook::Thess2,
        BibleBook::Tim1,
        BibleBook::Tim2,
        BibleBook::Titus,
        BibleBook::Phlm,
        BibleBook::Heb,
        BibleBook::Jas,
        BibleBook::Pet1,
        BibleBook::Pet2,
        BibleBook::John1,
        BibleBook::John2,
        BibleBook::John3,
        BibleBook::Jude,
        BibleBook::Rev,
        BibleBook::Tob,
        BibleBook::Jdt,
        BibleBook::AddEsth,
        BibleBook::Wis,
        BibleBook::Sir,
        BibleBook::Bar,
        BibleBook::EpJer,
        BibleBook::PrAzar,
        BibleBook::Sus,
        BibleBook::Bel,
        BibleBook::Macc1,
        BibleBook::Macc2,
        BibleBook::Macc3,
        BibleBook::Macc4,
        BibleBook::PrMan,
        BibleBook::Esd1,
        BibleBook::Esd2,
        BibleBook::Odes,
        BibleBook::PssSol,
        BibleBook::En1,
    ];

    /// Stable, versification-independent code.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<BibleBook> {
        BibleBook::ALL.get(code as usize).copied()
    }

    fn info(self) -> &'static BookInfo {
        &BOOK_INFO[self as usize]
    }

    /// OSIS book identifier, e.g. `1Cor`.
    pub fn osis(self) -> &'static str {
        self.info().osis
    }

    /// English display name, e.g. `1 Corinthians`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn from_osis(osis: &str) -> Option<BibleBook> {
        BibleBook::ALL
            .iter()
            .copied()
            .find(|b| b.osis().eq_ignore_ascii_case(osis))
    }

    /// Resolve a human book name against every known book.
    pub fn from_name(name: &str) -> Option<BibleBook> {
        BibleBook::lookup(name, &BibleBook::ALL)
    }

    /// Resolve a human book name, only considering `candidates`, in their
    /// order. Exact OSIS ids, full names and aliases win over prefixes.
    pub fn lookup(name: &str, candidates: &[BibleBook]) -> Option<BibleBook> {
        let wanted = normalize_book_name(name);
        if wanted.is_empty() {
            return None;
        }

        let exact = candidates.iter().copied().find(|b| {
            normalize_book_name(b.osis()) == wanted
                || normalize_book_name(b.name()) == wanted
                || b.info().aliases.contains(&wanted.as_str())
        });
        if exact.is_some() {
            return exact;
        }

        if wanted.len() < 2 {
            return None;
        }

        candidates.iter().copied().find(|b| {
            normalize_book_name(b.name()).starts_with(&wanted)
                || normalize_book_name(b.osis()).starts_with(&wanted)
        })
    }

    /// Closest known book name for an unrecognized one, if any is close
    /// enough to be worth suggesting.
    pub fn suggest(name: &str, candidates: &[BibleBook]) -> Option<BibleBook> {
        let wanted = normalize_book_name(name);
        if wanted.is_empty() {
            return None;
        }

        let mut best: Option<(BibleBook, f64)> = None;
        for book in candidates.iter().copied() {
            let score = normalized_levenshtein(&wanted, &normalize_book_name(book.name()))
                .max(normalized_levenshtein(&wanted, &normalize_book_name(book.osis())));
            if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                best = Some((book, score));
            }
        }
        best.map(|(book, _)| book)
    }
}

impl fmt::Display for BibleBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.osis())
    }
}

/// Lowercase, strip spaces and dots, and turn a leading roman numeral
/// ("II Kings") into a digit.
pub(crate) fn normalize_book_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut parts = trimmed.split_whitespace();
    let first = parts.next().unwrap_or("");
    let numeral = match first.to_ascii_lowercase().as_str() {
        "i" | "1st" | "first" => Some("1"),
        "ii" | "2nd" | "second" => Some("2"),
        "iii" | "3rd" | "third" => Some("3"),
        "iv" | "4th" | "fourth" => Some("4"),
        _ => None,
    };

    let mut out = String::with_capacity(trimmed.len());
    match numeral {
        Some(digit) if parts.clone().next().is_some() => {
            out.push_str(digit);
            for part in parts {
                out.push_str(part);
            }
        }
        _ => out.push_str(trimmed),
    }

    out.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable_and_dense() {
        for (idx, book) in BibleBook::ALL.iter().enumerate() {
            assert_eq!(book.code() as usize, idx);
            assert_eq!(BibleBook::from_code(book.code()), Some(*book));
        }
        assert_eq!(BibleBook::COUNT, 86);
        assert_eq!(BibleBook::from_code(BibleBook::COUNT as u8), None);
        assert_eq!(BibleBook::ALL[BibleBook::COUNT - 1], BibleBook::En1);
        assert_eq!(BibleBook::from_code(BibleBook::COUNT as u8 - 1), Some(BibleBook::En1));
        assert_eq!(BibleBook::En1.osis(), "1En");
    }

    #[test]
    fn test_osis_and_names() {
        assert_eq!(BibleBook::Cor1.osis(), "1Cor");
        assert_eq!(BibleBook::Cor1.name(), "1 Corinthians");
        assert_eq!(BibleBook::from_osis("3john"), Some(BibleBook::John3));
        assert_eq!(BibleBook::from_osis("Nope"), None);
    }

    #[test]
    fn test_from_name_variants() {
        assert_eq!(BibleBook::from_name("Genesis"), Some(BibleBook::Gen));
        assert_eq!(BibleBook::from_name("gen"), Some(BibleBook::Gen));
        assert_eq!(BibleBook::from_name("Exo"), Some(BibleBook::Exod));
        assert_eq!(BibleBook::from_name("1 John"), Some(BibleBook::John1));
        assert_eq!(BibleBook::from_name("I John"), Some(BibleBook::John1));
        assert_eq!(BibleBook::from_name("III John"), Some(BibleBook::John3));
        assert_eq!(BibleBook::from_name("2Pet"), Some(BibleBook::Pet2));
        assert_eq!(BibleBook::from_name("Phil"), Some(BibleBook::Phil));
        assert_eq!(BibleBook::from_name("Philemon"), Some(BibleBook::Phlm));
        assert_eq!(BibleBook::from_name("Song of Songs"), Some(BibleBook::Song));
        assert_eq!(BibleBook::from_name("Rev."), Some(BibleBook::Rev));
        assert_eq!(BibleBook::from_name("Psalm"), Some(BibleBook::Ps));
        assert_eq!(BibleBook::from_name("Job"), Some(BibleBook::Job));
        assert_eq!(BibleBook::from_name("Qwerty"), None);
        assert_eq!(BibleBook::from_name(""), None);
    }

    #[test]
    fn test_lookup_respects_candidates() {
        let protestant = &BibleBook::ALL[..66];
        assert_eq!(BibleBook::lookup("Tobit", protestant), None);
        assert_eq!(BibleBook::lookup("Tobit", &BibleBook::ALL), Some(BibleBook::Tob));
    }

    #[test]
    fn test_suggest_close_names() {
        assert_eq!(BibleBook::suggest("Genisis", &BibleBook::ALL), Some(BibleBook::Gen));
        assert_eq!(BibleBook::suggest("Revelatoin", &BibleBook::ALL), Some(BibleBook::Rev));
        assert_eq!(BibleBook::suggest("zzzzzzzzzz", &BibleBook::ALL), None);
    }

    #[test]
    fn test_normalize_book_name() {
        assert_eq!(normalize_book_name(" II  Kings "), "2kings");
        assert_eq!(normalize_book_name("Song of Solomon"), "songofsolomon");
        assert_eq!(normalize_book_name("I"), "i");
    }
}
