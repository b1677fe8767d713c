//! Verse tables of the built-in versifications.
//!
//! The tables are plain data handed to [`Versification::new`]; variants
//! that differ from a base system in a few chapters are expressed as
//! override lists through [`Versification::derive`].

use std::sync::Arc;

use crate::bible_book::BibleBook;
use crate::error::AddressError;
use crate::registry::ReferenceSystemRegistry;
use crate::versification::{VerseCountOverride, Versification};

pub const KJV: &str = "KJV";
pub const NRSV: &str = "NRSV";
pub const LXX: &str = "LXX";

/// Names of every versification this crate can build.
pub const BUILTIN: &[&str] = &[KJV, NRSV, LXX];

// NRSV counts 3 John 1:15, Rev 12:18 and ends 2 Cor 13 at verse 13.
const NRSV_OVERRIDES: &[VerseCountOverride] = &[
    VerseCountOverride {
        book: BibleBook::Cor2,
        chapter: 13,
        verses: 13,
    },
    VerseCountOverride {
        book: BibleBook::John3,
        chapter: 1,
        verses: 15,
    },
    VerseCountOverride {
        book: BibleBook::Rev,
        chapter: 12,
        verses: 18,
    },
];

/// Canonical spelling of a built-in name, matched case-insensitively.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    BUILTIN
        .iter()
        .copied()
        .find(|builtin| builtin.eq_ignore_ascii_case(name.trim()))
}

/// Build a built-in versification from its tables.
pub fn versification(name: &str) -> Result<Versification, AddressError> {
    match canonical_name(name) {
        Some(KJV) => Ok(kjv()?),
        Some(NRSV) => Ok(Versification::derive(&kjv()?, NRSV, NRSV_OVERRIDES)?),
        Some(LXX) => Ok(Versification::new(
            LXX,
            LXX_BOOKS_OT,
            KJV_BOOKS_NT,
            LXX_LAST_VERSE_OT,
            LXX_LAST_VERSE_NT,
        )?),
        _ => Err(AddressError::UnknownVersification(name.to_string())),
    }
}

/// Fetch a built-in versification through `registry`, building it on
/// first use.
pub fn lookup(
    registry: &ReferenceSystemRegistry,
    name: &str,
) -> Result<Arc<Versification>, AddressError> {
    if let Some(found) = registry.get(name) {
        return Ok(found);
    }
    let canonical =
        canonical_name(name).ok_or_else(|| AddressError::UnknownVersification(name.to_string()))?;
    registry.get_or_try_build(canonical, || versification(canonical))
}

fn kjv() -> Result<Versification, crate::error::DefinitionError> {
    Versification::new(
        KJV,
        KJV_BOOKS_OT,
        KJV_BOOKS_NT,
        KJV_LAST_VERSE_OT,
        KJV_LAST_VERSE_NT,
    )
}

const KJV_BOOKS_OT: &[BibleBook] = &[
    BibleBook::Gen, BibleBook::Exod, BibleBook::Lev, BibleBook::Num, BibleBook::Deut,
    BibleBook::Josh, BibleBook::Judg, BibleBook::Ruth, BibleBook::Sam1, BibleBook::Sam2,
    BibleBook::Kgs1, BibleBook::Kgs2, BibleBook::Chr1, BibleBook::Chr2, BibleBook::Ezra,
    BibleBook::Neh, BibleBook::Esth, BibleBook::Job, BibleBook::Ps, BibleBook::Prov,
    BibleBook::Eccl, BibleBook::Song, BibleBook::Isa, BibleBook::Jer, BibleBook::Lam,
    BibleBook::Ezek, BibleBook::Dan, BibleBook::Hos, BibleBook::Joel, BibleBook::Amos,
    BibleBook::Obad, BibleBook::Jonah, BibleBook::Mic, BibleBook::Nah, BibleBook::Hab,
    BibleBook::Zeph, BibleBook::Hag, BibleBook::Zech, BibleBook::Mal,
];

const KJV_BOOKS_NT: &[BibleBook] = &[
    BibleBook::Matt, BibleBook::Mark, BibleBook::Luke, BibleBook::John, BibleBook::Acts,
    BibleBook::Rom, BibleBook::Cor1, BibleBook::Cor2, BibleBook::Gal, BibleBook::Eph,
    BibleBook::Phil, BibleBook::Col, BibleBook::Thess1, BibleBook::Thess2, BibleBook::Tim1,
    BibleBook::Tim2, BibleBook::Titus, BibleBook::Phlm, BibleBook::Heb, BibleBook::Jas,
    BibleBook::Pet1, BibleBook::Pet2, BibleBook::John1, BibleBook::John2, BibleBook::John3,
    BibleBook::Jude, BibleBook::Rev,
];

const KJV_LAST_VERSE_OT: &[&[u16]] = &[
    // Gen
    &[
        0, 31, 25, 24, 26, 32, 22, 24, 22, 29, 32, 32, 20, 18, 24, 21,
        16, 27, 33, 38, 18, 34, 24, 20, 67, 34, 35, 46, 22, 35, 43, 55,
        32, 20, 31, 29, 43, 36, 30, 23, 23, 57, 38, 34, 34, 28, 34, 31,
        22, 33, 26,
    ],
    // Exod
    &[
        0, 22, 25, 22, 31, 23, 30, 25, 32, 35, 29, 10, 51, 22, 31, 27,
        36, 16, 27, 25, 26, 36, 31, 33, 18, 40, 37, 21, 43, 46, 38, 18,
        35, 23, 35, 35, 38, 29, 31, 43, 38,
    ],
    // Lev
    &[
        0, 17, 16, 17, 35, 19, 30, 38, 36, 24, 20, 47, 8, 59, 57, 33,
        34, 16, 30, 37, 27, 24, 33, 44, 23, 55, 46, 34,
    ],
    // Num
    &[
        0, 54, 34, 51, 49, 31, 27, 89, 26, 23, 36, 35, 16, 33, 45, 41,
        50, 13, 32, 22, 29, 35, 41, 30, 25, 18, 65, 23, 31, 40, 16, 54,
        42, 56, 29, 34, 13,
    ],
    // Deut
    &[
        0, 46, 37, 29, 49, 33, 25, 26, 20, 29, 22, 32, 32, 18, 29, 23,
        22, 20, 22, 21, 20, 23, 30, 25, 22, 19, 19, 26, 68, 29, 20, 30,
        52, 29, 12,
    ],
    // Josh
    &[
        0, 18, 24, 17, 24, 15, 27, 26, 35, 27, 43, 23, 24, 33, 15, 63,
        10, 18, 28, 51, 9, 45, 34, 16, 33,
    ],
    // Judg
    &[
        0, 36, 23, 31, 24, 31, 40, 25, 35, 57, 18, 40, 15, 25, 20, 20,
        31, 13, 31, 30, 48, 25,
    ],
    // Ruth
    &[0, 22, 23, 18, 22],
    // Sam1
    &[
        0, 28, 36, 21, 22, 12, 21, 17, 22, 27, 27, 15, 25, 23, 52, 35,
        23, 58, 30, 24, 42, 15, 23, 29, 22, 44, 25, 12, 25, 11, 31, 13,
    ],
    // Sam2
    &[
        0, 27, 32, 39, 12, 25, 23, 29, 18, 13, 19, 27, 31, 39, 33, 37,
        23, 29, 33, 43, 26, 22, 51, 39, 25,
    ],
    // Kgs1
    &[
        0, 53, 46, 28, 34, 18, 38, 51, 66, 28, 29, 43, 33, 34, 31, 34,
        34, 24, 46, 21, 43, 29, 53,
    ],
    // Kgs2
    &[
        0, 18, 25, 27, 44, 27, 33, 20, 29, 37, 36, 21, 21, 25, 29, 38,
        20, 41, 37, 37, 21, 26, 20, 37, 20, 30,
    ],
    // Chr1
    &[
        0, 54, 55, 24, 43, 26, 81, 40, 40, 44, 14, 47, 40, 14, 17, 29,
        43, 27, 17, 19, 8, 30, 19, 32, 31, 31, 32, 34, 21, 30,
    ],
    // Chr2
    &[
        0, 17, 18, 17, 22, 14, 42, 22, 18, 31, 19, 23, 16, 22, 15, 19,
        14, 19, 34, 11, 37, 20, 12, 21, 27, 28, 23, 9, 27, 36, 27, 21,
        33, 25, 33, 27, 23,
    ],
    // Ezra
    &[0, 11, 70, 13, 24, 17, 22, 28, 36, 15, 44],
    // Neh
    &[0, 11, 20, 32, 23, 19, 19, 73, 18, 38, 39, 36, 47, 31],
    // Esth
    &[0, 22, 23, 15, 17, 14, 14, 10, 17, 32, 3],
    // Job
    &[
        0, 22, 13, 26, 21, 27, 30, 21, 22, 35, 22, 20, 25, 28, 22, 35,
        22, 16, 21, 29, 29, 34, 30, 17, 25, 6, 14, 23, 28, 25, 31, 40,
        22, 33, 37, 16, 33, 24, 41, 30, 24, 34, 17,
    ],
    // Ps
    &[
        0, 6, 12, 8, 8, 12, 10, 17, 9, 20, 18, 7, 8, 6, 7, 5,
        11, 15, 50, 14, 9, 13, 31, 6, 10, 22, 12, 14, 9, 11, 12, 24,
        11, 22, 22, 28, 12, 40, 22, 13, 17, 13, 11, 5, 26, 17, 11, 9,
        14, 20, 23, 19, 9, 6, 7, 23, 13, 11, 11, 17, 12, 8, 12, 11,
        10, 13, 20, 7, 35, 36, 5, 24, 20, 28, 23, 10, 12, 20, 72, 13,
        19, 16, 8, 18, 12, 13, 17, 7, 18, 52, 17, 16, 15, 5, 23, 11,
        13, 12, 9, 9, 5, 8, 28, 22, 35, 45, 48, 43, 13, 31, 7, 10,
        10, 9, 8, 18, 19, 2, 29, 176, 7, 8, 9, 4, 8, 5, 6, 5,
        6, 8, 8, 3, 18, 3, 3, 21, 26, 9, 8, 24, 13, 10, 7, 12,
        15, 21, 10, 20, 14, 9, 6,
    ],
    // Prov
    &[
        0, 33, 22, 35, 27, 23, 35, 27, 36, 18, 32, 31, 28, 25, 35, 33,
        33, 28, 24, 29, 30, 31, 29, 35, 34, 28, 28, 27, 28, 27, 33, 31,
    ],
    // Eccl
    &[0, 18, 26, 22, 16, 20, 12, 29, 17, 18, 20, 10, 14],
    // Song
    &[0, 17, 17, 11, 16, 16, 13, 13, 14],
    // Isa
    &[
        0, 31, 22, 26, 6, 30, 13, 25, 22, 21, 34, 16, 6, 22, 32, 9,
        14, 14, 7, 25, 6, 17, 25, 18, 23, 12, 21, 13, 29, 24, 33, 9,
        20, 24, 17, 10, 22, 38, 22, 8, 31, 29, 25, 28, 28, 25, 13, 15,
        22, 26, 11, 23, 15, 12, 17, 13, 12, 21, 14, 21, 22, 11, 12, 19,
        12, 25, 24,
    ],
    // Jer
    &[
        0, 19, 37, 25, 31, 31, 30, 34, 22, 26, 25, 23, 17, 27, 22, 21,
        21, 27, 23, 15, 18, 14, 30, 40, 10, 38, 24, 22, 17, 32, 24, 40,
        44, 26, 22, 19, 32, 21, 28, 18, 16, 18, 22, 13, 30, 5, 28, 7,
        47, 39, 46, 64, 34,
    ],
    // Lam
    &[0, 22, 22, 66, 22, 22],
    // Ezek
    &[
        0, 28, 10, 27, 17, 17, 14, 27, 18, 11, 22, 25, 28, 23, 23, 8,
        63, 24, 32, 14, 49, 32, 31, 49, 27, 17, 21, 36, 26, 21, 26, 18,
        32, 33, 31, 15, 38, 28, 23, 29, 49, 26, 20, 27, 31, 25, 24, 23,
        35,
    ],
    // Dan
    &[0, 21, 49, 30, 37, 31, 28, 28, 27, 27, 21, 45, 13],
    // Hos
    &[0, 11, 23, 5, 19, 15, 11, 16, 14, 17, 15, 12, 14, 16, 9],
    // Joel
    &[0, 20, 32, 21],
    // Amos
    &[0, 15, 16, 15, 13, 27, 14, 17, 14, 15],
    // Obad
    &[0, 21],
    // Jonah
    &[0, 17, 10, 10, 11],
    // Mic
    &[0, 16, 13, 12, 13, 15, 16, 20],
    // Nah
    &[0, 15, 13, 19],
    // Hab
    &[0, 17, 20, 19],
    // Zeph
    &[0, 18, 15, 20],
    // Hag
    &[0, 15, 23],
    // Zech
    &[0, 21, 13, 10, 14, 11, 15, 14, 23, 17, 12, 17, 14, 9, 21],
    // Mal
    &[0, 14, 17, 18, 6],
];

const KJV_LAST_VERSE_NT: &[&[u16]] = &[
    // Matt
    &[
        0, 25, 23, 17, 25, 48, 34, 29, 34, 38, 42, 30, 50, 58, 36, 39,
        28, 27, 35, 30, 34, 46, 46, 39, 51, 46, 75, 66, 20,
    ],
    // Mark
    &[
        0, 45, 28, 35, 41, 43, 56, 37, 38, 50, 52, 33, 44, 37, 72, 47,
        20,
    ],
    // Luke
    &[
        0, 80, 52, 38, 44, 39, 49, 50, 56, 62, 42, 54, 59, 35, 35, 32,
        31, 37, 43, 48, 47, 38, 71, 56, 53,
    ],
    // John
    &[
        0, 51, 25, 36, 54, 47, 71, 53, 59, 41, 42, 57, 50, 38, 31, 27,
        33, 26, 40, 42, 31, 25,
    ],
    // Acts
    &[
        0, 26, 47, 26, 37, 42, 15, 60, 40, 43, 48, 30, 25, 52, 28, 41,
        40, 34, 28, 41, 38, 40, 30, 35, 27, 27, 32, 44, 31,
    ],
    // Rom
    &[
        0, 32, 29, 31, 25, 21, 23, 25, 39, 33, 21, 36, 21, 14, 23, 33,
        27,
    ],
    // Cor1
    &[
        0, 31, 16, 23, 21, 13, 20, 40, 13, 27, 33, 34, 31, 13, 40, 58,
        24,
    ],
    // Cor2
    &[0, 24, 17, 18, 18, 21, 18, 16, 24, 15, 18, 33, 21, 14],
    // Gal
    &[0, 24, 21, 29, 31, 26, 18],
    // Eph
    &[0, 23, 22, 21, 32, 33, 24],
    // Phil
    &[0, 30, 30, 21, 23],
    // Col
    &[0, 29, 23, 25, 18],
    // Thess1
    &[0, 10, 20, 13, 18, 28],
    // Thess2
    &[0, 12, 17, 18],
    // Tim1
    &[0, 20, 15, 16, 16, 25, 21],
    // Tim2
    &[0, 18, 26, 17, 22],
    // Titus
    &[0, 16, 15, 15],
    // Phlm
    &[0, 25],
    // Heb
    &[0, 14, 18, 19, 16, 14, 20, 28, 13, 28, 39, 40, 29, 25],
    // Jas
    &[0, 27, 26, 18, 17, 20],
    // Pet1
    &[0, 25, 25, 22, 19, 14],
    // Pet2
    &[0, 21, 22, 18],
    // John1
    &[0, 10, 29, 24, 21, 21],
    // John2
    &[0, 13],
    // John3
    &[0, 14],
    // Jude
    &[0, 25],
    // Rev
    &[
        0, 20, 29, 22, 11, 14, 17, 17, 13, 21, 11, 19, 17, 18, 20, 8,
        21, 18, 24, 21, 15, 27, 21,
    ],
];

const LXX_BOOKS_OT: &[BibleBook] = &[
    BibleBook::Gen, BibleBook::Exod, BibleBook::Lev, BibleBook::Num, BibleBook::Deut,
    BibleBook::Josh, BibleBook::Judg, BibleBook::Ruth, BibleBook::Sam1, BibleBook::Sam2,
    BibleBook::Kgs1, BibleBook::Kgs2, BibleBook::Chr1, BibleBook::Chr2, BibleBook::Esd1,
    BibleBook::Ezra, BibleBook::Neh, BibleBook::Esth, BibleBook::Jdt, BibleBook::Tob,
    BibleBook::Macc1, BibleBook::Macc2, BibleBook::Macc3, BibleBook::Macc4, BibleBook::Ps,
    BibleBook::PrMan, BibleBook::Prov, BibleBook::Eccl, BibleBook::Song, BibleBook::Job,
    BibleBook::Wis, BibleBook::Sir, BibleBook::PssSol, BibleBook::Hos, BibleBook::Amos,
    BibleBook::Mic, BibleBook::Joel, BibleBook::Obad, BibleBook::Jonah, BibleBook::Nah,
    BibleBook::Hab, BibleBook::Zeph, BibleBook::Hag, BibleBook::Zech, BibleBook::Mal,
    BibleBook::Isa, BibleBook::Jer, BibleBook::Bar, BibleBook::Lam, BibleBook::EpJer,
    BibleBook::Ezek, BibleBook::PrAzar, BibleBook::Sus, BibleBook::Dan, BibleBook::Bel,
    BibleBook::En1, BibleBook::Odes,
];

const LXX_LAST_VERSE_OT: &[&[u16]] = &[
    // Gen
    &[
        0, 31, 25, 25, 26, 32, 23, 24, 22, 29, 32, 32, 20, 18, 24, 21,
        16, 27, 33, 39, 18, 34, 24, 20, 67, 34, 35, 46, 22, 35, 43, 55,
        33, 20, 31, 29, 44, 36, 30, 23, 23, 57, 39, 34, 34, 28, 34, 31,
        22, 33, 26,
    ],
    // Exod
    &[
        0, 22, 25, 22, 31, 23, 30, 29, 32, 35, 29, 10, 51, 22, 31, 27,
        36, 16, 27, 25, 26, 37, 31, 33, 18, 40, 37, 21, 43, 46, 38, 18,
        35, 23, 35, 35, 40, 21, 29, 23, 38,
    ],
    // Lev
    &[
        0, 17, 16, 17, 35, 26, 40, 38, 36, 24, 20, 47, 8, 59, 57, 33,
        34, 16, 30, 37, 27, 24, 33, 44, 23, 55, 46, 34,
    ],
    // Num
    &[
        0, 54, 34, 51, 49, 31, 27, 89, 26, 23, 36, 35, 16, 34, 45, 41,
        50, 28, 32, 22, 29, 35, 41, 30, 25, 18, 65, 23, 31, 40, 17, 54,
        42, 56, 29, 34, 13,
    ],
    // Deut
    &[
        0, 46, 37, 29, 49, 33, 25, 26, 20, 29, 22, 32, 32, 19, 29, 23,
        22, 20, 22, 21, 20, 23, 30, 26, 24, 19, 19, 27, 69, 29, 20, 30,
        52, 29, 12,
    ],
    // Josh
    &[
        0, 18, 24, 17, 24, 16, 27, 26, 35, 33, 43, 23, 24, 33, 15, 64,
        10, 18, 28, 54, 9, 49, 34, 16, 36,
    ],
    // Judg
    &[
        0, 36, 23, 31, 24, 32, 40, 25, 35, 57, 18, 40, 15, 25, 20, 20,
        31, 13, 32, 30, 48, 25,
    ],
    // Ruth
    &[0, 22, 23, 18, 22],
    // Sam1
    &[
        0, 28, 36, 21, 22, 12, 21, 17, 22, 27, 27, 15, 25, 23, 52, 35,
        23, 58, 30, 24, 43, 16, 23, 29, 23, 44, 25, 12, 25, 11, 32, 13,
    ],
    // Sam2
    &[
        0, 27, 32, 39, 12, 26, 23, 29, 18, 13, 19, 27, 31, 39, 33, 37,
        23, 29, 33, 44, 26, 22, 51, 41, 25,
    ],
    // Kgs1
    &[
        0, 53, 71, 39, 34, 32, 38, 51, 66, 28, 33, 44, 54, 34, 31, 34,
        42, 24, 46, 21, 43, 43, 54,
    ],
    // Kgs2
    &[
        0, 22, 25, 27, 44, 27, 35, 20, 29, 37, 36, 21, 22, 25, 29, 38,
        20, 41, 37, 37, 21, 26, 20, 37, 20, 30,
    ],
    // Chr1
    &[
        0, 54, 55, 24, 43, 41, 81, 40, 40, 44, 14, 47, 41, 14, 17, 29,
        43, 27, 17, 19, 8, 30, 19, 32, 31, 31, 32, 34, 21, 30,
    ],
    // Chr2
    &[
        0, 18, 18, 17, 23, 14, 42, 22, 18, 31, 19, 23, 16, 23, 15, 19,
        14, 19, 34, 11, 37, 20, 12, 21, 27, 28, 23, 9, 27, 36, 27, 21,
        33, 25, 33, 31, 31,
    ],
    // Esd1
    &[0, 58, 30, 24, 63, 73, 34, 15, 96, 55],
    // Ezra
    &[0, 11, 70, 13, 24, 17, 22, 28, 36, 15, 44],
    // Neh
    &[0, 11, 20, 37, 23, 19, 19, 73, 18, 38, 40, 36, 47, 31],
    // Esth
    &[
        0, 22, 23, 15, 17, 22, 14, 10, 17, 35, 13, 17, 7, 30, 19, 24,
        24,
    ],
    // Jdt
    &[
        0, 16, 28, 10, 15, 24, 21, 32, 36, 14, 23, 23, 20, 20, 19, 14,
        25,
    ],
    // Tob
    &[0, 22, 14, 17, 21, 23, 19, 18, 21, 6, 14, 19, 22, 19, 15],
    // Macc1
    &[
        0, 64, 70, 60, 61, 68, 63, 50, 32, 73, 89, 74, 53, 54, 49, 41,
        24,
    ],
    // Macc2
    &[0, 36, 32, 40, 50, 27, 31, 42, 36, 29, 38, 38, 46, 26, 46, 39],
    // Macc3
    &[0, 29, 33, 30, 21, 51, 41, 23],
    // Macc4
    &[
        0, 35, 24, 21, 26, 38, 35, 25, 29, 32, 21, 27, 20, 27, 20, 32,
        25, 24, 24,
    ],
    // Ps
    &[
        0, 6, 13, 9, 9, 13, 11, 18, 10, 40, 8, 9, 6, 7, 6, 11,
        15, 51, 15, 10, 14, 32, 6, 10, 22, 12, 14, 9, 11, 13, 25, 11,
        22, 23, 28, 13, 40, 23, 14, 18, 14, 12, 6, 27, 18, 12, 10, 15,
        21, 23, 21, 11, 7, 9, 24, 14, 12, 12, 19, 14, 9, 13, 12, 11,
        14, 20, 8, 36, 37, 7, 24, 20, 28, 23, 11, 13, 21, 72, 13, 20,
        17, 8, 19, 13, 14, 17, 7, 19, 53, 17, 16, 16, 5, 23, 11, 13,
        12, 9, 9, 5, 8, 29, 22, 36, 45, 48, 43, 14, 31, 7, 10, 10,
        9, 26, 18, 19, 2, 29, 176, 7, 8, 9, 4, 8, 5, 7, 5, 6,
        8, 8, 3, 18, 3, 3, 21, 26, 9, 8, 24, 15, 10, 8, 12, 15,
        22, 10, 11, 20, 14, 9, 6, 7,
    ],
    // PrMan
    &[0, 15],
    // Prov
    &[
        0, 35, 23, 38, 28, 23, 40, 28, 37, 25, 33, 31, 31, 27, 36, 38,
        33, 30, 24, 29, 30, 31, 31, 36, 77, 31, 29, 29, 30, 49, 35, 31,
    ],
    // Eccl
    &[0, 18, 26, 22, 17, 20, 12, 30, 17, 18, 20, 10, 14],
    // Song
    &[0, 17, 17, 11, 16, 17, 13, 14, 15],
    // Job
    &[
        0, 22, 18, 26, 21, 27, 30, 22, 22, 35, 22, 20, 25, 28, 22, 35,
        23, 16, 21, 29, 29, 34, 30, 17, 25, 6, 14, 23, 28, 25, 31, 40,
        22, 33, 37, 16, 34, 24, 41, 35, 32, 34, 22,
    ],
    // Wis
    &[
        0, 16, 25, 19, 20, 24, 27, 30, 21, 19, 21, 27, 27, 19, 31, 19,
        29, 21, 25, 22,
    ],
    // Sir
    &[
        0, 30, 18, 31, 31, 15, 37, 36, 19, 18, 31, 34, 18, 26, 27, 20,
        30, 32, 33, 31, 32, 28, 27, 28, 34, 26, 29, 30, 26, 28, 40, 31,
        26, 33, 31, 26, 31, 31, 35, 35, 30, 27, 27, 33, 24, 26, 20, 25,
        25, 16, 29, 30,
    ],
    // PssSol
    &[
        0, 8, 41, 16, 29, 22, 9, 10, 40, 20, 9, 9, 8, 12, 10, 15,
        15, 51, 14,
    ],
    // Hos
    &[0, 11, 25, 5, 19, 15, 12, 16, 14, 17, 15, 12, 15, 16, 10],
    // Amos
    &[0, 15, 16, 15, 13, 27, 15, 17, 14, 15],
    // Mic
    &[0, 16, 13, 12, 14, 15, 16, 20],
    // Joel
    &[0, 20, 32, 21, 21],
    // Obad
    &[0, 21],
    // Jonah
    &[0, 17, 11, 10, 11],
    // Nah
    &[0, 15, 14, 19],
    // Hab
    &[0, 17, 20, 19],
    // Zeph
    &[0, 18, 15, 21],
    // Hag
    &[0, 15, 24],
    // Zech
    &[0, 21, 17, 11, 14, 11, 15, 14, 23, 17, 12, 17, 14, 9, 21],
    // Mal
    &[0, 14, 17, 24, 6],
    // Isa
    &[
        0, 31, 22, 26, 6, 30, 13, 25, 23, 21, 34, 16, 6, 22, 32, 9,
        14, 14, 7, 25, 6, 17, 25, 18, 23, 12, 21, 13, 29, 24, 33, 9,
        20, 24, 17, 10, 22, 38, 22, 8, 31, 29, 25, 28, 28, 26, 13, 15,
        22, 26, 11, 23, 15, 12, 17, 13, 12, 21, 14, 21, 22, 11, 12, 20,
        12, 25, 24,
    ],
    // Jer
    &[
        0, 19, 37, 25, 31, 31, 30, 34, 23, 26, 25, 23, 17, 27, 22, 21,
        21, 27, 23, 15, 18, 14, 30, 42, 10, 39, 28, 46, 64, 31, 33, 47,
        44, 24, 22, 19, 32, 24, 40, 44, 26, 22, 22, 32, 30, 28, 28, 16,
        44, 38, 46, 63, 34,
    ],
    // Bar
    &[0, 22, 35, 38, 37, 9],
    // Lam
    &[0, 22, 22, 66, 22, 22],
    // EpJer
    &[0, 73],
    // Ezek
    &[
        0, 28, 13, 27, 17, 17, 14, 27, 18, 11, 22, 25, 28, 23, 23, 8,
        63, 24, 32, 14, 49, 37, 31, 49, 27, 17, 21, 36, 26, 21, 26, 18,
        32, 33, 31, 15, 38, 28, 23, 29, 49, 26, 20, 27, 31, 25, 24, 23,
        35,
    ],
    // PrAzar
    &[0, 68],
    // Sus
    &[0, 64],
    // Dan
    &[0, 21, 49, 100, 37, 31, 29, 28, 27, 27, 21, 45, 13],
    // Bel
    &[0, 42],
    // En1
    &[
        0, 9, 3, 1, 1, 10, 8, 6, 4, 11, 22, 2, 6, 10, 25, 12,
        4, 8, 16, 3, 8, 10, 14, 4, 6, 7, 6, 5, 3, 2, 3, 3,
        6, 4, 3, 1, 4, 6, 6, 14, 10, 9, 3, 4, 1, 6, 8, 4,
        10, 4, 5, 5, 9, 7, 10, 4, 8, 3, 6, 3, 25, 13, 16, 12,
        2, 12, 3, 13, 5, 30, 4, 17, 37, 8, 17, 9, 14, 9, 17, 6,
        8, 10, 20, 11, 6, 10, 6, 4, 3, 77, 43, 19, 17, 14, 11, 7,
        8, 10, 16, 16, 13, 9, 11, 15, 13, 2, 19, 3, 15,
    ],
    // Odes
    &[0, 19, 43, 10, 20, 20, 19, 45, 88, 79, 88, 55, 32, 79, 46],
];

const LXX_LAST_VERSE_NT: &[&[u16]] = &[
    // Matt
    &[
        0, 25, 23, 17, 25, 48, 34, 29, 34, 38, 42, 30, 50, 58, 36, 39,
        28, 27, 35, 30, 34, 46, 46, 39, 51, 46, 75, 66, 20,
    ],
    // Mark
    &[
        0, 45, 28, 35, 41, 43, 56, 37, 38, 50, 52, 33, 44, 37, 72, 47,
        20,
    ],
    // Luke
    &[
        0, 80, 52, 38, 44, 39, 49, 50, 56, 62, 42, 54, 59, 35, 35, 32,
        31, 37, 43, 48, 47, 38, 71, 56, 53,
    ],
    // John
    &[
        0, 52, 25, 36, 54, 47, 71, 53, 59, 41, 42, 57, 50, 38, 31, 27,
        33, 26, 40, 42, 31, 25,
    ],
    // Acts
    &[
        0, 26, 47, 26, 37, 42, 15, 60, 40, 43, 48, 30, 25, 52, 28, 41,
        40, 34, 28, 41, 38, 40, 30, 35, 27, 27, 32, 44, 31,
    ],
    // Rom
    &[
        0, 32, 29, 31, 25, 21, 23, 25, 39, 33, 21, 36, 21, 14, 26, 33,
        27,
    ],
    // Cor1
    &[
        0, 31, 16, 23, 21, 13, 20, 40, 13, 27, 33, 34, 31, 13, 40, 58,
        24,
    ],
    // Cor2
    &[0, 24, 17, 18, 18, 21, 18, 16, 24, 15, 18, 33, 21, 14],
    // Gal
    &[0, 24, 21, 29, 31, 26, 18],
    // Eph
    &[0, 23, 22, 21, 32, 33, 24],
    // Phil
    &[0, 30, 30, 21, 23],
    // Col
    &[0, 29, 23, 25, 18],
    // Thess1
    &[0, 10, 20, 13, 18, 28],
    // Thess2
    &[0, 12, 17, 18],
    // Tim1
    &[0, 20, 15, 16, 16, 25, 21],
    // Tim2
    &[0, 18, 26, 17, 22],
    // Titus
    &[0, 16, 15, 15],
    // Phlm
    &[0, 25],
    // Heb
    &[0, 14, 18, 19, 16, 14, 20, 28, 13, 28, 39, 40, 29, 25],
    // Jas
    &[0, 27, 26, 18, 17, 20],
    // Pet1
    &[0, 25, 25, 22, 19, 14],
    // Pet2
    &[0, 21, 22, 18],
    // John1
    &[0, 10, 29, 24, 21, 21],
    // John2
    &[0, 13],
    // John3
    &[0, 15],
    // Jude
    &[0, 25],
    // Rev
    &[
        0, 20, 29, 22, 11, 14, 17, 17, 13, 21, 11, 19, 18, 18, 20, 9,
        21, 18, 24, 21, 15, 27, 21,
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versification::Testament;

    #[test]
    fn test_kjv_totals() {
        let kjv = versification("KJV").unwrap();
        assert_eq!(kjv.books().len(), 66);
        assert_eq!(kjv.testament_verse_count(Testament::Old), 23145);
        assert_eq!(kjv.testament_verse_count(Testament::New), 7957);
        assert_eq!(kjv.total_verse_count(), 31102);
        assert_eq!(kjv.chapters_in_book(BibleBook::Ps), 150);
        assert_eq!(kjv.verses_in_chapter(BibleBook::Ps, 119), 176);
        assert_eq!(kjv.ordinal(BibleBook::Rev, 22, 21), Ok(31102));
    }

    #[test]
    fn test_nrsv_diverges_from_kjv() {
        let kjv = versification("KJV").unwrap();
        let nrsv = versification("nrsv").unwrap();
        assert_eq!(nrsv.name(), "NRSV");
        assert!(nrsv.validate(BibleBook::John3, 1, 15).is_ok());
        assert_eq!(
            kjv.validate(BibleBook::John3, 1, 15),
            Err(AddressError::OutOfRange {
                book: BibleBook::John3,
                chapter: 1,
                verse: 15,
                max: 14
            })
        );
        assert_eq!(
            nrsv.total_verse_count(),
            kjv.total_verse_count() + 1
        );
    }

    #[test]
    fn test_lxx_orders_books_differently() {
        let lxx = versification("LXX").unwrap();
        assert_eq!(lxx.books_in(Testament::Old).len(), 57);
        assert!(lxx.contains_book(BibleBook::Tob));
        assert!(lxx.book_position(BibleBook::Esd1) < lxx.book_position(BibleBook::Ezra));
        let kjv = versification("KJV").unwrap();
        assert!(!kjv.contains_book(BibleBook::Tob));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            versification("Vulgate"),
            Err(AddressError::UnknownVersification("Vulgate".to_string()))
        );
    }

    #[test]
    fn test_lookup_caches_in_registry() {
        let registry = ReferenceSystemRegistry::new();
        let first = lookup(&registry, "kjv").unwrap();
        let second = lookup(&registry, "KJV").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.names(), vec!["KJV".to_string()]);
        assert!(lookup(&registry, "Vulgate").is_err());
    }
}
