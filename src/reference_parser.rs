use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock};

use crate::bible_book::BibleBook;
use crate::error::{AddressError, ParseError};
use crate::passage::Passage;
use crate::verse::{RefContext, RefLevel, VerseRange};
use crate::versification::Versification;

/// Turns `"Gen 1:1-5, 8; Exod 2"` style text into a [`Passage`].
pub struct ReferenceParser {
    separator_pattern: Regex,
    dash_pattern: Regex,
    side_pattern: Regex,
}

/// One side of a dash, resolved to ordinals.
struct Side {
    start: u32,
    end: u32,
    context: RefContext,
}

impl ReferenceParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(ReferenceParser {
            separator_pattern: Regex::new(r"[,;]")?,
            dash_pattern: Regex::new(r"[-–—]")?,
            side_pattern: Regex::new(
                r"^(?P<book>(?:[1-4]\s*)?[A-Za-z][A-Za-z .]*?)?\s*(?P<chapter>\d+)?(?:\s*[:.]\s*(?P<verse>\d+))?$",
            )?,
        })
    }

    pub(crate) fn shared() -> Result<&'static ReferenceParser, ParseError> {
        static SHARED: OnceLock<Result<ReferenceParser, regex::Error>> = OnceLock::new();
        SHARED
            .get_or_init(ReferenceParser::new)
            .as_ref()
            .map_err(|e| ParseError::Pattern(e.to_string()))
    }

    pub fn parse(&self, text: &str, v11n: &Arc<Versification>) -> Result<Passage, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut passage = Passage::new(v11n);
        let mut context: Option<RefContext> = None;

        for token in self.separator_pattern.split(text) {
            let token = token.trim();
            if token.is_empty() {
                return Err(malformed(text, "empty entry between separators"));
            }

            let sides: Vec<&str> = self.dash_pattern.split(token).map(str::trim).collect();
            if sides.len() > 2 {
                return Err(malformed(token, "more than one dash"));
            }
            if sides.iter().any(|side| side.is_empty()) {
                return Err(malformed(token, "dangling dash"));
            }

            let left = self.side(sides[0], token, context, v11n, false)?;
            let (start, end, after) = match sides.get(1) {
                Some(right) => {
                    let right = self.side(right, token, Some(left.context), v11n, true)?;
                    (left.start, right.end, right.context)
                }
                None => (left.start, left.end, left.context),
            };
            if end < start {
                return Err(malformed(token, "range is inverted"));
            }

            passage.add(&VerseRange::from_checked(v11n, start, end))?;
            context = Some(after);
        }

        Ok(passage)
    }

    fn side(
        &self,
        raw: &str,
        token: &str,
        context: Option<RefContext>,
        v11n: &Arc<Versification>,
        is_end: bool,
    ) -> Result<Side, ParseError> {
        let caps = self
            .side_pattern
            .captures(raw)
            .ok_or_else(|| malformed(token, "not a book, chapter or verse reference"))?;

        let book_text = caps
            .name("book")
            .map(|m| m.as_str().trim().trim_end_matches(['.', ' ']))
            .filter(|s| !s.is_empty());
        let chapter = number(&caps, "chapter", token)?;
        let verse = number(&caps, "verse", token)?;

        let book = match book_text {
            Some(name) => Some(resolve_book(name, v11n)?),
            None => None,
        };

        match (book, chapter, verse) {
            (Some(book), None, None) => {
                let start = v11n.first_ordinal_in_book(book)?;
                let end = v11n.last_ordinal_in_book(book)?;
                Ok(Side {
                    start,
                    end,
                    context: RefContext {
                        book,
                        chapter: v11n.chapters_in_book(book),
                        level: RefLevel::Book,
                    },
                })
            }
            (Some(book), Some(chapter), None) => chapter_side(v11n, book, chapter),
            (Some(book), Some(chapter), Some(verse)) => verse_side(v11n, book, chapter, verse),
            (None, Some(n), None) => {
                let context = context.ok_or_else(|| malformed(token, "no book to inherit"))?;
                if context.level == RefLevel::Verse {
                    verse_side(v11n, context.book, context.chapter, n)
                } else {
                    chapter_side(v11n, context.book, n)
                }
            }
            (None, Some(chapter), Some(verse)) => {
                let context = context.ok_or_else(|| malformed(token, "no book to inherit"))?;
                verse_side(v11n, context.book, chapter, verse)
            }
            _ if is_end => Err(malformed(token, "range end is not a reference")),
            _ => Err(malformed(token, "verse given without a chapter")),
        }
    }
}

fn malformed(token: &str, reason: &str) -> ParseError {
    ParseError::MalformedRange {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}

fn number(caps: &Captures<'_>, group: &str, token: &str) -> Result<Option<u16>, ParseError> {
    match caps.name(group) {
        Some(m) => m
            .as_str()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| malformed(token, "number is too large")),
        None => Ok(None),
    }
}

fn chapter_side(v11n: &Versification, book: BibleBook, chapter: u16) -> Result<Side, ParseError> {
    let start = v11n.first_ordinal_in_chapter(book, chapter)?;
    let end = v11n.last_ordinal_in_chapter(book, chapter)?;
    Ok(Side {
        start,
        end,
        context: RefContext {
            book,
            chapter,
            level: RefLevel::Chapter,
        },
    })
}

fn verse_side(v11n: &Versification, book: BibleBook, chapter: u16, verse: u16) -> Result<Side, ParseError> {
    let ordinal = v11n.ordinal(book, chapter, verse)?;
    Ok(Side {
        start: ordinal,
        end: ordinal,
        context: RefContext {
            book,
            chapter,
            level: RefLevel::Verse,
        },
    })
}

/// Book named in `v11n`; a real book missing from this system is an
/// address error, anything else is unknown.
fn resolve_book(name: &str, v11n: &Versification) -> Result<BibleBook, ParseError> {
    if let Some(book) = BibleBook::lookup(name, v11n.books()) {
        return Ok(book);
    }
    if let Some(book) = BibleBook::from_name(name) {
        return Err(ParseError::VerseOutOfRange(AddressError::BookNotInVersification {
            book,
            versification: v11n.name().to_string(),
        }));
    }
    Err(ParseError::UnknownBook {
        name: name.to_string(),
        suggestion: BibleBook::suggest(name, v11n.books()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon;

    fn kjv() -> Arc<Versification> {
        Arc::new(canon::versification("KJV").unwrap())
    }

    fn parse(text: &str) -> Result<Passage, ParseError> {
        ReferenceParser::new().unwrap().parse(text, &kjv())
    }

    fn ordinals(passage: &Passage) -> Vec<(u32, u32)> {
        passage
            .ranges()
            .iter()
            .map(|r| (r.start_ordinal(), r.end_ordinal()))
            .collect()
    }

    #[test]
    fn test_verse_list_inherits_chapter() {
        let p = parse("Gen 1:1-5, 8").unwrap();
        assert_eq!(ordinals(&p), vec![(1, 5), (8, 8)]);
        assert_eq!(p.verse_count(), 6);
    }

    #[test]
    fn test_chapter_and_book_forms() {
        assert_eq!(parse("Gen 2").unwrap().verse_count(), 25);
        assert_eq!(parse("Gen 1-2").unwrap().verse_count(), 56);
        assert_eq!(parse("Jude").unwrap().verse_count(), 25);
        assert_eq!(parse("Gen 1, 3").unwrap().range_count(), 2);
        let p = parse("Gen 1:31-2:2").unwrap();
        assert_eq!(ordinals(&p), vec![(31, 33)]);
    }

    #[test]
    fn test_book_name_spellings() {
        let expected = parse("1Cor 13:4").unwrap();
        assert_eq!(parse("1 Corinthians 13:4").unwrap(), expected);
        assert_eq!(parse("I Cor 13.4").unwrap(), expected);
        assert_eq!(parse("1Cor.13.4").unwrap(), expected);
        assert_eq!(parse("Song of Solomon 2:1").unwrap().verse_count(), 1);
    }

    #[test]
    fn test_semicolon_separator_and_cross_book() {
        let p = parse("Gen 50:26-Exod 1:2; Rev 22:21").unwrap();
        assert_eq!(p.verse_count(), 4);
        assert_eq!(p.range_count(), 2);
    }

    #[test]
    fn test_unknown_book_suggests() {
        match parse("Genisis 1:1") {
            Err(ParseError::UnknownBook { name, suggestion }) => {
                assert_eq!(name, "Genisis");
                assert_eq!(suggestion, Some(BibleBook::Gen));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_book_outside_versification() {
        assert!(matches!(
            parse("Tobit 1:1"),
            Err(ParseError::VerseOutOfRange(AddressError::BookNotInVersification { .. }))
        ));
    }

    #[test]
    fn test_out_of_range_is_delegated() {
        assert!(matches!(
            parse("3John 1:15"),
            Err(ParseError::VerseOutOfRange(AddressError::OutOfRange { max: 14, .. }))
        ));
        assert!(matches!(
            parse("Gen 51"),
            Err(ParseError::VerseOutOfRange(AddressError::OutOfRange { max: 50, .. }))
        ));
    }

    #[test]
    fn test_malformed_inputs() {
        for text in ["Gen 1:1-", "Gen 1:1-3-5", "Gen 1:5-1", "5", "Gen 1:1,,2", "Gen 1:", "Gen 99999"] {
            assert!(
                matches!(parse(text), Err(ParseError::MalformedRange { .. })),
                "{} should be malformed",
                text
            );
        }
        assert_eq!(parse("   "), Err(ParseError::Empty));
    }
}
