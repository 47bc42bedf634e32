//! Conversion between the 14 digit encoded scripture locations used by the
//! source data and canonical `BOOK CH:VERSE!WORD` references.
//!
//! Encoded layout: `BBB CCC VVV SS WWW`
//! - `BBB` book number (1-based, see `BOOKS`)
//! - `CCC` chapter, `VVV` verse
//! - `SS` sub-verse part, ignored
//! - `WWW` word position, twice the 1-based word index. Odd values mark
//!   apparatus-only words not present in the running text.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Book codes in canonical order, book number = position + 1.
pub static BOOKS: [&str; 123] = [
    "GEN", "EXO", "LEV", "NUM", "DEU", "JOS", "JDG", "RUT", "1SA", "2SA",
    "1KI", "2KI", "1CH", "2CH", "EZR", "NEH", "EST", "JOB", "PSA", "PRO",
    "ECC", "SNG", "ISA", "JER", "LAM", "EZK", "DAN", "HOS", "JOL", "AMO",
    "OBA", "JON", "MIC", "NAM", "HAB", "ZEP", "HAG", "ZEC", "MAL", "MAT",
    "MRK", "LUK", "JHN", "ACT", "ROM", "1CO", "2CO", "GAL", "EPH", "PHP",
    "COL", "1TH", "2TH", "1TI", "2TI", "TIT", "PHM", "HEB", "JAS", "1PE",
    "2PE", "1JN", "2JN", "3JN", "JUD", "REV", "TOB", "JDT", "ESG", "WIS",
    "SIR", "BAR", "LJE", "S3Y", "SUS", "BEL", "1MA", "2MA", "3MA", "4MA",
    "1ES", "2ES", "MAN", "PS2", "ODA", "PSS", "JSA", "JDB", "TBS", "SST",
    "DNT", "BLT", "XXA", "XXB", "XXC", "XXD", "XXE", "XXF", "XXG", "FRT",
    "BAK", "OTH", "3ES", "EZA", "5EZ", "6EZ", "INT", "CNC", "GLO", "TDX",
    "NDX", "DAG", "PS3", "2BA", "LBA", "JUB", "ENO", "1MQ", "2MQ", "3MQ",
    "REP", "4BA", "LAO",
];

/// Books for which cross-reference documents are processed: GEN..REV.
pub const SUPPORTED_BOOK_COUNT: usize = 66;

const ENCODED_LEN: usize = 14;

lazy_static! {
    static ref RE_CANONICAL: Regex = Regex::new(r"^(\S+) (\d+):(\d+)!(\d+)$").unwrap();
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Encoded reference must be 14 digits: {0:?}")]
    BadEncoding(String),
    #[error("Unknown book in encoded reference: {0}")]
    UnknownBook(String),
    #[error("Invalid canonical reference: {0:?}")]
    Malformed(String),
}

/// A parsed canonical reference, all parts numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalRef {
    pub book: u32,
    pub chapter: u32,
    pub verse: u32,
    pub word: u32,
}

pub fn book_code(book_num: u32) -> Option<&'static str> {
    if book_num == 0 {
        return None;
    }
    BOOKS.get(book_num as usize - 1).copied()
}

pub fn is_known_book(code: &str) -> bool {
    BOOKS.contains(&code)
}

pub fn is_supported_book(code: &str) -> bool {
    BOOKS[..SUPPORTED_BOOK_COUNT].contains(&code)
}

/// Canonical ordinal 1..=123 of a book code.
///
/// Unrecognized codes fall back to a deterministic hash in 1000..10000 so a
/// numeric key can still be produced. This is an approximation: distinct
/// unknown codes may collide.
pub fn book_number(code: &str) -> u32 {
    match BOOKS.iter().position(|b| *b == code) {
        Some(i) => i as u32 + 1,
        None => {
            let hash = code
                .chars()
                .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32));
            1000 + hash % 9000
        }
    }
}

/// Odd trailing digit marks an apparatus-only word position.
pub fn is_apparatus_word(code: &str) -> bool {
    code.chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d % 2 == 1)
        .unwrap_or(false)
}

/// `04200100100002` to `LUK 1:1!1`
pub fn encoded_to_canonical(code: &str) -> Result<String, ReferenceError> {
    if code.len() != ENCODED_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReferenceError::BadEncoding(code.to_string()));
    }

    let num = |range: std::ops::Range<usize>| -> u32 {
        // All ASCII digits, checked above
        code[range].parse::<u32>().unwrap_or(0)
    };

    let book_num = num(0..3);
    let book = book_code(book_num)
        .ok_or_else(|| ReferenceError::UnknownBook(code[0..3].to_string()))?;

    let chapter = num(3..6);
    let verse = num(6..9);
    let word = num(11..14) / 2;

    Ok(format!("{} {}:{}!{}", book, chapter, verse, word))
}

/// Outcome of checking an encoded location from source data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedLocation {
    /// Decoded canonical reference of a running-text word.
    Word(String),
    /// Apparatus-only word position (odd word digits).
    Apparatus,
    /// Not a valid encoded location.
    Invalid,
}

/// Decodes `code`, then applies the parity rule. Invalid codes are reported
/// as invalid even when the trailing digit is odd.
pub fn classify_encoded(code: &str) -> EncodedLocation {
    match encoded_to_canonical(code) {
        Err(_) => EncodedLocation::Invalid,
        Ok(_) if is_apparatus_word(code) => EncodedLocation::Apparatus,
        Ok(reference) => EncodedLocation::Word(reference),
    }
}

/// `LUK 1:1!1` to `(42, 1, 1, 1)`
pub fn parse_canonical(reference: &str) -> Result<CanonicalRef, ReferenceError> {
    let malformed = || ReferenceError::Malformed(reference.to_string());

    let caps = RE_CANONICAL.captures(reference).ok_or_else(malformed)?;
    let part = |i: usize| caps[i].parse::<u32>().map_err(|_| malformed());

    Ok(CanonicalRef {
        book: book_number(&caps[1]),
        chapter: part(2)?,
        verse: part(3)?,
        word: part(4)?,
    })
}

/// True if `reference` parses as a canonical reference with a known book.
pub fn is_valid_canonical(reference: &str) -> bool {
    match RE_CANONICAL.captures(reference) {
        Some(caps) => is_known_book(&caps[1]) && parse_canonical(reference).is_ok(),
        None => false,
    }
}
