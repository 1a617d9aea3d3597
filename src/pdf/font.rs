//! Base-14 Helvetica with an extended single-byte encoding.
//!
//! Codes 32..=126 are ASCII. Codes from 128 upward are assigned to the
//! glyphs in [`GLYPHS`] through a `/Differences` array, which covers the
//! Slovak and Czech alphabets, the euro sign and common typographic
//! punctuation. The table is built once per process by [`register_fonts`]
//! (or lazily on first use).

use std::collections::HashMap;

use lopdf::{Dictionary, Object, dictionary};
use once_cell::sync::Lazy;
use unicode_normalization::UnicodeNormalization;

/// First code assigned from [`GLYPHS`].
const FIRST_EXTRA_CODE: u8 = 128;

/// Typeface of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    pub fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
        }
    }

    /// Name of the font in the page resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }
}

/// Advance widths (1/1000 em) of ASCII 32..=126, regular then bold.
#[rustfmt::skip]
const ASCII_WIDTHS: [[u16; 95]; 2] = [
    [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
    ],
    [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
    ],
];

/// Extra glyphs: character, glyph name, regular width, bold width.
#[rustfmt::skip]
const GLYPHS: &[(char, &str, u16, u16)] = &[
    ('€', "Euro", 556, 556),
    ('–', "endash", 556, 556),
    ('—', "emdash", 1000, 1000),
    ('•', "bullet", 350, 350),
    ('…', "ellipsis", 1000, 1000),
    ('‘', "quoteleft", 222, 278),
    ('’', "quoteright", 222, 278),
    ('‚', "quotesinglbase", 222, 278),
    ('“', "quotedblleft", 333, 500),
    ('”', "quotedblright", 333, 500),
    ('„', "quotedblbase", 333, 500),
    ('«', "guillemotleft", 556, 556),
    ('»', "guillemotright", 556, 556),
    ('°', "degree", 400, 400),
    ('§', "section", 556, 556),
    ('×', "multiply", 584, 584),
    ('·', "periodcentered", 278, 278),
    ('±', "plusminus", 584, 584),
    ('©', "copyright", 737, 737),
    ('®', "registered", 737, 737),
    ('™', "trademark", 1000, 1000),
    ('á', "aacute", 556, 556),
    ('ä', "adieresis", 556, 556),
    ('à', "agrave", 556, 556),
    ('â', "acircumflex", 556, 556),
    ('č', "ccaron", 500, 556),
    ('ç', "ccedilla", 500, 556),
    ('ď', "dcaron", 643, 743),
    ('é', "eacute", 556, 556),
    ('ě', "ecaron", 556, 556),
    ('è', "egrave", 556, 556),
    ('ê', "ecircumflex", 556, 556),
    ('í', "iacute", 278, 278),
    ('î', "icircumflex", 278, 278),
    ('ĺ', "lacute", 222, 278),
    ('ľ', "lcaron", 299, 400),
    ('ł', "lslash", 222, 278),
    ('ň', "ncaron", 556, 611),
    ('ó', "oacute", 556, 611),
    ('ô', "ocircumflex", 556, 611),
    ('ö', "odieresis", 556, 611),
    ('ő', "ohungarumlaut", 556, 611),
    ('ŕ', "racute", 333, 389),
    ('ř', "rcaron", 333, 389),
    ('š', "scaron", 500, 556),
    ('ß', "germandbls", 611, 611),
    ('ť', "tcaron", 317, 389),
    ('ú', "uacute", 556, 611),
    ('ů', "uring", 556, 611),
    ('ü', "udieresis", 556, 611),
    ('ű', "uhungarumlaut", 556, 611),
    ('û', "ucircumflex", 556, 611),
    ('ý', "yacute", 500, 556),
    ('ž', "zcaron", 500, 500),
    ('Á', "Aacute", 667, 722),
    ('Ä', "Adieresis", 667, 722),
    ('Č', "Ccaron", 722, 722),
    ('Ď', "Dcaron", 722, 722),
    ('É', "Eacute", 667, 667),
    ('Ě', "Ecaron", 667, 667),
    ('Í', "Iacute", 278, 278),
    ('Ĺ', "Lacute", 556, 611),
    ('Ľ', "Lcaron", 556, 611),
    ('Ł', "Lslash", 556, 611),
    ('Ň', "Ncaron", 722, 722),
    ('Ó', "Oacute", 778, 778),
    ('Ô', "Ocircumflex", 778, 778),
    ('Ö', "Odieresis", 778, 778),
    ('Ő', "Ohungarumlaut", 778, 778),
    ('Ŕ', "Racute", 722, 722),
    ('Ř', "Rcaron", 722, 722),
    ('Š', "Scaron", 667, 667),
    ('Ť', "Tcaron", 611, 611),
    ('Ú', "Uacute", 722, 722),
    ('Ů', "Uring", 722, 722),
    ('Ü', "Udieresis", 722, 722),
    ('Ű', "Uhungarumlaut", 722, 722),
    ('Ý', "Yacute", 667, 667),
    ('Ž', "Zcaron", 611, 611),
];

struct Encoding {
    codes: HashMap<char, u8>,
}

static ENCODING: Lazy<Encoding> = Lazy::new(|| {
    let codes = GLYPHS
        .iter()
        .zip(FIRST_EXTRA_CODE..=u8::MAX)
        .map(|(&(c, ..), code)| (c, code))
        .collect::<HashMap<_, _>>();
    log::debug!("font encoding registered with {} extra glyphs", codes.len());
    Encoding { codes }
});

/// Build the process-wide encoding table. Repeated calls are no-ops.
pub fn register_fonts() {
    Lazy::force(&ENCODING);
}

/// Code of a character, or `None` when the encoding has no glyph for it.
fn code_of(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{00A0}' | '\u{202F}' | '\u{2009}' => Some(b' '),
        '\t' => Some(b' '),
        _ => ENCODING.codes.get(&c).copied(),
    }
}

/// Code of a character, falling back to its unaccented base letter and
/// finally to `?`. The flag is `true` when a substitute was used.
fn code_or_substitute(c: char) -> (u8, bool) {
    if let Some(code) = code_of(c) {
        return (code, false);
    }
    let base = std::iter::once(c).nfd().next().and_then(code_of);
    (base.unwrap_or(b'?'), true)
}

/// Encode text for a `Tj` operand.
pub fn encode(text: &str) -> Vec<u8> {
    let mut substituted = Vec::new();
    let bytes = text
        .chars()
        .map(|c| {
            let (code, sub) = code_or_substitute(c);
            if sub {
                substituted.push(c);
            }
            code
        })
        .collect();
    if !substituted.is_empty() {
        log::warn!("characters {substituted:?} are not in the document font encoding; substituted");
    }
    bytes
}

fn code_width(code: u8, face: Face) -> u16 {
    let bold = face == Face::Bold;
    match code {
        32..=126 => ASCII_WIDTHS[bold as usize][(code - 32) as usize],
        _ if code >= FIRST_EXTRA_CODE => GLYPHS
            .get((code - FIRST_EXTRA_CODE) as usize)
            .map_or(556, |g| if bold { g.3 } else { g.2 }),
        _ => 0,
    }
}

/// Width of `text` in points at `size`.
pub fn text_width(text: &str, face: Face, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| code_width(code_or_substitute(c).0, face) as u32)
        .sum();
    units as f32 * size / 1000.0
}

/// Font dictionary of a face, with the extended encoding.
pub fn font_dictionary(face: Face) -> Dictionary {
    let mut differences = vec![Object::Integer(FIRST_EXTRA_CODE as i64)];
    differences.extend(
        GLYPHS
            .iter()
            .map(|&(_, name, ..)| Object::Name(name.as_bytes().to_vec())),
    );
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => dictionary! {
            "Type" => "Encoding",
            "BaseEncoding" => "WinAnsiEncoding",
            "Differences" => differences,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_table_fits_the_upper_half() {
        assert!(GLYPHS.len() <= (u8::MAX - FIRST_EXTRA_CODE) as usize + 1);
        let mut chars: Vec<char> = GLYPHS.iter().map(|g| g.0).collect();
        chars.sort_unstable();
        chars.dedup();
        assert_eq!(chars.len(), GLYPHS.len());
    }

    #[test]
    fn ascii_passes_through() {
        assert_eq!(encode("Saldo 2024"), b"Saldo 2024".to_vec());
    }

    #[test]
    fn slovak_letters_get_extra_codes() {
        let bytes = encode("čľ€");
        assert!(bytes.iter().all(|&b| b >= FIRST_EXTRA_CODE));
        assert_eq!(bytes[2], FIRST_EXTRA_CODE);
    }

    #[test]
    fn nbsp_encodes_as_space() {
        assert_eq!(encode("1\u{a0}€")[1], b' ');
    }

    #[test]
    fn unknown_letters_fall_back_to_base_letter() {
        // ą has no glyph here; NFD gives 'a'.
        assert_eq!(encode("ą"), b"a".to_vec());
        assert_eq!(encode("漢"), b"?".to_vec());
    }

    #[test]
    fn widths_follow_the_face() {
        assert_eq!(text_width("i", Face::Regular, 1000.0), 222.0);
        assert_eq!(text_width("i", Face::Bold, 1000.0), 278.0);
        assert_eq!(text_width("ľ", Face::Regular, 10.0), 2.99);
        assert!(text_width("Zostatok", Face::Bold, 8.0) > text_width("Zostatok", Face::Regular, 8.0));
    }

    #[test]
    fn registration_is_idempotent() {
        register_fonts();
        register_fonts();
        assert_eq!(encode("ž"), encode("ž"));
    }
}
