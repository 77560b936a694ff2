//! Line and block shape predicates.
//!
//! Every heuristic in the pipeline asks a small question about a line of
//! text: is it a clause header, a list item, a table-of-contents entry? The
//! answers live here as plain functions collected into ordered tables of
//! `(predicate, tag)` pairs, so the stages read as table lookups.
//!
//! ## Case folding
//!
//! Turkish dotted and dotless i do not survive `to_lowercase` the way a
//! keyword match needs (`"İ".to_lowercase()` is `"i\u{307}"`). [`fold_case`]
//! maps `I`, `İ`, `ı` and `i` to one `i` before lower-casing everything else,
//! so `"İÇİNDEKİLER"`, `"İçindekiler"` and `"INTRODUCTION"` all match their
//! keywords.
//!
//! ## Tables
//!
//! ```text
//! LINE_PATTERNS   line  -> SkipStart | KeepStart | LeaderDots | ListItem
//! BLOCK_PATTERNS  block -> Image | Table | PageNumber   (first match wins)
//! ```

/// The literal image placeholder emitted by the page reader.
pub const IMAGE_MARKER: &str = "[IMAGE]";

/// Punctuation that ends a sentence.
const SENTENCE_END: [char; 3] = ['.', '!', '?'];

/// Bullet characters that open a list item.
const BULLETS: [char; 9] = ['•', '-', '*', '–', '·', '▪', '●', '◦', '○'];

/// Headers that open a boilerplate section. Matched against the whole line.
const SKIP_HEADERS: [&str; 15] = [
    "table of contents",
    "contents",
    "foreword",
    "preface",
    "introduction",
    "bibliography",
    "references",
    "içindekiler",
    "önsöz",
    "ulusal önsöz",
    "giriş",
    "kaynakça",
    "kaynaklar",
    "bibliyografya",
    "referanslar",
];

/// Annex-style headers: keyword followed by a designator (`Annex A`, `Ek 1`).
const ANNEX_HEADERS: [&str; 3] = ["annex", "appendix", "ek"];

/// Openers that continue the previous block's thought.
const CONNECTORS: [&str; 10] = [
    "however",
    "meanwhile",
    "nevertheless",
    "ancak",
    "bununla birlikte",
    "öte yandan",
    "bu arada",
    "fakat",
    "...",
    "…",
];

/// Annotation tokens that introduce a following table.
const NOTE_TOKENS: [&str; 7] = [
    "not",
    "note",
    "önemli",
    "important",
    "dikkat",
    "caution",
    "uyarı",
];

/// What may follow an annex designator on the same line.
const DESIGNATOR_FOLLOWERS: [char; 5] = ['(', '-', '–', '—', ':'];

/// Skip-start headers must be shorter than this.
const MAX_HEADER_LINE: usize = 150;

/// What a single line looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    /// Opens a boilerplate section (contents, foreword, bibliography, annex).
    SkipStart,
    /// A numbered clause header (`4.2 Requirements`).
    KeepStart,
    /// A table-of-contents entry with leader dots.
    LeaderDots,
    /// Starts a list item.
    ListItem,
}

/// What a whole block looks like, independent of what the reader said.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShape {
    /// The image placeholder.
    Image,
    /// Markdown table markup.
    Table,
    /// A bare page number.
    PageNumber,
}

/// Line predicates, in evaluation order.
pub static LINE_PATTERNS: [(fn(&str) -> bool, LineTag); 4] = [
    (is_skip_header, LineTag::SkipStart),
    (is_clause_header, LineTag::KeepStart),
    (has_leader_dots, LineTag::LeaderDots),
    (is_list_item, LineTag::ListItem),
];

/// Block predicates, first match wins.
pub static BLOCK_PATTERNS: [(fn(&str) -> bool, BlockShape); 3] = [
    (is_image_marker, BlockShape::Image),
    (is_table_markup, BlockShape::Table),
    (is_numeric, BlockShape::PageNumber),
];

/// All tags that apply to a line.
pub fn line_tags(line: &str) -> impl Iterator<Item = LineTag> + '_ {
    LINE_PATTERNS
        .iter()
        .filter(move |(matches, _)| matches(line))
        .map(|&(_, tag)| tag)
}

/// Whether any line of `text` carries `tag`.
#[must_use]
pub fn any_line(text: &str, tag: LineTag) -> bool {
    text.lines().any(|line| line_tags(line).any(|t| t == tag))
}

/// The shape of a block's text, if it has one.
#[must_use]
pub fn block_shape(text: &str) -> Option<BlockShape> {
    BLOCK_PATTERNS
        .iter()
        .find(|(matches, _)| matches(text))
        .map(|&(_, shape)| shape)
}

/// Lower-case with Turkish i variants collapsed to `i`.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            'I' | 'İ' | 'ı' => 'i'.to_lowercase(),
            _ => c.to_lowercase(),
        })
        .collect()
}

/// Digits only, after trimming.
#[must_use]
pub fn is_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Ends with `.`, `!` or `?`, after trimming.
#[must_use]
pub fn ends_sentence(text: &str) -> bool {
    text.trim_end().ends_with(SENTENCE_END)
}

/// Contains at least one letter and no lower-case letters.
#[must_use]
pub fn is_upper_case(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| !c.is_lowercase())
}

/// Starts with an upper-case letter.
#[must_use]
pub fn starts_upper(text: &str) -> bool {
    text.trim_start()
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

/// The image placeholder literal.
#[must_use]
pub fn is_image_marker(text: &str) -> bool {
    text.trim() == IMAGE_MARKER
}

/// Markdown table: a `|---|` separator row or more than four pipes.
#[must_use]
pub fn is_table_markup(text: &str) -> bool {
    text.lines().any(is_table_separator) || text.matches('|').count() > 4
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|')
        && trimmed.contains("---")
        && trimmed.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

/// A boilerplate section header: contents, foreword, introduction,
/// bibliography, annex, in English or Turkish.
#[must_use]
pub fn is_skip_header(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.chars().count() >= MAX_HEADER_LINE {
        return false;
    }
    let folded = fold_case(trimmed);
    let bare = folded.trim_end_matches([':', '.']).trim_end();

    if SKIP_HEADERS.iter().any(|h| bare == fold_case(h)) {
        return true;
    }

    ANNEX_HEADERS.iter().any(|h| {
        bare.strip_prefix(h)
            .and_then(|rest| rest.strip_prefix(|c: char| c.is_whitespace() || c == '-'))
            .is_some_and(|rest| is_designator(rest.trim_start()))
    })
}

/// `A`, `B (informative)`, `12 - Kaynaklar`: a single letter or a number
/// that ends the line or is followed by a qualifier or title separator.
fn is_designator(text: &str) -> bool {
    let rest = if text.starts_with(|c: char| c.is_ascii_digit()) {
        text.trim_start_matches(|c: char| c.is_ascii_digit())
    } else {
        let mut chars = text.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() => chars.as_str(),
            _ => return false,
        }
    };
    let rest = rest.trim_start();
    rest.is_empty() || rest.starts_with(DESIGNATOR_FOLLOWERS)
}

/// `<number>[.<number>] <Capitalized word>`.
#[must_use]
pub fn is_clause_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    let Some(rest) = strip_digits(trimmed) else {
        return false;
    };
    let rest = match rest.strip_prefix('.').and_then(strip_digits) {
        Some(after_minor) => after_minor,
        None => rest,
    };
    let after_space = rest.trim_start();
    after_space.len() < rest.len() && starts_upper(after_space)
}

fn strip_digits(text: &str) -> Option<&str> {
    let rest = text.trim_start_matches(|c: char| c.is_ascii_digit());
    (rest.len() < text.len()).then_some(rest)
}

/// Five or more consecutive dots.
#[must_use]
pub fn has_leader_dots(line: &str) -> bool {
    line.contains(".....")
}

/// A short alphanumeric or bullet prefix followed by whitespace:
/// `•`, `-`, `1.`, `12)`, `a)`, `iv.`, `(b)`.
#[must_use]
pub fn is_list_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    let followed_by_space = |rest: &str| rest.starts_with(char::is_whitespace);

    if let Some(rest) = trimmed.strip_prefix(BULLETS) {
        return followed_by_space(rest);
    }

    if let Some(inner) = trimmed.strip_prefix('(') {
        return match inner.split_once(')') {
            Some((label, rest)) => {
                (1..=3).contains(&label.chars().count())
                    && label.chars().all(char::is_alphanumeric)
                    && followed_by_space(rest)
            }
            None => false,
        };
    }

    let label_end = trimmed
        .find(|c: char| !c.is_alphanumeric())
        .unwrap_or(trimmed.len());
    let (label, rest) = trimmed.split_at(label_end);
    let Some(rest) = rest.strip_prefix(['.', ')']) else {
        return false;
    };
    is_list_label(label) && followed_by_space(rest)
}

fn is_list_label(label: &str) -> bool {
    let count = label.chars().count();
    let digits = (1..=3).contains(&count) && label.chars().all(|c| c.is_ascii_digit());
    let letter = count == 1 && label.chars().all(char::is_alphabetic);
    let roman = (1..=4).contains(&count) && label.chars().all(|c| matches!(c, 'i' | 'v' | 'x'));
    digits || letter || roman
}

/// Opens with a discourse connector (`However`, `Öte yandan`, `...`).
#[must_use]
pub fn starts_with_connector(text: &str) -> bool {
    let folded = fold_case(text.trim_start());
    CONNECTORS.iter().any(|connector| {
        let connector = fold_case(connector);
        let is_word = connector.chars().any(char::is_alphabetic);
        folded.strip_prefix(connector.as_str()).is_some_and(|rest| {
            !is_word || rest.chars().next().map_or(true, |c| !c.is_alphabetic())
        })
    })
}

/// A table annotation that belongs with the table after it: a bare `Note`
/// token or a parenthesized number such as `(1)`.
#[must_use]
pub fn is_table_annotation(text: &str) -> bool {
    let trimmed = text.trim();
    if let Some(number) = trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }
    let folded = fold_case(trimmed);
    let bare = folded.trim_end_matches(':').trim_end();
    NOTE_TOKENS.iter().any(|token| bare == fold_case(token))
}
