//! Merging adjacent blocks into coherent units.
//!
//! Page readers split text wherever the layout breaks it: a header lands in
//! its own block, a list wraps across two, a citation drifts below its
//! paragraph. The merge pass walks the filtered blocks once, holding a
//! `current` unit, and for every `next` block asks whether it belongs with
//! `current`:
//!
//! ```text
//! current                        next                       rule
//! "Genel Bakış"                  "Bu bölüm ... açıklar."    header
//! "Aşağıdakiler gereklidir:"     "a) korkuluk ..."          colon
//! "GENEL HÜKÜMLER."              "Bu madde ..."             title
//! "... as shown in the study."   "Smith, 2019"              citation
//! "... the load is fixed."       "However, ..."             connector
//! "1. first step"                "2. second step"           list
//! "| a | b |\n|---|---|"         "| 1 | 2 |\n|---|---|"     table
//! "Not"                          "| a | b |\n|---|---|"     annotation
//! ```
//!
//! The header, colon and title rules never pull a table or image marker in
//! as `next`; a special `current` takes text like any other unit, so an
//! image marker keeps its caption. The first matching rule wins; when none
//! matches, `current` is flushed and `next` becomes the new `current`.
//!
//! ## One Step, No Going Back
//!
//! Each decision sees only `current` and `next`, and a flushed unit is never
//! reopened. A header wrongly glued to the paragraph before it stays there.
//! Segmentation output depends on exactly these local decisions.

use crate::block::ClassifiedBlock;
use crate::bounds::LengthBounds;
use crate::patterns::{self, LineTag};

/// Units shorter than this (in chars) may be headers.
const HEADER_MAX: usize = 150;

/// Units shorter than this (in chars) may be titles; blocks this short may
/// be citations.
const TITLE_MAX: usize = 100;

/// Blocks inside one unit are joined with a blank line.
const JOIN: &str = "\n\n";

/// A unit under construction: one or more blocks joined by blank lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentUnit {
    blocks: Vec<ClassifiedBlock>,
    text: String,
    chars: usize,
}

impl SegmentUnit {
    /// Start a unit from one block.
    #[must_use]
    pub fn new(block: ClassifiedBlock) -> Self {
        let text = block.text().to_string();
        let chars = text.chars().count();
        Self {
            blocks: vec![block],
            text,
            chars,
        }
    }

    pub(crate) fn push(&mut self, block: ClassifiedBlock) {
        self.text.push_str(JOIN);
        self.text.push_str(block.text());
        self.chars += JOIN.len() + block.text().chars().count();
        self.blocks.push(block);
    }

    /// The concatenated text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars
    }

    /// Whether the unit text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The blocks in this unit, in source order.
    #[must_use]
    pub fn blocks(&self) -> &[ClassifiedBlock] {
        &self.blocks
    }

    /// Contains a table or image marker.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.blocks.iter().any(|b| b.special)
    }

    /// Contains table markup.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.blocks.iter().any(|b| b.table)
    }
}

/// Why two blocks were merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Short `current` without terminal punctuation.
    Header,
    /// `current` ends with a colon.
    Colon,
    /// Short `current` in upper case or without terminal punctuation.
    Title,
    /// Short `next` without terminal punctuation, with a comma or capital.
    Citation,
    /// `next` opens with a discourse connector.
    Connector,
    /// Both sides hold list items.
    ListContinuation,
    /// Both sides are tables.
    TableContinuation,
    /// `current` is a `Note` token or `(n)` and `next` is a table.
    TableAnnotation,
}

type Rule = fn(&SegmentUnit, &ClassifiedBlock) -> bool;

/// Merge rules, first match wins.
static RULES: [(Rule, MergeRule); 8] = [
    (header, MergeRule::Header),
    (colon, MergeRule::Colon),
    (title, MergeRule::Title),
    (citation, MergeRule::Citation),
    (connector, MergeRule::Connector),
    (list_continuation, MergeRule::ListContinuation),
    (table_continuation, MergeRule::TableContinuation),
    (table_annotation, MergeRule::TableAnnotation),
];

/// `next` is ordinary text, not a table or image marker.
fn text_next(next: &ClassifiedBlock) -> bool {
    !next.special
}

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

fn header(current: &SegmentUnit, next: &ClassifiedBlock) -> bool {
    text_next(next)
        && char_len(current.text()) < HEADER_MAX
        && !patterns::ends_sentence(current.text())
}

fn colon(current: &SegmentUnit, next: &ClassifiedBlock) -> bool {
    text_next(next) && current.text().trim_end().ends_with(':')
}

fn title(current: &SegmentUnit, next: &ClassifiedBlock) -> bool {
    text_next(next)
        && char_len(current.text()) < TITLE_MAX
        && (patterns::is_upper_case(current.text()) || !patterns::ends_sentence(current.text()))
}

fn citation(_current: &SegmentUnit, next: &ClassifiedBlock) -> bool {
    let text = next.text();
    char_len(text) < TITLE_MAX
        && !patterns::ends_sentence(text)
        && (text.contains(',') || patterns::starts_upper(text))
}

fn connector(_current: &SegmentUnit, next: &ClassifiedBlock) -> bool {
    patterns::starts_with_connector(next.text())
}

fn list_continuation(current: &SegmentUnit, next: &ClassifiedBlock) -> bool {
    patterns::any_line(current.text(), LineTag::ListItem)
        && patterns::any_line(next.text(), LineTag::ListItem)
}

fn table_continuation(current: &SegmentUnit, next: &ClassifiedBlock) -> bool {
    current.is_table() && next.table
}

fn table_annotation(current: &SegmentUnit, next: &ClassifiedBlock) -> bool {
    next.table && current.blocks.len() == 1 && patterns::is_table_annotation(current.text())
}

/// The rule that merges `next` into `current`, if any.
///
/// A merge that would push `current` past `bounds.max()` never happens.
#[must_use]
pub fn merge_rule(
    current: &SegmentUnit,
    next: &ClassifiedBlock,
    bounds: &LengthBounds,
) -> Option<MergeRule> {
    let additional = JOIN.len() + next.text().chars().count();
    if bounds.would_overflow(current.len(), additional) {
        return None;
    }
    RULES
        .iter()
        .find(|(applies, _)| applies(current, next))
        .map(|&(_, rule)| rule)
}

/// Fuse adjacent blocks into units in a single forward pass.
#[must_use]
pub fn merge_blocks(blocks: Vec<ClassifiedBlock>, bounds: &LengthBounds) -> Vec<SegmentUnit> {
    let before = blocks.len();
    let mut units = Vec::new();
    let mut current: Option<SegmentUnit> = None;

    for next in blocks.into_iter().filter(|b| !b.noise) {
        current = Some(match current.take() {
            None => SegmentUnit::new(next),
            Some(mut unit) => match merge_rule(&unit, &next, bounds) {
                Some(rule) => {
                    tracing::trace!(?rule, "merged block");
                    unit.push(next);
                    unit
                }
                None => {
                    units.push(unit);
                    SegmentUnit::new(next)
                }
            },
        });
    }
    units.extend(current);

    tracing::debug!(blocks = before, units = units.len(), "merged blocks");
    units
}
