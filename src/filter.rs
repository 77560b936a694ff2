//! Section filtering: the skip/keep state machine.
//!
//! Documents open with boilerplate (table of contents, foreword,
//! introduction) and close with more of it (bibliography, annexes). None of
//! it is useful to retrieve. The filter scans blocks in order with a single
//! `skipping` flag:
//!
//! ```text
//! block                        skip?  keep?  skipping  emitted
//! "İçindekiler"                 yes           true      no
//! "1 Kapsam ........ 3"                yes    false     no   (leader dots)
//! "Önsöz"                       yes           true      no
//! "Bu standart ... hazırlanmıştır."           true      no
//! "1 Kapsam"                           yes    false     yes
//! "Bu standart ... kapsar."                   false     yes
//! "Kaynakça"                    yes           true      no
//! ```
//!
//! A keep trigger beats a skip trigger in the same block. Leader-dot lines
//! are dropped whatever the flag says. The flag spans the whole document,
//! not one page.
//!
//! Noise blocks still take part in trigger evaluation (a lone `"Foreword"`
//! is noise but still opens a section); they are never emitted.

use crate::block::ClassifiedBlock;
use crate::patterns::{line_tags, LineTag};

/// What one block's lines say about the section state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Triggers {
    skip: bool,
    keep: bool,
    leader_dots: bool,
}

impl Triggers {
    fn scan(text: &str) -> Self {
        text.lines()
            .flat_map(line_tags)
            .fold(Self::default(), |mut acc, tag| {
                match tag {
                    LineTag::SkipStart => acc.skip = true,
                    LineTag::KeepStart => acc.keep = true,
                    LineTag::LeaderDots => acc.leader_dots = true,
                    LineTag::ListItem => {}
                }
                acc
            })
    }

    /// The flag after this block.
    fn resolve(self, skipping: bool) -> bool {
        if self.keep {
            false
        } else if self.skip {
            true
        } else {
            skipping
        }
    }
}

/// Decide one block: the new `skipping` state and whether to emit it.
#[must_use]
pub fn step(skipping: bool, block: &ClassifiedBlock) -> (bool, bool) {
    let triggers = Triggers::scan(block.text());
    let next = triggers.resolve(skipping);
    if next != skipping {
        tracing::trace!(skipping = next, text = %preview(block.text()), "section state changed");
    }
    let emit = !next && !triggers.leader_dots && !block.noise;
    (next, emit)
}

/// Drop boilerplate sections, table-of-contents lines and noise blocks.
#[must_use]
pub fn filter_sections(blocks: Vec<ClassifiedBlock>) -> Vec<ClassifiedBlock> {
    let before = blocks.len();
    let kept: Vec<ClassifiedBlock> = blocks
        .into_iter()
        .scan(false, |skipping, block| {
            let (next, emit) = step(*skipping, &block);
            *skipping = next;
            Some(emit.then_some(block))
        })
        .flatten()
        .collect();

    tracing::debug!(before, after = kept.len(), "filtered sections");
    kept
}

fn preview(text: &str) -> &str {
    let line = text.lines().next().unwrap_or_default();
    match line.char_indices().nth(40) {
        Some((end, _)) => &line[..end],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::RawBlock;
    use crate::classify::classify;

    fn blocks(texts: &[&str]) -> Vec<ClassifiedBlock> {
        texts
            .iter()
            .map(|t| classify(&RawBlock::text(*t, 0)))
            .collect()
    }

    fn texts(blocks: &[ClassifiedBlock]) -> Vec<&str> {
        blocks.iter().map(ClassifiedBlock::text).collect()
    }

    #[test]
    fn test_skip_then_keep() {
        let kept = filter_sections(blocks(&["İçindekiler", "....... 5", "1 Scope statement text"]));
        assert_eq!(texts(&kept), vec!["1 Scope statement text"]);
    }

    #[test]
    fn test_skipping_persists_until_clause_header() {
        let kept = filter_sections(blocks(&[
            "Foreword",
            "This document was prepared by Technical Committee 199.",
            "It cancels and replaces the previous edition.",
            "1 Scope",
            "This part specifies requirements for stairs.",
            "Bibliography",
            "[1] ISO 12100, Safety of machinery.",
        ]));
        assert_eq!(
            texts(&kept),
            vec!["1 Scope", "This part specifies requirements for stairs."]
        );
    }

    #[test]
    fn test_keep_wins_within_block() {
        let kept = filter_sections(blocks(&[
            "Contents",
            "Annex A\n2 Normative references",
            "The following documents are referred to in the text.",
        ]));
        assert_eq!(
            texts(&kept),
            vec![
                "Annex A\n2 Normative references",
                "The following documents are referred to in the text."
            ]
        );
    }

    #[test]
    fn test_annex_mention_in_body_keeps_section() {
        let body = "The platform shall be designed to carry the loads given in this clause.";
        let kept = filter_sections(blocks(&[
            "1 Kapsam",
            "Annex A gives guidance on the selection of fixed means of access.",
            body,
        ]));
        assert_eq!(
            texts(&kept),
            vec![
                "1 Kapsam",
                "Annex A gives guidance on the selection of fixed means of access.",
                body
            ]
        );
    }

    #[test]
    fn test_leader_dots_dropped_while_keeping() {
        let kept = filter_sections(blocks(&[
            "Body text that is kept as usual here.",
            "3 Terms ........ 7",
            "More body text that is also kept.",
        ]));
        assert_eq!(
            texts(&kept),
            vec![
                "Body text that is kept as usual here.",
                "More body text that is also kept."
            ]
        );
    }

    #[test]
    fn test_noise_triggers_but_is_not_emitted() {
        let kept = filter_sections(blocks(&["Önsöz", "Bu standart ilk kez hazırlanmıştır.", "12"]));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_step_is_pure() {
        let block = classify(&RawBlock::text("Kaynakça", 0));
        assert_eq!(step(false, &block), (true, false));
        assert_eq!(step(false, &block), step(false, &block));
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_sections(Vec::new()).is_empty());
    }
}
