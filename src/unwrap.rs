//! Unwrapping and normalization.
//!
//! Extracted text keeps the line breaks of the page it came from. Embedding
//! models do better with flowing prose, so each merged unit is split on blank
//! lines and every sub-block is unwrapped:
//!
//! ```text
//! prose:  "The stair shall\nhave a handrail\non each side."
//!      -> "The stair shall have a handrail on each side."
//!
//! list:   "1. İlk adım\ndevam metni\n2. İkinci adım"
//!      -> "1. İlk adım devam metni\n2. İkinci adım"
//! ```
//!
//! Sub-blocks are rejoined with a blank line. Tables and image markers pass
//! through byte for byte, even when text was merged around them. Units that are purely numeric, or whose final
//! length falls outside the bounds, are dropped rather than truncated.

use crate::bounds::LengthBounds;
use crate::merge::SegmentUnit;
use crate::patterns;
use crate::unit::FinalUnit;

/// The unwrapped text of one unit, or `None` if it is a bare number.
#[must_use]
pub fn unwrap_unit(unit: &SegmentUnit) -> Option<String> {
    if patterns::is_numeric(unit.text()) {
        return None;
    }
    if !unit.is_special() {
        return Some(unwrap_text(unit.text()));
    }
    let parts: Vec<String> = unit
        .blocks()
        .iter()
        .map(|block| {
            if block.special {
                block.text().to_string()
            } else {
                unwrap_text(block.text())
            }
        })
        .filter(|part| !part.is_empty())
        .collect();
    Some(parts.join("\n\n"))
}

/// Unwrap free text: split on blank lines, unwrap each part as a list or as
/// prose, rejoin with blank lines.
#[must_use]
pub fn unwrap_text(text: &str) -> String {
    paragraphs(text)
        .iter()
        .map(|lines| {
            if lines.iter().any(|line| patterns::is_list_item(line)) {
                unwrap_list(lines)
            } else {
                collapse_whitespace(&lines.join(" "))
            }
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Each list marker starts an item; other lines continue the current one.
fn unwrap_list(lines: &[&str]) -> String {
    let mut items: Vec<String> = Vec::new();
    for line in lines {
        if items.is_empty() || patterns::is_list_item(line) {
            items.push((*line).to_string());
        } else if let Some(item) = items.last_mut() {
            item.push(' ');
            item.push_str(line);
        }
    }
    items
        .iter()
        .map(|item| collapse_whitespace(item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs of non-blank lines.
fn paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut parts: Vec<Vec<&str>> = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Unwrap every unit and keep those within `bounds`, numbered in order.
#[must_use]
pub fn normalize(units: &[SegmentUnit], bounds: &LengthBounds) -> Vec<FinalUnit> {
    let finals: Vec<FinalUnit> = units
        .iter()
        .filter_map(unwrap_unit)
        .filter(|content| bounds.contains(content.chars().count()))
        .enumerate()
        .map(|(index, content)| FinalUnit::new(content, index))
        .collect();

    tracing::debug!(units = units.len(), emitted = finals.len(), "normalized units");
    finals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::RawBlock;
    use crate::classify::classify;

    fn unit(text: &str) -> SegmentUnit {
        SegmentUnit::new(classify(&RawBlock::text(text, 0)))
    }

    #[test]
    fn test_list_unwrap() {
        assert_eq!(
            unwrap_text("1. İlk adım\ndevam metni\n2. İkinci adım"),
            "1. İlk adım devam metni\n2. İkinci adım"
        );
    }

    #[test]
    fn test_prose_unwrap() {
        assert_eq!(
            unwrap_text("The stair   shall\nhave a handrail\n  on each side."),
            "The stair shall have a handrail on each side."
        );
    }

    #[test]
    fn test_sub_blocks_rejoined() {
        assert_eq!(
            unwrap_text("Genel Bakış\n\nBu bölüm\nsistemi açıklar.\n\n\n- bir\n- iki\n  devam"),
            "Genel Bakış\n\nBu bölüm sistemi açıklar.\n\n- bir\n- iki devam"
        );
    }

    #[test]
    fn test_special_unit_passes_through() {
        let table = "| Tip  | Eğim |\n|---|---|\n| Merdiven | 45° |";
        assert_eq!(unwrap_unit(&unit(table)).as_deref(), Some(table));
    }

    #[test]
    fn test_text_around_special_is_unwrapped() {
        let mut image = unit("[IMAGE]");
        image.push(classify(&RawBlock::text("Şekil 1 Sabit\nmerdiven,  yan görünüş", 0)));
        assert_eq!(
            unwrap_unit(&image).as_deref(),
            Some("[IMAGE]\n\nŞekil 1 Sabit merdiven, yan görünüş")
        );
    }

    #[test]
    fn test_numeric_unit_dropped() {
        assert_eq!(unwrap_unit(&unit(" 1234 ")), None);
    }

    #[test]
    fn test_normalize_filters_length() {
        let long = "Bu bölüm, platformların ve merdivenlerin genel yapısını ayrıntılı olarak açıklar.";
        let units = vec![unit("Kısa bir cümle."), unit(long), unit(&"uzun ".repeat(500))];
        let finals = normalize(&units, &LengthBounds::default());
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].content, long);
        assert_eq!(finals[0].index, 0);
    }

    #[test]
    fn test_whitespace_only_collapses_to_nothing() {
        assert_eq!(unwrap_text(" \n\t\n "), "");
    }
}
