//! Page geometry, column sizing, text wrapping and pagination.
//!
//! Positions here are measured in points from the top-left corner of the
//! page; [`super::canvas`] flips them into PDF user space.

use std::ops::Range;

use super::font::{Face, text_width};

/// 1 mm in points.
pub const MM: f32 = 72.0 / 25.4;

/// A4 portrait.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

pub const MARGIN_SIDE: f32 = 10.0 * MM;
pub const MARGIN_TOP: f32 = 16.0 * MM;
pub const MARGIN_BOTTOM: f32 = 14.0 * MM;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_SIDE;

/// Rows sampled when weighting column widths.
const WIDTH_SAMPLE_ROWS: usize = 300;
/// Extra weight of the balance column.
const BALANCE_WEIGHT: f32 = 1.2;

/// Text settings of one kind of table row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: Face,
    pub size: f32,
    pub leading: f32,
}

pub const HEADER_TEXT: TextStyle = TextStyle {
    face: Face::Bold,
    size: 8.0,
    leading: 10.0,
};

pub const BODY_TEXT: TextStyle = TextStyle {
    face: Face::Regular,
    size: 7.5,
    leading: 9.5,
};

pub const TOTAL_TEXT: TextStyle = TextStyle {
    face: Face::Bold,
    size: 8.0,
    leading: 10.0,
};

pub const CELL_PAD_X: f32 = 3.5;
pub const CELL_PAD_Y: f32 = 2.5;

/// Horizontal placement of cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Column widths in points, proportional to content length.
///
/// Each column weighs `0.6 * max + 0.4 * mean` of the character counts of its
/// label and its non-empty cells in the first rows; a column with nothing to
/// measure weighs 1. The column at `balance` gets 20 % more.
pub fn column_widths<const N: usize>(
    labels: &[&str; N],
    rows: &[[String; N]],
    balance: usize,
    total_width: f32,
) -> [f32; N] {
    let mut weights = [1.0f32; N];
    for (col, weight) in weights.iter_mut().enumerate() {
        let lengths: Vec<usize> = std::iter::once(labels[col])
            .chain(rows.iter().take(WIDTH_SAMPLE_ROWS).map(|r| r[col].as_str()))
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().count())
            .collect();
        if let Some(&max) = lengths.iter().max() {
            let mean = lengths.iter().sum::<usize>() as f32 / lengths.len() as f32;
            *weight = 0.6 * max as f32 + 0.4 * mean;
        }
        if col == balance {
            *weight *= BALANCE_WEIGHT;
        }
    }
    let sum: f32 = weights.iter().sum();
    weights.map(|w| w / sum * total_width)
}

/// Break text into lines no wider than `max_width`.
///
/// Explicit line breaks are kept. Lines break at spaces; a single word wider
/// than the column is split between characters.
pub fn wrap(text: &str, face: Face, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if text_width(&candidate, face, size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line = break_word(word, face, size, max_width, &mut lines);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// Push the full-width pieces of an overlong word; return the remainder.
fn break_word(word: &str, face: Face, size: f32, max_width: f32, lines: &mut Vec<String>) -> String {
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if text_width(&piece, face, size) > max_width && piece.chars().count() > 1 {
            piece.pop();
            lines.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    piece
}

/// Height of a row whose tallest cell has `lines` lines.
pub fn row_height(lines: usize, style: TextStyle) -> f32 {
    lines.max(1) as f32 * style.leading + 2.0 * CELL_PAD_Y
}

/// Rows placed on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice {
    /// Indices into the body rows.
    pub rows: Range<usize>,
    /// Whether the total row closes this page.
    pub total: bool,
}

/// Distribute body rows over pages.
///
/// Every page starts with the table header; the first page additionally
/// carries the document header block of height `first_page_offset`. The
/// total row follows the last body row and moves to a new page when it does
/// not fit. A page always takes at least one row.
pub fn paginate(
    first_page_offset: f32,
    header_height: f32,
    row_heights: &[f32],
    total_height: f32,
) -> Vec<PageSlice> {
    let bottom = PAGE_HEIGHT - MARGIN_BOTTOM;
    let mut pages = Vec::new();
    let mut start = 0;
    let mut y = MARGIN_TOP + first_page_offset + header_height;

    loop {
        let mut end = start;
        while end < row_heights.len() && (end == start || y + row_heights[end] <= bottom) {
            y += row_heights[end];
            end += 1;
        }
        let done = end == row_heights.len();
        let total = done && y + total_height <= bottom;
        pages.push(PageSlice {
            rows: start..end,
            total,
        });
        if total {
            break;
        }
        if done && end == start {
            // Only the total was left and it did not fit under the header.
            if let Some(last) = pages.last_mut() {
                last.total = true;
            }
            break;
        }
        start = end;
        y = MARGIN_TOP + header_height;
    }
    pages
}
