//! Player table geometry shared by rendering and mouse hit testing.

use ratatui::layout::{Constraint, Rect};
use txplayers_core::Column;

pub const HIGHLIGHT_SYMBOL: &str = "▶ ";
pub const COLUMN_SPACING: u16 = 1;
const HIGHLIGHT_WIDTH: u16 = 2;
const COLUMN_SHARES: [u16; 3] = [40, 30, 30];

/// Widths of the three columns for a table body `width` cells wide.
pub fn column_widths(width: u16) -> [u16; 3] {
    let usable = width
        .saturating_sub(HIGHLIGHT_WIDTH)
        .saturating_sub(COLUMN_SPACING * 2);
    let share = |percent: u16| (u32::from(usable) * u32::from(percent) / 100) as u16;
    let first = share(COLUMN_SHARES[0]);
    let second = share(COLUMN_SHARES[1]);
    [first, second, usable - first - second]
}

pub fn column_constraints(width: u16) -> [Constraint; 3] {
    column_widths(width).map(Constraint::Length)
}

/// Strip the one-cell border drawn around the table.
pub fn body(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

/// Column under screen column `x`, given the bordered table area.
pub fn column_at(area: Rect, x: u16) -> Option<Column> {
    let body = body(area);
    let start = body.x + HIGHLIGHT_WIDTH;
    if x < start || x >= body.x + body.width {
        return None;
    }
    let mut edge = start;
    for (index, width) in column_widths(body.width).into_iter().enumerate() {
        edge += width + COLUMN_SPACING;
        if x < edge {
            return Column::from_index(index);
        }
    }
    Some(Column::LastConnection)
}

/// Whether screen row `y` is the heading row.
pub fn is_header(area: Rect, x: u16, y: u16) -> bool {
    let body = body(area);
    body.height > 0 && y == body.y && x >= body.x && x < body.x + body.width
}

/// Row of the active view under screen row `y`, if it holds a record.
pub fn row_at(area: Rect, x: u16, y: u16, offset: usize, len: usize) -> Option<usize> {
    let body = body(area);
    let first = body.y + 1;
    if y < first || y >= body.y + body.height || x < body.x || x >= body.x + body.width {
        return None;
    }
    let row = offset + usize::from(y - first);
    (row < len).then_some(row)
}

/// Number of data rows that fit below the heading.
pub fn visible_rows(area: Rect) -> usize {
    usize::from(body(area).height.saturating_sub(1))
}
