//! Drawing module - 24-hour timeline strips behind the egui controls
//!
//! Each tracked zone gets one row of 24 hour cells. The slider hour and the
//! converted local hour are highlighted so the rebase after a slider move is
//! visible at a glance.

use chrono::{DateTime, Utc};
use nannou::prelude::*;
use shared::{anchor_instant, ZoneRule};

use crate::session::TimeZoneEntry;

/// Light and dark palettes
pub mod colors {
    use nannou::prelude::*;

    const fn rgb(red: u8, green: u8, blue: u8) -> Srgb<u8> {
        Srgb {
            red,
            green,
            blue,
            standard: std::marker::PhantomData,
        }
    }

    /// Colors for one theme
    pub struct Palette {
        pub background: Srgb<u8>,
        pub text_primary: Srgb<u8>,
        pub text_secondary: Srgb<u8>,
        /// Slider hour
        pub accent: Srgb<u8>,
        /// Converted local hour
        pub local: Srgb<u8>,
        pub cell: Srgb<u8>,
        /// Every sixth cell
        pub cell_major: Srgb<u8>,
    }

    pub const LIGHT: Palette = Palette {
        background: rgb(244, 246, 250),
        text_primary: rgb(28, 32, 40),
        text_secondary: rgb(96, 104, 118),
        accent: rgb(0, 122, 204),
        local: rgb(255, 160, 40),
        cell: rgb(220, 225, 233),
        cell_major: rgb(196, 203, 214),
    };

    pub const DARK: Palette = Palette {
        background: rgb(26, 26, 26),
        text_primary: rgb(240, 240, 240),
        text_secondary: rgb(160, 160, 160),
        accent: rgb(0, 212, 255),
        local: rgb(255, 180, 0),
        cell: rgb(50, 50, 50),
        cell_major: rgb(80, 80, 80),
    };

    pub fn for_mode(dark_mode: bool) -> &'static Palette {
        if dark_mode {
            &DARK
        } else {
            &LIGHT
        }
    }
}

const LABEL_WIDTH: f32 = 180.0;
const ROW_HEIGHT: f32 = 44.0;
const ROW_GAP: f32 = 10.0;
const MARGIN: f32 = 20.0;

/// Area not covered by the egui panels
pub struct TimelineLayout {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl TimelineLayout {
    /// Calculate layout from window dimensions, accounting for the left and top panels
    pub fn calculate(window_rect: Rect, left_panel_width: f32, top_panel_height: f32) -> Self {
        Self {
            left: window_rect.left() + left_panel_width + MARGIN,
            right: window_rect.right() - MARGIN,
            top: window_rect.top() - top_panel_height - 60.0,
            bottom: window_rect.bottom() + MARGIN,
        }
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Bounding rect of row `index`
    pub fn row_rect(&self, index: usize) -> Rect {
        let top = self.top - index as f32 * (ROW_HEIGHT + ROW_GAP);
        Rect::from_corners(pt2(self.left, top), pt2(self.right, top - ROW_HEIGHT))
    }

    /// Bounding rect of the cell for `hour` in row `index`
    pub fn cell_rect(&self, index: usize, hour: u32) -> Rect {
        let row = self.row_rect(index);
        let cell_w = (self.width() - LABEL_WIDTH) / 24.0;
        let x = self.left + LABEL_WIDTH + (hour as f32 + 0.5) * cell_w;
        Rect::from_x_y_w_h(x, row.y(), cell_w, row.h())
    }

    /// Whether row `index` still fits above the bottom edge
    pub fn row_visible(&self, index: usize) -> bool {
        self.row_rect(index).bottom() >= self.bottom
    }
}

/// Draw the title and one strip per entry
pub fn draw_timeline(
    draw: &Draw,
    layout: &TimelineLayout,
    entries: &[TimeZoneEntry],
    dragged_index: Option<usize>,
    palette: &colors::Palette,
    now: DateTime<Utc>,
) {
    if layout.width() <= LABEL_WIDTH {
        return;
    }

    draw.text("CONVERT TIME BETWEEN TIME ZONES")
        .x_y((layout.left + layout.right) / 2.0, layout.top + 36.0)
        .color(palette.text_primary)
        .font_size(18)
        .w(layout.width());

    for (index, entry) in entries.iter().enumerate() {
        if !layout.row_visible(index) {
            break;
        }
        draw_strip(draw, layout, index, entry, palette, now);

        if dragged_index == Some(index) {
            let row = layout.row_rect(index);
            draw.rect()
                .xy(row.xy())
                .wh(row.wh() + vec2(8.0, 8.0))
                .no_fill()
                .stroke_weight(2.0)
                .stroke(palette.accent);
        }
    }

    draw_hour_scale(draw, layout, entries.len(), palette);
}

fn draw_strip(
    draw: &Draw,
    layout: &TimelineLayout,
    index: usize,
    entry: &TimeZoneEntry,
    palette: &colors::Palette,
    now: DateTime<Utc>,
) {
    let row = layout.row_rect(index);
    let anchor = anchor_instant(now, entry.slider_value);
    let local_hour = ZoneRule::general(&entry.zone).local_hour(anchor);

    draw.text(&entry.name)
        .x_y(row.left() + LABEL_WIDTH / 2.0, row.y())
        .color(palette.text_primary)
        .font_size(14)
        .w(LABEL_WIDTH - 10.0)
        .left_justify();

    for hour in 0..24 {
        let cell = layout.cell_rect(index, hour);
        let color = if hour == entry.slider_value {
            palette.accent
        } else if hour == local_hour {
            palette.local
        } else if hour % 6 == 0 {
            palette.cell_major
        } else {
            palette.cell
        };
        draw.rect()
            .xy(cell.xy())
            .wh(cell.wh() * vec2(0.85, 0.8))
            .color(color);
    }
}

/// Hour numbers under the last visible row
fn draw_hour_scale(draw: &Draw, layout: &TimelineLayout, rows: usize, palette: &colors::Palette) {
    let last = (0..rows).take_while(|&i| layout.row_visible(i)).last();
    let Some(last) = last else {
        return;
    };

    for hour in (0..24).step_by(3) {
        let cell = layout.cell_rect(last, hour);
        draw.text(&format!("{:02}", hour))
            .x_y(cell.x(), cell.bottom() - 12.0)
            .color(palette.text_secondary)
            .font_size(11)
            .w(40.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> TimelineLayout {
        let window = Rect::from_w_h(1200.0, 800.0);
        TimelineLayout::calculate(window, 420.0, 40.0)
    }

    #[test]
    fn test_rows_stack_downward() {
        let layout = layout();
        let first = layout.row_rect(0);
        let second = layout.row_rect(1);
        assert!(second.top() < first.bottom());
        assert_eq!(first.h(), ROW_HEIGHT);
    }

    #[test]
    fn test_cells_span_the_strip() {
        let layout = layout();
        let first = layout.cell_rect(0, 0);
        let last = layout.cell_rect(0, 23);
        assert!((first.left() - (layout.left + LABEL_WIDTH)).abs() < 0.01);
        assert!((last.right() - layout.right).abs() < 0.01);
    }

    #[test]
    fn test_row_visibility() {
        let layout = layout();
        assert!(layout.row_visible(0));
        assert!(!layout.row_visible(100));
    }

    #[test]
    fn test_palette_for_mode() {
        assert_eq!(colors::for_mode(true).background, colors::DARK.background);
        assert_eq!(colors::for_mode(false).accent, colors::LIGHT.accent);
    }
}
