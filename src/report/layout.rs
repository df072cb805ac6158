//! Page layout: places report lines on A4 pages and breaks pages.
//!
//! Positions are millimetres from the top-left corner of the page. The
//! cursor only moves down; it is checked against the page bottom after
//! every entry and after every date group's trailing space.

use crate::constants::{
    REPORT_CONTENT_WIDTH_MM, REPORT_ENTRY_FONT_PT, REPORT_ENTRY_X_MM, REPORT_GROUP_SPACING_MM,
    REPORT_HEADER_ADVANCE_MM, REPORT_HEADER_FONT_PT, REPORT_LINE_HEIGHT_MM, REPORT_MARGIN_X_MM,
    REPORT_PAGE_BOTTOM_MM, REPORT_TITLE_FONT_PT, REPORT_TITLE_Y_MM, REPORT_TOP_MARGIN_MM,
};

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Advance widths of the standard Helvetica AFM for ASCII 32..=126, in
/// 1/1000 em. `printpdf` references the font by name only, so the metrics
/// are kept here for wrapping.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Width used for characters outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

/// Geometry of a report page. The defaults reproduce the classic diary
/// export on A4.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub title_y: f32,
    pub margin_x: f32,
    pub entry_x: f32,
    pub top_margin: f32,
    pub page_bottom: f32,
    pub content_width: f32,
    pub header_advance: f32,
    pub line_height: f32,
    pub group_spacing: f32,
    pub title_font: f32,
    pub header_font: f32,
    pub entry_font: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            title_y: REPORT_TITLE_Y_MM,
            margin_x: REPORT_MARGIN_X_MM,
            entry_x: REPORT_ENTRY_X_MM,
            top_margin: REPORT_TOP_MARGIN_MM,
            page_bottom: REPORT_PAGE_BOTTOM_MM,
            content_width: REPORT_CONTENT_WIDTH_MM,
            header_advance: REPORT_HEADER_ADVANCE_MM,
            line_height: REPORT_LINE_HEIGHT_MM,
            group_spacing: REPORT_GROUP_SPACING_MM,
            title_font: REPORT_TITLE_FONT_PT,
            header_font: REPORT_HEADER_FONT_PT,
            entry_font: REPORT_ENTRY_FONT_PT,
        }
    }
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

/// Text content of one date group before layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupText {
    pub header: String,
    /// One element per entry; text entries may span several lines.
    pub entries: Vec<Vec<String>>,
}

/// Width of `text` in millimetres when set in Helvetica at `font_pt`.
pub fn text_width_mm(text: &str, font_pt: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
            } else {
                u32::from(FALLBACK_WIDTH)
            }
        })
        .sum();
    units as f32 / 1000.0 * font_pt * MM_PER_PT
}

/// Greedy word wrap to `max_width_mm`.
///
/// Explicit newlines are kept as line breaks. A single word wider than the
/// line is split between characters. Always returns at least one line.
///
/// # Examples
///
/// ```
/// use moodlog::report::layout::wrap_text;
///
/// let lines = wrap_text("uno dos tres", 12.0, 12.0);
/// assert!(lines.len() > 1);
/// assert_eq!(lines.join(" "), "uno dos tres");
/// ```
pub fn wrap_text(text: &str, max_width_mm: f32, font_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width_mm(&candidate, font_pt) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = split_long_word(word, max_width_mm, font_pt, &mut lines);
        }
        lines.push(current);
    }

    lines
}

/// Pushes full-width chunks of `word` onto `lines` and returns the remainder.
fn split_long_word(word: &str, max_width_mm: f32, font_pt: f32, lines: &mut Vec<String>) -> String {
    let mut chunk = String::new();
    for c in word.chars() {
        chunk.push(c);
        if chunk.chars().count() > 1 && text_width_mm(&chunk, font_pt) > max_width_mm {
            chunk.pop();
            lines.push(std::mem::take(&mut chunk));
            chunk.push(c);
        }
    }
    chunk
}

/// Lays the title and groups out on pages.
///
/// Pages are opened lazily, so a break right at the end never produces a
/// blank trailing page.
pub fn paginate(title: &str, groups: &[GroupText], layout: &PageLayout) -> Vec<Page> {
    let mut pages = vec![Page {
        lines: vec![TextLine {
            x: layout.margin_x,
            y: layout.title_y,
            font_size: layout.title_font,
            text: title.to_string(),
        }],
    }];
    let mut y = layout.top_margin;
    let mut break_pending = false;

    let place = |pages: &mut Vec<Page>, break_pending: &mut bool, line: TextLine| {
        if std::mem::take(break_pending) {
            pages.push(Page::default());
        }
        if let Some(page) = pages.last_mut() {
            page.lines.push(line);
        }
    };

    for group in groups {
        place(
            &mut pages,
            &mut break_pending,
            TextLine {
                x: layout.margin_x,
                y,
                font_size: layout.header_font,
                text: group.header.clone(),
            },
        );
        y += layout.header_advance;

        for entry in &group.entries {
            for (i, line) in entry.iter().enumerate() {
                place(
                    &mut pages,
                    &mut break_pending,
                    TextLine {
                        x: layout.entry_x,
                        y: y + i as f32 * layout.line_height,
                        font_size: layout.entry_font,
                        text: line.clone(),
                    },
                );
            }
            y += entry.len().max(1) as f32 * layout.line_height;
            check_page_bottom(&mut y, &mut break_pending, layout);
        }

        y += layout.group_spacing;
        check_page_bottom(&mut y, &mut break_pending, layout);
    }

    pages
}

fn check_page_bottom(y: &mut f32, break_pending: &mut bool, layout: &PageLayout) {
    if *y > layout.page_bottom {
        *break_pending = true;
        *y = layout.top_margin;
    }
}
