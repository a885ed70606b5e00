//! Export of journal entries
//!
//! Exporters are pure functions over a snapshot. They never touch the store.
//!
//! - [`to_json`]: full-fidelity JSON, the same shape the store persists
//! - [`book`]: a paginated, human-readable document, oldest entry first

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::codec;
use crate::config::Config;
use crate::models::Entry;

/// What an export produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Json,
    Book,
}

impl ExportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Json => "json",
            ExportKind::Book => "txt",
        }
    }
}

/// Default download name, e.g. `diary-2024-03-01.json`
pub fn export_file_name(prefix: &str, kind: ExportKind, date: NaiveDate) -> String {
    format!("{}-{}.{}", prefix, date.format("%Y-%m-%d"), kind.extension())
}

/// Pretty-printed JSON array of every entry, extra fields included
pub fn to_json(entries: &[Entry]) -> Result<String, serde_json::Error> {
    codec::encode_pretty(entries)
}

/// Layout settings for [`book`]
#[derive(Debug, Clone, Copy)]
pub struct BookOptions {
    /// Maximum display columns per line
    pub line_width: usize,
    /// Lines per page, footer excluded
    pub lines_per_page: usize,
    /// Offset used to print timestamps
    pub offset: FixedOffset,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            line_width: 80,
            lines_per_page: 50,
            offset: Local::now().offset().fix(),
        }
    }
}

impl BookOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            line_width: config.line_width,
            lines_per_page: config.lines_per_page,
            ..Self::default()
        }
    }
}

/// One page of a book
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub lines: Vec<String>,
}

/// A laid-out, paginated export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    pub pages: Vec<Page>,
}

impl Book {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Plain text with a footer per page and form feeds between pages
    pub fn render(&self) -> String {
        let total = self.pages.len();
        self.pages
            .iter()
            .map(|page| {
                format!(
                    "{}\n\nPage {} of {}\n",
                    page.lines.join("\n"),
                    page.number,
                    total
                )
            })
            .collect::<Vec<_>>()
            .join("\u{000C}\n")
    }
}

/// Lay entries out as a book, oldest first
///
/// Each entry gets a header (mood, if any, and its creation time) followed by
/// its body wrapped to `line_width`. Entries are separated by a blank line.
pub fn book(entries: &[Entry], options: &BookOptions) -> Book {
    let width = options.line_width.max(1);
    let per_page = options.lines_per_page.max(1);

    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.created_at);

    let mut lines = Vec::new();
    for (index, entry) in ordered.into_iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.extend(wrap(&entry_header(entry, options.offset), width));
        lines.extend(wrap(&entry.text, width));
    }

    let mut pages: Vec<Page> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in lines {
        // Don't start a page with the gap between two entries
        if current.is_empty() && line.is_empty() {
            continue;
        }
        current.push(line);
        if current.len() == per_page {
            pages.push(Page {
                number: pages.len() + 1,
                lines: std::mem::take(&mut current),
            });
        }
    }
    if !current.is_empty() {
        pages.push(Page {
            number: pages.len() + 1,
            lines: current,
        });
    }

    Book { pages }
}

/// `[mood] 2024-03-01 09:30`, or just the time when there is no mood
pub fn entry_header(entry: &Entry, offset: FixedOffset) -> String {
    let when = format_timestamp(entry.created_at, offset);
    if entry.has_mood() {
        format!("[{}] {}", entry.mood.trim(), when)
    } else {
        when
    }
}

/// Human-readable form of a millisecond timestamp
pub fn format_timestamp(millis: i64, offset: FixedOffset) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}

/// Greedy word wrap by display width
///
/// Line breaks in the input are kept. Words wider than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();

    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            out.push(String::new());
            continue;
        }

        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.width()
            } else {
                line.width() + 1 + word.width()
            };
            if needed <= width {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
                continue;
            }

            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            if word.width() <= width {
                line.push_str(word);
            } else {
                let mut pieces = split_by_width(word, width);
                line = pieces.pop().unwrap_or_default();
                out.extend(pieces);
            }
        }
        if !line.is_empty() {
            out.push(line);
        }
    }

    out
}

fn split_by_width(word: &str, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut used = 0;

    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            used = 0;
        }
        piece.push(c);
        used += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn options(line_width: usize, lines_per_page: usize) -> BookOptions {
        BookOptions {
            line_width,
            lines_per_page,
            offset: utc(),
        }
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            export_file_name("diary", ExportKind::Json, date),
            "diary-2024-03-01.json"
        );
        assert_eq!(
            export_file_name("diary", ExportKind::Book, date),
            "diary-2024-03-01.txt"
        );
    }

    #[test]
    fn test_to_json_is_pretty_and_complete() {
        let entries = vec![Entry::new("a", "Hello", "happy", 1)];
        let json = to_json(&entries).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains(r#""createdAt": 1"#));
        let parsed: Vec<Entry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_header_with_and_without_mood() {
        // 2023-11-14 22:13:20 UTC
        let entry = Entry::new("a", "t", "happy", 1_700_000_000_000);
        assert_eq!(entry_header(&entry, utc()), "[happy] 2023-11-14 22:13");

        let plain = Entry::new("b", "t", "  ", 1_700_000_000_000);
        assert_eq!(entry_header(&plain, utc()), "2023-11-14 22:13");
    }

    #[test]
    fn test_header_respects_offset() {
        let entry = Entry::new("a", "t", "", 1_700_000_000_000);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(entry_header(&entry, plus_two), "2023-11-15 00:13");
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            ["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_keeps_paragraphs() {
        assert_eq!(wrap("one\n\ntwo", 10), ["one", "", "two"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij xy", 4), ["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_wrap_counts_display_width() {
        // Each CJK character is two columns wide
        assert_eq!(wrap("日本語 日本", 6), ["日本語", "日本"]);
    }

    #[test]
    fn test_book_orders_oldest_first() {
        let entries = vec![
            Entry::new("new", "Newest", "", 3_000_000),
            Entry::new("old", "Oldest", "", 1_000_000),
        ];
        let book = book(&entries, &options(40, 50));
        assert_eq!(book.page_count(), 1);

        let lines = &book.pages[0].lines;
        let oldest = lines.iter().position(|l| l == "Oldest").unwrap();
        let newest = lines.iter().position(|l| l == "Newest").unwrap();
        assert!(oldest < newest);
        assert_eq!(lines[2], "");
    }

    #[test]
    fn test_book_paginates() {
        let entries: Vec<_> = (0..5)
            .map(|i| Entry::new(format!("id{}", i), format!("Body {}", i), "", i * 60_000))
            .collect();
        // 5 entries x (header + body) + 4 separators = 14 lines
        let book = book(&entries, &options(40, 4));
        assert_eq!(book.page_count(), 4);
        assert!(book.pages.iter().all(|p| p.lines.len() <= 4));
        assert!(book.pages.iter().all(|p| p.lines.first().map_or(false, |l| !l.is_empty())));
        assert_eq!(book.pages[3].number, 4);
    }

    #[test]
    fn test_book_render() {
        let entries = vec![Entry::new("a", "Only entry", "ok", 0)];
        let rendered = book(&entries, &options(40, 10)).render();
        assert_eq!(rendered, "[ok] 1970-01-01 00:00\nOnly entry\n\nPage 1 of 1\n");
    }

    #[test]
    fn test_empty_book() {
        let book = book(&[], &options(40, 10));
        assert_eq!(book.page_count(), 0);
        assert_eq!(book.render(), "");
    }
}
