mod calculator;

pub use calculator::render_calculator;

use crate::calculator::{Notice, NoticeLevel};
use crate::items::RecallItem;

/// Render any recallable item based on its type.
/// This is the main dispatch function for list rendering.
pub fn render_item(item: &RecallItem, row: usize) -> String {
    match item {
        RecallItem::History(entry) => format!("{:>3}. [{}] {}", row + 1, entry.id, entry.summary()),
        RecallItem::Saved(saved) => format!(
            "{:>3}. [{}] {}: {} = {}",
            row + 1,
            saved.id,
            saved.name,
            saved.expression,
            saved.result
        ),
    }
}

/// Render a list under a section header, or a placeholder when empty.
pub fn render_list<'a>(
    section: &str,
    items: impl IntoIterator<Item = &'a RecallItem>,
) -> String {
    let rows: Vec<String> = items
        .into_iter()
        .enumerate()
        .map(|(row, item)| render_item(item, row))
        .collect();

    if rows.is_empty() {
        format!("{}: (empty)", section)
    } else {
        format!("{}:\n{}", section, rows.join("\n"))
    }
}

/// Render a notice as a one-line toast.
pub fn render_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Info => "i",
        NoticeLevel::Error => "!",
    };

    if notice.message.is_empty() {
        format!("[{}] {}", marker, notice.title)
    } else {
        format!("[{}] {}: {}", marker, notice.title, notice.message)
    }
}
