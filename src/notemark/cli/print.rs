use chrono::{DateTime, Utc};
use colored::Colorize;
use notemark::api::{CmdMessage, DisplayNote, MessageLevel};
use notemark::model::excerpt;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const EXCERPT_CHARS: usize = 80;
const SELECTED_MARKER: &str = "›";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_full_note(dn: &DisplayNote) {
    println!("{} {}", dn.index.to_string().yellow(), dn.note.title.bold());
    println!("--------------------------------");
    println!("{}", dn.note.display_content());
}

pub(super) fn print_notes(notes: &[DisplayNote]) {
    for dn in notes {
        println!("{}", note_line(dn, Utc::now()));
    }
}

fn note_line(dn: &DisplayNote, now: DateTime<Utc>) -> String {
    let left_prefix = if dn.selected {
        format!("  {} ", SELECTED_MARKER)
    } else {
        "    ".to_string()
    };
    let idx_str = format!("{}. ", dn.index);

    let title = &dn.note.title;
    let preview = excerpt(dn.note.content.as_deref().unwrap_or_default(), EXCERPT_CHARS);
    let title_content = if preview.is_empty() {
        title.clone()
    } else {
        format!("{}  {}", title, preview)
    };

    let fixed_width = left_prefix.width() + idx_str.width() + 2 + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed_width);
    let title_display = truncate_to_width(&title_content, available);
    let padding = available.saturating_sub(title_display.width());

    format!(
        "{}{}{}{}  {}",
        left_prefix,
        idx_str.yellow(),
        title_display,
        " ".repeat(padding),
        format_time_ago(dn.note.last_edit_time, now).dimmed()
    )
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(millis: i64, now: DateTime<Utc>) -> String {
    let time_str = match DateTime::from_timestamp_millis(millis) {
        Some(edited) => {
            let duration = now.signed_duration_since(edited);
            Formatter::new().convert(duration.to_std().unwrap_or_default())
        }
        None => String::new(),
    };
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemark::model::NoteInfo;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_to_width("a bit too long", 6), "a bit…");
        assert_eq!(truncate_to_width("日本語の文章", 5), "日本…");
    }

    #[test]
    fn test_format_time_ago() {
        let now = Utc::now();
        let hour_ago = (now - chrono::Duration::hours(1)).timestamp_millis();
        let formatted = format_time_ago(hour_ago, now);
        assert_eq!(formatted.trim(), "1 hour ago");
        assert_eq!(formatted.len(), TIME_WIDTH);
    }

    #[test]
    fn test_note_line_shows_excerpt_not_markup() {
        colored::control::set_override(false);
        let now = Utc::now();
        let note = NoteInfo::new("Groceries", "# Shopping\n\n- **milk**", now.timestamp_millis());
        let line = note_line(&DisplayNote::new(0, note, true), now);

        assert!(line.starts_with("  › 1. Groceries  Shopping milk"));
        assert!(!line.contains("**"));
    }
}
