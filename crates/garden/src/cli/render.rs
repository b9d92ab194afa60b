//! Terminal rendering for command results.
//!
//! Every function here returns a `String`; `commands.rs` decides where it goes.
//! With `--output json` none of this runs and the API's values are serialized
//! as they are.

use chrono::{DateTime, Utc};
use gardenapp::api::{BuildSummary, FilteredNotes};
use gardenapp::audit::{Audit, AuditItem};
use gardenapp::likes::{Like, Medium};
use gardenapp::model::Entry;
use gardenapp::query::TagState;
use gardenapp::tree::Node;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::styles::{names, style};

const KIND_WIDTH: usize = 9;
const TITLE_WIDTH: usize = 48;
const TIME_WIDTH: usize = 14;

fn paint(name: &str, text: &str) -> String {
    match style(name) {
        Some(style) => style.apply_to(text).to_string(),
        None => text.to_string(),
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_summary(summary: &BuildSummary) -> String {
    let rows = [
        ("items", summary.items),
        ("tags", summary.tags),
        ("notes", summary.notes),
        ("note trees", summary.note_roots),
        ("posts", summary.posts),
        ("published", summary.published_posts),
        ("scheduled", summary.scheduled_posts),
        ("drafts", summary.drafts),
        ("tils", summary.tils),
        ("bookmarks", summary.bookmarks),
        ("pages", summary.pages),
    ];

    let mut out = format!(
        "{} {}\n",
        paint(names::HEADER, "Build"),
        paint(names::MUTED, &format!("({})", summary.mode))
    );
    for (label, count) in rows {
        out.push_str(&format!("  {:<12}{:>6}\n", label, count));
    }
    out
}

pub fn render_entries(entries: &[&Entry], now: DateTime<Utc>) -> String {
    if entries.is_empty() {
        return format!("{}\n", paint(names::MUTED, "No entries."));
    }

    let mut out = String::new();
    for entry in entries {
        let kind = format!("{:<width$}", entry.kind().to_string(), width = KIND_WIDTH);
        let title = pad_to_width(&truncate_to_width(entry.title_or_id(), TITLE_WIDTH), TITLE_WIDTH);
        let time = entry
            .base
            .last_modified
            .or(entry.base.date)
            .map(|t| format_time_ago(t, now))
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        out.push_str(&format!(
            "{} {}  {}  {}\n",
            paint(names::KIND, &kind),
            paint(names::TITLE, &title),
            paint(names::TIME, &time),
            paint(names::MUTED, entry.id())
        ));
    }
    out
}

pub fn render_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return format!("{}\n", paint(names::MUTED, "No tags."));
    }
    tags.iter().map(|tag| format!("{}\n", tag)).collect()
}

pub fn render_filter(filtered: &FilteredNotes) -> String {
    let mut out = format!(
        "{} {}\n",
        paint(names::HEADER, "Notes"),
        paint(
            names::MUTED,
            &format!("({} of {})", filtered.count.filtered, filtered.count.all)
        )
    );

    let ignored: Vec<&String> = filtered
        .tags
        .query
        .iter()
        .filter(|q| !filtered.tags.valid.contains(q))
        .collect();
    if !ignored.is_empty() {
        let list: Vec<&str> = ignored.iter().map(|s| s.as_str()).collect();
        out.push_str(&format!(
            "{}\n",
            paint(names::WARNING, &format!("Ignoring unknown tags: {}", list.join(", ")))
        ));
    }

    let cloud: Vec<String> = filtered
        .facets
        .iter()
        .map(|facet| match facet.state {
            TagState::Active => paint(names::HIGHLIGHT, &format!("[{}]", facet.label)),
            TagState::Inactive => facet.label.clone(),
            TagState::Unavailable => paint(names::FAINT, &facet.label),
        })
        .collect();
    if !cloud.is_empty() {
        out.push_str(&cloud.join(" "));
        out.push('\n');
    }
    out.push('\n');

    for item in &filtered.results {
        out.push_str(&format!(
            "{}  {}\n",
            paint(names::TITLE, &pad_to_width(&truncate_to_width(&item.text, TITLE_WIDTH), TITLE_WIDTH)),
            paint(names::MUTED, &item.href)
        ));
    }
    out
}

pub fn render_tree(forest: &[Node]) -> String {
    fn walk(node: &Node, depth: usize, out: &mut String) {
        let marker = if depth == 0 { "" } else { "└ " };
        out.push_str(&format!(
            "{}{}{} {}\n",
            "  ".repeat(depth.saturating_sub(1)),
            marker,
            paint(names::TITLE, node.entry.title_or_id()),
            paint(names::MUTED, &format!("({})", node.entry.id()))
        ));
        for child in &node.children {
            walk(child, depth + 1, out);
        }
    }

    if forest.is_empty() {
        return format!("{}\n", paint(names::MUTED, "No notes."));
    }
    let mut out = String::new();
    for root in forest {
        walk(root, 0, &mut out);
    }
    out
}

fn audit_line(item: &AuditItem) -> String {
    let star = if item.high_priority { " ⭐️" } else { "" };
    let date = item
        .date
        .map(|d| format!("  {}", paint(names::TIME, &d.format("%Y-%m-%d").to_string())))
        .unwrap_or_default();
    format!("  {}{}{}\n", item.id, star, date)
}

pub fn render_audit(audit: &Audit) -> String {
    let mut out = String::new();

    if !audit.missing_title.is_empty() {
        out.push_str(&format!("{}\n", paint(names::HEADER, "Missing a title")));
        for item in &audit.missing_title {
            out.push_str(&audit_line(item));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", paint(names::HEADER, "Scheduled")));
    if audit.scheduled.is_empty() {
        out.push_str(&format!("  {}\n", paint(names::WARNING, "Time to schedule a post!")));
    }
    for item in &audit.scheduled {
        out.push_str(&audit_line(item));
    }

    for group in &audit.drafts {
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n",
            paint(names::HEADER, group.status.label()),
            group.status.emoji()
        ));
        for item in &group.items {
            out.push_str(&audit_line(item));
        }
    }
    out
}

pub fn render_likes(likes: &[(Medium, Vec<Like>)]) -> String {
    let mut out = String::new();
    for (medium, items) in likes {
        out.push_str(&format!(
            "{} {}\n",
            paint(names::HEADER, &medium.to_string()),
            paint(names::MUTED, &format!("({})", items.len()))
        ));
        for like in items {
            let label = match &like.artist {
                Some(artist) => format!("{} - {}", like.title, artist),
                None => like.title.clone(),
            };
            out.push_str(&format!(
                "  {}  {}\n",
                paint(names::TIME, &like.date.format("%Y-%m-%d").to_string()),
                truncate_to_width(&label, TITLE_WIDTH + 20)
            ));
        }
        out.push('\n');
    }
    out
}

pub fn render_snapshot(folder: &str, date: Option<&str>, count: usize) -> String {
    format!(
        "{} {}\n  taken   {}\n  images  {}\n",
        paint(names::HEADER, "CDN snapshot"),
        paint(names::MUTED, &format!("({})", folder)),
        date.unwrap_or("unknown"),
        count
    )
}

pub fn render_cached(path: &str) -> String {
    format!("{} {}\n", paint(names::SUCCESS, "Cached"), path)
}

fn pad_to_width(s: &str, width: usize) -> String {
    let current = s.width();
    if current >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - current))
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    // Pad units to the width of "seconds" so the column lines up.
    let time_str = time_str
        .replace("hours ago", "  hours ago")
        .replace("hour ago", "   hour ago")
        .replace("days ago", "   days ago")
        .replace("day ago", "    day ago")
        .replace("weeks ago", "  weeks ago")
        .replace("week ago", "   week ago")
        .replace("months ago", " months ago")
        .replace("month ago", "  month ago")
        .replace("years ago", "  years ago")
        .replace("year ago", "   year ago");

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
