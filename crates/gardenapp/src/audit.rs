//! # Content Audit
//!
//! A digest of the writing pipeline: posts without a title, the publishing
//! schedule, and unpublished posts grouped by their `status` frontmatter.
//!
//! Within a status group, `priority: high` posts come first, then ids
//! alphabetically. Scheduled posts are listed soonest first. Published posts
//! only show up when they lack a title.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{publish_state, PublishState};
use crate::listing::escape_html;
use crate::model::{Entry, EntryKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Announcing,
    Publishing,
    Editing,
    Drafting,
    Outlining,
    Researching,
    Unknown,
}

impl DraftStatus {
    pub fn all() -> &'static [DraftStatus] {
        &[
            DraftStatus::Announcing,
            DraftStatus::Publishing,
            DraftStatus::Editing,
            DraftStatus::Drafting,
            DraftStatus::Outlining,
            DraftStatus::Researching,
            DraftStatus::Unknown,
        ]
    }

    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("announcing") => DraftStatus::Announcing,
            Some("publishing") => DraftStatus::Publishing,
            Some("editing") => DraftStatus::Editing,
            Some("drafting") => DraftStatus::Drafting,
            Some("outlining") => DraftStatus::Outlining,
            Some("researching") => DraftStatus::Researching,
            _ => DraftStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DraftStatus::Announcing => "Announcing",
            DraftStatus::Publishing => "Publishing",
            DraftStatus::Editing => "Editing",
            DraftStatus::Drafting => "Drafting",
            DraftStatus::Outlining => "Outlining",
            DraftStatus::Researching => "Researching",
            DraftStatus::Unknown => "Unknown",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            DraftStatus::Announcing => "🎙️",
            DraftStatus::Publishing => "🚀",
            DraftStatus::Editing => "💅",
            DraftStatus::Drafting => "🤮",
            DraftStatus::Outlining => "🌳",
            DraftStatus::Researching => "🔍",
            DraftStatus::Unknown => "🤷‍♂️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditItem {
    pub id: String,
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub high_priority: bool,
}

impl AuditItem {
    fn from_entry(entry: &Entry) -> Self {
        let high_priority = match &entry.kind {
            EntryKind::Post(post) => post
                .priority
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case("high")),
            _ => false,
        };
        Self {
            id: entry.id().to_string(),
            title: entry.base.title.clone(),
            date: entry.base.date,
            high_priority,
        }
    }

    fn label(&self) -> String {
        if self.high_priority {
            format!("{} ⭐️", escape_html(&self.id))
        } else {
            escape_html(&self.id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftGroup {
    pub status: DraftStatus,
    pub items: Vec<AuditItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Audit {
    pub missing_title: Vec<AuditItem>,
    pub scheduled: Vec<AuditItem>,
    /// Non-empty groups only, in pipeline order.
    pub drafts: Vec<DraftGroup>,
}

fn draft_status(entry: &Entry) -> DraftStatus {
    match &entry.kind {
        EntryKind::Post(post) => DraftStatus::parse(post.status.as_deref()),
        _ => DraftStatus::Unknown,
    }
}

/// Sorts the posts of a build into the audit categories.
pub fn audit_posts<E: AsRef<Entry>>(posts: &[E], now: DateTime<Utc>) -> Audit {
    let mut audit = Audit::default();
    let mut by_status: Vec<(DraftStatus, Vec<AuditItem>)> =
        DraftStatus::all().iter().map(|s| (*s, Vec::new())).collect();

    for entry in posts.iter().map(AsRef::as_ref) {
        if entry.base.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            audit.missing_title.push(AuditItem::from_entry(entry));
        }
        if !matches!(entry.kind, EntryKind::Post(_)) {
            continue;
        }

        match publish_state(entry, now) {
            PublishState::Published => {}
            PublishState::Scheduled => audit.scheduled.push(AuditItem::from_entry(entry)),
            PublishState::Unscheduled => {
                let status = draft_status(entry);
                if let Some((_, items)) = by_status.iter_mut().find(|(s, _)| *s == status) {
                    items.push(AuditItem::from_entry(entry));
                }
            }
        }
    }

    audit.missing_title.sort_by(|a, b| a.id.cmp(&b.id));
    audit.scheduled.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    audit.drafts = by_status
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(status, mut items)| {
            items.sort_by(|a, b| b.high_priority.cmp(&a.high_priority).then_with(|| a.id.cmp(&b.id)));
            DraftGroup { status, items }
        })
        .collect();
    audit
}

fn list_html(items: &[AuditItem]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", item.label()))
        .collect()
}

impl Audit {
    pub fn is_empty(&self) -> bool {
        self.missing_title.is_empty() && self.scheduled.is_empty() && self.drafts.is_empty()
    }

    /// The digest as an HTML fragment, ready to mail.
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        if !self.missing_title.is_empty() {
            html.push_str("<h3>🤷‍♂️ Missing a title</h3><ul>");
            html.push_str(&list_html(&self.missing_title));
            html.push_str("</ul>");
        }

        html.push_str("<h3>Scheduled 📆</h3>");
        if self.scheduled.is_empty() {
            html.push_str("<p><em>Time to schedule a post!</em></p>");
        } else {
            html.push_str("<ul>");
            for item in &self.scheduled {
                let date = item
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                let title = item.title.as_deref().unwrap_or(&item.id);
                html.push_str(&format!("<li><strong>{}:</strong> {}</li>", date, escape_html(title)));
            }
            html.push_str("</ul>");
        }

        for group in &self.drafts {
            html.push_str(&format!(
                "<h3>{} {}</h3><ul>{}</ul>",
                group.status.label(),
                group.status.emoji(),
                list_html(&group.items)
            ));
        }
        html
    }
}
