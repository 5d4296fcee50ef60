//! Plain-text rendering of the group list and the status board.

use crate::group::{Group, GroupCard};
use crate::resolver::Resolution;
use chrono::NaiveDateTime;
use std::fmt::Write;

/// One line per group, numbered from 1, with a lock marker.
pub fn render_group_list(cards: &[GroupCard<'_>]) -> String {
    let mut out = String::new();
    for (n, card) in cards.iter().enumerate() {
        let access = if card.locked { "password required" } else { "open" };
        let _ = writeln!(
            out,
            "{:>3}. {} [{}] ({})",
            n + 1,
            card.group.name,
            card.group.id,
            access
        );
        if !card.group.description.is_empty() {
            let _ = writeln!(out, "     {}", card.group.description);
        }
    }
    out
}

/// Header, one line per member and a summary line.
pub fn render_board(group: &Group, resolution: &Resolution<'_>, at: &NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", group.name, at.format("%A %Y-%m-%d %H:%M"));
    if !group.description.is_empty() {
        let _ = writeln!(out, "{}", group.description);
    }
    out.push('\n');

    if resolution.is_empty() {
        out.push_str("This group has no members.\n");
    }

    for status in &resolution.statuses {
        match status.active_entry {
            Some(entry) => {
                let mut details = vec![format!("{}-{}", entry.start, entry.end)];
                if !entry.time_label.is_empty() {
                    details.push(entry.time_label.clone());
                }
                if !entry.location.is_empty() {
                    details.push(entry.location.clone());
                }
                let _ = writeln!(
                    out,
                    "  BUSY  {}: {} ({})",
                    status.person.name,
                    entry.activity,
                    details.join(", ")
                );
            }
            None => {
                let _ = writeln!(out, "  FREE  {}", status.person.name);
            }
        }
    }

    let _ = writeln!(
        out,
        "\n{} of {} busy, {} free",
        resolution.active_count,
        resolution.total_count,
        resolution.free_count()
    );
    out
}
