use crate::domain::model::{Member, Person, Roster};
use std::fmt::Write;

pub const GROUP_PREFIX: &str = "Group:";
pub const TOTAL_PREFIX: &str = "Total Members:";
pub const UNKNOWN_GROUP: &str = "Unknown Group";
const SEPARATOR_WIDTH: usize = 50;

/// Line-oriented text form of a roster:
///
/// ```text
/// Group: <name>
/// Total Members: <count>
/// --------------------------------------------------
///
/// <name>\t<hours>
/// ```
pub struct RosterCodec;

impl RosterCodec {
    pub fn encode<M: Member>(roster: &Roster<M>) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{} {}", GROUP_PREFIX, roster.name());
        let _ = writeln!(out, "{} {}", TOTAL_PREFIX, roster.len());
        let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
        out.push('\n');

        for member in roster.members() {
            let _ = writeln!(out, "{}\t{}", member.name(), member.hours());
        }
        out
    }

    /// Returns `None` for empty input or when no member rows are found.
    /// Bad hours fields degrade to zero instead of failing the load.
    pub fn decode(text: &str) -> Option<Roster> {
        if text.trim().is_empty() {
            tracing::warn!("Roster text is empty, nothing to load");
            return None;
        }

        let mut group_name: Option<String> = None;
        let mut declared_total: Option<String> = None;
        let mut in_data = false;
        let mut people = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            // Tabbed lines and everything past the separator are member rows,
            // even when a name happens to start with a header prefix.
            let is_separator = line.trim().chars().all(|c| c == '-');
            let (name, hours) = match line.split_once('\t') {
                Some((name, hours_field)) => (name, parse_hours(hours_field)),
                None if is_separator => {
                    in_data = true;
                    continue;
                }
                None if in_data => (line, 0),
                None => {
                    if let Some(rest) = line.strip_prefix(GROUP_PREFIX) {
                        let name = rest.trim();
                        if !name.is_empty() {
                            group_name = Some(name.to_string());
                        }
                    } else if let Some(rest) = line.strip_prefix(TOTAL_PREFIX) {
                        declared_total = Some(rest.trim().to_string());
                    } else {
                        tracing::debug!("Ignoring header line {}: {}", index + 1, line);
                    }
                    continue;
                }
            };

            match Person::new(name, i64::from(hours)) {
                Ok(person) => people.push(person),
                Err(e) => tracing::warn!("Skipping line {}: {}", index + 1, e),
            }
        }

        if people.is_empty() {
            tracing::warn!("No members found in roster text");
            return None;
        }

        let parsed = people.len();
        let mut roster = Roster::empty(group_name.unwrap_or_else(|| UNKNOWN_GROUP.to_string()));
        let kept = roster.merge(people);
        if kept < parsed {
            tracing::warn!(
                "Dropped {} repeated name(s) while loading '{}'",
                parsed - kept,
                roster.name()
            );
        }

        if let Some(declared) = declared_total {
            if declared.parse::<usize>().ok() != Some(roster.len()) {
                tracing::debug!(
                    "Header declares {} members but {} were loaded",
                    declared,
                    roster.len()
                );
            }
        }

        Some(roster)
    }

    /// Group name with spaces and slashes turned into underscores, plus `.txt`.
    pub fn default_file_name(group_name: &str) -> String {
        format!("{}.txt", group_name.replace([' ', '/'], "_"))
    }
}

fn parse_hours(field: &str) -> u32 {
    let field = field.trim();
    if let Ok(hours) = field.parse::<u32>() {
        return hours;
    }
    match field.parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours >= 0.0 => hours.trunc().min(u32::MAX as f64) as u32,
        _ => {
            tracing::warn!("Unreadable hours value '{}', using 0", field);
            0
        }
    }
}
