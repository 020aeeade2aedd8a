use crate::utils::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Anything the roster can aggregate over.
pub trait Member {
    fn name(&self) -> &str;
    fn hours(&self) -> f64;
    fn reset_hours(&mut self);
}

impl<M: Member + ?Sized> Member for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn hours(&self) -> f64 {
        (**self).hours()
    }

    fn reset_hours(&mut self) {
        (**self).reset_hours()
    }
}

/// One roster entry: a trimmed, non-empty name and whole service hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    name: String,
    hours: u32,
}

impl Person {
    pub fn new(name: &str, hours: i64) -> Result<Self> {
        let name = Self::validate_name(name)?;
        let hours = u32::try_from(hours).map_err(|_| {
            RosterError::validation(format!(
                "hours for '{}' must be a non-negative whole number, got {}",
                name, hours
            ))
        })?;
        Ok(Self { name, hours })
    }

    /// Accepts a floating value only when it is a whole, non-negative number.
    pub fn from_fractional(name: &str, hours: f64) -> Result<Self> {
        if !hours.is_finite() || hours.fract() != 0.0 || hours < 0.0 || hours > u32::MAX as f64 {
            return Err(RosterError::validation(format!(
                "hours for '{}' must be a non-negative whole number, got {}",
                name.trim(),
                hours
            )));
        }
        Self::new(name, hours as i64)
    }

    fn validate_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RosterError::validation("name cannot be empty"));
        }
        if trimmed.contains(['\t', '\n', '\r']) {
            return Err(RosterError::validation(format!(
                "name '{}' cannot contain tabs or line breaks",
                trimmed.escape_default()
            )));
        }
        Ok(trimmed.to_string())
    }

    pub fn whole_hours(&self) -> u32 {
        self.hours
    }
}

impl Member for Person {
    fn name(&self) -> &str {
        &self.name
    }

    fn hours(&self) -> f64 {
        f64::from(self.hours)
    }

    fn reset_hours(&mut self) {
        self.hours = 0;
    }
}

/// A named group of members, kept in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster<M: Member = Person> {
    name: String,
    members: Vec<M>,
}

impl<M: Member> Roster<M> {
    /// Stores `members` as given; duplicates are not removed here.
    pub fn new(name: impl Into<String>, members: Vec<M>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn members(&self) -> &[M] {
        &self.members
    }

    /// Direct access to the collection. Pushing through this skips the
    /// duplicate-name check that `merge` performs.
    pub fn members_mut(&mut self) -> &mut Vec<M> {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn total_hours(&self) -> f64 {
        self.members
            .iter()
            .filter_map(|member| {
                let hours = member.hours();
                if hours.is_finite() && hours >= 0.0 {
                    Some(hours)
                } else {
                    tracing::warn!(
                        "Skipping member '{}' with unusable hours value {}",
                        member.name(),
                        hours
                    );
                    None
                }
            })
            .sum()
    }

    pub fn members_below(&self, threshold: f64) -> Vec<&M> {
        self.members
            .iter()
            .filter(|member| member.hours() < threshold)
            .collect()
    }

    pub fn reset_all_hours(&mut self) -> usize {
        for member in &mut self.members {
            member.reset_hours();
        }
        self.members.len()
    }

    /// Appends every incoming member whose trimmed name is not already present.
    /// Existing members always win; their hours are never touched.
    pub fn merge<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = M>,
    {
        let mut known: HashSet<String> = self
            .members
            .iter()
            .map(|member| member.name().trim().to_string())
            .collect();

        let mut added = 0;
        let mut collisions = 0;
        for candidate in incoming {
            if known.insert(candidate.name().trim().to_string()) {
                self.members.push(candidate);
                added += 1;
            } else {
                collisions += 1;
            }
        }

        tracing::debug!(
            "Merged into '{}': {} added, {} already present",
            self.name,
            added,
            collisions
        );
        added
    }
}

/// A member as reported by the group-chat service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    #[serde(rename = "nickname")]
    pub name: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl MemberRecord {
    pub fn into_person(self) -> Result<Person> {
        Person::new(&self.name, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with_hours(hours: &[i64]) -> Roster {
        let members = hours
            .iter()
            .enumerate()
            .map(|(i, h)| Person::new(&format!("Member {}", i + 1), *h).unwrap())
            .collect();
        Roster::new("Key Club", members)
    }

    struct Broken;

    impl Member for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn hours(&self) -> f64 {
            f64::NAN
        }

        fn reset_hours(&mut self) {}
    }

    struct Fixed(&'static str, f64);

    impl Member for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn hours(&self) -> f64 {
            self.1
        }

        fn reset_hours(&mut self) {
            self.1 = 0.0;
        }
    }

    #[test]
    fn test_person_trims_name_and_keeps_hours() {
        let person = Person::new("  Alice Smith ", 12).unwrap();
        assert_eq!(person.name(), "Alice Smith");
        assert_eq!(person.whole_hours(), 12);
        assert_eq!(person.hours(), 12.0);
    }

    #[test]
    fn test_person_rejects_invalid_input() {
        assert!(matches!(Person::new("", 1), Err(RosterError::Validation { .. })));
        assert!(Person::new("   ", 1).is_err());
        assert!(Person::new("Bob", -1).is_err());
        assert!(Person::new("Tab\tName", 1).is_err());
        assert!(Person::new("Bob", i64::from(u32::MAX) + 1).is_err());
        assert!(Person::from_fractional("Bob", 2.5).is_err());
        assert!(Person::from_fractional("Bob", -3.0).is_err());
        assert!(Person::from_fractional("Bob", f64::NAN).is_err());
        assert_eq!(Person::from_fractional("Bob", 4.0).unwrap().whole_hours(), 4);
    }

    #[test]
    fn test_reset_hours() {
        let mut person = Person::new("Carol", 9).unwrap();
        person.reset_hours();
        assert_eq!(person.whole_hours(), 0);
    }

    #[test]
    fn test_total_hours() {
        assert_eq!(roster_with_hours(&[3, 0, 7]).total_hours(), 10.0);
        assert_eq!(Roster::<Person>::empty("Nobody").total_hours(), 0.0);
    }

    #[test]
    fn test_total_hours_skips_unusable_members() {
        let members: Vec<Box<dyn Member>> = vec![
            Box::new(Fixed("a", 2.0)),
            Box::new(Broken),
            Box::new(Fixed("b", 3.5)),
        ];
        let roster = Roster::new("Mixed", members);
        assert_eq!(roster.total_hours(), 5.5);
    }

    #[test]
    fn test_members_below() {
        let roster = roster_with_hours(&[3, 5, 7]);

        let below = roster.members_below(5.0);
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].whole_hours(), 3);

        assert!(roster.members_below(-1.0).is_empty());
        assert_eq!(roster.members_below(1e9).len(), 3);
    }

    #[test]
    fn test_members_below_keeps_order() {
        let roster = roster_with_hours(&[1, 9, 0, 4]);
        let names: Vec<&str> = roster.members_below(5.0).into_iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Member 1", "Member 3", "Member 4"]);
    }

    #[test]
    fn test_reset_all_hours() {
        let mut roster = roster_with_hours(&[3, 0, 7]);
        assert_eq!(roster.reset_all_hours(), 3);
        assert_eq!(roster.total_hours(), 0.0);

        assert_eq!(Roster::<Person>::empty("Nobody").reset_all_hours(), 0);
    }

    #[test]
    fn test_merge_existing_wins() {
        let mut roster = Roster::new("Key Club", vec![Person::new("Alice", 3).unwrap()]);
        let incoming = vec![Person::new("Alice", 0).unwrap(), Person::new("Bob", 0).unwrap()];

        let added = roster.merge(incoming);

        assert_eq!(added, 1);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.members()[0].name(), "Alice");
        assert_eq!(roster.members()[0].whole_hours(), 3);
        assert_eq!(roster.members()[1].name(), "Bob");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut roster = Roster::empty("Key Club");
        let incoming = || vec![Person::new("Alice", 0).unwrap(), Person::new("Bob", 0).unwrap()];

        assert_eq!(roster.merge(incoming()), 2);
        assert_eq!(roster.merge(incoming()), 0);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_merge_dedups_within_incoming() {
        let mut roster = Roster::empty("Key Club");
        let added = roster.merge(vec![
            Person::new("Dana", 0).unwrap(),
            Person::new(" Dana ", 0).unwrap(),
        ]);
        assert_eq!(added, 1);
    }

    #[test]
    fn test_merge_is_case_sensitive() {
        let mut roster = Roster::new("Key Club", vec![Person::new("alice", 1).unwrap()]);
        assert_eq!(roster.merge(vec![Person::new("Alice", 0).unwrap()]), 1);
    }

    #[test]
    fn test_member_record_deserializes_nickname() {
        let record: MemberRecord =
            serde_json::from_value(serde_json::json!({"nickname": "Eve", "user_id": "42"})).unwrap();
        assert_eq!(record.name, "Eve");
        assert_eq!(record.user_id.as_deref(), Some("42"));
        assert_eq!(record.into_person().unwrap().whole_hours(), 0);
    }
}
