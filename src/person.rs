use crate::schedule::{find_active, ScheduleEntry};
use chrono::NaiveDateTime;
use log::debug;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    /// Ids of the groups this person belongs to.
    pub groups: Vec<String>,
    /// Weekly timetable, in the order it was listed.
    pub schedule: Vec<ScheduleEntry>,
}

impl Person {
    /// Constructs a new Person with the given timetable and no groups.
    pub fn new(id: &str, name: &str, schedule: Vec<ScheduleEntry>) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
            groups: vec![],
            schedule,
        }
    }

    pub fn in_groups<I, S>(mut self, groups: I) -> Person
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_member_of(&self, group_id: &str) -> bool {
        self.groups.iter().any(|g| g == group_id)
    }

    /// What this person is doing at `at`, or `None` when free.
    pub fn active_entry(&self, at: &NaiveDateTime) -> Option<&ScheduleEntry> {
        find_active(&self.schedule, at)
    }
}

/// People belonging to `group_id`, in roster order.
///
/// # Examples
/// ```
/// use roster_board::person::{members_of, Person};
///
/// let people = vec![
///     Person::new("1", "Alice", vec![]).in_groups(["g1"]),
///     Person::new("2", "Bob", vec![]).in_groups(["g2"]),
///     Person::new("3", "Carol", vec![]).in_groups(["g2", "g1"]),
///     Person::new("4", "Dan", vec![]),
/// ];
///
/// let names: Vec<_> = members_of(&people, "g1").iter().map(|p| p.name.as_str()).collect();
/// assert_eq!(names, vec!["Alice", "Carol"]);
///
/// assert!(members_of(&people, "g3").is_empty());
/// ```
pub fn members_of<'a>(people: &'a [Person], group_id: &str) -> Vec<&'a Person> {
    let members: Vec<&Person> = people.iter().filter(|p| p.is_member_of(group_id)).collect();
    debug!(
        "group {}: {} of {} people are members",
        group_id,
        members.len(),
        people.len()
    );
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Person> {
        vec![
            Person::new("1", "Alice", vec![]).in_groups(["g1", "g2"]),
            Person::new("2", "Bob", vec![]).in_groups(["g2"]),
            Person::new("3", "Carol", vec![]),
            Person::new("4", "Dan", vec![]).in_groups(["g1"]),
            Person::new("5", "Eve", vec![]).in_groups(["g10"]),
        ]
    }

    #[test]
    fn filter_returns_only_members() {
        let people = roster();

        for group_id in ["g1", "g2", "g10", "missing", ""] {
            let members = members_of(&people, group_id);
            assert!(members.len() <= people.len());
            assert!(members.iter().all(|p| p.groups.iter().any(|g| g == group_id)));
        }
    }

    #[test]
    fn filter_preserves_roster_order() {
        let people = roster();
        let ids: Vec<_> = members_of(&people, "g1").iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn group_ids_match_exactly() {
        let people = roster();
        let ids: Vec<_> = members_of(&people, "g1").iter().map(|p| p.id.as_str()).collect();

        // "g10" is not a member of "g1"
        assert!(!ids.contains(&"5"));
    }

    #[test]
    fn empty_roster() {
        assert!(members_of(&[], "g1").is_empty());
    }
}
