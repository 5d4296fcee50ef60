use crate::group::Group;
use crate::person::{members_of, Person};
use crate::schedule::ScheduleEntry;
use chrono::NaiveDateTime;
use log::debug;
use serde::Serialize;

/// What one member is doing at the resolved moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStatus<'a> {
    pub person: &'a Person,
    /// `None` means free.
    pub active_entry: Option<&'a ScheduleEntry>,
}

impl ResolvedStatus<'_> {
    pub fn is_active(&self) -> bool {
        self.active_entry.is_some()
    }
}

/// Status of every member of a group at one point in time.
///
/// Computed fresh on every call and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution<'a> {
    pub statuses: Vec<ResolvedStatus<'a>>,
    pub active_count: usize,
    pub total_count: usize,
}

impl Resolution<'_> {
    /// True when the group has no members.
    ///
    /// Data is always loaded before anything is resolved, so an empty
    /// resolution means an empty group and never "still loading".
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn free_count(&self) -> usize {
        self.total_count - self.active_count
    }
}

/// Resolves who in `group` is busy and who is free at `at`.
///
/// Members keep their roster order. Each member's active entry is the first
/// entry of their timetable containing `at`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use roster_board::group::Group;
/// use roster_board::person::Person;
/// use roster_board::resolver::resolve;
/// use roster_board::schedule::ScheduleEntry;
/// use roster_board::time::{Day, TimeOfDay};
///
/// let t = |h, m| TimeOfDay::from_hm(h, m).unwrap();
/// let group = Group::new("g1", "Class 1", "");
/// let people = vec![
///     Person::new("1", "Alice", vec![ScheduleEntry::new(Day::Tuesday, t(9, 0), t(10, 0), "Math", "A1")])
///         .in_groups(["g1"]),
///     Person::new("2", "Bob", vec![]).in_groups(["g1"]),
/// ];
///
/// // 2024-01-02 was a Tuesday
/// let at = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let resolution = resolve(&group, &people, &at);
///
/// assert_eq!(resolution.total_count, 2);
/// assert_eq!(resolution.active_count, 1);
/// assert_eq!(resolution.free_count(), 1);
/// assert!(!resolution.statuses[1].is_active());
/// ```
pub fn resolve<'a>(group: &Group, people: &'a [Person], at: &NaiveDateTime) -> Resolution<'a> {
    let statuses: Vec<ResolvedStatus<'a>> = members_of(people, &group.id)
        .into_iter()
        .map(|person| ResolvedStatus {
            person,
            active_entry: person.active_entry(at),
        })
        .collect();

    let active_count = statuses.iter().filter(|s| s.is_active()).count();
    let total_count = statuses.len();

    debug!(
        "resolved group {} at {}: {}/{} active",
        group.id, at, active_count, total_count
    );

    Resolution {
        statuses,
        active_count,
        total_count,
    }
}
