//! Loading and validating the data document.
//!
//! The document is read once at startup. Everything the resolver relies on
//! (known weekdays, well-formed `HH:MM` times, `start <= end`) is checked
//! here so that resolution never has to deal with malformed input.

use crate::group::{Group, SharedSecret};
use crate::person::Person;
use crate::schedule::ScheduleEntry;
use crate::time::{Day, ParseDayError, ParseTimeError, TimeOfDay, TimeRange};
use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Could not read data file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed data document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Group id `{id}` is defined more than once")]
    DuplicateGroup { id: String },
    #[error("Person `{person}`, schedule entry {index}: {source}")]
    UnknownDay {
        person: String,
        index: usize,
        #[source]
        source: ParseDayError,
    },
    #[error("Person `{person}`, schedule entry {index}: {source}")]
    InvalidTime {
        person: String,
        index: usize,
        #[source]
        source: ParseTimeError,
    },
    #[error("Person `{person}`, schedule entry {index}: ends at {end} before it starts at {start}")]
    EndBeforeStart {
        person: String,
        index: usize,
        start: TimeOfDay,
        end: TimeOfDay,
    },
    #[error("Invalid schedule. No overlapping entries allowed\nPerson `{person}` has entries {first} and {second} overlapping on {day}")]
    OverlappingEntries {
        person: String,
        day: Day,
        first: usize,
        second: usize,
    },
}

/// What to do with two entries of one person that overlap on the same day.
///
/// Entries that only share their boundary minute (one ends at 10:00, the
/// next starts at 10:00) are never treated as overlapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Keep them. The earlier entry in the timetable wins while both run.
    #[default]
    Allow,
    /// Fail the load.
    Reject,
}

#[derive(Deserialize)]
struct RawDocument {
    groups: Vec<RawGroup>,
    people: Vec<RawPerson>,
}

#[derive(Deserialize)]
struct RawGroup {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Deserialize)]
struct RawPerson {
    id: String,
    name: String,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    schedule: Vec<RawEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    day: String,
    start_time: String,
    end_time: String,
    course: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    location: String,
}

/// Groups and people, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub groups: Vec<Group>,
    pub people: Vec<Person>,
}

impl Dataset {
    pub fn new(groups: Vec<Group>, people: Vec<Person>) -> Dataset {
        Dataset { groups, people }
    }

    /// Reads and validates the document at `path`.
    pub fn load(path: &Path, policy: OverlapPolicy) -> Result<Dataset, DataLoadError> {
        let json = fs::read_to_string(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Dataset::from_json_str(&json, policy)?;
        info!(
            "loaded {} groups and {} people from {}",
            dataset.groups.len(),
            dataset.people.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parses and validates a data document.
    ///
    /// # Examples
    /// ```
    /// use roster_board::data::{DataLoadError, Dataset, OverlapPolicy};
    ///
    /// let json = r#"{
    ///     "groups": [{ "id": "g1", "name": "Class 1", "description": "" }],
    ///     "people": [{
    ///         "id": "1", "name": "Alice", "groups": ["g1"],
    ///         "schedule": [{ "day": "Tuesday", "startTime": "09:00", "endTime": "10:00",
    ///                        "course": "Math", "time": "1-2", "location": "A1" }]
    ///     }]
    /// }"#;
    ///
    /// let dataset = Dataset::from_json_str(json, OverlapPolicy::Allow).unwrap();
    /// assert_eq!(dataset.people[0].schedule[0].activity, "Math");
    ///
    /// let broken = json.replace("10:00", "10am");
    /// assert!(matches!(
    ///     Dataset::from_json_str(&broken, OverlapPolicy::Allow),
    ///     Err(DataLoadError::InvalidTime { index: 0, .. })
    /// ));
    /// ```
    pub fn from_json_str(json: &str, policy: OverlapPolicy) -> Result<Dataset, DataLoadError> {
        let raw: RawDocument = serde_json::from_str(json)?;

        let groups = raw
            .groups
            .into_iter()
            .map(RawGroup::into_group)
            .collect::<Vec<_>>();

        let mut seen = HashSet::with_capacity(groups.len());
        if let Some(duplicate) = groups.iter().find(|g| !seen.insert(g.id.as_str())) {
            return Err(DataLoadError::DuplicateGroup {
                id: duplicate.id.clone(),
            });
        }

        let people = raw
            .people
            .into_iter()
            .map(|p| p.into_person(policy))
            .collect::<Result<Vec<_>, _>>()?;

        for person in &people {
            for group_id in person.groups.iter().filter(|id| !seen.contains(id.as_str())) {
                warn!(
                    "person {} references unknown group {}",
                    person.id, group_id
                );
            }
        }

        debug!("validated {} groups, {} people", groups.len(), people.len());

        Ok(Dataset { groups, people })
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }
}

impl RawGroup {
    fn into_group(self) -> Group {
        Group {
            id: self.id,
            name: self.name,
            description: self.description,
            // an empty password gates nothing
            secret: self
                .password
                .filter(|p| !p.is_empty())
                .map(SharedSecret::new),
        }
    }
}

impl RawPerson {
    fn into_person(self, policy: OverlapPolicy) -> Result<Person, DataLoadError> {
        let person_id = self.id;

        let schedule = self
            .schedule
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_entry(&person_id, index))
            .collect::<Result<Vec<_>, _>>()?;

        check_overlaps(&person_id, &schedule, policy)?;

        Ok(Person {
            id: person_id,
            name: self.name,
            groups: self.groups,
            schedule,
        })
    }
}

impl RawEntry {
    fn into_entry(self, person: &str, index: usize) -> Result<ScheduleEntry, DataLoadError> {
        let day = self
            .day
            .parse::<Day>()
            .map_err(|source| DataLoadError::UnknownDay {
                person: person.to_string(),
                index,
                source,
            })?;

        let parse_time = |value: &str| {
            value
                .parse::<TimeOfDay>()
                .map_err(|source| DataLoadError::InvalidTime {
                    person: person.to_string(),
                    index,
                    source,
                })
        };
        let start = parse_time(&self.start_time)?;
        let end = parse_time(&self.end_time)?;

        if end < start {
            return Err(DataLoadError::EndBeforeStart {
                person: person.to_string(),
                index,
                start,
                end,
            });
        }

        Ok(ScheduleEntry::new(day, start, end, self.course, self.location).with_time_label(self.time))
    }
}

/// Finds entries of one person overlapping on the same day, reporting
/// them as timetable indices.
fn check_overlaps(
    person: &str,
    schedule: &[ScheduleEntry],
    policy: OverlapPolicy,
) -> Result<(), DataLoadError> {
    let overlaps = schedule
        .iter()
        .enumerate()
        .sorted_by_key(|(_, entry)| (entry.day, entry.start, entry.end))
        .tuple_windows()
        .filter(|((_, prev), (_, next))| {
            prev.day == next.day && conflicts(prev.window(), next.window())
        });

    for ((first, prev), (second, _)) in overlaps {
        let (first, second) = (first.min(second), first.max(second));
        match policy {
            OverlapPolicy::Reject => {
                return Err(DataLoadError::OverlappingEntries {
                    person: person.to_string(),
                    day: prev.day,
                    first,
                    second,
                })
            }
            OverlapPolicy::Allow => warn!(
                "person {} has overlapping entries {} and {} on {}; entry {} wins while both run",
                person, first, second, prev.day, first
            ),
        }
    }

    Ok(())
}

/// `prev` sorts before `next`. Back-to-back entries sharing only the
/// boundary minute are fine as long as neither one contains the other;
/// a contained entry can lose every minute to the first match.
fn conflicts(prev: TimeRange<u16>, next: TimeRange<u16>) -> bool {
    prev.overlaps(next) && (next.start() < prev.end() || prev.covers(next) || next.covers(prev))
}
