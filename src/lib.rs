//! Who in a group is busy right now, read off a static weekly timetable.
//!
//! Groups and people are loaded once from a JSON document ([`data`]). A
//! [`session::Session`] tracks the selected group and the password-gated
//! groups unlocked so far, and resolves ([`resolver::resolve`]) every member
//! against the current time on each refresh.

pub mod access;
pub mod board;
pub mod clock;
pub mod config;
pub mod data;
pub mod group;
pub mod person;
pub mod resolver;
pub mod schedule;
pub mod session;
pub mod time;

pub use access::{AccessState, Unlocked, WrongSecret};
pub use data::{DataLoadError, Dataset, OverlapPolicy};
pub use group::{Group, GroupCard, SharedSecret};
pub use person::{members_of, Person};
pub use resolver::{resolve, Resolution, ResolvedStatus};
pub use schedule::{find_active, ScheduleEntry};
pub use session::{PromptEvent, Selection, Session, SessionError, SessionState};
pub use time::{Day, Moment, TimeOfDay, TimeRange};

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    // 2024-01-02 was a Tuesday
    fn tuesday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    const DOCUMENT: &str = r#"{
        "groups": [
            { "id": "G1", "name": "Group one", "description": "Open to all" },
            { "id": "G2", "name": "Group two", "description": "Gated", "password": "xyz" }
        ],
        "people": [
            {
                "id": "alice",
                "name": "Alice",
                "groups": ["G1"],
                "schedule": [
                    { "day": "Tuesday", "startTime": "09:00", "endTime": "10:00",
                      "course": "Math", "time": "1-2", "location": "A1" }
                ]
            }
        ]
    }"#;

    #[test]
    fn alice_in_math_then_free() {
        use crate::data::{Dataset, OverlapPolicy};
        use crate::resolver::resolve;

        let dataset = Dataset::from_json_str(DOCUMENT, OverlapPolicy::Allow).unwrap();
        let g1 = dataset.group("G1").unwrap();

        let during = resolve(g1, &dataset.people, &tuesday_at(9, 30));
        assert_eq!(during.active_count, 1);
        assert_eq!(during.total_count, 1);
        assert_eq!(during.statuses[0].person.name, "Alice");
        assert_eq!(
            during.statuses[0].active_entry.map(|e| e.activity.as_str()),
            Some("Math")
        );

        let after = resolve(g1, &dataset.people, &tuesday_at(10, 5));
        assert_eq!(after.active_count, 0);
        assert_eq!(after.total_count, 1);
        assert_eq!(after.statuses[0].person.name, "Alice");
        assert!(after.statuses[0].active_entry.is_none());
    }

    #[test]
    fn gated_group_unlocks_with_exact_secret() {
        use crate::access::{AccessState, Unlocked};
        use crate::data::{Dataset, OverlapPolicy};

        let dataset = Dataset::from_json_str(DOCUMENT, OverlapPolicy::Allow).unwrap();
        let g2 = dataset.group("G2").unwrap();
        let mut access = AccessState::new();

        assert!(!access.is_unlocked(g2));
        assert!(access.attempt_unlock(g2, "abc").is_err());
        assert!(!access.is_unlocked(g2));
        assert_eq!(access.attempt_unlock(g2, "xyz"), Ok(Unlocked::Granted));
        assert!(access.is_unlocked(g2));
    }

    #[test]
    fn session_walkthrough() {
        use crate::clock::{Clock, FixedClock};
        use crate::data::{Dataset, OverlapPolicy};
        use crate::session::{Selection, Session};
        use chrono::Duration;

        let clock = FixedClock::new(tuesday_at(9, 30));
        let dataset = Dataset::from_json_str(DOCUMENT, OverlapPolicy::Allow).unwrap();
        let mut session = Session::new(dataset, clock.now());

        assert_eq!(session.select_group("G1"), Ok(Selection::Entered));
        assert_eq!(session.resolution().unwrap().active_count, 1);

        clock.advance(Duration::minutes(35));
        let resolution = session.tick(clock.now()).unwrap();
        assert_eq!(resolution.active_count, 0);
        assert_eq!(resolution.total_count, 1);

        // G2 has no members in this document
        session.deselect();
        assert_eq!(session.select_group("G2"), Ok(Selection::SecretRequired));
        session.submit_secret("xyz").unwrap();
        let resolution = session.resolution().unwrap();
        assert!(resolution.is_empty());
        assert_eq!(resolution.active_count, 0);
    }
}
