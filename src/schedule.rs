use crate::time::{Day, Moment, TimeOfDay, TimeRange};
use chrono::NaiveDateTime;
use log::trace;
use serde::Serialize;

/// One weekly recurring slot in a person's timetable.
/// `end` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day: Day,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub activity: String,
    pub location: String,
    /// Free-form time text shown next to the activity, e.g. `"1-2节"`.
    pub time_label: String,
}

impl ScheduleEntry {
    pub fn new(
        day: Day,
        start: TimeOfDay,
        end: TimeOfDay,
        activity: impl Into<String>,
        location: impl Into<String>,
    ) -> ScheduleEntry {
        ScheduleEntry {
            day,
            start,
            end,
            activity: activity.into(),
            location: location.into(),
            time_label: String::new(),
        }
    }

    pub fn with_time_label(mut self, label: impl Into<String>) -> ScheduleEntry {
        self.time_label = label.into();
        self
    }

    /// The minutes of the day covered by this entry.
    pub fn window(&self) -> TimeRange<u16> {
        TimeRange::new(self.start.minutes(), self.end.minutes())
    }

    /// True when `moment` falls on this entry's day and inside its window.
    /// Both the start and the end minute match.
    ///
    /// # Examples
    /// ```
    /// use roster_board::schedule::ScheduleEntry;
    /// use roster_board::time::{Day, Moment, TimeOfDay};
    ///
    /// let at = |h, m| Moment::new(Day::Tuesday, TimeOfDay::from_hm(h, m).unwrap());
    /// let math = ScheduleEntry::new(
    ///     Day::Tuesday,
    ///     TimeOfDay::from_hm(9, 0).unwrap(),
    ///     TimeOfDay::from_hm(10, 0).unwrap(),
    ///     "Math",
    ///     "Room 101",
    /// );
    ///
    /// assert!(math.is_active_at(at(9, 0)));
    /// assert!(math.is_active_at(at(10, 0)));
    /// assert!(!math.is_active_at(at(10, 1)));
    /// assert!(!math.is_active_at(Moment::new(Day::Monday, TimeOfDay::from_hm(9, 30).unwrap())));
    /// ```
    pub fn is_active_at(&self, moment: Moment) -> bool {
        self.day == moment.day && self.window().contains(moment.time.minutes())
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for ScheduleEntry {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let day = u.arbitrary::<Day>()?;
        let a = u.arbitrary::<TimeOfDay>()?;
        let b = u.arbitrary::<TimeOfDay>()?;
        Ok(ScheduleEntry::new(
            day,
            a.min(b),
            a.max(b),
            u.arbitrary::<String>()?,
            u.arbitrary::<String>()?,
        ))
    }
}

pub trait ActiveEntry<'a> {
    fn active_at(self, moment: Moment) -> Option<&'a ScheduleEntry>;
}

impl<'a, T> ActiveEntry<'a> for T
where
    T: Iterator<Item = &'a ScheduleEntry>,
{
    /// First entry, in iteration order, that contains `moment`.
    /// Later entries are never consulted once one matches, so overlapping
    /// entries resolve to whichever comes first in the timetable.
    ///
    /// # Examples
    /// ```
    /// use roster_board::schedule::{ActiveEntry, ScheduleEntry};
    /// use roster_board::time::{Day, Moment, TimeOfDay};
    ///
    /// let t = |h, m| TimeOfDay::from_hm(h, m).unwrap();
    /// let schedule = vec![
    ///     ScheduleEntry::new(Day::Friday, t(8, 0), t(9, 30), "Physics", "Lab 2"),
    ///     ScheduleEntry::new(Day::Friday, t(9, 0), t(11, 0), "Chemistry", "Lab 3"),
    /// ];
    ///
    /// let active = schedule.iter().active_at(Moment::new(Day::Friday, t(9, 15)));
    /// assert_eq!(active.map(|e| e.activity.as_str()), Some("Physics"));
    ///
    /// assert!(schedule.iter().active_at(Moment::new(Day::Friday, t(11, 1))).is_none());
    /// ```
    fn active_at(mut self, moment: Moment) -> Option<&'a ScheduleEntry> {
        self.find(|entry| entry.is_active_at(moment))
    }
}

/// Which entry of `entries`, if any, is running at `at`.
///
/// `at` is read as local wall-clock time; its weekday picks the day and its
/// hour and minute (seconds dropped) pick the minute of that day.
pub fn find_active<'a>(entries: &'a [ScheduleEntry], at: &NaiveDateTime) -> Option<&'a ScheduleEntry> {
    let moment = Moment::from(at);
    let active = entries.iter().active_at(moment);
    trace!(
        "{} of {} entries active at {}",
        if active.is_some() { "one" } else { "none" },
        entries.len(),
        moment
    );
    active
}
