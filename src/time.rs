use chrono::{NaiveDateTime, Timelike, Weekday};
use num::{Integer, One};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

/// Minutes in one day. Valid `TimeOfDay` values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Inclusive [start, end] time range
/// <N>: Any integer type
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimeRange<N>(pub N, pub N)
where
    N: Integer + One + Copy;

impl<N> TimeRange<N>
where
    N: Integer + One + Copy,
{
    /// Construct a new Time Range
    /// Range is inclusive on [start, end]
    /// # Examples
    /// ```
    /// use roster_board::time::TimeRange;
    ///
    /// let test = TimeRange::new(540, 600);
    ///
    /// assert_eq!(test.0, 540);
    /// assert_eq!(test.1, 600);
    /// ```
    pub fn new(start: N, end: N) -> TimeRange<N> {
        TimeRange(start, end)
    }

    /// Convenience function for readability
    /// Returns the start of the TimeRange
    pub fn start(self) -> N {
        self.0
    }

    /// Convenience function for readability
    /// Returns the end of the TimeRange
    pub fn end(self) -> N {
        self.1
    }

    /// Both bounds are part of the range.
    ///
    /// # Examples
    /// ```
    /// use roster_board::time::TimeRange;
    ///
    /// let class = TimeRange::new(540, 600);
    ///
    /// assert!(class.contains(540));
    /// assert!(class.contains(600));
    /// assert!(!class.contains(601));
    /// ```
    pub fn contains(self, value: N) -> bool {
        self.start() <= value && value <= self.end()
    }

    /// Two inclusive ranges overlap when they share at least one value,
    /// so ranges that only touch at a bound overlap as well.
    ///
    /// # Examples
    /// ```
    /// use roster_board::time::TimeRange;
    ///
    /// assert!(TimeRange::new(0, 5).overlaps(TimeRange::new(5, 9)));
    /// assert!(!TimeRange::new(0, 4).overlaps(TimeRange::new(5, 9)));
    /// ```
    pub fn overlaps(self, other: TimeRange<N>) -> bool {
        self.start() <= other.end() && other.start() <= self.end()
    }

    /// Every value of `other` is also in `self`.
    ///
    /// # Examples
    /// ```
    /// use roster_board::time::TimeRange;
    ///
    /// assert!(TimeRange::new(0, 5).covers(TimeRange::new(5, 5)));
    /// assert!(!TimeRange::new(0, 5).covers(TimeRange::new(5, 9)));
    /// ```
    pub fn covers(self, other: TimeRange<N>) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }
}

/// Day of the week a schedule entry recurs on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// English name, as written in the data document.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }
}

impl From<Day> for Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
            Day::Sunday => Weekday::Sun,
        }
    }
}

impl Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown day `{0}`. Expected an English weekday name such as `Monday`")]
pub struct ParseDayError(pub String);

impl FromStr for Day {
    type Err = ParseDayError;

    /// Parses English weekday names, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use roster_board::time::Day;
    ///
    /// assert_eq!("Tuesday".parse::<Day>(), Ok(Day::Tuesday));
    /// assert_eq!(" sunday ".parse::<Day>(), Ok(Day::Sunday));
    /// assert!("Tue".parse::<Day>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Day::ALL
            .iter()
            .copied()
            .find(|day| day.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDayError(s.to_string()))
    }
}

/// Wall-clock time of day, stored as minutes since midnight.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn from_hm(hour: u16, minute: u16) -> Option<TimeOfDay> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay(hour * 60 + minute))
        } else {
            None
        }
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl From<&NaiveDateTime> for TimeOfDay {
    /// Seconds are dropped: 09:59:59 is still 09:59.
    fn from(at: &NaiveDateTime) -> Self {
        // hour() < 24 and minute() < 60 always hold for chrono values
        TimeOfDay((at.hour() * 60 + at.minute()) as u16)
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time `{0}`. Expected 24-hour `HH:MM`")]
pub struct ParseTimeError(pub String);

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    /// Parses `HH:MM` on a 24-hour clock. The hour may have one digit.
    ///
    /// # Examples
    /// ```
    /// use roster_board::time::TimeOfDay;
    ///
    /// let nine: TimeOfDay = "9:00".parse().unwrap();
    /// assert_eq!(nine.minutes(), 540);
    /// assert_eq!("23:59".parse::<TimeOfDay>().unwrap().minutes(), 1439);
    ///
    /// assert!("24:00".parse::<TimeOfDay>().is_err());
    /// assert!("10:5".parse::<TimeOfDay>().is_err());
    /// assert!("ten".parse::<TimeOfDay>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(err)?;

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
            return Err(err());
        }

        let hour = hour.parse::<u16>().map_err(|_| err())?;
        let minute = minute.parse::<u16>().map_err(|_| err())?;

        TimeOfDay::from_hm(hour, minute).ok_or_else(err)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for TimeOfDay {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(TimeOfDay(u.int_in_range(0..=MINUTES_PER_DAY - 1)?))
    }
}

/// A point in the weekly cycle: the day plus the minute of that day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Moment {
    pub day: Day,
    pub time: TimeOfDay,
}

impl Moment {
    pub fn new(day: Day, time: TimeOfDay) -> Moment {
        Moment { day, time }
    }
}

impl From<&NaiveDateTime> for Moment {
    fn from(at: &NaiveDateTime) -> Self {
        use chrono::Datelike;

        Moment {
            day: at.weekday().into(),
            time: at.into(),
        }
    }
}

impl From<NaiveDateTime> for Moment {
    fn from(at: NaiveDateTime) -> Self {
        Moment::from(&at)
    }
}

impl Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn weekday_mapping_is_a_bijection() {
        let mut seen = std::collections::HashSet::new();
        for day in Day::ALL {
            let weekday: Weekday = day.into();
            assert_eq!(Day::from(weekday), day);
            assert!(seen.insert(weekday), "{} maps to a weekday twice", day);
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn moment_from_calendar_date() {
        // 2024-01-02 was a Tuesday
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 59)
            .unwrap();

        let moment = Moment::from(&at);
        assert_eq!(moment.day, Day::Tuesday);
        assert_eq!(moment.time, TimeOfDay::from_hm(9, 30).unwrap());
        assert_eq!(moment.to_string(), "Tuesday 09:30");
    }

    #[test]
    fn sunday_is_not_aliased() {
        // 2024-01-07 was a Sunday, 2024-01-08 a Monday
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap().and_hms_opt(0, 0, 0).unwrap();

        assert_eq!(Moment::from(sunday).day, Day::Sunday);
        assert_eq!(Moment::from(monday).day, Day::Monday);
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", ":", "9", "09:", ":30", "9:0", "009:00", "12:60", "-1:00", "1a:00", "09:00:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "`{}` should not parse", bad);
        }
    }

    #[test]
    fn time_of_day_displays_padded() {
        assert_eq!("7:05".parse::<TimeOfDay>().unwrap().to_string(), "07:05");
    }

    #[test]
    fn unknown_day_names() {
        assert_eq!(
            "Funday".parse::<Day>(),
            Err(ParseDayError("Funday".to_string()))
        );
    }

    #[test]
    fn range_overlap_and_cover() {
        let class = TimeRange::new(540_u16, 600);

        assert!(class.overlaps(TimeRange::new(600, 660)));
        assert!(!class.covers(TimeRange::new(600, 660)));
        assert!(class.covers(class));
        assert!(TimeRange::new(600_u16, 600).covers(TimeRange::new(600, 600)));
    }
}
