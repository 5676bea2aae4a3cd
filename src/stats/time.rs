use crate::stats::ActivityRecord;
use chrono::{Datelike, Timelike, Weekday};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Range;

/// Weekdays in histogram order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// English name of a weekday
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Commit counts per weekday, Sunday first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdayHistogram {
    counts: [u64; 7],
}

impl WeekdayHistogram {
    /// Count one commit on `day`
    pub fn record(&mut self, day: Weekday) {
        self.counts[day.num_days_from_sunday() as usize] += 1;
    }

    /// Commits on `day`
    pub fn get(&self, day: Weekday) -> u64 {
        self.counts[day.num_days_from_sunday() as usize]
    }

    /// `(weekday, count)` pairs, Sunday first
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, u64)> + '_ {
        WEEKDAYS.iter().map(move |day| (*day, self.get(*day)))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Saturday plus Sunday
    pub fn weekend(&self) -> u64 {
        self.get(Weekday::Sat) + self.get(Weekday::Sun)
    }

    /// Monday through Friday
    pub fn weekdays(&self) -> u64 {
        self.total() - self.weekend()
    }

    /// Day with the most commits; earliest in Sunday-first order wins ties.
    /// `None` when nothing was recorded.
    pub fn busiest(&self) -> Option<(Weekday, u64)> {
        let mut best: Option<(Weekday, u64)> = None;
        for (day, count) in self.iter() {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((day, count));
            }
        }
        best
    }

    /// Non-zero day with the fewest commits; earliest wins ties
    pub fn quietest_active(&self) -> Option<(Weekday, u64)> {
        let mut best: Option<(Weekday, u64)> = None;
        for (day, count) in self.iter().filter(|(_, count)| *count > 0) {
            if best.map_or(true, |(_, c)| count < c) {
                best = Some((day, count));
            }
        }
        best
    }
}

impl Serialize for WeekdayHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WEEKDAYS.len()))?;
        for (day, count) in self.iter() {
            map.serialize_entry(weekday_name(day), &count)?;
        }
        map.end()
    }
}

/// Commit counts per local hour of day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct HourHistogram([u64; 24]);

impl HourHistogram {
    /// Count one commit at `hour` (0-23)
    pub fn record(&mut self, hour: u32) {
        self.0[hour as usize % 24] += 1;
    }

    pub fn get(&self, hour: u32) -> u64 {
        self.0[hour as usize % 24]
    }

    pub fn counts(&self) -> &[u64; 24] {
        &self.0
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Sum over a half-open hour range
    pub fn sum(&self, hours: Range<usize>) -> u64 {
        self.0[hours].iter().sum()
    }

    /// Busiest hour; earliest wins ties. `None` when nothing was recorded.
    pub fn peak(&self) -> Option<u32> {
        let mut best: Option<(u32, u64)> = None;
        for (hour, count) in self.0.iter().enumerate() {
            if *count > best.map_or(0, |(_, c)| c) {
                best = Some((hour as u32, *count));
            }
        }
        best.map(|(hour, _)| hour)
    }
}

impl From<[u64; 24]> for HourHistogram {
    fn from(counts: [u64; 24]) -> Self {
        Self(counts)
    }
}

/// Bucket records by weekday and by hour, both read in each record's own offset
pub fn bucket_by_time(records: &[ActivityRecord]) -> (WeekdayHistogram, HourHistogram) {
    let mut by_day = WeekdayHistogram::default();
    let mut by_hour = HourHistogram::default();

    for record in records {
        by_day.record(record.timestamp.weekday());
        by_hour.record(record.timestamp.hour());
    }

    (by_day, by_hour)
}
