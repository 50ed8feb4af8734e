use chrono::{
    DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Utc, Weekday,
};

/// Clock the league's calendar runs on. Days, weeks and displayed times follow it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeagueZone {
    /// Whatever zone the machine running the board is set to.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl LeagueZone {
    /// Out-of-range offsets fall back to the local zone.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        minutes
            .and_then(|m| m.checked_mul(60))
            .and_then(FixedOffset::east_opt)
            .map_or(LeagueZone::Local, LeagueZone::Fixed)
    }

    /// Wall-clock reading of `at` in this zone.
    pub fn wall_clock(&self, at: DateTime<Utc>) -> NaiveDateTime {
        match self {
            LeagueZone::Local => at.with_timezone(&Local).naive_local(),
            LeagueZone::Fixed(offset) => at.with_timezone(offset).naive_local(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.wall_clock(Utc::now()).date()
    }

    /// First instant of `date` in this zone. A midnight skipped by a DST jump resolves to
    /// the first hour that exists.
    pub fn start_of(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        [midnight, midnight + TimeDelta::hours(1)]
            .into_iter()
            .find_map(|naive| self.resolve(naive))
            .unwrap_or_else(|| midnight.and_utc())
    }

    fn resolve(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            LeagueZone::Local => Local.from_local_datetime(&naive).earliest().map(|dt| dt.to_utc()),
            LeagueZone::Fixed(offset) => offset.from_local_datetime(&naive).earliest().map(|dt| dt.to_utc()),
        }
    }
}

/// Half-open `[start, end)` range over scheduled times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn day(date: NaiveDate, zone: LeagueZone) -> Self {
        Self::span(date, 1, zone)
    }

    /// Monday through Sunday of the week containing `date`.
    pub fn week_of(date: NaiveDate, zone: LeagueZone) -> Self {
        Self::span(week_start(date), 7, zone)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    fn span(first: NaiveDate, days: u64, zone: LeagueZone) -> Self {
        let start = zone.start_of(first);
        let end = first
            .checked_add_days(Days::new(days))
            .map(|last| zone.start_of(last))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start, end }
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// `today` itself when it is a Saturday, otherwise the Saturday before it.
pub fn most_recent_saturday(today: NaiveDate) -> NaiveDate {
    let back = (today.weekday().num_days_from_monday() + 7 - Weekday::Sat.num_days_from_monday()) % 7;
    today
        .checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(today)
}

/// 1-based season week. Dates before the season start count as week 1.
pub fn week_number(season_start: NaiveDate, date: NaiveDate) -> u32 {
    let days = (week_start(date) - week_start(season_start)).num_days();
    if days <= 0 {
        1
    } else {
        (days / 7) as u32 + 1
    }
}
