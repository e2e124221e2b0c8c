use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format for boundary keys (the persisted last-reset marker)
pub const BOUNDARY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Daily reset time-of-day, in local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetTime {
    pub hour: u32,
    pub minute: u32,
}

impl ResetTime {
    pub fn new(hour: u32, minute: u32) -> EngineResult<Self> {
        if hour > 23 {
            return Err(EngineError::Validation(format!(
                "reset hour must be between 0 and 23, got {}",
                hour
            )));
        }
        if minute > 59 {
            return Err(EngineError::Validation(format!(
                "reset minute must be between 0 and 59, got {}",
                minute
            )));
        }
        Ok(Self { hour, minute })
    }

    fn time_of_day(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// The boundary instant on a given local date
    ///
    /// Ambiguous local times (clocks going back) use the earlier instant. Skipped local
    /// times (clocks going forward) use the first valid minute after the gap.
    pub fn boundary_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
        let naive = date.and_time(self.time_of_day());
        if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
            return dt;
        }
        (1..=180)
            .find_map(|m| {
                tz.from_local_datetime(&(naive + Duration::minutes(m)))
                    .earliest()
            })
            .unwrap_or_else(|| tz.from_utc_datetime(&naive))
    }

    /// Next boundary strictly after `now`. Exactly on a boundary yields the next day's.
    pub fn next_boundary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let today = now.date_naive();
        let candidate = self.boundary_on(today, &tz);
        if candidate > *now {
            return candidate;
        }
        let tomorrow = today.succ_opt().unwrap_or(today);
        self.boundary_on(tomorrow, &tz)
    }

    /// The reset day `now` belongs to: a day runs from one boundary to the next, so
    /// anything before today's boundary still belongs to yesterday.
    pub fn current_boundary_date<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> NaiveDate {
        let tz = now.timezone();
        let today = now.date_naive();
        if *now >= self.boundary_on(today, &tz) {
            today
        } else {
            today.pred_opt().unwrap_or(today)
        }
    }

    /// Date-only key for the current reset day
    pub fn current_boundary_key<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        self.current_boundary_date(now)
            .format(BOUNDARY_KEY_FORMAT)
            .to_string()
    }

    /// Time left until the next boundary, never negative
    pub fn remaining<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        let next = self.next_boundary(now);
        let left = next.signed_duration_since(now.clone());
        std::cmp::max(left, Duration::zero())
    }
}

impl fmt::Display for ResetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ResetTime {
    type Err = EngineError;

    /// Parse "HH:MM" (or a bare hour "H")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation(format!("invalid reset time '{}', use HH:MM", s));
        let (hour, minute) = match s.trim().split_once(':') {
            Some((h, m)) => (h.trim(), m.trim()),
            None => (s.trim(), "0"),
        };
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

/// Format a countdown as "HH:MM:SS"
pub fn format_countdown(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use chrono_tz::Europe::Berlin;

    fn at(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(ResetTime::new(23, 59).is_ok());
        assert!(matches!(ResetTime::new(24, 0), Err(EngineError::Validation(_))));
        assert!(matches!(ResetTime::new(0, 60), Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_before_boundary_belongs_to_previous_day() {
        let reset = ResetTime::new(8, 0).unwrap();
        let now = at(10, 7, 59, 0);

        assert_eq!(reset.current_boundary_key(&now), "2024-03-09");
        assert!(reset.remaining(&now) <= Duration::seconds(60));
        assert_eq!(reset.remaining(&now), Duration::seconds(60));
    }

    #[test]
    fn test_key_flips_after_boundary() {
        let reset = ResetTime::new(8, 0).unwrap();
        assert_eq!(reset.current_boundary_key(&at(10, 8, 0, 1)), "2024-03-10");
        assert_eq!(reset.current_boundary_key(&at(10, 8, 0, 0)), "2024-03-10");
    }

    #[test]
    fn test_exactly_on_boundary_returns_next_day() {
        let reset = ResetTime::new(8, 0).unwrap();
        let now = at(10, 8, 0, 0);
        assert_eq!(reset.next_boundary(&now), at(11, 8, 0, 0));
        assert_eq!(reset.remaining(&now), Duration::hours(24));
    }

    #[test]
    fn test_next_boundary_later_today() {
        let reset = ResetTime::new(21, 30).unwrap();
        let now = at(10, 9, 15, 0);
        assert_eq!(reset.next_boundary(&now), at(10, 21, 30, 0));
        assert_eq!(reset.remaining(&now), Duration::minutes(12 * 60 + 15));
    }

    #[test]
    fn test_midnight_default() {
        let reset = ResetTime::default();
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 30).unwrap();
        assert_eq!(reset.current_boundary_key(&now), "2024-12-31");
        assert_eq!(reset.remaining(&now), Duration::seconds(30));
        assert_eq!(
            reset.next_boundary(&now),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_boundary_in_spring_forward_gap() {
        // 2024-03-31 in Berlin: 02:00 CET jumps to 03:00 CEST, so 02:30 never happens
        let reset = ResetTime::new(2, 30).unwrap();
        let now = Berlin.with_ymd_and_hms(2024, 3, 31, 1, 0, 0).unwrap();
        let first_valid = Utc.with_ymd_and_hms(2024, 3, 31, 1, 0, 0).unwrap();

        assert_eq!(reset.next_boundary(&now).with_timezone(&Utc), first_valid);
        assert_eq!(reset.remaining(&now), Duration::hours(1));
        assert_eq!(reset.current_boundary_key(&now), "2024-03-30");

        let after = Berlin.with_ymd_and_hms(2024, 3, 31, 3, 0, 1).unwrap();
        assert_eq!(reset.current_boundary_key(&after), "2024-03-31");
        assert_eq!(
            reset.next_boundary(&after).with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_boundary_in_fall_back_overlap() {
        // 2024-10-27 in Berlin: 03:00 CEST falls back to 02:00 CET, so 02:30 happens twice
        let reset = ResetTime::new(2, 30).unwrap();
        let now = Utc
            .with_ymd_and_hms(2024, 10, 27, 0, 0, 0)
            .unwrap()
            .with_timezone(&Berlin);
        let earlier = Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap();

        assert_eq!(reset.next_boundary(&now).with_timezone(&Utc), earlier);
        assert_eq!(reset.remaining(&now), Duration::minutes(30));
        assert_eq!(reset.current_boundary_key(&now), "2024-10-26");

        // 02:45 CET, the second pass through the repeated hour
        let second_pass = Utc
            .with_ymd_and_hms(2024, 10, 27, 1, 45, 0)
            .unwrap()
            .with_timezone(&Berlin);
        assert_eq!(reset.current_boundary_key(&second_pass), "2024-10-27");
        assert_eq!(
            reset.next_boundary(&second_pass).with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 10, 28, 1, 30, 0).unwrap()
        );
        assert_eq!(
            reset.remaining(&second_pass),
            Duration::hours(23) + Duration::minutes(45)
        );
    }

    #[test]
    fn test_parse_and_display() {
        let reset: ResetTime = "08:05".parse().unwrap();
        assert_eq!(reset, ResetTime { hour: 8, minute: 5 });
        assert_eq!(reset.to_string(), "08:05");
        assert_eq!("7".parse::<ResetTime>().unwrap().to_string(), "07:00");
        assert!("25:00".parse::<ResetTime>().is_err());
        assert!("ab:cd".parse::<ResetTime>().is_err());
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::seconds(0)), "00:00:00");
        assert_eq!(format_countdown(Duration::seconds(3661)), "01:01:01");
        assert_eq!(format_countdown(Duration::seconds(-5)), "00:00:00");
    }
}
