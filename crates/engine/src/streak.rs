//! Daily completion streak.
//!
//! Days are calendar dates in the engine time zone, never 24-hour windows: a
//! completion at 23:50 followed by one at 00:10 counts as two consecutive
//! days.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Consecutive calendar days containing at least one completed token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreakState {
    pub streak: u32,
    pub last_completion: Option<DateTime<Utc>>,
}

impl StreakState {
    pub fn new(streak: u32, last_completion: Option<DateTime<Utc>>) -> Self {
        Self {
            streak,
            last_completion,
        }
    }

    /// Updates the streak for a token completed at `now`.
    ///
    /// - first completion ever: streak 1
    /// - same day as the last one: unchanged, and the last date is kept
    /// - the day after the last one: streak + 1
    /// - anything else (a gap, or a clock that went backwards): streak 1
    pub fn record_completion(&mut self, now: DateTime<Utc>, tz: Tz) {
        let today = local_date(now, tz);

        let Some(last) = self.last_completion else {
            self.streak = 1;
            self.last_completion = Some(now);
            return;
        };

        let last_day = local_date(last, tz);
        if last_day == today {
            return;
        }

        if Some(last_day) == previous_day(today) {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 1;
        }
        self.last_completion = Some(now);
    }

    /// The streak as it stands on `now`'s day.
    ///
    /// The stored counter only resets on the next completion, so after a
    /// missed day it still holds the old run. This reports 0 in that case.
    pub fn current(&self, now: DateTime<Utc>, tz: Tz) -> u32 {
        let Some(last) = self.last_completion else {
            return 0;
        };
        let today = local_date(now, tz);
        let last_day = local_date(last, tz);
        if last_day == today || Some(last_day) == previous_day(today) {
            self.streak
        } else {
            0
        }
    }
}

fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(1))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn first_completion_starts_streak() {
        let mut state = StreakState::default();
        state.record_completion(at(1, 10), Tz::UTC);

        assert_eq!(state, StreakState::new(1, Some(at(1, 10))));
    }

    #[test]
    fn same_day_keeps_first_timestamp() {
        let mut state = StreakState::new(1, Some(at(1, 8)));
        state.record_completion(at(1, 20), Tz::UTC);

        assert_eq!(state.streak, 1);
        assert_eq!(state.last_completion, Some(at(1, 8)));
    }

    #[test]
    fn consecutive_day_extends() {
        let mut state = StreakState::new(3, Some(at(1, 23)));
        state.record_completion(at(2, 0), Tz::UTC);

        assert_eq!(state.streak, 4);
        assert_eq!(state.last_completion, Some(at(2, 0)));
    }

    #[test]
    fn gap_resets() {
        let mut state = StreakState::new(5, Some(at(1, 12)));
        state.record_completion(at(3, 12), Tz::UTC);

        assert_eq!(state.streak, 1);
    }

    #[test]
    fn earlier_date_resets() {
        let mut state = StreakState::new(5, Some(at(10, 12)));
        state.record_completion(at(9, 12), Tz::UTC);

        assert_eq!(state, StreakState::new(1, Some(at(9, 12))));
    }

    #[test]
    fn uses_local_calendar_date() {
        // 23:30 UTC on the 1st is already the 2nd in Rome.
        let mut state = StreakState::new(1, Some(at(1, 10)));
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        state.record_completion(late, Tz::Europe__Rome);

        assert_eq!(state.streak, 2);

        let mut utc_state = StreakState::new(1, Some(at(1, 10)));
        utc_state.record_completion(late, Tz::UTC);
        assert_eq!(utc_state.streak, 1);
    }

    #[test]
    fn current_drops_to_zero_after_missed_day() {
        let state = StreakState::new(4, Some(at(5, 9)));

        assert_eq!(state.current(at(5, 22), Tz::UTC), 4);
        assert_eq!(state.current(at(6, 22), Tz::UTC), 4);
        assert_eq!(state.current(at(7, 0), Tz::UTC), 0);
        assert_eq!(StreakState::default().current(at(7, 0), Tz::UTC), 0);
    }
}
