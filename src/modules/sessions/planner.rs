//! Pure scheduling logic for generating class sessions.
//!
//! Week numbering is anchored to the first generated class date, after
//! holiday filtering, so the first emitted session is always week 1. A
//! holiday skipped later in the range still consumes a week number.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};

/// One weekly schedule slot. `day_of_week` is 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSession {
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Walk the semester range and emit one session per date whose weekday
/// matches a schedule slot, skipping holidays unless the date is a makeup
/// day for the course.
pub fn plan_semester_sessions(
    range_start: NaiveDate,
    range_end: NaiveDate,
    schedules: &[ScheduleSlot],
    holidays: &HashSet<NaiveDate>,
    makeup_dates: &HashSet<NaiveDate>,
) -> Vec<PlannedSession> {
    if schedules.is_empty() || range_start > range_end {
        return Vec::new();
    }

    let mut first_class_date: Option<NaiveDate> = None;
    let mut planned = Vec::new();

    let mut date = range_start;
    while date <= range_end {
        let weekday = weekday_index(date);
        for slot in schedules.iter().filter(|s| s.day_of_week == weekday) {
            if holidays.contains(&date) && !makeup_dates.contains(&date) {
                continue;
            }

            let anchor = *first_class_date.get_or_insert(date);
            let week_number = ((date - anchor).num_days() / 7) as i32 + 1;
            planned.push(PlannedSession {
                week_number,
                session_date: date,
                start_time: slot.start_time,
                end_time: slot.end_time,
            });
        }
        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    planned
}

/// Weekly dates for batch generation: first matching weekday on or after
/// `start`, then 7-day steps. The week number increments every step; callers
/// skipping holidays keep the numbering. Empty when no matching weekday
/// falls inside the range.
pub fn plan_weekly_dates(
    start: NaiveDate,
    end: NaiveDate,
    day_of_week: i16,
) -> Vec<(i32, NaiveDate)> {
    if start > end {
        return Vec::new();
    }

    let offset = (day_of_week - weekday_index(start)).rem_euclid(7) as u64;
    let Some(mut date) = start.checked_add_days(Days::new(offset)) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut week = 1;
    while date <= end {
        out.push((week, date));
        week += 1;
        date = match date.checked_add_days(Days::new(7)) {
            Some(next) => next,
            None => break,
        };
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(dow: i16) -> ScheduleSlot {
        ScheduleSlot {
            day_of_week: dow,
            start_time: time(9, 0),
            end_time: time(10, 30),
        }
    }

    #[test]
    fn plans_one_session_per_matching_weekday() {
        // 2026-03-02 is a Monday.
        let planned = plan_semester_sessions(
            date(2026, 3, 2),
            date(2026, 3, 22),
            &[slot(1)], // Mondays
            &HashSet::new(),
            &HashSet::new(),
        );

        let dates: Vec<_> = planned.iter().map(|p| p.session_date).collect();
        assert_eq!(
            dates,
            vec![date(2026, 3, 2), date(2026, 3, 9), date(2026, 3, 16)]
        );
        assert_eq!(
            planned.iter().map(|p| p.week_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn holiday_is_skipped_but_week_numbering_keeps_counting() {
        let holidays: HashSet<_> = [date(2026, 3, 9)].into();
        let planned = plan_semester_sessions(
            date(2026, 3, 2),
            date(2026, 3, 22),
            &[slot(1)],
            &holidays,
            &HashSet::new(),
        );

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].week_number, 1);
        // Week 2 was the holiday; the next session is week 3.
        assert_eq!(planned[1].week_number, 3);
        assert_eq!(planned[1].session_date, date(2026, 3, 16));
    }

    #[test]
    fn makeup_day_overrides_holiday_skip() {
        let holidays: HashSet<_> = [date(2026, 3, 9)].into();
        let makeup: HashSet<_> = [date(2026, 3, 9)].into();
        let planned = plan_semester_sessions(
            date(2026, 3, 2),
            date(2026, 3, 15),
            &[slot(1)],
            &holidays,
            &makeup,
        );

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[1].session_date, date(2026, 3, 9));
        assert_eq!(planned[1].week_number, 2);
    }

    #[test]
    fn first_generated_session_is_week_one_when_opening_date_is_a_holiday() {
        // The first matching Monday is a holiday: it is skipped entirely and
        // the next Monday anchors week 1.
        let holidays: HashSet<_> = [date(2026, 3, 2)].into();
        let planned = plan_semester_sessions(
            date(2026, 3, 2),
            date(2026, 3, 22),
            &[slot(1)],
            &holidays,
            &HashSet::new(),
        );

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].session_date, date(2026, 3, 9));
        assert_eq!(planned[0].week_number, 1);
        assert_eq!(planned[1].session_date, date(2026, 3, 16));
        assert_eq!(planned[1].week_number, 2);
    }

    #[test]
    fn multiple_slots_per_week() {
        // Monday + Wednesday schedule.
        let planned = plan_semester_sessions(
            date(2026, 3, 2),
            date(2026, 3, 8),
            &[slot(1), slot(3)],
            &HashSet::new(),
            &HashSet::new(),
        );

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].session_date, date(2026, 3, 2));
        assert_eq!(planned[1].session_date, date(2026, 3, 4));
        assert_eq!(planned[1].week_number, 1);
    }

    #[test]
    fn empty_inputs_plan_nothing() {
        assert!(
            plan_semester_sessions(
                date(2026, 3, 2),
                date(2026, 3, 22),
                &[],
                &HashSet::new(),
                &HashSet::new()
            )
            .is_empty()
        );
        assert!(
            plan_semester_sessions(
                date(2026, 3, 22),
                date(2026, 3, 2),
                &[slot(1)],
                &HashSet::new(),
                &HashSet::new()
            )
            .is_empty()
        );
    }

    #[test]
    fn weekly_dates_start_on_first_matching_weekday() {
        // Start on a Tuesday, ask for Thursdays (4).
        let dates = plan_weekly_dates(date(2026, 3, 3), date(2026, 3, 31), 4);
        assert_eq!(
            dates,
            vec![
                (1, date(2026, 3, 5)),
                (2, date(2026, 3, 12)),
                (3, date(2026, 3, 19)),
                (4, date(2026, 3, 26)),
            ]
        );
    }

    #[test]
    fn weekly_dates_empty_when_weekday_missing_from_range() {
        // Tuesday through Wednesday, asking for Friday.
        assert!(plan_weekly_dates(date(2026, 3, 3), date(2026, 3, 4), 5).is_empty());
    }

    #[test]
    fn weekly_dates_match_start_day_itself() {
        // 2026-03-02 is a Monday; asking for Mondays starts same day.
        let dates = plan_weekly_dates(date(2026, 3, 2), date(2026, 3, 9), 1);
        assert_eq!(dates, vec![(1, date(2026, 3, 2)), (2, date(2026, 3, 9))]);
    }
}
