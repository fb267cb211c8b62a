use crate::errors::StatsError;
use crate::models::{CheckIn, CheckInStatus, Stats};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

pub fn compute_stats(history: &[CheckIn], price_per_unit: f64) -> Result<Stats, StatsError> {
    compute_stats_at(history, price_per_unit, &Local::now())
}

/// Derives the full stats snapshot from a user's check-in history.
///
/// `as_of` decides whether the current streak is still alive; it is read in
/// its own timezone, so pass the user's local clock. The input order does not
/// matter. When two records share a date only the earliest-inserted one counts.
pub fn compute_stats_at<Tz: TimeZone>(
    history: &[CheckIn],
    price_per_unit: f64,
    as_of: &DateTime<Tz>,
) -> Result<Stats, StatsError> {
    if !price_per_unit.is_finite() || price_per_unit < 0.0 {
        return Err(StatsError::InvalidPrice(price_per_unit));
    }

    let computed_at = as_of.with_timezone(&Utc);

    let mut sorted: Vec<&CheckIn> = history.iter().collect();
    sorted.sort_by_key(|check_in| (check_in.date, check_in.created_at));
    sorted.dedup_by_key(|check_in| check_in.date);

    let Some(last) = sorted.last().copied() else {
        return Ok(Stats::empty(computed_at));
    };

    let mut run = 0u32;
    let mut longest_streak = 0u32;
    let mut total_days_completed = 0u32;
    let mut total_units_avoided = 0.0;
    let mut previous: Option<NaiveDate> = None;

    for check_in in &sorted {
        match check_in.status {
            CheckInStatus::Success => {
                let units = check_in.units_avoided;
                if !units.is_finite() || units < 0.0 {
                    return Err(StatsError::InvalidRecord {
                        date: check_in.date,
                        reason: format!("units_avoided must be a non-negative number, got {units}"),
                    });
                }

                run = match previous {
                    Some(prev) if days_between(prev, check_in.date) == 1 => run + 1,
                    _ => 1,
                };
                longest_streak = longest_streak.max(run);
                total_days_completed += 1;
                total_units_avoided += units;
            }
            // slips never contribute units, whatever the record carries
            CheckInStatus::Slip => run = 0,
        }
        previous = Some(check_in.date);
    }

    let gap_to_today = days_between(last.date, as_of.date_naive());
    let current_streak = if gap_to_today <= 1 && last.status.is_success() {
        run
    } else {
        0
    };

    Ok(Stats {
        current_streak,
        longest_streak,
        total_days_completed,
        total_units_avoided,
        total_money_saved: total_units_avoided * price_per_unit,
        last_check_in_date: Some(last.date),
        computed_at,
    })
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
    }

    fn at(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, n, 9, 30, 0).unwrap()
    }

    fn record(n: u32, status: CheckInStatus, units: f64) -> CheckIn {
        CheckIn {
            date: day(n),
            status,
            mood_index: 2,
            units_avoided: units,
            notes: String::new(),
            created_at: at(n) + Duration::hours(10),
        }
    }

    fn success(n: u32) -> CheckIn {
        record(n, CheckInStatus::Success, 2.0)
    }

    fn slip(n: u32) -> CheckIn {
        record(n, CheckInStatus::Slip, 0.0)
    }

    #[test]
    fn empty_history_yields_zero_stats() {
        let stats = compute_stats_at(&[], 5.0, &at(10)).unwrap();
        assert_eq!(stats, Stats::empty(at(10)));
        assert_eq!(stats.current_streak, 0);
        assert!(stats.last_check_in_date.is_none());
    }

    #[test]
    fn same_inputs_give_identical_stats() {
        let history = vec![success(1), success(2), slip(3), success(4)];
        let first = compute_stats_at(&history, 4.25, &at(4)).unwrap();
        let second = compute_stats_at(&history, 4.25, &at(4)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn input_order_does_not_matter() {
        let ordered = vec![success(1), success(2), slip(3), success(4), success(5)];
        let mut reversed = ordered.clone();
        reversed.reverse();
        let mut rotated = ordered.clone();
        rotated.rotate_left(2);

        let expected = compute_stats_at(&ordered, 6.0, &at(5)).unwrap();
        assert_eq!(compute_stats_at(&reversed, 6.0, &at(5)).unwrap(), expected);
        assert_eq!(compute_stats_at(&rotated, 6.0, &at(5)).unwrap(), expected);
        assert_eq!(expected.current_streak, 2);
        assert_eq!(expected.longest_streak, 2);
    }

    #[test]
    fn missing_day_breaks_streak() {
        let stats = compute_stats_at(&[success(1), success(3)], 5.0, &at(3)).unwrap();
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.total_days_completed, 2);
    }

    #[test]
    fn consecutive_successes_extend_streak() {
        let history = vec![success(1), success(2), success(3)];
        let stats = compute_stats_at(&history, 5.0, &at(3)).unwrap();
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn slip_resets_running_streak() {
        let history = vec![success(1), slip(2), success(3)];
        let stats = compute_stats_at(&history, 5.0, &at(3)).unwrap();
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.total_days_completed, 2);
    }

    #[test]
    fn streak_survives_one_silent_day_only() {
        let history = vec![success(1), success(2), success(3)];
        let grace = compute_stats_at(&history, 5.0, &at(4)).unwrap();
        assert_eq!(grace.current_streak, 3);

        let expired = compute_stats_at(&history, 5.0, &at(5)).unwrap();
        assert_eq!(expired.current_streak, 0);
        assert_eq!(expired.longest_streak, 3);
    }

    #[test]
    fn slip_as_last_record_ends_current_streak() {
        let history = vec![success(1), success(2), slip(3)];
        let stats = compute_stats_at(&history, 5.0, &at(3)).unwrap();
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.last_check_in_date, Some(day(3)));
    }

    #[test]
    fn money_saved_multiplies_units_by_price() {
        let history = vec![
            record(1, CheckInStatus::Success, 2.0),
            record(2, CheckInStatus::Success, 3.0),
        ];
        let stats = compute_stats_at(&history, 5.50, &at(2)).unwrap();
        assert_eq!(stats.total_units_avoided, 5.0);
        assert_eq!(stats.total_money_saved, 27.50);
    }

    #[test]
    fn slip_units_are_ignored() {
        let history = vec![
            record(1, CheckInStatus::Success, 2.0),
            record(2, CheckInStatus::Slip, 4.0),
        ];
        let stats = compute_stats_at(&history, 1.0, &at(2)).unwrap();
        assert_eq!(stats.total_units_avoided, 2.0);
        assert_eq!(stats.total_money_saved, 2.0);
    }

    #[test]
    fn earliest_insert_wins_on_duplicate_date() {
        let mut early_slip = slip(1);
        early_slip.created_at = at(1);
        let mut late_success = success(1);
        late_success.created_at = at(1) + Duration::hours(1);

        let stats = compute_stats_at(&[late_success, early_slip], 5.0, &at(1)).unwrap();
        assert_eq!(stats.total_days_completed, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.total_units_avoided, 0.0);
    }

    #[test]
    fn as_of_is_read_in_its_own_timezone() {
        let history = vec![success(1), success(2)];
        // 2026-03-03 23:30 at UTC+2 is still the 3rd locally, the 3rd at 21:30 in UTC
        let local = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 3, 23, 30, 0)
            .unwrap();
        let stats = compute_stats_at(&history, 5.0, &local).unwrap();
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.computed_at, Utc.with_ymd_and_hms(2026, 3, 3, 21, 30, 0).unwrap());

        let next_morning = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 4, 0, 30, 0)
            .unwrap();
        let stats = compute_stats_at(&history, 5.0, &next_morning).unwrap();
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn negative_units_on_success_is_rejected() {
        let history = vec![success(1), record(2, CheckInStatus::Success, -1.0)];
        let err = compute_stats_at(&history, 5.0, &at(2)).unwrap_err();
        assert!(matches!(err, StatsError::InvalidRecord { date, .. } if date == day(2)));
    }

    #[test]
    fn invalid_price_is_rejected() {
        let history = vec![success(1)];
        assert!(matches!(
            compute_stats_at(&history, -0.5, &at(1)),
            Err(StatsError::InvalidPrice(_))
        ));
        assert!(matches!(
            compute_stats_at(&history, f64::NAN, &at(1)),
            Err(StatsError::InvalidPrice(_))
        ));
    }
}
