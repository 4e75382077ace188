use {
    anyhow::Context,
    jiff::{
        ToSpan,
        civil::{Date, Weekday},
    },
};

/// Returns the number of days one needs to add to a date falling on `base`
/// in order to reach the next date falling on `target`.
///
/// The result is always in the range `0..=6`. In particular, when `target`
/// and `base` are the same weekday, this returns `0` and not `7`.
pub fn isoweekday_gap(target: Weekday, base: Weekday) -> i8 {
    base.until(target)
}

/// Returns the next date on or after `base` whose weekday is `target`, and
/// then adds `extra_weeks` whole weeks to it.
///
/// When `base` already falls on `target` and `extra_weeks` is zero, `base`
/// is returned unchanged. Negative `extra_weeks` values are permitted and
/// step backward. (The nth-weekday engine relies on this when an anchor
/// sits in a weekday slot that a shorter month doesn't have.)
pub fn next_same_weekday(
    target: Weekday,
    base: Date,
    extra_weeks: i32,
) -> anyhow::Result<Date> {
    let days = i32::from(isoweekday_gap(target, base.weekday()))
        + 7 * extra_weeks;
    base.checked_add(days.days()).with_context(|| {
        format!(
            "failed to find date {extra_weeks} week(s) past the \
             next {target:?} on or after {base}",
        )
    })
}

/// Returns how many times the given weekday occurs within the month
/// containing `month`.
///
/// The result is always `4` or `5`.
pub fn weekday_occurrences_in_month(weekday: Weekday, month: Date) -> i8 {
    let gap = isoweekday_gap(weekday, month.first_of_month().weekday());
    let days = month.last_of_month().day() - gap;
    (days + 6) / 7
}

/// Returns the first day of the month that is `count` calendar months after
/// the month containing `month`.
///
/// `count` may be negative. This is the step operation for the nth-weekday
/// engine's month cursor, which always sits on the first of a month.
pub fn add_months(month: Date, count: i32) -> anyhow::Result<Date> {
    month.first_of_month().checked_add(count.months()).with_context(|| {
        format!(
            "failed to step {count} month(s) from the month \
             containing {month}",
        )
    })
}

/// Returns the number of whole calendar months from the month containing
/// `from` to the month containing `to`.
///
/// Only the year and month components participate. Two dates in the same
/// month have a delta of `0`; the delta is negative when `to`'s month
/// precedes `from`'s.
pub fn month_delta(from: Date, to: Date) -> i32 {
    let years = i32::from(to.year()) - i32::from(from.year());
    let months = i32::from(to.month()) - i32::from(from.month());
    years * 12 + months
}

#[cfg(test)]
mod tests {
    use jiff::civil::{Weekday::*, date};

    use super::*;

    #[test]
    fn gap_is_zero_for_same_weekday() {
        assert_eq!(0, isoweekday_gap(Wednesday, Wednesday));
    }

    #[test]
    fn gap_wraps_over_the_end_of_the_week() {
        // From a Wednesday to the following Monday is 5 days, not -2.
        assert_eq!(5, isoweekday_gap(Monday, Wednesday));
        // From a Wednesday to the following Sunday.
        assert_eq!(4, isoweekday_gap(Sunday, Wednesday));
    }

    #[test]
    fn next_same_weekday_earlier_weekday() {
        // 2014-07-21 is a Monday, 2014-07-23 a Wednesday. The next Monday
        // on or after the Wednesday is the 28th.
        let got =
            next_same_weekday(Monday, date(2014, 7, 23), 0).unwrap();
        assert_eq!(date(2014, 7, 28), got);
    }

    #[test]
    fn next_same_weekday_later_weekday() {
        // 2014-07-20 is a Sunday.
        let got =
            next_same_weekday(Sunday, date(2014, 7, 23), 0).unwrap();
        assert_eq!(date(2014, 7, 27), got);
    }

    #[test]
    fn next_same_weekday_is_a_fixed_point() {
        // A Thursday stays put when asked for the next Thursday.
        let got =
            next_same_weekday(Thursday, date(2014, 7, 17), 0).unwrap();
        assert_eq!(date(2014, 7, 17), got);
    }

    #[test]
    fn next_same_weekday_additional_weeks() {
        // 2014-09-02 is a Tuesday, 2014-09-01 a Monday.
        let got =
            next_same_weekday(Tuesday, date(2014, 9, 1), 1).unwrap();
        assert_eq!(date(2014, 9, 9), got);
    }

    #[test]
    fn next_same_weekday_negative_weeks() {
        let got =
            next_same_weekday(Tuesday, date(2014, 9, 1), -1).unwrap();
        assert_eq!(date(2014, 8, 26), got);
    }

    #[test]
    fn occurrences_in_month_four() {
        assert_eq!(
            4,
            weekday_occurrences_in_month(Monday, date(2014, 7, 1))
        );
        assert_eq!(
            4,
            weekday_occurrences_in_month(Thursday, date(2014, 6, 1))
        );
        assert_eq!(
            4,
            weekday_occurrences_in_month(Sunday, date(2014, 7, 15))
        );
    }

    #[test]
    fn occurrences_in_month_five() {
        assert_eq!(
            5,
            weekday_occurrences_in_month(Monday, date(2014, 6, 1))
        );
        assert_eq!(
            5,
            weekday_occurrences_in_month(Thursday, date(2014, 7, 31))
        );
        assert_eq!(
            5,
            weekday_occurrences_in_month(Sunday, date(2014, 6, 1))
        );
    }

    #[test]
    fn occurrences_in_month_february() {
        // A 28-day February has exactly four of every weekday. This is the
        // only month shape where the result never depends on the weekday.
        for wd in
            [Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday]
        {
            assert_eq!(
                4,
                weekday_occurrences_in_month(wd, date(2015, 2, 10)),
                "expected 4 occurrences of {wd:?} in 2015-02",
            );
        }
        // A leap-year February gets a fifth of whatever the 29th lands on.
        // 2016-02-29 was a Monday.
        assert_eq!(
            5,
            weekday_occurrences_in_month(Monday, date(2016, 2, 1))
        );
        assert_eq!(
            4,
            weekday_occurrences_in_month(Tuesday, date(2016, 2, 1))
        );
    }

    #[test]
    fn add_months_normalizes_to_the_first() {
        let got = add_months(date(2014, 4, 17), 1).unwrap();
        assert_eq!(date(2014, 5, 1), got);
        let got = add_months(date(2014, 4, 17), 0).unwrap();
        assert_eq!(date(2014, 4, 1), got);
    }

    #[test]
    fn add_months_across_year_boundaries() {
        let got = add_months(date(2014, 11, 30), 2).unwrap();
        assert_eq!(date(2015, 1, 1), got);
        let got = add_months(date(2014, 2, 1), -2).unwrap();
        assert_eq!(date(2013, 12, 1), got);
    }

    #[test]
    fn month_delta_ignores_days() {
        assert_eq!(0, month_delta(date(2014, 4, 1), date(2014, 4, 30)));
        assert_eq!(1, month_delta(date(2014, 4, 30), date(2014, 5, 1)));
        assert_eq!(13, month_delta(date(2013, 3, 21), date(2014, 4, 1)));
        assert_eq!(-3, month_delta(date(2014, 4, 1), date(2014, 1, 31)));
    }
}
