use {
    anyhow::Context,
    jiff::{
        ToSpan, Zoned,
        civil::{Date, Weekday},
    },
};

use crate::weekday::{
    add_months, month_delta, next_same_weekday, weekday_occurrences_in_month,
};

/// The ordinal labels for weekday slots counted from the start of a month.
///
/// Indexed by the zero-based slot number. A day of the month is at most 31,
/// so the slot number is at most 4.
const ORDINAL_FROM_START: [&str; 5] = ["1st", "2nd", "3rd", "4th", "5th"];

/// The ordinal labels for weekday slots counted from the end of a month.
///
/// Indexed by the one-based slot number minus one. The first entry is the
/// last occurrence of a weekday in its month.
const ORDINAL_FROM_END: [&str; 5] =
    ["last", "last but one", "last but two", "last but three", "last but four"];

/// A recurrence pattern.
///
/// This is the closed set of rules for how an event repeats. A pattern is
/// stateless on its own; combining it with an anchor datetime (see
/// `Recurrence`) is what pins down the concrete sequence of occurrences.
///
/// The variants that mention a weekday always take it from the anchor. For
/// example, `MonthlyWeekday` with an anchor on the third Thursday of some
/// month repeats on the third Thursday of every month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pattern {
    /// Every day.
    Daily,
    /// Every week, on the anchor's weekday.
    Weekly,
    /// Every other week, on the anchor's weekday. The fourteen day phase is
    /// anchored at the anchor itself.
    BiWeekly,
    /// Every month, on the anchor's weekday slot counted from the start of
    /// the month (e.g., the 3rd Thursday).
    MonthlyWeekday,
    /// Every month, on the anchor's weekday slot counted from the end of
    /// the month (e.g., the last but one Thursday).
    MonthlyWeekdayFromEnd,
    /// Like `MonthlyWeekday`, but only every other month.
    BiMonthlyWeekday,
    /// Like `MonthlyWeekdayFromEnd`, but only every other month.
    BiMonthlyWeekdayFromEnd,
    /// Every year, on the anchor's month and day. An anchor on a leap day
    /// occurs on 28 February in non-leap years.
    Yearly,
}

impl Pattern {
    /// Returns the stable name of this pattern.
    ///
    /// This is the canonical name used by the pattern registry and accepted
    /// on the command line.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Pattern::Daily => "daily",
            Pattern::Weekly => "weekly",
            Pattern::BiWeekly => "biweekly",
            Pattern::MonthlyWeekday => "monthly-weekday",
            Pattern::MonthlyWeekdayFromEnd => "monthly-weekday-from-end",
            Pattern::BiMonthlyWeekday => "bimonthly-weekday",
            Pattern::BiMonthlyWeekdayFromEnd => "bimonthly-weekday-from-end",
            Pattern::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurrence: a pattern plus the anchor datetime that gives it phase.
///
/// The anchor plays two roles. It is the earliest possible occurrence, and
/// it determines the phase that every occurrence shares: the civil
/// time-of-day for all patterns, the weekday for the weekly and monthly
/// families, the weekday slot within a month for the monthly family and the
/// month/day for the yearly pattern.
///
/// Occurrences are computed with `Recurrence::between`, which returns a lazy
/// iterator. The iterator holds no state beyond its own cursor, so a
/// `Recurrence` may be shared freely and `between` may be called any number
/// of times; identical arguments always produce identical sequences.
#[derive(Clone, Debug)]
pub struct Recurrence {
    pattern: Pattern,
    anchor: Zoned,
}

impl Recurrence {
    /// Creates a recurrence for the given pattern anchored at `anchor`.
    pub fn new(pattern: Pattern, anchor: Zoned) -> Recurrence {
        Recurrence { pattern, anchor }
    }

    /// Returns the pattern of this recurrence.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Returns the anchor of this recurrence.
    pub fn anchor(&self) -> &Zoned {
        &self.anchor
    }

    /// Returns an iterator over the occurrences of this recurrence that
    /// fall within the half-open interval `[start, end)`.
    ///
    /// Every yielded datetime `t` satisfies `anchor <= t`, `start <= t` and
    /// `t < end`, in that order of precedence: occurrences before the anchor
    /// do not exist, and the interval merely selects a window out of the
    /// ones that do. The sequence is strictly increasing and finite. An
    /// interval whose end does not come after its start yields nothing, as
    /// does an interval that ends before the anchor. Neither is an error.
    ///
    /// Every yielded datetime carries the anchor's civil time-of-day,
    /// localized to the anchor's time zone on the occurrence's date. That
    /// makes the sequence stable in local time across DST transitions: the
    /// UTC offset of the occurrences shifts, their wall clock time does not.
    ///
    /// # Errors
    ///
    /// When either interval endpoint uses a time zone different from the
    /// anchor's. All three datetimes of one computation must agree on what
    /// their civil fields mean, and the engine never picks a zone on its
    /// own.
    pub fn between(
        &self,
        start: &Zoned,
        end: &Zoned,
    ) -> anyhow::Result<Occurrences<'_>> {
        let tz = self.anchor.time_zone();
        anyhow::ensure!(
            start.time_zone() == tz,
            "interval start `{start}` must be in the anchor's time zone \
             (anchor is `{anchor}`)",
            anchor = self.anchor,
        );
        anyhow::ensure!(
            end.time_zone() == tz,
            "interval end `{end}` must be in the anchor's time zone \
             (anchor is `{anchor}`)",
            anchor = self.anchor,
        );
        let state = if self.anchor > *end {
            // There can be no results, so don't bother locating a start.
            State::Done
        } else {
            self.initial_state(start)?
        };
        Ok(Occurrences {
            recurrence: self,
            start: start.clone(),
            end: end.clone(),
            state,
        })
    }

    /// Returns the description payload for this recurrence.
    ///
    /// The payload is a template identifier plus the substitution values the
    /// template needs. It is meant to be rendered by a caller that owns the
    /// localization of weekday names; the engine only ever exposes a weekday
    /// as an ISO weekday number. See `crate::cmd::describe` for the renderer
    /// shipped with this crate.
    pub fn info(&self) -> Info {
        match self.pattern {
            Pattern::Daily => Info {
                template: "each day",
                ..Info::default()
            },
            Pattern::Weekly => Info {
                template: "${weekday} every week",
                weekday: Some(self.anchor.weekday()),
                ..Info::default()
            },
            Pattern::BiWeekly => Info {
                template: "${weekday} every other week",
                weekday: Some(self.anchor.weekday()),
                ..Info::default()
            },
            Pattern::MonthlyWeekday => Info {
                template: "${recurrence} ${weekday} every month",
                weekday: Some(self.anchor.weekday()),
                recurrence: Some(self.ordinal()),
                ..Info::default()
            },
            Pattern::BiMonthlyWeekday => Info {
                template: "${recurrence} ${weekday} every other month",
                weekday: Some(self.anchor.weekday()),
                recurrence: Some(self.ordinal()),
                ..Info::default()
            },
            Pattern::MonthlyWeekdayFromEnd => Info {
                template: "${recurrence} ${weekday} every month",
                weekday: Some(self.anchor.weekday()),
                recurrence: Some(self.ordinal()),
                ..Info::default()
            },
            Pattern::BiMonthlyWeekdayFromEnd => Info {
                template: "${recurrence} ${weekday} every other month",
                weekday: Some(self.anchor.weekday()),
                recurrence: Some(self.ordinal()),
                ..Info::default()
            },
            Pattern::Yearly => Info {
                template: "${date} every year",
                date: Some((self.anchor.day(), self.anchor.month())),
                ..Info::default()
            },
        }
    }

    /// Returns the ordinal label for the anchor's weekday slot.
    ///
    /// # Panics
    ///
    /// When the pattern is not in the monthly family. Callers only reach
    /// this from `info` for monthly patterns.
    fn ordinal(&self) -> &'static str {
        match self.slot() {
            Slot::FromStart(n) => {
                // A day of the month is in 1..=31, so `n` is in 0..=4.
                ORDINAL_FROM_START[usize::try_from(n).unwrap()]
            }
            Slot::FromEnd(k) => {
                // `k` counts at least one slot and a month has at most
                // five, so `k` is in 1..=5.
                ORDINAL_FROM_END[usize::try_from(k - 1).unwrap()]
            }
        }
    }

    /// Returns the anchor's weekday slot for the monthly family.
    ///
    /// # Panics
    ///
    /// When the pattern is not in the monthly family.
    fn slot(&self) -> Slot {
        let day = self.anchor.day();
        match self.pattern {
            Pattern::MonthlyWeekday | Pattern::BiMonthlyWeekday => {
                Slot::FromStart((day - 1) / 7)
            }
            Pattern::MonthlyWeekdayFromEnd
            | Pattern::BiMonthlyWeekdayFromEnd => {
                let last = self.anchor.date().last_of_month().day();
                Slot::FromEnd((last - day) / 7 + 1)
            }
            _ => unreachable!("slot is only defined for monthly patterns"),
        }
    }

    /// Computes the iteration state positioned at the first candidate for
    /// the interval starting at `start`.
    fn initial_state(&self, start: &Zoned) -> anyhow::Result<State> {
        match self.pattern {
            Pattern::Daily => self.fixed_state(start, 1),
            Pattern::Weekly => self.fixed_state(start, 7),
            Pattern::BiWeekly => self.fixed_state(start, 14),
            Pattern::MonthlyWeekday | Pattern::MonthlyWeekdayFromEnd => {
                self.monthly_state(start, 1)
            }
            Pattern::BiMonthlyWeekday
            | Pattern::BiMonthlyWeekdayFromEnd => self.monthly_state(start, 2),
            Pattern::Yearly => Ok(State::Yearly { offset: 0 }),
        }
    }

    /// Locates the first candidate date for the fixed-interval family.
    ///
    /// When the anchor is inside the interval, the anchor itself is the
    /// first candidate. Otherwise the candidate is derived from the start
    /// of the interval: any date for the daily pattern, and the next date
    /// with the anchor's weekday for the weekly family.
    fn fixed_state(
        &self,
        start: &Zoned,
        step_days: i32,
    ) -> anyhow::Result<State> {
        let cursor = if self.anchor >= *start {
            self.anchor.date()
        } else if step_days == 1 {
            start.date()
        } else {
            let mut cursor = next_same_weekday(
                self.anchor.weekday(),
                start.date(),
                0,
            )?;
            // The candidate shares the anchor's weekday, but for steps
            // longer than a week it may still be off phase: an odd number
            // of weeks away from the anchor. The distance is measured in
            // civil days, deliberately ignoring UTC offsets, so that a DST
            // transition between the anchor and the interval cannot flip
            // the parity.
            let days = self.anchor.date().until(cursor)?.get_days();
            if days.rem_euclid(step_days) != 0 {
                cursor = cursor.checked_add(7.days()).with_context(|| {
                    format!(
                        "failed to re-phase candidate {cursor} to an exact \
                         multiple of {step_days} days from the anchor",
                    )
                })?;
            }
            cursor
        };
        Ok(State::Fixed { cursor, step_days })
    }

    /// Locates the first candidate month for the nth-weekday family.
    ///
    /// The cursor starts at the month containing the start of the interval
    /// and, for steps longer than one month, is pushed forward until its
    /// distance from the anchor's month is an exact multiple of the step.
    fn monthly_state(
        &self,
        start: &Zoned,
        month_step: i32,
    ) -> anyhow::Result<State> {
        let mut cursor = start.date().first_of_month();
        let misalign =
            month_delta(self.anchor.date(), cursor).rem_euclid(month_step);
        if misalign != 0 {
            cursor = add_months(cursor, month_step - misalign)?;
        }
        Ok(State::Monthly {
            cursor: Some(cursor),
            month_step,
            slot: self.slot(),
        })
    }
}

/// The anchor's weekday slot within a month.
#[derive(Clone, Copy, Debug)]
enum Slot {
    /// The zero-based slot counted from the start of the month. Fixed for
    /// the lifetime of a computation.
    FromStart(i8),
    /// The one-based slot counted from the end of the month. How this
    /// resolves to a concrete week depends on the month under the cursor,
    /// since months have either four or five occurrences of a weekday.
    FromEnd(i8),
}

impl Slot {
    /// Resolves this slot to a zero-based week number within the given
    /// month.
    ///
    /// The result may be `-1` or may point past the month's last week. Both
    /// produce a candidate outside the month, which the iterator discards
    /// via the month-overflow rule.
    fn resolve(&self, weekday: Weekday, month: Date) -> i8 {
        match *self {
            Slot::FromStart(n) => n,
            Slot::FromEnd(k) => weekday_occurrences_in_month(weekday, month) - k,
        }
    }
}

/// The iteration state of an occurrence sequence.
#[derive(Clone, Debug)]
enum State {
    /// Iteration has ended. Terminal.
    Done,
    /// The fixed-interval family. `cursor` is the next candidate date and
    /// already carries the pattern's phase; stepping is a constant number
    /// of civil days.
    Fixed { cursor: Date, step_days: i32 },
    /// The nth-weekday family. `cursor` is the first day of the next
    /// candidate month, or `None` once stepping left the calendar's range.
    Monthly { cursor: Option<Date>, month_step: i32, slot: Slot },
    /// The yearly pattern. `offset` is the number of years to add to the
    /// anchor for the next candidate.
    Yearly { offset: i32 },
}

/// A lazy iterator over the occurrences of one recurrence in one interval.
///
/// Created by `Recurrence::between`. The iterator owns nothing but its
/// cursor, so memory use is constant no matter how wide the interval is,
/// and dropping it early has no effect beyond not computing the rest.
#[derive(Clone, Debug)]
pub struct Occurrences<'r> {
    recurrence: &'r Recurrence,
    start: Zoned,
    end: Zoned,
    state: State,
}

impl<'r> Occurrences<'r> {
    /// Combines a candidate date with the anchor's civil time-of-day and
    /// localizes the result into the anchor's time zone.
    ///
    /// This is recomputed for every candidate rather than carried as a
    /// fixed offset from the anchor. A candidate on the other side of a DST
    /// transition must pick up the transition's offset to keep the
    /// anchor's wall clock time.
    fn localize(&self, date: Date) -> Result<Zoned, jiff::Error> {
        let anchor = self.recurrence.anchor();
        let dt = date.to_datetime(anchor.time());
        dt.to_zoned(anchor.time_zone().clone())
    }
}

impl<'r> Iterator for Occurrences<'r> {
    type Item = Zoned;

    fn next(&mut self) -> Option<Zoned> {
        loop {
            match self.state {
                State::Done => return None,
                State::Fixed { cursor, step_days } => {
                    let Ok(zdt) = self.localize(cursor) else {
                        self.state = State::Done;
                        return None;
                    };
                    match cursor.checked_add(step_days.days()) {
                        Ok(next) => {
                            self.state =
                                State::Fixed { cursor: next, step_days };
                        }
                        Err(_) => self.state = State::Done,
                    }
                    if zdt >= self.end {
                        self.state = State::Done;
                        return None;
                    }
                    if zdt < *self.recurrence.anchor() || zdt < self.start {
                        continue;
                    }
                    return Some(zdt);
                }
                State::Monthly { cursor, month_step, slot } => {
                    let Some(month) = cursor else {
                        self.state = State::Done;
                        return None;
                    };
                    let weekday = self.recurrence.anchor().weekday();
                    let weeks = slot.resolve(weekday, month);
                    let candidate = next_same_weekday(
                        weekday,
                        month,
                        i32::from(weeks),
                    );
                    // The cursor advances whether or not this month
                    // produces an occurrence.
                    self.state = State::Monthly {
                        cursor: add_months(month, month_step).ok(),
                        month_step,
                        slot,
                    };
                    let Ok(candidate) = candidate else {
                        self.state = State::Done;
                        return None;
                    };
                    // The anchor's slot may not exist in this month (a 5th
                    // Saturday, say, in a month with only four). The
                    // computed date then sits in an adjacent month, and
                    // this month simply has no occurrence. Never substitute
                    // a date from the adjacent month.
                    if (candidate.year(), candidate.month())
                        != (month.year(), month.month())
                    {
                        continue;
                    }
                    let Ok(zdt) = self.localize(candidate) else {
                        continue;
                    };
                    if zdt >= self.end {
                        self.state = State::Done;
                        return None;
                    }
                    if zdt < *self.recurrence.anchor() || zdt < self.start {
                        continue;
                    }
                    return Some(zdt);
                }
                State::Yearly { offset } => {
                    let anchor = self.recurrence.anchor();
                    let Ok(date) = add_years(anchor.date(), offset) else {
                        self.state = State::Done;
                        return None;
                    };
                    self.state = State::Yearly { offset: offset + 1 };
                    let Ok(zdt) = self.localize(date) else {
                        continue;
                    };
                    if zdt >= self.end {
                        self.state = State::Done;
                        return None;
                    }
                    if zdt < *anchor || zdt < self.start {
                        continue;
                    }
                    return Some(zdt);
                }
            }
        }
    }
}

impl<'r> std::iter::FusedIterator for Occurrences<'r> {}

/// Adds `years` whole years to a date, keeping the month and day.
///
/// The one date this can invalidate is 29 February when the target year is
/// not a leap year. That case falls back to 28 February. It is a policy
/// choice, not an error: a leap day anniversary is observed a day early
/// rather than skipped.
fn add_years(date: Date, years: i32) -> anyhow::Result<Date> {
    let year = i16::try_from(i32::from(date.year()) + years)
        .ok()
        .and_then(|year| {
            Date::new(year, date.month(), date.day())
                .or_else(|_| Date::new(year, date.month(), date.day() - 1))
                .ok()
        });
    year.with_context(|| {
        format!("failed to add {years} year(s) to {date}")
    })
}

/// The description payload of a recurrence.
///
/// This is an opaque pairing of a template identifier and the substitution
/// values it mentions. The engine never renders it; a caller with access to
/// localized weekday names does (see `crate::cmd::describe`). The weekday
/// substitution is exposed as a weekday value, not a string, precisely so
/// that its spelling stays out of the engine.
///
/// Serialization produces the template and a `substitutions` object whose
/// `weekday` member, when present, is the ISO weekday number (1 is Monday,
/// 7 is Sunday).
#[derive(Clone, Debug, Default)]
pub struct Info {
    template: &'static str,
    weekday: Option<Weekday>,
    recurrence: Option<&'static str>,
    date: Option<(i8, i8)>,
}

impl Info {
    /// Returns the template identifier, e.g.,
    /// `${recurrence} ${weekday} every month`.
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Returns the weekday substitution, when the template mentions one.
    pub fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }

    /// Returns the ordinal substitution (e.g., `3rd` or `last but one`),
    /// when the template mentions one.
    pub fn recurrence(&self) -> Option<&'static str> {
        self.recurrence
    }

    /// Returns the `(day, month)` substitution of the yearly pattern, when
    /// the template mentions one.
    pub fn date(&self) -> Option<(i8, i8)> {
        self.date
    }
}

impl serde::Serialize for Info {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        struct Substitutions<'i>(&'i Info);

        impl<'i> serde::Serialize for Substitutions<'i> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let mut map = serializer.serialize_map(None)?;
                if let Some(weekday) = self.0.weekday {
                    map.serialize_entry(
                        "weekday",
                        &weekday.to_monday_one_offset(),
                    )?;
                }
                if let Some(recurrence) = self.0.recurrence {
                    map.serialize_entry("recurrence", recurrence)?;
                }
                if let Some((day, month)) = self.0.date {
                    map.serialize_entry(
                        "date",
                        &format!("{day:02}.{month:02}."),
                    )?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("template", self.template)?;
        map.serialize_entry("substitutions", &Substitutions(self))?;
        map.end()
    }
}
