use crate::{command::assert_cmd_snapshot, recur};

/// Every Friday of April 2014, at the anchor's time of day.
#[test]
fn weekly_sequence() {
    assert_cmd_snapshot!(
        recur([
            "seq",
            "weekly",
            "2014-04-04T21:45[Europe/Berlin]",
            "-s",
            "2014-04-01T00:00[Europe/Berlin]",
            "-e",
            "2014-04-30T00:00[Europe/Berlin]",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2014-04-04T21:45:00+02:00[Europe/Berlin]
    2014-04-11T21:45:00+02:00[Europe/Berlin]
    2014-04-18T21:45:00+02:00[Europe/Berlin]
    2014-04-25T21:45:00+02:00[Europe/Berlin]

    ----- stderr -----
    ",
    );
}

/// Civil datetimes without a zone annotation are interpreted in the zone
/// from the `TZ` environment variable, here Europe/Berlin. A bare date is
/// the first instant of its day.
#[test]
fn weekly_sequence_with_civil_arguments() {
    assert_cmd_snapshot!(
        recur([
            "seq",
            "weekly",
            "2014-04-04T21:45",
            "-s",
            "2014-04-01",
            "-e",
            "2014-04-30",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2014-04-04T21:45:00+02:00[Europe/Berlin]
    2014-04-11T21:45:00+02:00[Europe/Berlin]
    2014-04-18T21:45:00+02:00[Europe/Berlin]
    2014-04-25T21:45:00+02:00[Europe/Berlin]

    ----- stderr -----
    ",
    );
}

/// The interval start defaults to the anchor, and `-c` caps the output.
#[test]
fn daily_with_count() {
    assert_cmd_snapshot!(
        recur([
            "seq",
            "daily",
            "2014-04-01T08:00[UTC]",
            "-e",
            "2015-01-01T00:00[UTC]",
            "-c2",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2014-04-01T08:00:00+00:00[UTC]
    2014-04-02T08:00:00+00:00[UTC]

    ----- stderr -----
    ",
    );
}

/// The anchor defaults to the current time, which the tests pin via
/// `RECUR_NOW` to 2024-07-20T16:30:55 in Europe/Berlin.
#[test]
fn anchor_defaults_to_now() {
    assert_cmd_snapshot!(
        recur(["seq", "daily", "-e", "2024-07-23T00:00"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2024-07-20T16:30:55+02:00[Europe/Berlin]
    2024-07-21T16:30:55+02:00[Europe/Berlin]
    2024-07-22T16:30:55+02:00[Europe/Berlin]

    ----- stderr -----
    ",
    );
}

/// A monthly sequence crossing a spring-forward transition keeps its local
/// wall clock time. The UTC offset is what changes.
#[test]
fn monthly_from_end_across_dst() {
    assert_cmd_snapshot!(
        recur([
            "seq",
            "monthly-weekday-from-end",
            "2016-02-26T09:00[Europe/Berlin]",
            "-e",
            "2016-06-01T00:00[Europe/Berlin]",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2016-02-26T09:00:00+01:00[Europe/Berlin]
    2016-03-25T09:00:00+01:00[Europe/Berlin]
    2016-04-29T09:00:00+02:00[Europe/Berlin]
    2016-05-27T09:00:00+02:00[Europe/Berlin]

    ----- stderr -----
    ",
    );
}

/// A fifth-Saturday anchor skips months with only four Saturdays.
#[test]
fn monthly_skips_short_months() {
    assert_cmd_snapshot!(
        recur([
            "seq",
            "monthly-weekday",
            "2014-05-31T00:00[UTC]",
            "-e",
            "2014-08-31T00:00[UTC]",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2014-05-31T00:00:00+00:00[UTC]
    2014-08-30T00:00:00+00:00[UTC]

    ----- stderr -----
    ",
    );
}

/// `--json` emits the same sequence as a JSON array.
#[test]
fn yearly_leap_day_json() {
    assert_cmd_snapshot!(
        recur([
            "seq",
            "yearly",
            "2008-02-29T15:00[UTC]",
            "-s",
            "2011-01-01T00:00[UTC]",
            "-e",
            "2013-01-01T00:00[UTC]",
            "--json",
        ]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    ["2011-02-28T15:00:00+00:00[UTC]","2012-02-29T15:00:00+00:00[UTC]"]

    ----- stderr -----
    "#,
    );
}

/// An interval that ends before it starts is empty, not an error.
#[test]
fn inverted_interval_is_empty() {
    assert_cmd_snapshot!(
        recur([
            "seq",
            "weekly",
            "2014-04-04T21:45[UTC]",
            "-s",
            "2014-04-30T00:00[UTC]",
            "-e",
            "2014-04-01T00:00[UTC]",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----

    ----- stderr -----
    ",
    );
}

/// The interval end is required.
#[test]
fn missing_end() {
    assert_cmd_snapshot!(
        recur(["seq", "weekly", "2014-04-04T21:45[UTC]"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    missing required flag -e/--end
    ",
    );
}

/// An unknown pattern name points at `recur patterns`.
#[test]
fn unknown_pattern() {
    assert_cmd_snapshot!(
        recur(["seq", "quarterly", "2014-04-04T21:45[UTC]", "-e", "now"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    unrecognized recurrence pattern `quarterly` (run `recur patterns` for the list of valid patterns)
    ",
    );
}

/// The anchor and the interval endpoints must agree on a time zone.
#[test]
fn mismatched_time_zones() {
    assert_cmd_snapshot!(
        recur([
            "seq",
            "weekly",
            "2014-04-04T21:45[UTC]",
            "-e",
            "2014-04-30T00:00[Europe/Berlin]",
        ]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    interval end `2014-04-30T00:00:00+02:00[Europe/Berlin]` must be in the anchor's time zone (anchor is `2014-04-04T21:45:00+00:00[UTC]`)
    ",
    );
}

/// A datetime that isn't one is reported with the flag it was given to.
#[test]
fn unparseable_end() {
    assert_cmd_snapshot!(
        recur(["seq", "weekly", "2014-04-04T21:45[UTC]", "-e", "whenever"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    -e/--end: unrecognized datetime `whenever`
    ",
    );
}
