use crate::{command::assert_cmd_snapshot, recur};

/// A monthly recurrence rendered in words.
#[test]
fn monthly_weekday() {
    assert_cmd_snapshot!(
        recur(["describe", "monthly-weekday", "2013-03-21T21:45[UTC]"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    3rd Thursday every month

    ----- stderr -----
    ",
    );
}

/// The same anchor counted from the end of the month.
#[test]
fn monthly_weekday_from_end() {
    assert_cmd_snapshot!(
        recur([
            "describe",
            "monthly-weekday-from-end",
            "2013-03-21T21:45[UTC]",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    last but one Thursday every month

    ----- stderr -----
    ",
    );
}

/// Pattern aliases are accepted wherever a pattern name is.
#[test]
fn accepts_aliases() {
    assert_cmd_snapshot!(
        recur(["describe", "mo", "2013-03-21T21:45[UTC]"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    3rd Thursday every month

    ----- stderr -----
    ",
    );
}

/// A yearly recurrence names its day and month rather than a weekday.
#[test]
fn yearly() {
    assert_cmd_snapshot!(
        recur(["describe", "yearly", "2013-12-24T15:00[UTC]"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    24.12. every year

    ----- stderr -----
    ",
    );
}

/// The raw payload leaves the weekday as an ISO weekday number.
#[test]
fn json_payload() {
    assert_cmd_snapshot!(
        recur([
            "describe",
            "monthly-weekday",
            "2013-03-21T21:45[UTC]",
            "--json",
        ]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"template":"${recurrence} ${weekday} every month","substitutions":{"weekday":4,"recurrence":"3rd"}}

    ----- stderr -----
    "#,
    );
}

/// The daily payload has no substitutions at all.
#[test]
fn json_payload_daily() {
    assert_cmd_snapshot!(
        recur(["describe", "daily", "now", "--json"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"template":"each day","substitutions":{}}

    ----- stderr -----
    "#,
    );
}
