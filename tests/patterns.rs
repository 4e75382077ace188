use crate::{command::assert_cmd_snapshot, recur};

/// The registry listing, in weight order.
#[test]
fn listing() {
    assert_cmd_snapshot!(
        recur(["patterns"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    daily                       daily
    weekly                      weekly, same weekday (e.g. each Friday)
    biweekly                    every other week, same weekday (e.g. each second Friday)
    monthly-weekday             monthly, same weekday (e.g. each 3rd Sunday)
    monthly-weekday-from-end    monthly, same weekday counted from the end of the month (e.g. each last but one Sunday)
    bimonthly-weekday           every other month, same weekday (e.g. each 3rd Sunday in other month)
    bimonthly-weekday-from-end  every other month, same weekday counted from the end of the month (e.g. each last but one Sunday every other month)
    yearly                      yearly (e.g. 24th of December)

    ----- stderr -----
    ",
    );
}

/// The JSON listing additionally carries aliases and weights.
#[test]
fn listing_json() {
    assert_cmd_snapshot!(
        recur(["patterns", "--json"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    [{"name":"daily","aliases":["day","d"],"weight":5,"title":"daily"},{"name":"weekly","aliases":["week","wk","w"],"weight":10,"title":"weekly, same weekday (e.g. each Friday)"},{"name":"biweekly","aliases":["fortnightly"],"weight":11,"title":"every other week, same weekday (e.g. each second Friday)"},{"name":"monthly-weekday","aliases":["monthly","mo"],"weight":20,"title":"monthly, same weekday (e.g. each 3rd Sunday)"},{"name":"monthly-weekday-from-end","aliases":["monthly-from-end"],"weight":21,"title":"monthly, same weekday counted from the end of the month (e.g. each last but one Sunday)"},{"name":"bimonthly-weekday","aliases":["bimonthly"],"weight":25,"title":"every other month, same weekday (e.g. each 3rd Sunday in other month)"},{"name":"bimonthly-weekday-from-end","aliases":["bimonthly-from-end"],"weight":26,"title":"every other month, same weekday counted from the end of the month (e.g. each last but one Sunday every other month)"},{"name":"yearly","aliases":["year","yr","y"],"weight":100,"title":"yearly (e.g. 24th of December)"}]

    ----- stderr -----
    "#,
    );
}

/// `patterns` takes no positional arguments.
#[test]
fn rejects_positional_arguments() {
    assert_cmd_snapshot!(
        recur(["patterns", "weekly"]),
        @r#"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    unexpected argument "weekly"
    "#,
    );
}
