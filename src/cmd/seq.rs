use std::io::Write;

use anyhow::Context;

use crate::{
    args::{self, Usage},
    datetime::DateTime,
    parse::OsStrExt,
    recur::{Pattern, Recurrence},
    registry,
};

const USAGE: &'static str = r#"
Compute the occurrences of a recurrence within a half-open interval.

A recurrence is a pattern (e.g., `weekly`) plus an anchor datetime. The
anchor is the earliest possible occurrence and fixes everything the pattern
keeps invariant: the time of day, and depending on the pattern, the weekday,
the weekday's slot within its month or the month and day.

Occurrences are computed within the interval [start, end): the start is
included, the end is not. The `-e/--end` flag is required; `-s/--start`
defaults to the anchor itself. The anchor and both endpoints must agree on
one time zone.

Occurrences are printed in chronological order, one RFC 9557 datetime per
line. Every occurrence keeps the anchor's local wall clock time, even when
the sequence crosses a daylight saving time transition. (Its UTC offset is
what changes instead.)

USAGE:
    recur seq <pattern> <anchor>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Every Friday in April 2014, at the anchor's time of day:

        $ recur seq weekly '2014-04-04T21:45[Europe/Berlin]' \
            -e '2014-04-30T00:00[Europe/Berlin]'
        2014-04-04T21:45:00+02:00[Europe/Berlin]
        2014-04-11T21:45:00+02:00[Europe/Berlin]
        2014-04-18T21:45:00+02:00[Europe/Berlin]
        2014-04-25T21:45:00+02:00[Europe/Berlin]

    %snip-start%

    The last Friday of each month. Note how the UTC offset changes when
    daylight saving time starts in late March, while the local time stays
    at 09:00:

        $ recur seq monthly-weekday-from-end '2016-02-26T09:00[Europe/Berlin]' \
            -e '2016-06-01T00:00[Europe/Berlin]'
        2016-02-26T09:00:00+01:00[Europe/Berlin]
        2016-03-25T09:00:00+01:00[Europe/Berlin]
        2016-04-29T09:00:00+02:00[Europe/Berlin]
        2016-05-27T09:00:00+02:00[Europe/Berlin]

    A leap day anniversary is observed on 28 February in non-leap years:

        $ recur seq yearly '2008-02-29T15:00[UTC]' \
            -s '2011-01-01T00:00[UTC]' -e '2013-01-01T00:00[UTC]'
        2011-02-28T15:00:00+00:00[UTC]
        2012-02-29T15:00:00+00:00[UTC]

    The next three occurrences of a biweekly event, starting from the
    current time:

        $ recur seq biweekly '2025-01-03T12:00[America/New_York]' \
            -s now -e '2026-01-01T00:00[America/New_York]' -c3

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    args::configure(p, USAGE, &mut [&mut config])?;

    let rec = config.recurrence()?;
    let start = config.start();
    let end = config.end()?;
    log::trace!(
        "generating `{}` sequence anchored at `{}` within [{start}, {end})",
        rec.pattern(),
        rec.anchor(),
    );
    let occurrences = rec
        .between(start.get(), end.get())?
        .map(DateTime::from)
        .take(config.count());

    let mut wtr = std::io::stdout().lock();
    if config.json {
        let all: Vec<DateTime> = occurrences.collect();
        serde_json::to_writer(&mut wtr, &all)?;
        writeln!(wtr)?;
    } else {
        for dt in occurrences {
            writeln!(wtr, "{dt}")?;
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    pattern: Option<Pattern>,
    anchor: Option<DateTime>,
    start: Option<DateTime>,
    end: Option<DateTime>,
    count: Option<usize>,
    json: bool,
}

impl Config {
    fn recurrence(&self) -> anyhow::Result<Recurrence> {
        let pattern = self.pattern.context("missing required <pattern>")?;
        Ok(Recurrence::new(pattern, self.anchor().get().clone()))
    }

    fn anchor(&self) -> DateTime {
        self.anchor.clone().unwrap_or_else(DateTime::now)
    }

    fn start(&self) -> DateTime {
        self.start.clone().unwrap_or_else(|| self.anchor())
    }

    fn end(&self) -> anyhow::Result<DateTime> {
        self.end.clone().context("missing required flag -e/--end")
    }

    fn count(&self) -> usize {
        self.count.unwrap_or(usize::MAX)
    }
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        use lexopt::Arg::*;

        match *arg {
            Value(ref v) => {
                if self.pattern.is_none() {
                    self.pattern = Some(v.to_str()?.parse()?);
                    return Ok(true);
                }
                if self.anchor.is_none() {
                    self.anchor = Some(v.to_str()?.parse()?);
                    return Ok(true);
                }
                return Ok(false);
            }
            Short('s') | Long("start") => {
                self.start = Some(args::parse(p, "-s/--start")?);
            }
            Short('e') | Long("end") => {
                self.end = Some(args::parse(p, "-e/--end")?);
            }
            Short('c') | Long("count") => {
                self.count = Some(args::parse(p, "-c/--count")?);
            }
            Long("json") => {
                self.json = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const COUNT: Usage = Usage::flag(
            "-c/--count <number>",
            "Print at most this many occurrences.",
            r#"
Print at most this many occurrences.

Zero is a legal value, but always results in an empty sequence.

This caps the output without changing the interval: the occurrences printed
are always the chronologically first ones inside [start, end).
"#,
        );
        const JSON: Usage = Usage::flag(
            "--json",
            "Print the occurrences as a JSON array.",
            r#"
Print the occurrences as a JSON array of RFC 9557 datetime strings instead
of one datetime per line.
"#,
        );

        &[
            registry::USAGE,
            DateTime::ARG,
            DateTime::FLAG_START,
            DateTime::FLAG_END,
            COUNT,
            JSON,
        ]
    }
}
