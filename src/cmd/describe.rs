use std::io::Write;

use {anyhow::Context, jiff::civil::Weekday};

use crate::{
    args::{self, Usage},
    datetime::DateTime,
    parse::OsStrExt,
    recur::{Info, Pattern, Recurrence},
    registry,
};

const USAGE: &'static str = r#"
Explain a recurrence in words.

Given a pattern and an anchor, this prints a short human readable
description of the recurrence, e.g., `3rd Thursday every month` or
`Friday every other week`.

The description is produced by filling a template with the values the
recurrence engine reports: a weekday, an ordinal like `3rd` or `last but
one`, or a day and month for yearly recurrences. The engine itself never
spells out a weekday; it reports an ISO weekday number and this command owns
the table of names. Use `--json` to see the raw template and substitution
values, with the weekday left as a number for callers that bring their own
names.

USAGE:
    recur describe <pattern> <anchor>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Describe a monthly recurrence anchored on a third Thursday:

        $ recur describe monthly-weekday '2013-03-21T21:45[UTC]'
        3rd Thursday every month

    %snip-start%

    The same recurrence counted from the end of the month:

        $ recur describe monthly-weekday-from-end '2013-03-21T21:45[UTC]'
        last but one Thursday every month

    The raw description payload:

        $ recur describe monthly-weekday '2013-03-21T21:45[UTC]' --json
        {"template":"${recurrence} ${weekday} every month","substitutions":{"weekday":4,"recurrence":"3rd"}}

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
    log::trace!(
        "describing `{}` anchored at `{}`",
        rec.pattern(),
        rec.anchor(),
    );
    let info = rec.info();
    let mut wtr = std::io::stdout().lock();
    if config.json {
        serde_json::to_writer(&mut wtr, &info)?;
        writeln!(wtr)?;
    } else {
        writeln!(wtr, "{}", render(&info, &WeekdayNames::english()))?;
    }
    Ok(())
}

/// A mapping from ISO weekdays to display names.
///
/// This sits outside the recurrence engine on purpose: the engine reports
/// *which* weekday a recurrence uses, and whoever renders a description
/// decides what to call it.
#[derive(Clone, Debug)]
pub struct WeekdayNames {
    /// Indexed by the weekday's offset from Monday, i.e., names[0] is the
    /// name of Monday.
    names: [&'static str; 7],
}

impl WeekdayNames {
    /// Returns the English weekday names.
    pub fn english() -> WeekdayNames {
        WeekdayNames {
            names: [
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
            ],
        }
    }

    /// Returns the name of the given weekday.
    pub fn name(&self, weekday: Weekday) -> &'static str {
        // The offset is guaranteed to be in 0..=6.
        self.names[usize::try_from(weekday.to_monday_zero_offset()).unwrap()]
    }
}

/// Renders a description payload into prose.
///
/// Substitution values the template doesn't mention are ignored, and vice
/// versa: a template placeholder with no corresponding value is left as is.
/// (The engine never produces such a payload, but this routine has no way
/// to insist on that.)
pub fn render(info: &Info, names: &WeekdayNames) -> String {
    let mut rendered = info.template().to_string();
    if let Some(weekday) = info.weekday() {
        rendered = rendered.replace("${weekday}", names.name(weekday));
    }
    if let Some(recurrence) = info.recurrence() {
        rendered = rendered.replace("${recurrence}", recurrence);
    }
    if let Some((day, month)) = info.date() {
        rendered =
            rendered.replace("${date}", &format!("{day:02}.{month:02}."));
    }
    rendered
}

#[derive(Debug, Default)]
struct Config {
    pattern: Option<Pattern>,
    anchor: Option<DateTime>,
    json: bool,
}

impl Config {
    fn recurrence(&self) -> anyhow::Result<Recurrence> {
        let pattern = self.pattern.context("missing required <pattern>")?;
        let anchor = self.anchor.clone().unwrap_or_else(DateTime::now);
        Ok(Recurrence::new(pattern, anchor.get().clone()))
    }
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
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
            Long("json") => {
                self.json = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const JSON: Usage = Usage::flag(
            "--json",
            "Print the raw description payload as JSON.",
            r#"
Print the raw description payload as JSON instead of rendering it.

The payload is the template identifier plus its substitution values. The
weekday substitution, when present, is the ISO weekday number (1 is Monday,
7 is Sunday), to be resolved to a name by the consumer.
"#,
        );

        &[registry::USAGE, DateTime::ARG, JSON]
    }
}
