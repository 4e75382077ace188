use std::io::Write;

use crate::{
    args::{self, Usage},
    registry,
};

const USAGE: &'static str = r#"
List the recurrence patterns recur knows about.

Patterns are listed in their registry order: by ascending sort weight. The
weights exist so that user interfaces built on top of recur can present
related patterns next to each other; the listing here shows the same order.

USAGE:
    recur patterns

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    List every pattern with its title:

        $ recur patterns
        daily                       daily
        weekly                      weekly, same weekday (e.g. each Friday)
        ...

    %snip-start%

    The `--json` output also includes the accepted aliases and the sort
    weight of every pattern:

        $ recur patterns --json | jq '.[] | select(.name == "weekly")'
        {
          "name": "weekly",
          "aliases": ["week", "wk", "w"],
          "weight": 10,
          "title": "weekly, same weekday (e.g. each Friday)"
        }

    %snip-end%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    args::configure(p, USAGE, &mut [&mut config])?;

    let entries = registry::all();
    let mut wtr = std::io::stdout().lock();
    if config.json {
        serde_json::to_writer(&mut wtr, entries)?;
        writeln!(wtr)?;
        return Ok(());
    }
    // Two column output with the names padded to a common width.
    let max_len =
        entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for e in entries.iter() {
        let padding = " ".repeat(2 + (max_len - e.name.len()));
        writeln!(wtr, "{}{}{}", e.name, padding, e.title)?;
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    json: bool,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        use lexopt::Arg::*;

        match *arg {
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
            "Print the registry as a JSON array.",
            r#"
Print the registry as a JSON array.

Every element carries the pattern's stable name, its accepted aliases, its
sort weight (smaller weights sort first) and its title. The array itself is
already in weight order.
"#,
        );

        &[JSON]
    }
}
