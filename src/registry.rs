use std::sync::LazyLock;

use crate::{args::Usage, recur::Pattern};

/// One pattern's registry entry.
///
/// An entry carries everything a caller needs to present a pattern without
/// asking the engine: the stable name, the accepted aliases, the weight used
/// to order pattern pickers and a one line title.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    /// The stable, canonical name. Always equal to `pattern.as_str()`.
    pub name: &'static str,
    /// Shorthand spellings accepted anywhere a pattern name is.
    pub aliases: &'static [&'static str],
    /// The sort weight. Smaller weights sort first.
    pub weight: i32,
    /// A one line human readable title.
    pub title: &'static str,
    /// The pattern this entry describes.
    pub pattern: Pattern,
}

/// The pattern registry.
///
/// The weights leave gaps on purpose so related patterns group together in
/// a weight-ordered listing: the weekly family in the tens, the monthly
/// family in the twenties, yearly at the end.
const ENTRIES: &[Entry] = &[
    Entry {
        name: "daily",
        aliases: &["day", "d"],
        weight: 5,
        title: "daily",
        pattern: Pattern::Daily,
    },
    Entry {
        name: "weekly",
        aliases: &["week", "wk", "w"],
        weight: 10,
        title: "weekly, same weekday (e.g. each Friday)",
        pattern: Pattern::Weekly,
    },
    Entry {
        name: "biweekly",
        aliases: &["fortnightly"],
        weight: 11,
        title: "every other week, same weekday (e.g. each second Friday)",
        pattern: Pattern::BiWeekly,
    },
    Entry {
        name: "monthly-weekday",
        aliases: &["monthly", "mo"],
        weight: 20,
        title: "monthly, same weekday (e.g. each 3rd Sunday)",
        pattern: Pattern::MonthlyWeekday,
    },
    Entry {
        name: "monthly-weekday-from-end",
        aliases: &["monthly-from-end"],
        weight: 21,
        title: "monthly, same weekday counted from the end of the month \
                (e.g. each last but one Sunday)",
        pattern: Pattern::MonthlyWeekdayFromEnd,
    },
    Entry {
        name: "bimonthly-weekday",
        aliases: &["bimonthly"],
        weight: 25,
        title: "every other month, same weekday \
                (e.g. each 3rd Sunday in other month)",
        pattern: Pattern::BiMonthlyWeekday,
    },
    Entry {
        name: "bimonthly-weekday-from-end",
        aliases: &["bimonthly-from-end"],
        weight: 26,
        title: "every other month, same weekday counted from the end of \
                the month (e.g. each last but one Sunday every other month)",
        pattern: Pattern::BiMonthlyWeekdayFromEnd,
    },
    Entry {
        name: "yearly",
        aliases: &["year", "yr", "y"],
        weight: 100,
        title: "yearly (e.g. 24th of December)",
        pattern: Pattern::Yearly,
    },
];

/// Returns all registry entries, ordered by weight (then name, although no
/// two entries share a weight).
pub fn all() -> &'static [Entry] {
    static SORTED: LazyLock<Vec<Entry>> = LazyLock::new(|| {
        let mut entries = ENTRIES.to_vec();
        entries.sort_by_key(|e| (e.weight, e.name));
        entries
    });
    &*SORTED
}

/// Looks up a pattern by name or alias.
///
/// Names are matched case insensitively.
pub fn find(name: &str) -> Option<&'static Entry> {
    let name = name.to_lowercase();
    ENTRIES.iter().find(|e| {
        e.name == name || e.aliases.iter().any(|&alias| alias == name)
    })
}

pub const USAGE: Usage = Usage::arg(
    "<pattern>",
    "A recurrence pattern name, e.g., `weekly` or `monthly-weekday`.",
    r#"
A recurrence pattern name.

Valid values, in the order used by `recur patterns`, are:

daily (aliases: day, d)

weekly (aliases: week, wk, w)

biweekly (alias: fortnightly)

monthly-weekday (aliases: monthly, mo), the anchor's weekday slot counted
from the start of the month, e.g. the 3rd Thursday.

monthly-weekday-from-end (alias: monthly-from-end), the anchor's weekday
slot counted from the end of the month, e.g. the last but one Thursday.

bimonthly-weekday (alias: bimonthly), like monthly-weekday but only every
other month.

bimonthly-weekday-from-end (alias: bimonthly-from-end), like
monthly-weekday-from-end but only every other month.

yearly (aliases: year, yr, y)

Names are matched case insensitively.
"#,
);

impl serde::Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        // The pattern itself is omitted: its name is its identity for
        // anything consuming this output.
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("name", self.name)?;
        map.serialize_entry("aliases", self.aliases)?;
        map.serialize_entry("weight", &self.weight)?;
        map.serialize_entry("title", self.title)?;
        map.end()
    }
}

impl std::str::FromStr for Pattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Pattern> {
        match find(s) {
            Some(entry) => Ok(entry.pattern),
            None => anyhow::bail!(
                "unrecognized recurrence pattern `{s}` \
                 (run `recur patterns` for the list of valid patterns)",
            ),
        }
    }
}
