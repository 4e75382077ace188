use {
    anyhow::Context,
    jiff::{Zoned, civil, fmt, tz},
};

use crate::{TZ, args::Usage};

static TEMPORAL_PARSER: fmt::temporal::DateTimeParser =
    fmt::temporal::DateTimeParser::new();

/// Represents a datetime parsed from user input.
///
/// Everything comes down to a single instant in a particular time zone. We
/// support a few different ways of writing one down, but the representation
/// is always a `jiff::Zoned`.
///
/// All of the recurrence arithmetic in this crate requires the anchor and
/// both interval endpoints to agree on a time zone. This type does not
/// enforce that (the engine does, per computation); it only makes sure that
/// every parsed datetime has *some* zone: inputs without an offset or
/// annotation are interpreted in the system time zone, which may be
/// overridden with the `TZ` environment variable.
///
/// This type exists primarily as a target for trait impls for tailoring
/// behavior specific to recur.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct DateTime {
    /// The actual parsed datetime. i.e., The thing we operate on.
    zdt: Zoned,
}

impl DateTime {
    pub const ARG: Usage = Usage::arg(
        "<anchor>",
        "A datetime string, e.g., `now` or `2014-04-04T21:45`.",
        r#"
A single datetime string.

recur accepts a number of different formats for a datetime automatically:

RFC 9557, e.g., `2025-03-15T10:23:00-04:00[America/New_York]`. This is also
the format occurrences are printed in.

RFC 3339, e.g., `2025-03-15T10:23:00-04:00` or `2025-03-15T14:23:00Z`.

A civil datetime without an offset, e.g., `2014-04-04T21:45` or
`2014-04-04 21:45:00`. This is interpreted as a local time in your system's
configured time zone (which may be overridden by the `TZ` environment
variable).

A civil date, e.g., `2014-04-04`. This refers to the first instant of the
corresponding day in your system's configured time zone. (Which is usually
midnight, but not always, for example `2015-10-18` in `America/Sao_Paulo`.)

The special string `now` refers to the current datetime to the highest
precision supported by your system. The current datetime is computed once
when recur starts, or if the `RECUR_NOW` environment variable is set, that
time is used instead.

Note that whichever formats are used, the anchor and the interval endpoints
must all agree on one time zone.
"#,
    );

    pub const FLAG_START: Usage = Usage::flag(
        "-s/--start <datetime>",
        "The start of the interval (inclusive). Defaults to the anchor.",
        r#"
The start of the interval (inclusive).

Occurrences are computed within the half-open interval [start, end): an
occurrence exactly at the start is included, one exactly at the end is not.

When absent, the interval starts at the anchor itself, i.e., the sequence
starts with the anchor's first occurrence.

This accepts the same formats as the <anchor> argument and must use the same
time zone as the anchor.
"#,
    );

    pub const FLAG_END: Usage = Usage::flag(
        "-e/--end <datetime>",
        "The end of the interval (exclusive).",
        r#"
The end of the interval (exclusive).

Occurrences are computed within the half-open interval [start, end): an
occurrence exactly at the start is included, one exactly at the end is not.

An end that does not come after the start produces an empty sequence. That
is not an error.

This accepts the same formats as the <anchor> argument and must use the same
time zone as the anchor.
"#,
    );

    pub fn now() -> DateTime {
        DateTime { zdt: crate::NOW.clone() }
    }

    /// Get the underlying Jiff zoned date time.
    ///
    /// If possible, prefer defining an operation on `DateTime` instead of
    /// using a `Zoned` directly. This helps centralize the operations we
    /// need, and also helps encourage consistent error reporting.
    pub fn get(&self) -> &Zoned {
        &self.zdt
    }
}

impl From<Zoned> for DateTime {
    fn from(zdt: Zoned) -> DateTime {
        DateTime { zdt }
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.zdt, f)
    }
}

impl std::str::FromStr for DateTime {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<DateTime> {
        if s == "now" {
            return Ok(DateTime::now());
        }
        // We attempt the most specific thing first: an RFC 9557 timestamp
        // with a time zone annotation.
        //
        // We do keep the error for this around, since if we later find out
        // that we did have a time zone annotation but something else about
        // it was invalid, then we'll want to return this error.
        let temporal_parse_err = match TEMPORAL_PARSER.parse_zoned(s) {
            Err(err) => err,
            Ok(zdt) => return Ok(DateTime::from(zdt)),
        };
        let Ok(pieces) = fmt::temporal::Pieces::parse(s) else {
            anyhow::bail!("unrecognized datetime `{s}`")
        };
        // If we parsed a time zone annotation, that means the RFC 9557
        // parse failed above for exciting reasons. Like perhaps, an offset
        // inconsistent with the time zone. Or an invalid time zone name. So
        // we should just return the error that we got above.
        if pieces.time_zone_annotation().is_some() {
            return Err(temporal_parse_err.into());
        }
        let date = pieces.date();
        let time = pieces.time().unwrap_or(civil::Time::midnight());
        let dt = date.to_datetime(time);
        let zdt = match pieces.offset() {
            // No offset means a civil datetime, which we interpret in the
            // system time zone.
            None => dt.to_zoned(TZ.clone()),
            Some(fmt::temporal::PiecesOffset::Zulu) => {
                dt.to_zoned(tz::TimeZone::UTC)
            }
            Some(fmt::temporal::PiecesOffset::Numeric(ref off)) => {
                dt.to_zoned(tz::TimeZone::fixed(off.offset()))
            }
            Some(unk) => {
                anyhow::bail!("unrecognized parsed offset: {unk:?}")
            }
        };
        let zdt = zdt.with_context(|| {
            format!("failed to interpret `{s}` as a zoned datetime")
        })?;
        Ok(DateTime::from(zdt))
    }
}

impl serde::Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
