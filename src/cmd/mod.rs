mod describe;
mod patterns;
mod seq;

const USAGE: &'static str = "\
A utility for computing the occurrences of a recurring event within a
half-open datetime interval.

USAGE:
    recur <command> ...

COMMANDS:
    describe  Explain a recurrence in words, e.g., `3rd Thursday every month`
    patterns  List the recurrence patterns recur knows about
    seq       Compute the occurrences of a recurrence within an interval
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "describe" => describe::run(p),
        "patterns" => patterns::run(p),
        "seq" => seq::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
