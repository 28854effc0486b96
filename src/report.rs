use crate::checks::CheckResult;
use std::io::{self, Write};
use tracing::error;

/// Writes the plugin output line and flushes it.
pub fn write_line<W: Write>(out: &mut W, result: &CheckResult) -> io::Result<()> {
    writeln!(out, "{result}")?;
    out.flush()
}

/// Prints the single plugin output line and terminates with the result's
/// exit code.
pub fn exit(result: &CheckResult) -> ! {
    let mut out = io::stdout().lock();
    if let Err(err) = write_line(&mut out, result) {
        error!(error = %err, status = %result.status, "failed to write plugin output");
    }
    std::process::exit(result.exit_code())
}
