// Text console front-end: prompt, read a line, print the reply.

use std::io::{BufRead, Write};

use crate::audit::AuditSink;
use crate::errors::Result;
use crate::shell::Shell;

/// Drive `shell` from `input` until it exits or the input ends.
///
/// End of input stops the loop without running `exit`, so nothing is logged
/// for it.
pub fn run_console<S, R, W>(shell: &mut Shell<S>, mut input: R, output: &mut W) -> Result<()>
where
    S: AuditSink,
    R: BufRead,
    W: Write,
{
    let mut raw = Vec::new();
    loop {
        write!(output, "{}", shell.prompt())?;
        output.flush()?;
        raw.clear();
        if input.read_until(b'\n', &mut raw)? == 0 {
            writeln!(output)?;
            tracing::info!("Console input closed");
            return Ok(());
        }
        let line = decode_line(&raw);
        let reply = shell.execute(&line)?;
        if !reply.output.is_empty() {
            writeln!(output, "{}", reply.output)?;
        }
        if reply.terminated {
            output.flush()?;
            return Ok(());
        }
    }
}

/// Strip the line ending and decode. Invalid UTF-8 becomes U+FFFD rather than
/// an error, so a bad line gets a reply like any other unknown input.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
