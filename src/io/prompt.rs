//! Interactive prompt for grid counts.

use std::io::{BufRead, Write};

use tracing::warn;

/// Print `message`, read one line, and parse it as a count of at least 1.
///
/// Anything that is not a positive integer (including EOF) falls back to 1
/// after printing why.
pub fn prompt_count<R: BufRead, W: Write>(message: &str, input: &mut R, output: &mut W) -> u32 {
    // Console write failures are ignored
    let _ = write!(output, "{message}");
    let _ = output.flush();

    let mut line = String::new();
    if let Err(e) = input.read_line(&mut line) {
        warn!("failed to read from stdin: {}", e);
        let _ = writeln!(output, "Error: {e}");
        return 1;
    }

    match line.trim().parse::<i64>() {
        Ok(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
        Ok(_) => {
            let _ = writeln!(output, "Error: amount of slices must be at least 1");
            1
        }
        Err(e) => {
            let _ = writeln!(output, "Error: {e}");
            1
        }
    }
}
