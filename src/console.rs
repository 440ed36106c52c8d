//! Console prompts. Both tools run in their own console window, which would
//! close before the operator could read the output.

use std::io::{self, BufRead, Write};

/// Prints `message` and returns the next line from stdin, trimmed.
pub fn prompt(message: &str) -> io::Result<String> {
    read_line_from(message, &mut io::stdin().lock(), &mut io::stdout())
}

/// Blocks until Enter is pressed.
pub fn wait_for_exit() {
    let _ = prompt("Press \"Enter\" to exit ");
}

fn read_line_from<R: BufRead, W: Write>(message: &str, input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{}", message)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line() {
        let mut input = io::Cursor::new(b"session=abc; token=1 \r\nnext\n".to_vec());
        let mut output = Vec::new();

        let line = read_line_from("Cookies: ", &mut input, &mut output).unwrap();

        assert_eq!(line, "session=abc; token=1");
        assert_eq!(output, b"Cookies: ");
    }
}
