//! Byte and line input for `inc`/`inn`.

use std::io::{self, BufRead};

use super::error::{InputError, RuntimeError};

/// What `inc`/`inn` do when input is exhausted or malformed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputPolicy {
    /// Store 0 and keep running.
    #[default]
    Lenient,
    /// Fault with [`RuntimeError::Input`].
    Strict,
}

impl InputPolicy {
    /// Apply the policy to a read result.
    pub(crate) fn resolve(self, read: Result<i64, InputError>) -> Result<i64, RuntimeError> {
        match (read, self) {
            (Ok(value), _) => Ok(value),
            (Err(err), Self::Lenient) => {
                tracing::debug!(%err, "input unavailable, storing 0");
                Ok(0)
            }
            (Err(err), Self::Strict) => Err(err.into()),
        }
    }
}

/// Read one byte. Outer `Err` is an I/O failure, inner is end of input.
pub(crate) fn read_byte<R: BufRead>(input: &mut R) -> io::Result<Result<i64, InputError>> {
    loop {
        match input.fill_buf() {
            Ok(buf) => {
                let Some(&b) = buf.first() else {
                    return Ok(Err(InputError::EndOfInput));
                };
                input.consume(1);
                return Ok(Ok(i64::from(b)));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Read one line and parse it as a decimal `i64`.
///
/// The trailing `\n` and an optional `\r` before it are stripped. A final
/// line without a terminator is accepted.
pub(crate) fn read_number<R: BufRead>(input: &mut R) -> io::Result<Result<i64, InputError>> {
    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Ok(Err(InputError::EndOfInput));
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }

    let parsed = std::str::from_utf8(&line)
        .ok()
        .and_then(|text| text.parse::<i64>().ok());
    Ok(parsed.ok_or_else(|| InputError::InvalidNumber(String::from_utf8_lossy(&line).into_owned())))
}
