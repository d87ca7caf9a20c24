//! String token encoding.
//!
//! In encoded mode the writer hands string content to a [`StringEncoder`],
//! whose output is written verbatim and must already carry the delimiters.

use std::iter::Peekable;
use std::str::Chars;

/// Turns arbitrary text into a complete, delimited string token.
pub trait StringEncoder: Sync {
    fn encode(&self, text: &str) -> String;
}

impl<F> StringEncoder for F
where
    F: Fn(&str) -> String + Sync,
{
    fn encode(&self, text: &str) -> String {
        self(text)
    }
}

/// ISO 10303-21 string encoder.
///
/// Printable ASCII is written as is, `'` and `\` are doubled, and everything
/// else is written as `\X2\` (BMP) or `\X4\` (supplementary planes) hex runs
/// terminated by `\X0\`.
///
/// ```
/// use step_write::{Part21StringEncoder, StringEncoder};
///
/// let enc = Part21StringEncoder;
/// assert_eq!(enc.encode("it's"), "'it''s'");
/// assert_eq!(enc.encode("Größe"), "'Gr\\X2\\00F600DF\\X0\\e'");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Part21StringEncoder;

impl Part21StringEncoder {
    fn is_plain(c: char) -> bool {
        (' '..='~').contains(&c)
    }

    fn write_run(out: &mut String, chars: &mut Peekable<Chars<'_>>, wide: bool) {
        out.push_str(if wide { "\\X4\\" } else { "\\X2\\" });
        while let Some(&c) = chars.peek() {
            if Self::is_plain(c) || (u32::from(c) > 0xFFFF) != wide {
                break;
            }
            chars.next();
            if wide {
                out.push_str(&format!("{:08X}", u32::from(c)));
            } else {
                out.push_str(&format!("{:04X}", u32::from(c)));
            }
        }
        out.push_str("\\X0\\");
    }
}

impl StringEncoder for Part21StringEncoder {
    fn encode(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('\'');
        let mut chars = text.chars().peekable();
        while let Some(&c) = chars.peek() {
            match c {
                '\'' => {
                    chars.next();
                    out.push_str("''");
                }
                '\\' => {
                    chars.next();
                    out.push_str("\\\\");
                }
                c if Self::is_plain(c) => {
                    chars.next();
                    out.push(c);
                }
                c => Self::write_run(&mut out, &mut chars, u32::from(c) > 0xFFFF),
            }
        }
        out.push('\'');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_is_quoted() {
        assert_eq!(Part21StringEncoder.encode(""), "''");
        assert_eq!(Part21StringEncoder.encode("Wall-01"), "'Wall-01'");
    }

    #[test]
    fn quotes_and_backslashes_are_doubled() {
        assert_eq!(Part21StringEncoder.encode("a'b\\c"), "'a''b\\\\c'");
    }

    #[test]
    fn bmp_runs_use_x2() {
        assert_eq!(
            Part21StringEncoder.encode("\u{00E9}\u{4E2D}x"),
            "'\\X2\\00E94E2D\\X0\\x'"
        );
    }

    #[test]
    fn control_chars_use_x2() {
        assert_eq!(Part21StringEncoder.encode("a\nb"), "'a\\X2\\000A\\X0\\b'");
    }

    #[test]
    fn supplementary_planes_use_x4() {
        assert_eq!(
            Part21StringEncoder.encode("\u{1F600}\u{00E9}"),
            "'\\X4\\0001F600\\X0\\\\X2\\00E9\\X0\\'"
        );
    }

    #[test]
    fn closures_are_encoders() {
        let upper = |s: &str| format!("'{}'", s.to_uppercase());
        assert_eq!(upper.encode("abc"), "'ABC'");
    }
}
