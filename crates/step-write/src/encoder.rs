//! `StepEncoder`: writes an [`ArgumentValue`] as an ISO 10303-21 token
//! sequence.
//!
//! Token grammar (exchange structure, clause 6):
//!
//! ```text
//! REAL   = [ SIGN ] DIGIT { DIGIT } "." { DIGIT } [ "E" [ SIGN ] DIGIT { DIGIT } ]
//! BINARY = """" ( "0" | "1" | "2" | "3" ) { HEX } """"
//! ENUM   = "." UPPER { UPPER | DIGIT } "."
//! LIST   = "(" [ PARAMETER { "," PARAMETER } ] ")"
//! ```

use tracing::warn;

use crate::bits::BitSequence;
use crate::error::ArgumentError;
use crate::instance::InstanceRef;
use crate::options::RenderOptions;
use crate::strings::{Part21StringEncoder, StringEncoder};
use crate::types::Logical;
use crate::value::{ArgumentValue, Container};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Writes argument values as text.
///
/// Inline simple-type instances are written recursively; the encoder keeps the
/// chain of instances currently being written so that a cycle or an overly
/// deep chain fails instead of recursing without bound.
pub struct StepEncoder<'e> {
    out: String,
    options: RenderOptions,
    strings: &'e dyn StringEncoder,
    path: Vec<usize>,
}

impl Default for StepEncoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl StepEncoder<'static> {
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    /// Uses [`Part21StringEncoder`] for strings in encoded mode.
    pub fn with_options(options: RenderOptions) -> Self {
        Self::with_string_encoder(options, &Part21StringEncoder)
    }
}

impl<'e> StepEncoder<'e> {
    pub fn with_string_encoder(options: RenderOptions, strings: &'e dyn StringEncoder) -> Self {
        Self {
            out: String::new(),
            options,
            strings,
            path: Vec::new(),
        }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Encode a value and return its text.
    pub fn encode(&mut self, value: &ArgumentValue<'_>) -> Result<String, ArgumentError> {
        self.out.clear();
        self.path.clear();
        self.write_any(value)?;
        Ok(std::mem::take(&mut self.out))
    }

    pub fn write_any(&mut self, value: &ArgumentValue<'_>) -> Result<(), ArgumentError> {
        match value.container() {
            Container::Null => self.write_null(),
            Container::Derived => self.write_derived(),
            Container::Int(n) => self.write_integer(*n),
            Container::Bool(b) => self.write_boolean(*b),
            Container::Logical(l) => self.write_logical(*l),
            Container::Double(d) => self.write_real(*d),
            Container::String(s) => self.write_str(s),
            Container::Binary(b) => self.write_binary(b),
            Container::Enumeration(e) => self.write_enumeration(&e.value),
            Container::EntityInstance(r) => return self.write_reference(*r),
            Container::EmptyAggregate | Container::AggregateOfEmptyAggregate => {
                self.write_empty_aggregate()
            }
            Container::AggregateOfInt(v) => self.write_list(v, |enc, n| enc.write_integer(*n)),
            Container::AggregateOfDouble(v) => self.write_list(v, |enc, d| enc.write_real(*d)),
            Container::AggregateOfString(v) => self.write_list(v, |enc, s| enc.write_str(s)),
            Container::AggregateOfBinary(v) => self.write_list(v, |enc, b| enc.write_binary(b)),
            Container::AggregateOfAggregateOfInt(v) => self.write_list(v, |enc, inner| {
                enc.write_list(inner, |enc, n| enc.write_integer(*n))
            }),
            Container::AggregateOfAggregateOfDouble(v) => self.write_list(v, |enc, inner| {
                enc.write_list(inner, |enc, d| enc.write_real(*d))
            }),
            Container::AggregateOfEntityInstance(v) => {
                return self.try_write_list(v, |enc, r| enc.write_reference(*r));
            }
            Container::AggregateOfAggregateOfEntityInstance(v) => {
                return self.try_write_list(v, |enc, inner| {
                    enc.try_write_list(inner, |enc, r| enc.write_reference(*r))
                });
            }
        }
        Ok(())
    }

    pub fn write_null(&mut self) {
        self.out.push('$');
    }

    pub fn write_derived(&mut self) {
        self.out.push('*');
    }

    pub fn write_integer(&mut self, n: i64) {
        self.out.push_str(&n.to_string());
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.out.push_str(if b { ".T." } else { ".F." });
    }

    pub fn write_logical(&mut self, l: Logical) {
        self.out.push_str(match l {
            Logical::True => ".T.",
            Logical::False => ".F.",
            Logical::Unknown => ".U.",
        });
    }

    pub fn write_real(&mut self, d: f64) {
        self.out.push_str(&format_real(d));
    }

    pub fn write_binary(&mut self, bits: &BitSequence) {
        self.out.push_str(&format_binary(bits));
    }

    /// Plain single quotes in header mode, the string encoder otherwise.
    pub fn write_str(&mut self, s: &str) {
        if self.options.encode_strings {
            let token = self.strings.encode(s);
            self.out.push_str(&token);
        } else {
            self.out.push('\'');
            self.out.push_str(s);
            self.out.push('\'');
        }
    }

    pub fn write_enumeration(&mut self, name: &str) {
        self.out.push('.');
        self.out.push_str(name);
        self.out.push('.');
    }

    pub fn write_empty_aggregate(&mut self) {
        self.out.push_str("()");
    }

    /// `#id` for entities. Inline instances are written as
    /// `TYPE(arg,...)` with the same options.
    pub fn write_reference(&mut self, r: InstanceRef<'_>) -> Result<(), ArgumentError> {
        let instance = r.get();
        if instance.is_entity() {
            self.out.push('#');
            self.out.push_str(&instance.id().to_string());
            return Ok(());
        }
        let addr = r.addr();
        if self.path.contains(&addr) {
            warn!(
                type_name = instance.type_name(),
                depth = self.path.len(),
                "cyclic inline instance reference"
            );
            return Err(ArgumentError::CyclicReference(
                instance.type_name().to_owned(),
            ));
        }
        if self.path.len() >= self.options.max_depth {
            warn!(
                type_name = instance.type_name(),
                max_depth = self.options.max_depth,
                "inline instance nesting too deep"
            );
            return Err(ArgumentError::DepthExceeded(self.options.max_depth));
        }
        self.path.push(addr);
        self.out.push_str(instance.type_name());
        let result = self.try_write_list(instance.arguments(), |enc, arg| enc.write_any(arg));
        self.path.pop();
        result
    }

    fn write_list<T>(&mut self, items: &[T], mut write_item: impl FnMut(&mut Self, &T)) {
        self.out.push('(');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            write_item(self, item);
        }
        self.out.push(')');
    }

    fn try_write_list<T>(
        &mut self,
        items: &[T],
        mut write_item: impl FnMut(&mut Self, &T) -> Result<(), ArgumentError>,
    ) -> Result<(), ArgumentError> {
        self.out.push('(');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            write_item(self, item)?;
        }
        self.out.push(')');
        Ok(())
    }
}

/// Writes `value`, using plain quotes for strings unless `encode_strings` is
/// set, in which case [`Part21StringEncoder`] is used.
///
/// ```
/// use step_write::{render, ArgumentValue};
///
/// let mut value = ArgumentValue::new();
/// value.set_int_list_list(vec![vec![1, 2], vec![3]]);
/// assert_eq!(render(&value, false).unwrap(), "((1,2),(3))");
/// ```
pub fn render(value: &ArgumentValue<'_>, encode_strings: bool) -> Result<String, ArgumentError> {
    StepEncoder::with_options(RenderOptions {
        encode_strings,
        ..RenderOptions::default()
    })
    .encode(value)
}

/// Formats a finite real as a REAL token.
///
/// The shortest round-tripping decimal form is taken, positional or
/// scientific, whichever is shorter. A `.` is added to the mantissa when it
/// has none and the exponent marker is written as `E`. Only ASCII digits,
/// `.`, `-` and `E` are produced.
pub fn format_real(d: f64) -> String {
    let positional = format!("{d}");
    let scientific = format!("{d:e}");
    let raw = if scientific.len() < positional.len() {
        scientific
    } else {
        positional
    };
    let (mantissa, exponent) = match raw.find(['e', 'E']) {
        Some(i) => (&raw[..i], Some(&raw[i + 1..])),
        None => (raw.as_str(), None),
    };
    let mut out = String::with_capacity(raw.len() + 2);
    out.push_str(mantissa);
    if !mantissa.contains('.') {
        out.push('.');
    }
    if let Some(exponent) = exponent {
        out.push('E');
        out.push_str(exponent);
    }
    out
}

/// Formats a bit string as a BINARY token.
///
/// The first hex digit is the number of zero bits (0-3) prepended so that the
/// length becomes a multiple of 4; the padded bits are then written four at a
/// time, most significant first, as upper-case hex.
pub fn format_binary(bits: &BitSequence) -> String {
    let pad = (4 - bits.len() % 4) % 4;
    let mut out = String::with_capacity(bits.len() / 4 + 4);
    out.push('"');
    out.push(HEX_DIGITS[pad] as char);
    let mut nibble = 0usize;
    let mut filled = 0;
    for bit in std::iter::repeat(false).take(pad).chain(bits.iter()) {
        nibble = (nibble << 1) | usize::from(bit);
        filled += 1;
        if filled == 4 {
            out.push(HEX_DIGITS[nibble] as char);
            nibble = 0;
            filled = 0;
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    use crate::instance::{Instance, SimpleValue};

    fn value(f: impl FnOnce(&mut ArgumentValue<'static>)) -> ArgumentValue<'static> {
        let mut v = ArgumentValue::new();
        f(&mut v);
        v
    }

    #[test]
    fn real_always_has_a_point() {
        assert_eq!(format_real(1.0), "1.");
        assert_eq!(format_real(0.0), "0.");
        assert_eq!(format_real(-0.0), "-0.");
        assert_eq!(format_real(-3.0), "-3.");
        assert_eq!(format_real(100.0), "100.");
        assert_eq!(format_real(0.5), "0.5");
        assert_eq!(format_real(-12.25), "-12.25");
    }

    #[test]
    fn real_exponent_is_upper_case() {
        assert_eq!(format_real(1.5e10), "1.5E10");
        assert_eq!(format_real(1e21), "1.E21");
        assert_eq!(format_real(1e-7), "1.E-7");
        assert_eq!(format_real(-2.5e-9), "-2.5E-9");
        assert_eq!(format_real(f64::MAX), "1.7976931348623157E308");
    }

    #[test]
    fn binary_pad_and_nibbles() {
        let b = |s: &str| format_binary(&s.parse().unwrap());
        assert_eq!(b(""), "\"0\"");
        assert_eq!(b("1"), "\"31\"");
        assert_eq!(b("101"), "\"15\"");
        assert_eq!(b("1010"), "\"0A\"");
        assert_eq!(b("11111"), "\"31F\"");
        assert_eq!(b("11001010"), "\"0CA\"");
        assert_eq!(b("1000000000001"), "\"31001\"");
    }

    #[test]
    fn scalars() {
        assert_eq!(render(&value(|_| {}), false).unwrap(), "$");
        assert_eq!(render(&value(|v| v.set_derived()), false).unwrap(), "*");
        assert_eq!(render(&value(|v| v.set_int(0)), false).unwrap(), "0");
        assert_eq!(render(&value(|v| v.set_int(-42)), false).unwrap(), "-42");
        assert_eq!(render(&value(|v| v.set_bool(true)), false).unwrap(), ".T.");
        assert_eq!(render(&value(|v| v.set_bool(false)), false).unwrap(), ".F.");
        assert_eq!(
            render(&value(|v| v.set_logical(Logical::Unknown)), false).unwrap(),
            ".U."
        );
        assert_eq!(
            render(&value(|v| v.set_enumeration("ELEMENT")), false).unwrap(),
            ".ELEMENT."
        );
    }

    #[test]
    fn strings_by_mode() {
        let v = value(|v| v.set_str("it's"));
        assert_eq!(render(&v, false).unwrap(), "'it's'");
        assert_eq!(render(&v, true).unwrap(), "'it''s'");
    }

    #[test]
    fn custom_string_encoder() {
        let upper = |s: &str| format!("'{}'", s.to_uppercase());
        let mut enc = StepEncoder::with_string_encoder(RenderOptions::encoded(), &upper);
        let v = value(|v| v.set_str_list(vec!["a".into(), "b".into()]));
        assert_eq!(enc.encode(&v).unwrap(), "('A','B')");
    }

    #[test]
    fn empty_markers_render_as_parens() {
        assert_eq!(render(&value(|v| v.set_empty_aggregate()), false).unwrap(), "()");
        assert_eq!(
            render(&value(|v| v.set_empty_aggregate_of_aggregate()), false).unwrap(),
            "()"
        );
        assert_eq!(render(&value(|v| v.set_int_list(vec![])), false).unwrap(), "()");
    }

    #[test]
    fn nested_lists() {
        assert_eq!(
            render(&value(|v| v.set_int_list(vec![1, 2, 3])), false).unwrap(),
            "(1,2,3)"
        );
        assert_eq!(
            render(&value(|v| v.set_int_list_list(vec![vec![1, 2], vec![3]])), false).unwrap(),
            "((1,2),(3))"
        );
        let reals = value(|v| v.set_real_list_list(vec![vec![0.0, 1.0], vec![]]).unwrap());
        assert_eq!(render(&reals, false).unwrap(), "((0.,1.),())");
    }

    struct Node<'a> {
        arguments: OnceLock<Vec<ArgumentValue<'a>>>,
    }

    impl Instance for Node<'_> {
        fn is_entity(&self) -> bool {
            false
        }
        fn id(&self) -> u64 {
            0
        }
        fn type_name(&self) -> &str {
            "NODE"
        }
        fn arguments(&self) -> &[ArgumentValue<'_>] {
            self.arguments.get().map(Vec::as_slice).unwrap_or(&[])
        }
    }

    #[test]
    fn depth_limit_applies_to_inline_chains() {
        let leaf = SimpleValue::new("IFCLABEL", vec![value(|v| v.set_str("x"))]);
        let mut mid_arg = ArgumentValue::new();
        mid_arg.set_reference(Some(InstanceRef::from(&leaf)));
        let mid = SimpleValue::new("WRAP", vec![mid_arg]);
        let mut top = ArgumentValue::new();
        top.set_reference(Some(InstanceRef::from(&mid)));

        let mut enc = StepEncoder::with_options(RenderOptions {
            max_depth: 2,
            ..RenderOptions::default()
        });
        assert_eq!(enc.encode(&top).unwrap(), "WRAP(IFCLABEL('x'))");

        let mut enc = StepEncoder::with_options(RenderOptions {
            max_depth: 1,
            ..RenderOptions::default()
        });
        assert_eq!(enc.encode(&top), Err(ArgumentError::DepthExceeded(1)));
    }

    #[test]
    fn cycles_fail_fast() {
        let a = Node {
            arguments: OnceLock::new(),
        };
        let b = Node {
            arguments: OnceLock::new(),
        };
        let mut to_a = ArgumentValue::new();
        to_a.set_reference(Some(InstanceRef::from(&a)));
        let mut to_b = ArgumentValue::new();
        to_b.set_reference(Some(InstanceRef::from(&b)));
        let _ = a.arguments.set(vec![to_b.clone()]);
        let _ = b.arguments.set(vec![to_a.clone()]);
        assert_eq!(
            render(&to_a, false),
            Err(ArgumentError::CyclicReference("NODE".into()))
        );
    }

    #[test]
    fn shared_inline_instance_is_not_a_cycle() {
        let label = SimpleValue::new("IFCLABEL", vec![value(|v| v.set_str("x"))]);
        let r = InstanceRef::from(&label);
        let mut v = ArgumentValue::new();
        v.set_reference_list_list(Some(vec![vec![r, r], vec![r]]));
        assert_eq!(
            render(&v, false).unwrap(),
            "((IFCLABEL('x'),IFCLABEL('x')),(IFCLABEL('x')))"
        );
    }
}
