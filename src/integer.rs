//! Classifying values that can safely be interpreted as integers.
//!
//! [`isinteger`] answers "is this a whole number?" for anything implementing
//! [`IsInteger`]: native integers and floats, strings, `ndarray` arrays,
//! dynamic `serde_json` values, and the structural types that are always
//! rejected. It never fails; a value with no numeric reading is simply not an
//! integer.

use ndarray::{ArrayBase, Data, Dimension};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// A value that may or may not represent a whole number.
pub trait IsInteger {
    /// Whether the value's mathematical value is an integer.
    fn is_integer(&self) -> bool;
}

/// Whether `value` can be interpreted as an integer.
///
/// ```
/// use simcore::integer::isinteger;
///
/// assert!(isinteger(&1.0));
/// assert!(isinteger("100_000"));
/// assert!(!isinteger("1.1"));
/// assert!(!isinteger(&None::<i64>));
/// ```
pub fn isinteger<T: IsInteger + ?Sized>(value: &T) -> bool {
    value.is_integer()
}

/// Whether `text` is an integer literal.
///
/// Accepted, after trimming surrounding ASCII whitespace and an optional sign:
/// decimal digits, or hex digits after a `0x`/`0X` prefix. Digits may be
/// grouped with single underscores between them (`100_000`, `0x_ff_ff`).
/// Nothing else is accepted.
pub fn is_integer_literal(text: &str) -> bool {
    let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
    let unsigned = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);

    let accepted = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => {
            let hex = hex.strip_prefix('_').unwrap_or(hex);
            digit_groups(hex, |b| b.is_ascii_hexdigit())
        }
        None => digit_groups(unsigned, |b| b.is_ascii_digit()),
    };

    if !accepted {
        trace!(value = %text, "Rejected non-integer literal");
    }
    accepted
}

/// Non-empty runs of digits joined by single underscores.
fn digit_groups(body: &str, is_digit: impl Fn(u8) -> bool) -> bool {
    !body.is_empty()
        && body
            .split('_')
            .all(|group| !group.is_empty() && group.bytes().all(&is_digit))
}

macro_rules! impl_whole {
    ($($t:ty),* $(,)?) => {
        $(
            impl IsInteger for $t {
                fn is_integer(&self) -> bool {
                    true
                }
            }
        )*
    };
}

impl_whole!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool);

impl IsInteger for f64 {
    fn is_integer(&self) -> bool {
        self.is_finite() && self.fract() == 0.0
    }
}

impl IsInteger for f32 {
    fn is_integer(&self) -> bool {
        self.is_finite() && self.fract() == 0.0
    }
}

impl IsInteger for str {
    fn is_integer(&self) -> bool {
        is_integer_literal(self)
    }
}

impl IsInteger for String {
    fn is_integer(&self) -> bool {
        is_integer_literal(self)
    }
}

impl<T: IsInteger + ?Sized> IsInteger for &T {
    fn is_integer(&self) -> bool {
        (**self).is_integer()
    }
}

impl<T: IsInteger> IsInteger for Option<T> {
    fn is_integer(&self) -> bool {
        self.as_ref().is_some_and(IsInteger::is_integer)
    }
}

/// Arrays are integers only when they hold exactly one integral element,
/// whatever their dimensionality.
impl<S, D> IsInteger for ArrayBase<S, D>
where
    S: Data,
    S::Elem: IsInteger,
    D: Dimension,
{
    fn is_integer(&self) -> bool {
        self.len() == 1 && self.iter().all(IsInteger::is_integer)
    }
}

impl IsInteger for Value {
    fn is_integer(&self) -> bool {
        match self {
            Value::Null | Value::Array(_) | Value::Object(_) => false,
            Value::Bool(_) => true,
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_integer())
            }
            Value::String(s) => is_integer_literal(s),
        }
    }
}

// Structural values have no numeric reading.

impl IsInteger for () {
    fn is_integer(&self) -> bool {
        false
    }
}

impl<T> IsInteger for [T] {
    fn is_integer(&self) -> bool {
        false
    }
}

impl<T> IsInteger for Vec<T> {
    fn is_integer(&self) -> bool {
        false
    }
}

impl<K, V, S> IsInteger for HashMap<K, V, S> {
    fn is_integer(&self) -> bool {
        false
    }
}

impl<K, V> IsInteger for BTreeMap<K, V> {
    fn is_integer(&self) -> bool {
        false
    }
}
