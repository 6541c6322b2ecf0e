//! Permissive parsing of operator-entered counts.
//!
//! Form fields may be blank, half-typed or junk while the operator is still
//! typing. Everything that does not start with an integer counts as 0, so a
//! partially filled form always has a running total.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A count read from a form field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormCount(i32);

impl FormCount {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Parse raw field text. Absent or unparseable input is 0.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(leading_integer).map(Self).unwrap_or_default()
    }

    /// Read a JSON form value: numbers, numeric strings, null or missing.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self(clamp_i64(i))
                } else if let Some(f) = n.as_f64() {
                    // NaN and infinities cast to 0 and the i32 bounds
                    Self(f.trunc() as i32)
                } else {
                    Self::default()
                }
            }
            Value::String(s) => Self::parse(Some(s)),
            _ => Self::default(),
        }
    }
}

impl From<FormCount> for i32 {
    fn from(count: FormCount) -> Self {
        count.0
    }
}

impl<'de> Deserialize<'de> for FormCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map(|v| Self::from_json(&v)).unwrap_or_default())
    }
}

impl Serialize for FormCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

/// Integer prefix of `s`, ignoring leading whitespace: `"12abc"` is 12,
/// `"3.9"` is 3, `"-4"` is -4.
fn leading_integer(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    let value = if negative { -magnitude } else { magnitude };
    Some(clamp_i64(value))
}

fn clamp_i64(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
