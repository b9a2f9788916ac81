// used for timestamps in records
use chrono::{NaiveDate, NaiveDateTime, Utc};
// used for decimal numbers
use bigdecimal::BigDecimal;

// used when parsing strings into values
use std::str::FromStr;
// used to print out readable forms of a data type
use std::fmt;
// multi-values are kept in hash sets
use std::collections::HashSet;
use std::hash::BuildHasherDefault;
use seahash::SeaHasher;
// used to overload common operations for datatypes
use std::ops;

use serde_json::Value as JsonValue;

use crate::error::RegisterError;

pub type ValueHasher = BuildHasherDefault<SeaHasher>;

// ------------- Scalar -------------
/// An atomic value that can be stored under a key in a record.
/// Every variant is comparable, orderable and hashable, so scalars
/// can live in multi-value sets and be matched by predicates.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Debug)]
pub enum Scalar {
    String(String),
    Int(i64),
    Bool(bool),
    Decimal(Decimal),
    Time(Time),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Decimal(d) => write!(f, "{}", d),
            Scalar::Time(t) => write!(f, "{}", t),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Scalar {
        Scalar::String(String::from(s))
    }
}
impl From<String> for Scalar {
    fn from(s: String) -> Scalar {
        Scalar::String(s)
    }
}
impl From<i64> for Scalar {
    fn from(i: i64) -> Scalar {
        Scalar::Int(i)
    }
}
impl From<i32> for Scalar {
    fn from(i: i32) -> Scalar {
        Scalar::Int(i as i64)
    }
}
impl From<bool> for Scalar {
    fn from(b: bool) -> Scalar {
        Scalar::Bool(b)
    }
}
impl From<Decimal> for Scalar {
    fn from(d: Decimal) -> Scalar {
        Scalar::Decimal(d)
    }
}
impl From<Time> for Scalar {
    fn from(t: Time) -> Scalar {
        Scalar::Time(t)
    }
}

// JSON numbers that fit an i64 become Int, everything else Decimal,
// so 1 and 1.5 both come through without loss.
impl TryFrom<&JsonValue> for Scalar {
    type Error = RegisterError;
    fn try_from(value: &JsonValue) -> Result<Scalar, RegisterError> {
        match value {
            JsonValue::String(s) => Ok(Scalar::String(s.clone())),
            JsonValue::Bool(b) => Ok(Scalar::Bool(*b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Ok(Scalar::Int(i)),
                None => Decimal::from_str(&n.to_string())
                    .map(Scalar::Decimal)
                    .ok_or_else(|| {
                        RegisterError::InvalidElement(format!("Unrepresentable number: {}", n))
                    }),
            },
            other => Err(RegisterError::InvalidElement(format!(
                "Not a scalar value: {}",
                other
            ))),
        }
    }
}

// ------------- Value -------------
/// What is actually stored under a key: either a single scalar or a
/// multi-value set. A `Many` holds at least two distinct scalars at all
/// times. The transitions in [`Value::join`] and [`Value::without`]
/// maintain this, collapsing a set back to a bare scalar when only one
/// member remains and never materializing an empty set.
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum Value {
    One(Scalar),
    Many(HashSet<Scalar, ValueHasher>),
}

impl Value {
    /// Builds a value from loose scalars, de-duplicating along the way.
    /// No scalars yield no value, a single distinct scalar stays bare.
    pub fn from_scalars<I: IntoIterator<Item = Scalar>>(scalars: I) -> Option<Value> {
        let mut set = HashSet::<Scalar, ValueHasher>::default();
        for scalar in scalars {
            set.insert(scalar);
        }
        match set.len() {
            0 => None,
            1 => set.into_iter().next().map(Value::One),
            _ => Some(Value::Many(set)),
        }
    }
    /// Adds a scalar to this value. Joining an equal scalar onto a bare
    /// scalar is a no-op, so a 1-element set never comes into existence.
    pub fn join(self, scalar: Scalar) -> Value {
        match self {
            Value::One(kept) if kept == scalar => Value::One(kept),
            Value::One(kept) => {
                let mut set = HashSet::<Scalar, ValueHasher>::default();
                set.insert(kept);
                set.insert(scalar);
                Value::Many(set)
            }
            Value::Many(mut set) => {
                set.insert(scalar);
                Value::Many(set)
            }
        }
    }
    /// Removes a scalar from this value. `None` means the key holding it
    /// should be deleted. A set left with a single member collapses back
    /// to a bare scalar, a scalar that does not match stays untouched.
    pub fn without(self, scalar: &Scalar) -> Option<Value> {
        match self {
            Value::One(kept) if kept == *scalar => None,
            Value::One(kept) => Some(Value::One(kept)),
            Value::Many(mut set) => {
                set.remove(scalar);
                if set.len() == 1 {
                    set.into_iter().next().map(Value::One)
                } else {
                    Some(Value::Many(set))
                }
            }
        }
    }
    /// Membership in the sense of the `in` operator: set membership for a
    /// multi-value, whole-value equality for a bare scalar. A string
    /// scalar is a single value, never a collection of characters.
    pub fn contains(&self, scalar: &Scalar) -> bool {
        match self {
            Value::One(kept) => kept == scalar,
            Value::Many(set) => set.contains(scalar),
        }
    }
    pub fn is_many(&self) -> bool {
        matches!(self, Value::Many(_))
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Value {
        Value::One(scalar)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::One(Scalar::from(s))
    }
}
impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::One(Scalar::from(s))
    }
}
impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::One(Scalar::from(i))
    }
}
impl From<i32> for Value {
    fn from(i: i32) -> Value {
        Value::One(Scalar::from(i))
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::One(Scalar::from(b))
    }
}
impl From<Time> for Value {
    fn from(t: Time) -> Value {
        Value::One(Scalar::from(t))
    }
}
impl From<Decimal> for Value {
    fn from(d: Decimal) -> Value {
        Value::One(Scalar::from(d))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::One(scalar) => write!(f, "{}", scalar),
            Value::Many(set) => {
                // sorted so the rendering is deterministic
                let mut members: Vec<&Scalar> = set.iter().collect();
                members.sort();
                let mut s = String::new();
                for member in members {
                    s += &(member.to_string() + ", ");
                }
                s.pop();
                s.pop();
                write!(f, "{{{}}}", s)
            }
        }
    }
}

// ------------- Decimal -------------
#[derive(Eq, PartialEq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct Decimal(BigDecimal);

impl Decimal {
    pub fn from_str(s: &str) -> Option<Decimal> {
        match BigDecimal::from_str(s) {
            Ok(decimal) => Some(Decimal(decimal)),
            _ => None,
        }
    }
}
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl ops::Deref for Decimal {
    type Target = BigDecimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ops::DerefMut for Decimal {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// ------------- Time -------------
#[derive(Eq, PartialEq, PartialOrd, Ord, Debug, Hash, Clone)]
pub enum TimeType {
    Year(u16),
    YearMonth(u16, u8),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}
#[derive(Eq, PartialEq, PartialOrd, Ord, Debug, Hash, Clone)]
pub struct Time {
    moment: TimeType,
}
impl Time {
    pub fn new() -> Time {
        Time {
            moment: TimeType::DateTime(Utc::now().naive_utc()),
        }
    }
    pub fn new_year_from(d: &str) -> Option<Time> {
        let year = d.parse::<u16>().ok()?;
        Some(Time {
            moment: TimeType::Year(year),
        })
    }
    pub fn new_year_month_from(d: &str) -> Option<Time> {
        let (year, month) = d.split_once('-')?;
        Some(Time {
            moment: TimeType::YearMonth(year.parse::<u16>().ok()?, month.parse::<u8>().ok()?),
        })
    }
    pub fn new_date_from(d: &str) -> Option<Time> {
        let date = NaiveDate::from_str(d).ok()?;
        Some(Time {
            moment: TimeType::Date(date),
        })
    }
    pub fn new_datetime_from(d: &str) -> Option<Time> {
        let datetime = NaiveDateTime::from_str(d).ok()?;
        Some(Time {
            moment: TimeType::DateTime(datetime),
        })
    }
}
impl Default for Time {
    fn default() -> Self {
        Time::new()
    }
}
impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.moment {
            TimeType::Year(y) => {
                write!(f, "{}", y)
            }
            TimeType::YearMonth(y, m) => {
                write!(f, "{}-{}", y, m)
            }
            TimeType::Date(d) => {
                write!(f, "{}", d)
            }
            TimeType::DateTime(d) => {
                write!(f, "{}", d)
            }
        }
    }
}
