use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::construct::Mapping;
use crate::datatype::{Scalar, Value};

lazy_static! {
    // non-greedy, so the token splits at the first separator and a key
    // containing the separator never comes out of a parse
    static ref KEYOP: Regex = Regex::new(r"^(.+?)__(.*)$").unwrap();
}

// ------------- Operator -------------
/// The closed set of comparison operators. A token naming anything else
/// parses to `Unrecognized`, which matches no record at all rather than
/// raising.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Eq,
    Ne,
    In,
    Nin,
    IsKey,
    Unrecognized,
}

impl Operator {
    pub fn parse(op: &str) -> Operator {
        match op {
            "eq" => Operator::Eq,
            "ne" => Operator::Ne,
            "in" => Operator::In,
            "nin" => Operator::Nin,
            "iskey" => Operator::IsKey,
            _ => {
                warn!("Unrecognized operator: {}", op);
                Operator::Unrecognized
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operator::Eq => write!(f, "eq"),
            Operator::Ne => write!(f, "ne"),
            Operator::In => write!(f, "in"),
            Operator::Nin => write!(f, "nin"),
            Operator::IsKey => write!(f, "iskey"),
            Operator::Unrecognized => write!(f, "?"),
        }
    }
}

// ------------- Predicate -------------
/// One (key, operator, value) condition against a record. Predicates are
/// built either explicitly with [`Predicate::new`] or from a combined
/// `key__op` token with [`Predicate::parse`], where a bare key token
/// means equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    key: String,
    operator: Operator,
    value: Scalar,
}

impl Predicate {
    pub fn new(key: &str, operator: Operator, value: impl Into<Scalar>) -> Self {
        Self {
            key: key.to_owned(),
            operator,
            value: value.into(),
        }
    }
    pub fn parse(keyop: &str, value: impl Into<Scalar>) -> Self {
        match KEYOP.captures(keyop) {
            Some(captures) => Predicate::new(
                captures.get(1).map(|m| m.as_str()).unwrap_or_default(),
                Operator::parse(captures.get(2).map(|m| m.as_str()).unwrap_or_default()),
                value,
            ),
            None => Predicate::new(keyop, Operator::Eq, value),
        }
    }
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn operator(&self) -> Operator {
        self.operator
    }
    pub fn value(&self) -> &Scalar {
        &self.value
    }

    /// Whether the record satisfies this predicate.
    ///
    /// `eq` compares bare scalars, so it is false against a multi-value.
    /// `ne` is its exact negation and `nin` the exact negation of `in`,
    /// which makes both of them true for records without the key.
    /// `iskey` compares key presence against a boolean value; any other
    /// value type makes it false.
    pub fn matches<R: Mapping>(&self, record: &R) -> bool {
        match self.operator {
            Operator::Eq => {
                matches!(record.value(&self.key), Some(Value::One(kept)) if *kept == self.value)
            }
            Operator::Ne => {
                !matches!(record.value(&self.key), Some(Value::One(kept)) if *kept == self.value)
            }
            Operator::In => record
                .value(&self.key)
                .is_some_and(|kept| kept.contains(&self.value)),
            Operator::Nin => !record
                .value(&self.key)
                .is_some_and(|kept| kept.contains(&self.value)),
            Operator::IsKey => match self.value {
                Scalar::Bool(expected) => record.has(&self.key) == expected,
                _ => false,
            },
            Operator::Unrecognized => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}__{} = {}", self.key, self.operator, self.value)
    }
}
