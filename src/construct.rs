use std::sync::{Arc, Mutex};

// records keep their keys in hashmaps
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use seahash::SeaHasher;

// used to print out readable forms of a construct
use std::fmt;
use std::ops;

use serde_json::Value as JsonValue;
use tracing::debug;

// our own stuff that we need
use crate::datatype::{Scalar, Value};
use crate::error::{RegisterError, Result};
use crate::query::Predicate;

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

/// Records are handed out as shared handles, so a filtered register and
/// the register it came from refer to the very same record objects.
pub type Shared<R> = Arc<Mutex<R>>;

// ------------- Mapping -------------
/// The capability a register requires of its elements: key lookup,
/// containment testing and key removal. Any concrete record type
/// implementing this can be kept and queried.
pub trait Mapping {
    fn value(&self, key: &str) -> Option<&Value>;
    fn put(&mut self, key: String, value: Value);
    fn unset(&mut self, key: &str) -> Option<Value>;
    fn has(&self, key: &str) -> bool {
        self.value(key).is_some()
    }
}

// ------------- Record -------------
/// The provided record type, a flat map from string keys to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    kept: HashMap<String, Value, KeyHasher>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            kept: HashMap::default(),
        }
    }
    // It's intentional that records are built through this consuming
    // "builder", so a record reads as one expression in calling code.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.kept.insert(key.to_owned(), value.into());
        self
    }
    pub fn from_json(text: &str) -> Result<Record> {
        let parsed: JsonValue = serde_json::from_str(text)?;
        Record::try_from(&parsed)
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.kept.keys()
    }
}

impl Mapping for Record {
    fn value(&self, key: &str) -> Option<&Value> {
        self.kept.get(key)
    }
    fn put(&mut self, key: String, value: Value) {
        self.kept.insert(key, value);
    }
    fn unset(&mut self, key: &str) -> Option<Value> {
        self.kept.remove(key)
    }
}

// A JSON object maps onto a record directly: scalar fields become bare
// scalars and arrays become multi-values through the same de-duplicating
// constructor the mutation operations use. An empty array carries no
// value, so its key stays absent. Anything that is not an object is the
// "not a mapping" case.
impl TryFrom<&JsonValue> for Record {
    type Error = RegisterError;
    fn try_from(element: &JsonValue) -> Result<Record> {
        let JsonValue::Object(fields) = element else {
            return Err(RegisterError::InvalidElement(format!(
                "Given element {} is not a mapping-like object",
                element
            )));
        };
        let mut record = Record::new();
        for (key, field) in fields {
            match field {
                JsonValue::Array(members) => {
                    let mut scalars = Vec::with_capacity(members.len());
                    for member in members {
                        scalars.push(Scalar::try_from(member)?);
                    }
                    if let Some(value) = Value::from_scalars(scalars) {
                        record.put(key.clone(), value);
                    }
                }
                scalar => {
                    record.put(key.clone(), Value::One(Scalar::try_from(scalar)?));
                }
            }
        }
        Ok(record)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // sorted so the rendering is deterministic
        let mut keys: Vec<&String> = self.kept.keys().collect();
        keys.sort();
        let mut s = String::new();
        for key in keys {
            s += &format!("{}: {}, ", key, self.kept[key]);
        }
        s.pop();
        s.pop();
        write!(f, "{{{}}}", s)
    }
}

// ------------- Register -------------
/// An ordered register of records. Insertion order is kept, duplicates
/// are permitted, and every query operation is a linear scan.
///
/// The register assumes single-threaded use. Records sit behind shared
/// handles so that filtered registers alias the originals, which makes
/// concurrent mutation of the same records from several threads a caller
/// responsibility.
#[derive(Debug)]
pub struct Register<R: Mapping = Record> {
    kept: Vec<Shared<R>>,
}

impl<R: Mapping> Register<R> {
    pub fn new() -> Self {
        Self { kept: Vec::new() }
    }
    pub fn from_records<I: IntoIterator<Item = R>>(records: I) -> Self {
        Self {
            kept: records
                .into_iter()
                .map(|record| Arc::new(Mutex::new(record)))
                .collect(),
        }
    }
    pub fn push(&mut self, record: R) {
        self.kept.push(Arc::new(Mutex::new(record)));
    }
    pub fn push_shared(&mut self, record: Shared<R>) {
        self.kept.push(record);
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
    pub fn get(&self, position: usize) -> Option<Shared<R>> {
        self.kept.get(position).cloned()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Shared<R>> {
        self.kept.iter()
    }

    // ---- bulk key mutation ----
    // These mutate records in place behind their handles, so they take
    // &self like every other read of the sequence.

    /// Adds the value under the key on every record. A record that
    /// already holds something under the key gets a multi-value set.
    pub fn kadd(&self, key: &str, scalar: Scalar) {
        debug!("Adding {} under '{}' on {} records", scalar, key, self.kept.len());
        for record in &self.kept {
            let mut record = record.lock().unwrap();
            match record.unset(key) {
                Some(value) => record.put(key.to_owned(), value.join(scalar.clone())),
                None => record.put(key.to_owned(), Value::One(scalar.clone())),
            }
        }
    }
    /// Overwrites the value under the key on every record that has the
    /// key, multi-value or not. Records without the key are passed over.
    pub fn kreplace(&self, key: &str, scalar: Scalar) {
        debug!("Replacing '{}' with {} on {} records", key, scalar, self.kept.len());
        for record in &self.kept {
            let mut record = record.lock().unwrap();
            if record.has(key) {
                record.put(key.to_owned(), Value::One(scalar.clone()));
            }
        }
    }
    /// Removes the key from every record. Records without the key are
    /// passed over.
    pub fn kremove(&self, key: &str) {
        debug!("Removing '{}' from {} records", key, self.kept.len());
        for record in &self.kept {
            record.lock().unwrap().unset(key);
        }
    }
    /// Removes one scalar from under the key on every record. A matching
    /// bare scalar takes its key with it, a multi-value left with a
    /// single member collapses back to a bare scalar, and records where
    /// neither key nor scalar match are passed over.
    pub fn kremove_value(&self, key: &str, scalar: &Scalar) {
        debug!("Removing {} under '{}' from {} records", scalar, key, self.kept.len());
        for record in &self.kept {
            let mut record = record.lock().unwrap();
            if let Some(value) = record.unset(key) {
                if let Some(kept) = value.without(scalar) {
                    record.put(key.to_owned(), kept);
                }
            }
        }
    }

    // ---- queries ----

    /// Keeps the records matching every given predicate, in their
    /// original order, as a new register sharing the same record
    /// handles. No predicates keeps everything.
    pub fn dfilter(&self, predicates: &[Predicate]) -> Register<R> {
        debug!("Filtering {} records with {} predicates", self.kept.len(), predicates.len());
        let mut kept = self.kept.clone();
        for predicate in predicates {
            kept.retain(|record| predicate.matches(&*record.lock().unwrap()));
        }
        Register { kept }
    }
    /// The first record matching every given predicate.
    pub fn dget(&self, predicates: &[Predicate]) -> Result<Shared<R>> {
        self.dfilter(predicates)
            .kept
            .first()
            .cloned()
            .ok_or_else(|| RegisterError::NotFound(describe(predicates)))
    }
    /// The first record matching every given predicate, taken out of the
    /// register. Only that one occurrence is removed.
    pub fn dpop(&mut self, predicates: &[Predicate]) -> Result<Shared<R>> {
        let found = self.dget(predicates)?;
        if let Some(position) = self
            .kept
            .iter()
            .position(|record| Arc::ptr_eq(record, &found))
        {
            self.kept.remove(position);
        }
        Ok(found)
    }
    /// Takes every matching record out of the register and returns them.
    /// One occurrence is removed per matched handle, so equal duplicates
    /// beyond the matches stay in place.
    pub fn dremove(&mut self, predicates: &[Predicate]) -> Register<R> {
        let filtered = self.dfilter(predicates);
        for record in &filtered.kept {
            if let Some(position) = self
                .kept
                .iter()
                .position(|kept| Arc::ptr_eq(kept, record))
            {
                self.kept.remove(position);
            }
        }
        filtered
    }
    /// Like [`Register::dremove`], applied to a copy of the sequence.
    /// The returned register has the matches removed while this one is
    /// left untouched.
    pub fn dremove_copy(&self, predicates: &[Predicate]) -> Register<R> {
        let mut copy = self.clone();
        copy.dremove(predicates);
        copy
    }
}

impl Register<Record> {
    /// Builds a register from a JSON array of objects. Every element is
    /// validated before any register comes into existence, so a single
    /// offending element fails the whole construction.
    pub fn from_json(text: &str) -> Result<Self> {
        let parsed: JsonValue = serde_json::from_str(text)?;
        Register::try_from(&parsed)
    }
}

impl TryFrom<&JsonValue> for Register<Record> {
    type Error = RegisterError;
    fn try_from(elements: &JsonValue) -> Result<Self> {
        let JsonValue::Array(elements) = elements else {
            return Err(RegisterError::InvalidElement(format!(
                "Given value {} is not a sequence of mapping-like objects",
                elements
            )));
        };
        let mut records = Vec::with_capacity(elements.len());
        for element in elements {
            records.push(Record::try_from(element)?);
        }
        Ok(Register::from_records(records))
    }
}

impl<R: Mapping> Default for Register<R> {
    fn default() -> Self {
        Register::new()
    }
}

// Cloning shares the record handles rather than the records themselves.
impl<R: Mapping> Clone for Register<R> {
    fn clone(&self) -> Self {
        Self {
            kept: self.kept.clone(),
        }
    }
}

impl<R: Mapping + PartialEq> PartialEq for Register<R> {
    fn eq(&self, other: &Self) -> bool {
        self.kept.len() == other.kept.len()
            && self
                .kept
                .iter()
                .zip(other.kept.iter())
                .all(|(mine, theirs)| {
                    // Same handle means same content; also avoids locking
                    // one mutex twice when registers share records.
                    Arc::ptr_eq(mine, theirs)
                        || *mine.lock().unwrap() == *theirs.lock().unwrap()
                })
    }
}

impl<R: Mapping> ops::Index<usize> for Register<R> {
    type Output = Shared<R>;
    fn index(&self, position: usize) -> &Self::Output {
        &self.kept[position]
    }
}

impl<R: Mapping> FromIterator<R> for Register<R> {
    fn from_iter<I: IntoIterator<Item = R>>(records: I) -> Self {
        Register::from_records(records)
    }
}

impl<'a, R: Mapping> IntoIterator for &'a Register<R> {
    type Item = &'a Shared<R>;
    type IntoIter = std::slice::Iter<'a, Shared<R>>;
    fn into_iter(self) -> Self::IntoIter {
        self.kept.iter()
    }
}

impl<R: Mapping + fmt::Display> fmt::Display for Register<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        for record in &self.kept {
            s += &(record.lock().unwrap().to_string() + ", ");
        }
        s.pop();
        s.pop();
        write!(f, "[{}]", s)
    }
}

fn describe(predicates: &[Predicate]) -> String {
    let mut s = String::new();
    for predicate in predicates {
        s += &(predicate.to_string() + ", ");
    }
    s.pop();
    s.pop();
    format!("no record matching [{}]", s)
}
