//! Dictregister – a searchable, in-memory register of record-like objects.
//!
//! The register behaves like an ordered list whose elements are constrained
//! to be mapping-like, with two families of operations layered on top:
//! * Bulk key mutation – [`construct::Register::kadd`],
//!   [`construct::Register::kreplace`], [`construct::Register::kremove`] and
//!   [`construct::Register::kremove_value`] apply one key/value change to
//!   every record at once.
//! * Predicate queries – [`construct::Register::dfilter`],
//!   [`construct::Register::dget`], [`construct::Register::dpop`],
//!   [`construct::Register::dremove`] and
//!   [`construct::Register::dremove_copy`] select records with a small
//!   query language of `(key, operator, value)` conditions.
//!
//! ## Modules
//! * [`construct`] – The [`construct::Mapping`] capability trait, the
//!   provided [`construct::Record`] type and the [`construct::Register`]
//!   container with its operations.
//! * [`datatype`] – The [`datatype::Scalar`] value types (string, integer,
//!   boolean, decimal, temporal) and the [`datatype::Value`] union that
//!   keeps a key's storage either a bare scalar or a set of two or more.
//! * [`query`] – The predicate engine: the closed
//!   [`query::Operator`] set (`eq`, `ne`, `in`, `nin`, `iskey`) and the
//!   `key__op` token grammar.
//! * [`error`] – The error taxonomy. Only boundary validation and
//!   first-match lookups can fail; every bulk mutation is total, so it is
//!   safe to call unconditionally across heterogeneous records.
//!
//! ## Multi-values
//! Adding a second value under a key turns its storage into a set, and
//! removing the next-to-last member turns it back into a bare scalar. A
//! stored set therefore always holds at least two distinct scalars, which
//! is what the `in` and `nin` operators consider "iterable" – a string
//! scalar is never treated as a collection of characters.
//!
//! ## Quick Start
//! ```
//! use dictregister::construct::{Mapping, Register};
//! use dictregister::query::Predicate;
//! let mut register = Register::from_json(
//!     r#"[{"x": 1, "y": 2}, {"x": 3, "y": 4}]"#,
//! ).unwrap();
//! register.kadd("x", 3.into());
//! let matching = register.dfilter(&[Predicate::parse("x__in", 3)]);
//! assert_eq!(matching.len(), 2);
//! let popped = register.dpop(&[Predicate::parse("y", 4)]).unwrap();
//! assert!(popped.lock().unwrap().has("x"));
//! assert_eq!(register.len(), 1);
//! ```
//!
//! ## Concurrency
//! The register is designed for single-threaded use. Records sit behind
//! shared handles so that query results alias the live register; mutating
//! the same records or register from several threads at once is a caller
//! responsibility, not something the register coordinates.

pub mod construct;
pub mod datatype;
pub mod error;
pub mod query;
