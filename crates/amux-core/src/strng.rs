//! Cheap clonable strings.
//!
//! Identifiers, model names, and local paths flow through many maps and log
//! records; `Strng` makes cloning them a refcount bump instead of an
//! allocation.

pub use arcstr::{ArcStr, format, literal};

pub type Strng = ArcStr;

pub fn new<A: AsRef<str>>(s: A) -> Strng {
	ArcStr::from(s.as_ref())
}

pub const EMPTY: Strng = literal!("");
