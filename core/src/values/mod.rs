//! Engine values and atoms.
//!
//! [`Value`] is an owned, tagged handle: inline scalars are stored directly,
//! heap cells hold one reference that is released on drop. [`Atom`] is the
//! equivalent handle for interned strings.

pub mod atom;
pub mod convert;
pub mod tag;
pub mod value;

pub use atom::Atom;
pub use tag::{Tag, nan};
pub use value::Value;
