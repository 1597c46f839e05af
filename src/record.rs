//! The records handled by the index.
//!
//! An [`Entry`] is one fully parsed line of the source file, whereas a
//! [`Position`] is the compact form of that line that is stored in the index.

pub mod entry;
pub mod position;

pub use entry::Entry;
pub use position::Position;
