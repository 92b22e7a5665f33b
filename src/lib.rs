//! The edit-transaction engine and asset library core of a world editor: a `World` data model,
//! a closed set of undoable `Edit`s kept on an `EditStack`, a reference-counted asynchronous asset
//! library, and the object-class slot table built on top of it. No rendering, UI, or file-format
//! parsing lives here; see `DESIGN.md` for the sources each module is grounded on.

mod macros;

pub mod assets;
pub mod edit;
pub mod error;
pub mod identifiers;
pub mod object_class;
pub mod world;

pub use error::{Result, WorldEditError};
