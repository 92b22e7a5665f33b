//=======================================================================//
// IMPORTS
//
//=======================================================================//

use std::path::PathBuf;

use thiserror::Error;

//=======================================================================//
// TYPES
//
//=======================================================================//

/// Recoverable errors surfaced across the crate. Invariant violations (a caller passing a stale
/// `EntityId`, a corrupted edit stack) remain `panic!`/`assert!`, keeping a clean split between
/// "bad input" (`Result`) and "the program is broken" (panic). Asset load failures have their own
/// [`crate::assets::library::AssetLoadError`], logged where they occur rather than routed through
/// here: per the crate's error-handling design, a failed load collapses to `None`/an empty
/// broadcast and never reaches a caller as a `WorldEditError`.
#[derive(Debug, Error)]
pub enum WorldEditError
{
    #[error("filesystem watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("io error at {path}: {source}")]
    Io
    {
        path: PathBuf,
        #[source]
        source: std::io::Error
    }
}

/// Convenience alias used throughout the crate's fallible APIs.
pub type Result<T> = std::result::Result<T, WorldEditError>;
