//! `tim`: wiring for the terminal editor binary.
//!
//! The binary resolves a document source from the command line, loads it,
//! then hands a seeded `EditorModel` to the single-threaded [`runtime`] loop.
//! Everything here is an outer collaborator of the editing core: argument
//! parsing, document loading, the system clipboard, and logging.

pub mod cli;
pub mod clipboard;
pub mod loader;
pub mod logging;
pub mod runtime;

pub use cli::{Args, DocumentSource};
pub use loader::{Document, LoadError, load};
pub use runtime::{Runtime, Shutdown};
