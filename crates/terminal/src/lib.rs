//! Terminal easter egg
//!
//! A toy shell for the landing page: a handful of commands over an in-memory
//! filesystem, with a bounded history the browser keeps between visits.
//! Sessions are plain data (working directory and history), so a server can
//! run each command statelessly.

mod history;
mod shell;
mod vfs;

pub use history::{DEFAULT_LIMIT, History};
pub use shell::{Output, Shell, ShellConfig};
pub use vfs::{Entry, HOME, Node, Vfs, VfsError, display_path, resolve_path};
