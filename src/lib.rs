pub mod audit;
pub mod commands;
mod connection;
pub mod console;
pub mod errors;
pub mod loader;
pub mod locations;
pub mod log;
pub mod paths;
pub mod server;
pub mod shell;
pub mod vfs;

pub use audit::{AuditLog, AuditSink, LogEntry};
pub use errors::{Result, ShellError, ShellErrorType};
pub use shell::{Reply, SessionState, Shell};
pub use vfs::{Entry, EntryKind, VirtualFileSystem};
