// The command engine. A `Shell` is one interactive session: it owns the
// current directory and the audit sink and shares the read-only file system
// with any other sessions.

use std::sync::Arc;
use tracing::instrument;

use crate::audit::{AuditSink, LogEntry};
use crate::commands::Command;
use crate::errors::{Result, ShellError, ShellErrorType};
use crate::paths::{resolve, ROOT};
use crate::vfs::VirtualFileSystem;

pub const SYSTEM_NAME: &str = "UNIX Shell Emulator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

/// What a front-end should show after one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub output: String,
    pub terminated: bool,
}

impl Reply {
    fn output(output: String) -> Reply {
        Reply {
            output,
            terminated: false,
        }
    }

    fn empty() -> Reply {
        Reply::output(String::new())
    }

    fn exit() -> Reply {
        Reply {
            output: String::new(),
            terminated: true,
        }
    }
}

pub struct Shell<S: AuditSink> {
    vfs: Arc<VirtualFileSystem>,
    audit: S,
    hostname: String,
    current_dir: String,
    state: SessionState,
}

impl<S: AuditSink> Shell<S> {
    pub fn new(vfs: Arc<VirtualFileSystem>, audit: S, hostname: &str) -> Shell<S> {
        Shell {
            vfs,
            audit,
            hostname: hostname.to_string(),
            current_dir: ROOT.to_string(),
            state: SessionState::Running,
        }
    }

    pub fn prompt(&self) -> String {
        format!("{}:{}$ ", self.hostname, self.current_dir)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn audit(&self) -> &S {
        &self.audit
    }

    /// Parse and run one command line.
    #[instrument(skip(self))]
    pub fn execute(&mut self, line: &str) -> Result<Reply> {
        if self.state == SessionState::Terminated {
            return Err(ShellError::new(
                ShellErrorType::SessionClosed,
                "Session has exited".to_string(),
            ));
        }
        match Command::parse(line) {
            None => Ok(Reply::empty()),
            Some(cmd) => self.dispatch(cmd),
        }
    }

    pub fn dispatch(&mut self, cmd: Command) -> Result<Reply> {
        tracing::debug!(verb = cmd.verb(), "Dispatching command");
        let reply = match cmd {
            Command::Ls(target) => Reply::output(self.ls(target.as_deref())?),
            Command::Cd(target) => Reply::output(self.cd(target.as_deref())?),
            Command::Exit => {
                self.exit()?;
                Reply::exit()
            }
            Command::Uname => Reply::output(self.uname()?),
            Command::Chmod { mode, path } => Reply::output(self.chmod(&mode, &path)?),
            Command::Du(target) => Reply::output(self.du(target.as_deref())?),
            Command::Usage(message) => Reply::output(message),
            Command::Unknown(verb) => {
                tracing::info!("Unknown command {}", verb);
                Reply::output(format!("{}: command not found", verb))
            }
        };
        Ok(reply)
    }

    fn ls(&mut self, target: Option<&str>) -> Result<String> {
        let path = resolve(&self.current_dir, target.unwrap_or("."));
        if !self.vfs.is_dir(&path) {
            return Ok(format!(
                "ls: cannot access '{}': No such file or directory",
                path
            ));
        }
        let listing = self.vfs.list_children(&path).join("\n");
        self.log("ls", &path)?;
        Ok(listing)
    }

    fn cd(&mut self, target: Option<&str>) -> Result<String> {
        let path = match target {
            Some(t) => resolve(&self.current_dir, t),
            None => ROOT.to_string(),
        };
        if !self.vfs.is_dir(&path) {
            return Ok(format!("cd: {}: No such file or directory", path));
        }
        self.log("cd", &path)?;
        self.current_dir = path;
        Ok(String::new())
    }

    fn exit(&mut self) -> Result<()> {
        self.log("exit", "")?;
        self.state = SessionState::Terminated;
        tracing::info!("Session for {} terminated", self.hostname);
        Ok(())
    }

    fn uname(&mut self) -> Result<String> {
        self.log("uname", "")?;
        Ok(SYSTEM_NAME.to_string())
    }

    // Permissions are not modelled, so a successful chmod only leaves a record.
    fn chmod(&mut self, mode: &str, target: &str) -> Result<String> {
        let path = resolve(&self.current_dir, target);
        if !self.vfs.exists(&path) {
            return Ok(format!(
                "chmod: cannot access '{}': No such file or directory",
                path
            ));
        }
        self.log("chmod", &format!("{} {}", mode, path))?;
        Ok(String::new())
    }

    fn du(&mut self, target: Option<&str>) -> Result<String> {
        let path = match target {
            Some(t) => resolve(&self.current_dir, t),
            None => self.current_dir.clone(),
        };
        if !self.vfs.exists(&path) {
            return Ok(format!(
                "du: cannot access '{}': No such file or directory",
                path
            ));
        }
        let size = self.vfs.total_size(&path);
        self.log("du", &path)?;
        Ok(format!("{}\t{}", size, path))
    }

    fn log(&mut self, action: &str, details: &str) -> Result<()> {
        tracing::info!(action, details, "Accepted command");
        self.audit.record(LogEntry::new(action, details))
    }
}
