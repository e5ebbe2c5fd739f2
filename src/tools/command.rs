//! Subprocess runner shared by every external tool wrapper
//!
//! Standard output and standard error go to anonymous temporary files, so a
//! chatty child can never fill a pipe and stall while we poll it for the
//! timeout.

use std::ffi::OsString;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::ToolError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const STDERR_LIMIT: usize = 2000;

/// A fully specified external command.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    tool: &'static str,
    program: String,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    pub fn new(tool: &'static str, program: impl Into<String>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `None` waits forever.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The command line as it would be typed, for logs.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Run and return captured standard output.
    pub fn output(&self) -> Result<Vec<u8>, ToolError> {
        let mut stdout = self.scratch()?;
        let out_handle = stdout.try_clone().map_err(|e| self.io_error(e))?;
        self.execute(out_handle)?;
        let mut buf = Vec::new();
        stdout
            .seek(SeekFrom::Start(0))
            .and_then(|_| stdout.read_to_end(&mut buf))
            .map_err(|e| self.io_error(e))?;
        Ok(buf)
    }

    fn execute(&self, stdout: File) -> Result<(), ToolError> {
        log::debug!("Running {}", self.command_line());
        let mut stderr = self.scratch()?;
        let err_handle = stderr.try_clone().map_err(|e| self.io_error(e))?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(err_handle));
        let mut child = command.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ToolError::NotFound {
                    tool: self.tool,
                    executable: self.program.clone(),
                }
            } else {
                self.io_error(e)
            }
        })?;

        let status = self.wait(&mut child)?;
        if status.success() {
            return Ok(());
        }
        let mut message = String::new();
        let _ = stderr
            .seek(SeekFrom::Start(0))
            .and_then(|_| stderr.read_to_string(&mut message));
        let message = message.trim();
        let message = match message.char_indices().nth(STDERR_LIMIT) {
            Some((idx, _)) => &message[..idx],
            None => message,
        };
        Err(ToolError::Failed {
            tool: self.tool,
            status: status.to_string(),
            stderr: message.to_string(),
        })
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, ToolError> {
        let Some(timeout) = self.timeout else {
            return child.wait().map_err(|e| self.io_error(e));
        };
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(|e| self.io_error(e))? {
                return Ok(status);
            }
            if started.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ToolError::TimedOut {
                    tool: self.tool,
                    timeout,
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn scratch(&self) -> Result<File, ToolError> {
        tempfile::tempfile().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> ToolError {
        ToolError::Io {
            tool: self.tool,
            source,
        }
    }
}
