/// Scheduler backends
///
/// One backend per host OS family, chosen once from the platform the binary
/// runs on.

use crate::core::config::ScheduleSettings;
use crate::core::WorkspaceContext;
use crate::error::{Result, TilError};
use crate::schedule::crontab::CrontabBackend;
use crate::schedule::launch_agent::LaunchAgentBackend;
use crate::schedule::task_scheduler::TaskSchedulerBackend;
use crate::schedule::ScheduleTime;
use std::io::Write;
use std::process::{Command, Stdio};

/// A native facility that can run `<entrypoint> auto run` once a day
pub trait SchedulerBackend {
    fn name(&self) -> &str;

    fn register(&self, time: ScheduleTime) -> Result<()>;

    fn deregister(&self) -> Result<()>;
}

/// Host operating system family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
    Other(String),
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Other(os) => os,
        }
    }

    /// Backend for this platform, `None` when scheduling is unsupported
    pub fn backend(
        &self,
        ctx: &WorkspaceContext,
        settings: &ScheduleSettings,
    ) -> Result<Option<Box<dyn SchedulerBackend>>> {
        let backend: Box<dyn SchedulerBackend> = match self {
            Platform::MacOs => Box::new(LaunchAgentBackend::new(ctx, settings)?),
            Platform::Linux => Box::new(CrontabBackend::new(ctx, settings)),
            Platform::Windows => Box::new(TaskSchedulerBackend::new(ctx, settings)),
            Platform::Other(_) => return Ok(None),
        };
        Ok(Some(backend))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Run an external program, returning stdout on success
pub(crate) fn run_command(program: &str, args: &[&str]) -> Result<String> {
    run_command_with_stdin(program, args, None)
}

pub(crate) fn run_command_with_stdin(
    program: &str,
    args: &[&str],
    stdin: Option<&str>,
) -> Result<String> {
    let command_line = format!("{} {}", program, args.join(" "));
    tracing::debug!("Running: {}", command_line);

    let mut child = Command::new(program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TilError::BinaryNotFound(program.to_string())
            } else {
                TilError::Io(e)
            }
        })?;

    if let Some(input) = stdin {
        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(input.as_bytes())?;
        }
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(TilError::CommandFailed {
            command: command_line,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
