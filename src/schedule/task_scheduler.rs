// Windows Task Scheduler backend
//
// Drops a small PowerShell script in the workspace and registers a daily
// task that runs it.

use crate::core::config::ScheduleSettings;
use crate::core::WorkspaceContext;
use crate::error::Result;
use crate::schedule::backend::{run_command, SchedulerBackend};
use crate::schedule::ScheduleTime;
use std::fs;
use std::path::PathBuf;

pub const TASK_NAME: &str = "TIL_AutoGit";
pub const SCRIPT_FILE: &str = "auto_git_task.ps1";

pub struct TaskSchedulerBackend {
    script_path: PathBuf,
    workdir: PathBuf,
    entrypoint: String,
}

impl TaskSchedulerBackend {
    pub fn new(ctx: &WorkspaceContext, settings: &ScheduleSettings) -> Self {
        Self {
            script_path: ctx.join(SCRIPT_FILE),
            workdir: ctx.root().to_path_buf(),
            entrypoint: settings.entrypoint.clone(),
        }
    }

    pub fn render_script(&self) -> String {
        format!(
            "cd \"{}\"\n{} auto run\n",
            self.workdir.display(),
            self.entrypoint
        )
    }

    /// Arguments for `schtasks /create`
    pub fn create_args(&self, time: ScheduleTime) -> Vec<String> {
        vec![
            "/create".to_string(),
            "/tn".to_string(),
            TASK_NAME.to_string(),
            "/tr".to_string(),
            format!(
                "powershell.exe -ExecutionPolicy Bypass -File \"{}\"",
                self.script_path.display()
            ),
            "/sc".to_string(),
            "daily".to_string(),
            "/st".to_string(),
            time.to_string(),
            "/f".to_string(),
        ]
    }
}

impl SchedulerBackend for TaskSchedulerBackend {
    fn name(&self) -> &str {
        "schtasks"
    }

    fn register(&self, time: ScheduleTime) -> Result<()> {
        fs::write(&self.script_path, self.render_script())?;

        let args = self.create_args(time);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_command("schtasks", &args)?;

        tracing::info!("Registered scheduled task {}", TASK_NAME);
        Ok(())
    }

    fn deregister(&self) -> Result<()> {
        let result = run_command("schtasks", &["/delete", "/tn", TASK_NAME, "/f"]);
        if self.script_path.exists() {
            fs::remove_file(&self.script_path)?;
        }
        result.map(|_| ())
    }
}
