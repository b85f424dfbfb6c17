/// macOS launchd backend
///
/// Writes a user LaunchAgent with a daily StartCalendarInterval and loads it
/// with `launchctl`.

use crate::core::config::ScheduleSettings;
use crate::core::WorkspaceContext;
use crate::error::{Result, TilError};
use crate::schedule::backend::{run_command, SchedulerBackend};
use crate::schedule::ScheduleTime;
use std::fs;
use std::path::{Path, PathBuf};

pub const AGENT_LABEL: &str = "com.til.autogit";

pub struct LaunchAgentBackend {
    plist_path: PathBuf,
    workdir: PathBuf,
    entrypoint: String,
    log_dir: PathBuf,
}

impl LaunchAgentBackend {
    pub fn new(ctx: &WorkspaceContext, settings: &ScheduleSettings) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            TilError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self {
            plist_path: home
                .join("Library/LaunchAgents")
                .join(format!("{}.plist", AGENT_LABEL)),
            workdir: ctx.root().to_path_buf(),
            entrypoint: settings.entrypoint.clone(),
            log_dir: std::env::temp_dir(),
        })
    }

    pub fn plist_path(&self) -> &Path {
        &self.plist_path
    }

    /// Property list for the agent
    pub fn render_plist(&self, time: ScheduleTime) -> String {
        let mut program_args = vec!["/usr/bin/env".to_string()];
        program_args.extend(self.entrypoint.split_whitespace().map(str::to_string));
        program_args.push("auto".to_string());
        program_args.push("run".to_string());

        let args_xml: String = program_args
            .iter()
            .map(|arg| format!("        <string>{}</string>\n", xml_escape(arg)))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{label}</string>
    <key>ProgramArguments</key>
    <array>
{args}    </array>
    <key>WorkingDirectory</key>
    <string>{workdir}</string>
    <key>StartCalendarInterval</key>
    <dict>
        <key>Hour</key>
        <integer>{hour}</integer>
        <key>Minute</key>
        <integer>{minute}</integer>
    </dict>
    <key>StandardOutPath</key>
    <string>{stdout}</string>
    <key>StandardErrorPath</key>
    <string>{stderr}</string>
</dict>
</plist>
"#,
            label = AGENT_LABEL,
            args = args_xml,
            workdir = xml_escape(&self.workdir.display().to_string()),
            hour = time.hour(),
            minute = time.minute(),
            stdout = xml_escape(&self.log_dir.join("til_autogit.log").display().to_string()),
            stderr = xml_escape(
                &self
                    .log_dir
                    .join("til_autogit_error.log")
                    .display()
                    .to_string()
            ),
        )
    }
}

impl SchedulerBackend for LaunchAgentBackend {
    fn name(&self) -> &str {
        "launchd"
    }

    fn register(&self, time: ScheduleTime) -> Result<()> {
        if let Some(parent) = self.plist_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Reloading an already loaded agent fails, so unload first
        if self.plist_path.exists() {
            let _ = run_command("launchctl", &["unload", &self.plist_path.to_string_lossy()]);
        }

        fs::write(&self.plist_path, self.render_plist(time))?;
        run_command("launchctl", &["load", &self.plist_path.to_string_lossy()])?;

        tracing::info!("Loaded launch agent {}", self.plist_path.display());
        Ok(())
    }

    fn deregister(&self) -> Result<()> {
        if !self.plist_path.exists() {
            return Ok(());
        }

        let unload = run_command("launchctl", &["unload", &self.plist_path.to_string_lossy()]);
        fs::remove_file(&self.plist_path)?;
        unload.map(|_| ())
    }
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
