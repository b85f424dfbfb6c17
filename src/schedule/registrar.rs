/// Schedule registrar
///
/// Persists the auto-git schedule to `.auto_git_config.json` and installs it
/// with the host's native scheduler.

use crate::core::config::ScheduleSettings;
use crate::core::WorkspaceContext;
use crate::error::{Result, TilError};
use crate::schedule::backend::{Platform, SchedulerBackend};
use crate::schedule::store::{ConfigStore, ScheduleConfig};
use crate::schedule::ScheduleTime;
use serde::Serialize;
use std::path::PathBuf;

/// What `auto status` reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleStatus {
    pub enabled: bool,
    pub time: Option<String>,
    pub message: Option<String>,
    pub created_at: Option<String>,
    pub platform: String,
    pub config_file: PathBuf,
}

pub struct ScheduleRegistrar {
    store: ConfigStore,
    platform: Platform,
    backend: Option<Box<dyn SchedulerBackend>>,
}

impl ScheduleRegistrar {
    /// Registrar for the current host
    pub fn new(ctx: &WorkspaceContext, settings: &ScheduleSettings) -> Result<Self> {
        let platform = Platform::current();
        let backend = platform.backend(ctx, settings)?;
        Self::with_backend(ctx, platform, backend)
    }

    pub fn with_backend(
        ctx: &WorkspaceContext,
        platform: Platform,
        backend: Option<Box<dyn SchedulerBackend>>,
    ) -> Result<Self> {
        Ok(Self {
            store: ConfigStore::open(ctx.auto_git_config_path())?,
            platform,
            backend,
        })
    }

    /// Validate, persist, then register with the platform scheduler.
    ///
    /// A registration error is returned after the config has been written;
    /// the persisted section is not rolled back.
    pub fn setup(&self, time: &str, message: Option<&str>) -> Result<ScheduleConfig> {
        let parsed: ScheduleTime = time.parse()?;

        let config = ScheduleConfig {
            enabled: true,
            time: parsed.to_string(),
            message: message.map(str::to_string),
            created_at: chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        };
        self.store.write_schedule(&config)?;
        tracing::info!("Saved schedule {} to {}", config.time, self.store.path().display());

        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| TilError::UnsupportedPlatform(self.platform.to_string()))?;

        backend.register(parsed).map_err(|e| {
            tracing::error!("{} registration failed: {}", backend.name(), e);
            match e {
                TilError::Scheduler(_) => e,
                other => TilError::Scheduler(other.to_string()),
            }
        })?;

        tracing::info!("Registered daily run at {} with {}", config.time, backend.name());
        Ok(config)
    }

    /// Forget the schedule and uninstall the platform job
    pub fn remove(&self) -> Result<()> {
        if !self.store.clear_schedule()? {
            tracing::debug!("No schedule section to remove");
        }

        if let Some(backend) = &self.backend {
            if let Err(e) = backend.deregister() {
                tracing::warn!("{} deregistration failed: {}", backend.name(), e);
            }
        }

        Ok(())
    }

    pub fn status(&self) -> ScheduleStatus {
        let section = self.store.section().unwrap_or_default();

        ScheduleStatus {
            enabled: section.enabled.unwrap_or(false),
            time: section.time,
            message: section.message,
            created_at: section.created_at,
            platform: self.platform.to_string(),
            config_file: self.store.path().to_path_buf(),
        }
    }
}

/// Human-readable status block
pub fn format_status(status: &ScheduleStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Auto-git: {}\n",
        if status.enabled { "enabled" } else { "disabled" }
    ));
    if let Some(time) = &status.time {
        out.push_str(&format!("Time:     {}\n", time));
    }
    if let Some(message) = &status.message {
        out.push_str(&format!("Message:  {}\n", message));
    }
    if let Some(created_at) = &status.created_at {
        out.push_str(&format!("Created:  {}\n", created_at));
    }
    out.push_str(&format!("Platform: {}\n", status.platform));
    out.push_str(&format!("Config:   {}\n", status.config_file.display()));
    out
}
