/// Scheduled auto-commit
///
/// Persisted schedule state plus the per-OS backends that trigger
/// `auto run` once a day.

pub mod backend;
pub mod crontab;
pub mod launch_agent;
pub mod registrar;
pub mod store;
pub mod task_scheduler;
pub mod time;

pub use backend::{Platform, SchedulerBackend};
pub use registrar::{format_status, ScheduleRegistrar, ScheduleStatus};
pub use store::{ConfigStore, ScheduleConfig};
pub use time::ScheduleTime;
