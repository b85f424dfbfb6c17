// Daily trigger time, strictly HH:MM

use crate::error::{Result, TilError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TIME_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2})$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTime {
    hour: u32,
    minute: u32,
}

impl ScheduleTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(TilError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl FromStr for ScheduleTime {
    type Err = TilError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TilError::InvalidTime(s.to_string());

        let caps = TIME_FORMAT.captures(s).ok_or_else(invalid)?;
        let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
        let minute: u32 = caps[2].parse().map_err(|_| invalid())?;

        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
