// --- File: crates/meetbot_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

fn default_time_zone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_work_start_hour() -> u32 {
    9
}

fn default_work_end_hour() -> u32 {
    18
}

fn default_granularity_minutes() -> i64 {
    15
}

fn default_reminder_lead_minutes() -> i64 {
    10
}

// --- Scheduler Config ---
/// Working-hour band and search granularity shared by every attendee.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulerSettings {
    /// IANA zone name, e.g. "Asia/Kolkata"
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_work_start_hour")]
    pub work_start_hour: u32,
    /// Exclusive; a meeting may end exactly at this hour. At most 23, since
    /// meetings never cross midnight.
    #[serde(default = "default_work_end_hour")]
    pub work_end_hour: u32,
    #[serde(default = "default_granularity_minutes")]
    pub granularity_minutes: i64,
    /// How long before a meeting the reminder job fires.
    #[serde(default = "default_reminder_lead_minutes")]
    pub reminder_lead_minutes: i64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            work_start_hour: default_work_start_hour(),
            work_end_hour: default_work_end_hour(),
            granularity_minutes: default_granularity_minutes(),
            reminder_lead_minutes: default_reminder_lead_minutes(),
        }
    }
}

// --- Calendar Backend Selection ---
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalendarBackend {
    /// Process-local calendars, used for local runs and tests.
    #[default]
    Memory,
    /// Google Calendar through a service account.
    Google,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CalendarConfig {
    #[serde(default)]
    pub backend: CalendarBackend,
}

// --- Google Calendar Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>, // Mandatory for the google backend
    /// Calendar the organizer's events are inserted into. Defaults to the organizer email.
    pub organizer_calendar_id: Option<String>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub scheduler: SchedulerSettings,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}
