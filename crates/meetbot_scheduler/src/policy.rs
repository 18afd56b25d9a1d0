// --- File: crates/meetbot_scheduler/src/policy.rs ---
use chrono::{DateTime, Duration, NaiveTime};
use chrono_tz::Tz;
use meetbot_common::{config_error, MeetbotError};
use meetbot_config::SchedulerSettings;

/// Working-hour band shared by all attendees, in one fixed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHoursPolicy {
    pub time_zone: Tz,
    /// First admissible start time of day.
    pub day_start: NaiveTime,
    /// Starts must be before this and meetings must end by it.
    pub day_end: NaiveTime,
    /// Step used to move through free time and across the band boundaries.
    pub granularity: Duration,
}

impl Default for WorkingHoursPolicy {
    fn default() -> Self {
        Self {
            time_zone: Tz::Asia__Kolkata,
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            day_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            granularity: Duration::minutes(15),
        }
    }
}

impl WorkingHoursPolicy {
    pub fn from_settings(settings: &SchedulerSettings) -> Result<Self, MeetbotError> {
        let time_zone: Tz = settings
            .time_zone
            .parse()
            .map_err(|_| config_error(format!("unknown time zone '{}'", settings.time_zone)))?;
        let day_start = NaiveTime::from_hms_opt(settings.work_start_hour, 0, 0).ok_or_else(|| {
            config_error(format!("invalid work_start_hour {}", settings.work_start_hour))
        })?;
        let day_end = NaiveTime::from_hms_opt(settings.work_end_hour, 0, 0).ok_or_else(|| {
            config_error(format!("invalid work_end_hour {}, must be at most 23", settings.work_end_hour))
        })?;
        if day_start >= day_end {
            return Err(config_error(format!(
                "working hours are empty: {} >= {}",
                day_start, day_end
            )));
        }
        let granularity = Duration::try_minutes(settings.granularity_minutes)
            .filter(|step| *step > Duration::zero())
            .ok_or_else(|| {
                config_error(format!(
                    "granularity_minutes must be positive, got {}",
                    settings.granularity_minutes
                ))
            })?;

        Ok(Self {
            time_zone,
            day_start,
            day_end,
            granularity,
        })
    }

    /// Whether a meeting `[start, end)` fits inside the band on a single local day.
    pub fn admits<T: chrono::TimeZone>(&self, start: &DateTime<T>, end: &DateTime<T>) -> bool {
        let local_start = start.with_timezone(&self.time_zone);
        let local_end = end.with_timezone(&self.time_zone);
        let start_time = local_start.time();

        start_time >= self.day_start
            && start_time < self.day_end
            && local_end.date_naive() == local_start.date_naive()
            && local_end.time() <= self.day_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    fn at(hour: u32, minute: u32) -> DateTime<Tz> {
        Kolkata.with_ymd_and_hms(2025, 5, 5, hour, minute, 0).unwrap()
    }

    #[test]
    fn default_band_is_nine_to_six_in_fifteen_minute_steps() {
        let policy = WorkingHoursPolicy::default();
        assert_eq!(policy.time_zone, Tz::Asia__Kolkata);
        assert_eq!(policy.day_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(policy.day_end, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(policy.granularity, Duration::minutes(15));
    }

    #[test]
    fn band_boundaries_are_inclusive_start_exclusive_end() {
        let policy = WorkingHoursPolicy::default();
        let half_hour = Duration::minutes(30);

        assert!(policy.admits(&at(9, 0), &(at(9, 0) + half_hour)));
        assert!(!policy.admits(&at(8, 59), &(at(8, 59) + half_hour)));
        assert!(policy.admits(&at(17, 30), &at(18, 0)));
        // start in band, end past 18:00
        assert!(!policy.admits(&at(17, 46), &(at(17, 46) + half_hour)));
        assert!(!policy.admits(&at(18, 0), &(at(18, 0) + half_hour)));
    }

    #[test]
    fn meetings_may_not_cross_midnight() {
        let policy = WorkingHoursPolicy {
            day_start: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            ..WorkingHoursPolicy::default()
        };
        assert!(!policy.admits(&at(22, 45), &(at(22, 45) + Duration::hours(2))));
    }

    #[test]
    fn band_is_evaluated_in_policy_zone() {
        let policy = WorkingHoursPolicy::default();
        // 03:30 UTC is 09:00 in Kolkata
        let start = chrono::Utc.with_ymd_and_hms(2025, 5, 5, 3, 30, 0).unwrap();
        assert!(policy.admits(&start, &(start + Duration::minutes(30))));
    }

    #[test]
    fn settings_are_validated() {
        let settings = SchedulerSettings {
            time_zone: "Europe/Zurich".to_string(),
            work_start_hour: 8,
            work_end_hour: 17,
            granularity_minutes: 30,
            reminder_lead_minutes: 5,
        };
        let policy = WorkingHoursPolicy::from_settings(&settings).unwrap();
        assert_eq!(policy.time_zone, Tz::Europe__Zurich);
        assert_eq!(policy.granularity, Duration::minutes(30));

        let bad_zone = SchedulerSettings {
            time_zone: "Mars/Olympus".to_string(),
            ..settings.clone()
        };
        assert!(WorkingHoursPolicy::from_settings(&bad_zone).is_err());

        let empty_band = SchedulerSettings {
            work_start_hour: 18,
            work_end_hour: 9,
            ..settings.clone()
        };
        assert!(WorkingHoursPolicy::from_settings(&empty_band).is_err());

        let midnight_end = SchedulerSettings {
            work_end_hour: 24,
            ..settings.clone()
        };
        assert!(matches!(
            WorkingHoursPolicy::from_settings(&midnight_end),
            Err(MeetbotError::ConfigError(_))
        ));

        let zero_step = SchedulerSettings {
            granularity_minutes: 0,
            ..settings
        };
        assert!(WorkingHoursPolicy::from_settings(&zero_step).is_err());
    }
}
