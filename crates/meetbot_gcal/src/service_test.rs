#[cfg(test)]
mod tests {
    use crate::service::{build_meeting_event, collect_busy, meeting_links, GcalServiceError};
    use chrono::{TimeZone, Utc};
    use google_calendar3::api::{
        ConferenceData, EntryPoint, Error as CalendarApiError, Event, FreeBusyCalendar,
        FreeBusyResponse, TimePeriod,
    };
    use meetbot_common::{Attendee, CredentialHandle, MeetingRequest};
    use std::collections::HashMap;

    fn attendee(email: &str) -> Attendee {
        Attendee::new(email, CredentialHandle::default())
    }

    fn response(calendars: Vec<(&str, FreeBusyCalendar)>) -> FreeBusyResponse {
        let calendars: HashMap<String, FreeBusyCalendar> = calendars
            .into_iter()
            .map(|(id, calendar)| (id.to_string(), calendar))
            .collect();
        FreeBusyResponse {
            calendars: Some(calendars),
            ..Default::default()
        }
    }

    fn request(with_conference: bool) -> MeetingRequest {
        MeetingRequest {
            summary: "Roadmap".to_string(),
            start: Utc.with_ymd_and_hms(2025, 5, 5, 4, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 5, 5, 5, 0, 0).unwrap(),
            attendee_emails: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            time_zone: "Asia/Kolkata".to_string(),
            with_conference,
        }
    }

    #[test]
    fn test_collect_busy_reports_every_attendee() {
        let busy_period = TimePeriod {
            start: Some(Utc.with_ymd_and_hms(2025, 5, 5, 4, 30, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2025, 5, 5, 5, 30, 0).unwrap()),
        };
        let response = response(vec![
            (
                "a@example.com",
                FreeBusyCalendar {
                    busy: Some(vec![busy_period]),
                    ..Default::default()
                },
            ),
            ("b@example.com", FreeBusyCalendar::default()),
        ]);

        let busy = collect_busy(&[attendee("a@example.com"), attendee("b@example.com")], response).unwrap();

        assert_eq!(busy["a@example.com"].len(), 1);
        assert_eq!(busy["a@example.com"][0].start, "2025-05-05T04:30:00+00:00");
        assert!(busy["b@example.com"].is_empty());
    }

    #[test]
    fn test_calendar_error_fails_the_query() {
        let response = response(vec![(
            "a@example.com",
            FreeBusyCalendar {
                errors: Some(vec![CalendarApiError {
                    domain: Some("global".to_string()),
                    reason: Some("notFound".to_string()),
                }]),
                ..Default::default()
            },
        )]);

        let result = collect_busy(&[attendee("a@example.com")], response);

        assert!(matches!(
            result,
            Err(GcalServiceError::CalendarAccess { reason, .. }) if reason == "notFound"
        ));
    }

    #[test]
    fn test_missing_calendar_fails_the_query() {
        let result = collect_busy(&[attendee("a@example.com")], FreeBusyResponse::default());
        assert!(matches!(result, Err(GcalServiceError::MissingCalendar(email)) if email == "a@example.com"));
    }

    #[test]
    fn test_open_ended_busy_period_is_rejected() {
        let response = response(vec![(
            "a@example.com",
            FreeBusyCalendar {
                busy: Some(vec![TimePeriod {
                    start: Some(Utc::now()),
                    end: None,
                }]),
                ..Default::default()
            },
        )]);

        let result = collect_busy(&[attendee("a@example.com")], response);

        assert!(matches!(result, Err(GcalServiceError::MalformedBusyPeriod(_))));
    }

    #[test]
    fn test_meeting_event_requests_meet_link_and_invites_everyone() {
        let event = build_meeting_event(&request(true));

        assert_eq!(event.summary.as_deref(), Some("Roadmap"));
        let start = event.start.unwrap();
        assert_eq!(start.time_zone.as_deref(), Some("Asia/Kolkata"));
        assert_eq!(start.date_time, Some(Utc.with_ymd_and_hms(2025, 5, 5, 4, 30, 0).unwrap()));

        let invitees: Vec<String> = event
            .attendees
            .unwrap()
            .into_iter()
            .filter_map(|a| a.email)
            .collect();
        assert_eq!(invitees, vec!["a@example.com", "b@example.com"]);

        let create_request = event.conference_data.unwrap().create_request.unwrap();
        assert!(create_request.request_id.is_some());
        assert_eq!(
            create_request.conference_solution_key.unwrap().type_.as_deref(),
            Some("hangoutsMeet")
        );
    }

    #[test]
    fn test_meeting_event_without_conference() {
        let event = build_meeting_event(&request(false));
        assert!(event.conference_data.is_none());
    }

    #[test]
    fn test_meeting_links_prefer_hangout_link() {
        let event = Event {
            id: Some("evt1".to_string()),
            html_link: Some("https://www.google.com/calendar/event?eid=evt1".to_string()),
            hangout_link: Some("https://meet.google.com/abc-defg-hij".to_string()),
            ..Default::default()
        };

        let links = meeting_links(&event);

        assert_eq!(links.event_id.as_deref(), Some("evt1"));
        assert_eq!(links.calendar_link.as_deref(), Some("https://www.google.com/calendar/event?eid=evt1"));
        assert_eq!(links.conference_link.as_deref(), Some("https://meet.google.com/abc-defg-hij"));
    }

    #[test]
    fn test_meeting_links_fall_back_to_video_entry_point() {
        let event = Event {
            id: Some("evt2".to_string()),
            conference_data: Some(ConferenceData {
                entry_points: Some(vec![
                    EntryPoint {
                        entry_point_type: Some("phone".to_string()),
                        uri: Some("tel:+1-555-0100".to_string()),
                        ..Default::default()
                    },
                    EntryPoint {
                        entry_point_type: Some("video".to_string()),
                        uri: Some("https://meet.google.com/xyz".to_string()),
                        ..Default::default()
                    },
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let links = meeting_links(&event);

        assert_eq!(links.conference_link.as_deref(), Some("https://meet.google.com/xyz"));
        assert!(links.calendar_link.is_none());
    }
}
