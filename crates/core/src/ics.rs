//! iCalendar (RFC 5545) export for a booked appointment.
//!
//! Produces a `VCALENDAR` holding exactly one `VEVENT`, CRLF line endings,
//! TEXT values escaped and long content lines folded.

use crate::timezone::to_ics_utc;
use crate::types::Timestamp;

/// MIME type of the exported artifact.
pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Domain suffix appended to the appointment id to form the event UID.
pub const UID_DOMAIN: &str = "careerkey";

const PRODID: &str = "-//CareerKey//Expo Scheduler//EN";

/// Maximum octets per content line before folding.
const MAX_LINE_OCTETS: usize = 75;

/// Data needed to describe one appointment as a calendar event.
#[derive(Debug, Clone)]
pub struct AppointmentEvent<'a> {
    pub appointment_id: &'a str,
    pub company_name: &'a str,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Name of the zone the times were shown in.
    pub time_zone: &'a str,
}

/// Deterministic download name for an appointment's calendar file.
pub fn file_name(appointment_id: &str) -> String {
    format!("careerkey-appointment-{appointment_id}.ics")
}

/// Render the calendar document. `now` becomes the `DTSTAMP`.
pub fn build_calendar(event: &AppointmentEvent<'_>, now: Timestamp) -> String {
    let description = format!(
        "Appointment booked.\nAppointment ID: {}\nTime zone shown: {}",
        event.appointment_id, event.time_zone
    );

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@{UID_DOMAIN}", event.appointment_id),
        format!("DTSTAMP:{}", to_ics_utc(now)),
        format!("DTSTART:{}", to_ics_utc(event.start)),
        format!("DTEND:{}", to_ics_utc(event.end)),
        format!(
            "SUMMARY:{}",
            escape_text(&format!("Engineering Expo: {}", event.company_name))
        ),
        format!("DESCRIPTION:{}", escape_text(&description)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push_str("\r\n");
        }
        out.push_str(&fold_line(line));
    }
    out
}

/// Escape an iCalendar TEXT value.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Fold a content line at 75 octets without splitting UTF-8 sequences.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current = 0;
    // Continuation lines start with a space, which counts against the limit.
    let mut limit = MAX_LINE_OCTETS;
    for c in line.chars() {
        let width = c.len_utf8();
        if current + width > limit {
            out.push_str("\r\n ");
            current = 1;
            limit = MAX_LINE_OCTETS;
        }
        out.push(c);
        current += width;
    }
    out
}
