//! Rendering of booking notification emails.

use crate::booking::BookingRequest;

/// The three renditions of one booking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Render subject, plain-text and HTML bodies for a validated booking.
pub fn compose(booking: &BookingRequest) -> ComposedMail {
    let subject = format!(
        "New booking: {} ({})",
        booking.name,
        booking.company_or("no company")
    );

    let text = format!(
        "New booking request\n\
         Name: {}\n\
         Email: {}\n\
         Company: {}\n\
         Date: {}\n\
         Time: {}\n\
         Notes: {}",
        booking.name,
        booking.email,
        booking.company,
        booking.date,
        booking.time,
        booking.notes_or("(none)"),
    );

    let notes = escape_html(booking.notes_or("-")).replace('\n', "<br/>");
    let html = format!(
        "<h2>New booking request</h2>\n\
         <p><b>Name:</b> {}</p>\n\
         <p><b>Email:</b> {}</p>\n\
         <p><b>Company:</b> {}</p>\n\
         <p><b>Date:</b> {}</p>\n\
         <p><b>Time:</b> {}</p>\n\
         <p><b>Notes:</b><br/>{}</p>\n",
        escape_html(&booking.name),
        escape_html(&booking.email),
        escape_html(booking.company_or("-")),
        escape_html(&booking.date),
        escape_html(&booking.time),
        notes,
    );

    ComposedMail { subject, text, html }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
