use std::fmt::Write;

use crate::booking::{Notification, PageState};
use crate::view::{month_name, CalendarView, ScheduleView};

/// Everything one render of the booking page needs
pub struct PageContext<'a> {
    pub page: &'a PageState,
    pub years: &'a [i32],
    pub calendar: Option<&'a CalendarView<String>>,
    pub schedule: Option<&'a ScheduleView>,
    pub notice: Option<&'a Notification>,
}

/// Escapes text for use inside HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

pub fn render_page(ctx: &PageContext<'_>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Appointment booking</title>\n");
    html.push_str("<link rel=\"stylesheet\" href=\"/static/booking.css\">\n</head>\n<body>\n");

    render_month_selectors(&mut html, ctx);
    render_calendar(&mut html, ctx.calendar);
    render_schedule(&mut html, ctx.schedule);
    render_booking_form(&mut html, ctx);
    if let Some(notice) = ctx.notice {
        render_notice(&mut html, notice);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_month_selectors(html: &mut String, ctx: &PageContext<'_>) {
    html.push_str("<form method=\"post\" action=\"/month\" id=\"monthForm\">\n");
    html.push_str("<select id=\"yearSelect\" name=\"year\">\n");
    for year in ctx.years {
        let selected = if *year == ctx.page.year { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{}\"{}>{}</option>", year, selected, year);
    }
    html.push_str("</select>\n<select id=\"monthSelect\" name=\"month\">\n");
    for month in 0..12 {
        let selected = if month == ctx.page.month { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            month,
            selected,
            month_name(month as u32)
        );
    }
    html.push_str("</select>\n<button type=\"submit\">Show</button>\n</form>\n");
}

fn render_calendar(html: &mut String, calendar: Option<&CalendarView<String>>) {
    html.push_str("<div id=\"calendar\">\n");
    if let Some(calendar) = calendar {
        let _ = writeln!(html, "<h2>{}</h2>", escape(&calendar.title));
        for _ in 0..calendar.blanks {
            html.push_str("<div class=\"day empty\"></div>\n");
        }
        for cell in &calendar.days {
            let class = if cell.selected { "day available selected" } else { "day available" };
            let _ = writeln!(
                html,
                "<form method=\"post\" action=\"{}\"><button class=\"{}\">{}</button></form>",
                escape(&cell.on_click),
                class,
                cell.day
            );
        }
    }
    html.push_str("</div>\n");
}

fn render_schedule(html: &mut String, schedule: Option<&ScheduleView>) {
    html.push_str("<div id=\"schedule\">\n");
    if let Some(schedule) = schedule {
        let _ = writeln!(html, "<h3>{}</h3>", escape(&schedule.header));
        html.push_str("<ul class=\"time-slot-list\">\n");
        for row in &schedule.rows {
            let class = if row.booked {
                "time-slot-item booked"
            } else {
                "time-slot-item available"
            };
            let _ = write!(html, "<li class=\"{}\">", class);
            if row.selectable {
                let _ = write!(
                    html,
                    concat!(
                        "<form method=\"post\" action=\"/slot\">",
                        "<input type=\"hidden\" name=\"time\" value=\"{}\">",
                        "<button>{}</button></form>",
                    ),
                    escape(&row.time),
                    escape(&row.text)
                );
            } else {
                html.push_str(&escape(&row.text));
            }
            if row.cancellable {
                let _ = write!(
                    html,
                    concat!(
                        "<form method=\"post\" action=\"/cancel\">",
                        "<input type=\"hidden\" name=\"day\" value=\"{}\">",
                        "<input type=\"hidden\" name=\"time\" value=\"{}\">",
                        "<button class=\"cancel-btn\">Cancel booking</button></form>",
                    ),
                    schedule.day,
                    escape(&row.time)
                );
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
}

fn render_booking_form(html: &mut String, ctx: &PageContext<'_>) {
    html.push_str("<form method=\"post\" action=\"/book\" id=\"bookingForm\">\n");
    let _ = writeln!(
        html,
        "<input type=\"text\" id=\"name\" name=\"name\" value=\"{}\">",
        escape(&ctx.page.form.name)
    );
    html.push_str("<select id=\"timeSlot\" name=\"time_slot\">\n");
    // The selector is filled in once a day's schedule has been rendered
    if let Some(schedule) = ctx.schedule {
        for time in &schedule.time_options {
            let selected = if *time == ctx.page.form.time_slot { " selected" } else { "" };
            let _ = writeln!(
                html,
                "<option value=\"{}\"{}>{}</option>",
                escape(time),
                selected,
                escape(time)
            );
        }
    }
    html.push_str("</select>\n<button type=\"submit\">Book</button>\n</form>\n");
}

fn render_notice(html: &mut String, notice: &Notification) {
    let class = match notice {
        Notification::Success { .. } => "notice success",
        Notification::Failure { .. } => "notice failure",
        Notification::ConfirmCancel { .. } => "notice confirm",
    };
    let _ = writeln!(html, "<div class=\"{}\" role=\"alertdialog\">", class);
    let _ = writeln!(html, "<p>{}</p>", escape(notice.message()));

    match notice {
        Notification::ConfirmCancel { day, time, .. } => {
            for (confirmed, label) in [(true, "OK"), (false, "Cancel")] {
                let _ = writeln!(
                    html,
                    concat!(
                        "<form method=\"post\" action=\"/cancel/confirm\">",
                        "<input type=\"hidden\" name=\"day\" value=\"{}\">",
                        "<input type=\"hidden\" name=\"time\" value=\"{}\">",
                        "<input type=\"hidden\" name=\"confirmed\" value=\"{}\">",
                        "<button>{}</button></form>",
                    ),
                    day,
                    escape(time),
                    confirmed,
                    label
                );
            }
        }
        _ => html.push_str("<a href=\"/\">OK</a>\n"),
    }
    html.push_str("</div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BookingFeatures;
    use crate::schedule::{booked_status, default_day_schedule};
    use crate::view::{render_calendar as build_calendar, render_schedule as build_schedule};
    use chrono::NaiveDate;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn page_without_a_day_has_an_empty_slot_selector() {
        let page = PageState::new(2024, 2);
        let calendar = build_calendar(2024, 2, None, |day| format!("/day/{}", day)).unwrap();
        let html = render_page(&PageContext {
            page: &page,
            years: &[2023, 2024, 2025],
            calendar: Some(&calendar),
            schedule: None,
            notice: None,
        });

        assert!(html.contains("<option value=\"2024\" selected>2024</option>"));
        assert!(html.contains("<option value=\"2\" selected>March</option>"));
        assert_eq!(html.matches("class=\"day empty\"").count(), 4);
        assert_eq!(html.matches("action=\"/day/").count(), 31);
        assert!(html.contains("<select id=\"timeSlot\" name=\"time_slot\">\n</select>"));
    }

    #[test]
    fn booked_names_are_escaped_and_cancellable() {
        let mut page = PageState::new(2024, 2);
        page.selected_day = Some(15);
        let mut schedule = default_day_schedule();
        schedule.find_mut("9:00 - 10:00").unwrap().status = booked_status("<script>");
        let now = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let view = build_schedule(2024, 2, 15, &schedule, BookingFeatures::default(), now);

        let html = render_page(&PageContext {
            page: &page,
            years: &[2024],
            calendar: None,
            schedule: Some(&view),
            notice: None,
        });

        assert!(!html.contains("<script>"));
        assert!(html.contains("9:00 - 10:00 - Booked by &lt;script&gt;"));
        assert_eq!(html.matches("class=\"cancel-btn\"").count(), 1);
        assert_eq!(html.matches("action=\"/slot\"").count(), 15);
        assert_eq!(html.matches("<option value=\"").count(), 1 + 12 + 16);
    }

    #[test]
    fn confirmation_offers_both_answers() {
        let page = PageState::new(2024, 2);
        let notice = Notification::ConfirmCancel {
            day: 15,
            time: "9:00 - 10:00".to_string(),
            message: "Are you sure?".to_string(),
        };
        let html = render_page(&PageContext {
            page: &page,
            years: &[2024],
            calendar: None,
            schedule: None,
            notice: Some(&notice),
        });

        assert!(html.contains("name=\"confirmed\" value=\"true\""));
        assert!(html.contains("name=\"confirmed\" value=\"false\""));
        assert!(html.contains("<p>Are you sure?</p>"));
    }
}
