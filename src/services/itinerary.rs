//! Day-by-day ordering of a trip's activities.
//!
//! Storage returns activities unordered. Dates are compared as `YYYY-MM-DD` text and
//! times as `HH:MM` text, which matches chronological order as long as both follow
//! that fixed, zero-padded 24-hour format. Nothing enforces the format.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use askama_escape::{escape, Html};
use chrono::NaiveDate;
use regex::Regex;

use crate::models::Activity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryDay {
    pub date: String,
    pub header: String,
    pub activities: Vec<Activity>,
}

pub fn sort_chronologically(activities: &mut [Activity]) {
    activities.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
}

pub fn group_by_day(activities: Vec<Activity>) -> Vec<ItineraryDay> {
    let mut days: BTreeMap<String, Vec<Activity>> = BTreeMap::new();
    for activity in activities {
        days.entry(activity.date.clone()).or_default().push(activity);
    }

    days.into_iter()
        .map(|(date, mut activities)| {
            activities.sort_by(|a, b| a.time.cmp(&b.time));
            ItineraryDay {
                header: format_day_header(&date),
                date,
                activities,
            }
        })
        .collect()
}

/// "Monday, January 1" for ISO dates, the raw text otherwise.
pub fn format_day_header(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%A, %B %-d").to_string(),
        Err(_) => date.to_string(),
    }
}

pub fn format_date_range(start: &str, end: &str) -> String {
    let parsed = (
        NaiveDate::parse_from_str(start, "%Y-%m-%d"),
        NaiveDate::parse_from_str(end, "%Y-%m-%d"),
    );
    match parsed {
        (Ok(start), Ok(end)) if start == end => start.format("%b %-d, %Y").to_string(),
        (Ok(start), Ok(end)) => format!(
            "{} - {}",
            start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        ),
        _ => format!("{start} - {end}"),
    }
}

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn url_pattern() -> &'static Regex {
    URL_PATTERN.get_or_init(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("url pattern is valid"))
}

/// Escapes free text for HTML and turns `http(s)://` runs into links.
pub fn linkify(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    let mut last = 0;
    for found in url_pattern().find_iter(text) {
        html.push_str(&escape(&text[last..found.start()], Html).to_string());
        let url = escape(found.as_str(), Html).to_string();
        html.push_str(&format!(
            r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a>"#
        ));
        last = found.end();
    }
    html.push_str(&escape(&text[last..], Html).to_string());
    html
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn activity(date: &str, time: &str, title: &str) -> Activity {
        Activity {
            id: format!("{date}-{time}-{title}"),
            trip_id: "t".into(),
            date: date.into(),
            time: time.into(),
            title: title.into(),
            location: None,
            description: None,
        }
    }

    #[test]
    fn groups_by_date_and_orders_by_time() {
        let days = group_by_day(vec![
            activity("2024-01-02", "18:00", "dinner"),
            activity("2024-01-01", "14:30", "museum"),
            activity("2024-01-02", "08:15", "breakfast"),
            activity("2024-01-01", "09:00", "check in"),
        ]);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-01");
        assert_eq!(days[0].header, "Monday, January 1");
        let first: Vec<_> = days[0].activities.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(first, ["check in", "museum"]);
        let second: Vec<_> = days[1].activities.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(second, ["breakfast", "dinner"]);
    }

    #[test]
    fn empty_input_has_no_days() {
        assert!(group_by_day(Vec::new()).is_empty());
    }

    #[test]
    fn flat_sort_orders_across_days() {
        let mut items = vec![
            activity("2024-01-02", "07:00", "c"),
            activity("2024-01-01", "23:59", "b"),
            activity("2024-01-01", "00:00", "a"),
        ];
        sort_chronologically(&mut items);
        let titles: Vec<_> = items.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[test]
    fn text_order_matches_clock_order_for_every_minute() {
        let times: Vec<String> = (0..24)
            .flat_map(|h| (0..60).map(move |m| format!("{h:02}:{m:02}")))
            .collect();
        let mut by_text = times.clone();
        by_text.reverse();
        by_text.sort();
        let mut by_clock = times.clone();
        by_clock.reverse();
        by_clock.sort_by_key(|t| NaiveTime::parse_from_str(t, "%H:%M").expect("valid time"));
        assert_eq!(by_text, by_clock);
    }

    #[test]
    fn malformed_times_sort_without_erroring() {
        // "9:00" sorts after "10:00" as text
        let days = group_by_day(vec![
            activity("2024-01-01", "9:00", "late"),
            activity("2024-01-01", "10:00", "early"),
        ]);
        let titles: Vec<_> = days[0].activities.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["early", "late"]);
    }

    #[test]
    fn header_falls_back_to_raw_text() {
        assert_eq!(format_day_header("someday"), "someday");
    }

    #[test]
    fn date_range_formats() {
        assert_eq!(
            format_date_range("2024-05-01", "2024-05-07"),
            "May 1, 2024 - May 7, 2024"
        );
        assert_eq!(format_date_range("2024-05-01", "2024-05-01"), "May 1, 2024");
        assert_eq!(format_date_range("soon", "later"), "soon - later");
    }

    #[test]
    fn linkify_wraps_urls_in_anchors() {
        let html = linkify("Tickets at https://example.com/tickets?day=1 and more");
        assert!(html.starts_with("Tickets at <a href=\""));
        assert!(html.contains(r#"target="_blank" rel="noopener noreferrer">"#));
        assert!(html.contains("example.com"));
        assert!(html.ends_with("</a> and more"));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn linkify_escapes_markup_around_and_inside_links() {
        let html = linkify("<b>bold</b> http://x.test/\"onmouseover=1 & done");
        assert!(html.starts_with("&lt;b&gt;bold&lt;"));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("\"onmouseover"));
        assert!(html.contains("&amp; done"));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn linkify_leaves_plain_text_alone() {
        assert_eq!(linkify("just a walk"), "just a walk");
        assert_eq!(linkify(""), "");
    }
}
