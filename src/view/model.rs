use chrono::{DateTime, NaiveDate};

use crate::models::{Registration, RegistrationId, Status};

/// Maximum number of cards in the gallery
pub const GALLERY_LIMIT: usize = 6;

/// Text shown for dates that can't be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Visual tone of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    /// Positive outcome (Attended)
    Success,
    /// Neutral highlight (Registered)
    Primary,
    /// Negative outcome (Cancelled)
    Danger,
    /// Muted fallback for anything else
    Secondary,
}

/// Status badge: label plus tone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Target of the row's edit/delete actions
    pub id: Option<RegistrationId>,
    pub event_name: String,
    pub category: String,
    pub date: String,
    pub badge: Badge,
}

/// One gallery card (no actions)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub event_name: String,
    pub category: String,
    pub date: String,
    pub badge: Badge,
}

pub fn badge_for(status: &Status) -> Badge {
    let tone = match status {
        Status::Attended => BadgeTone::Success,
        Status::Registered => BadgeTone::Primary,
        Status::Cancelled => BadgeTone::Danger,
        Status::Other(_) => BadgeTone::Secondary,
    };
    Badge {
        label: status.label().to_string(),
        tone,
    }
}

/// Calendar date of a `YYYY-MM-DD` string or an RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Format an ISO date as `May 1, 2024`
/// Accepts plain dates and RFC 3339 timestamps (date part taken as written).
/// Anything else yields [`INVALID_DATE`].
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Table projection: every record, in input order
pub fn table_rows(records: &[Registration]) -> Vec<RowView> {
    records
        .iter()
        .map(|r| RowView {
            id: r.id.clone(),
            event_name: r.event_name.clone(),
            category: r.category.clone(),
            date: format_date(&r.date),
            badge: badge_for(&r.status),
        })
        .collect()
}

/// Gallery projection: the first [`GALLERY_LIMIT`] records, in input order
pub fn gallery_cards(records: &[Registration]) -> Vec<CardView> {
    records
        .iter()
        .take(GALLERY_LIMIT)
        .map(|r| CardView {
            event_name: r.event_name.clone(),
            category: r.category.clone(),
            date: format_date(&r.date),
            badge: badge_for(&r.status),
        })
        .collect()
}

/// Number of gallery columns for a given width in cells
pub fn gallery_columns(width: u16) -> usize {
    match width {
        0..60 => 1,
        60..100 => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> Vec<Registration> {
        (0..n)
            .map(|i| {
                Registration::new(
                    format!("Event {}", i),
                    "Workshop",
                    "2024-05-01",
                    Status::Registered,
                )
                .with_id(i as u64 + 1)
            })
            .collect()
    }

    #[test]
    fn test_badge_mapping() {
        assert_eq!(badge_for(&Status::Attended).tone, BadgeTone::Success);
        assert_eq!(badge_for(&Status::Registered).tone, BadgeTone::Primary);
        assert_eq!(badge_for(&Status::Cancelled).tone, BadgeTone::Danger);
        assert_eq!(badge_for(&Status::Cancelled).label, "Cancelled");
    }

    #[test]
    fn test_unknown_status_falls_back_to_secondary() {
        for other in ["Waitlisted", "", "attended", "CANCELLED"] {
            let badge = badge_for(&other.parse::<Status>().unwrap());
            assert_eq!(badge.tone, BadgeTone::Secondary, "status {:?}", other);
            assert_eq!(badge.label, other);
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-05-01"), "May 1, 2024");
        assert_eq!(format_date("2023-12-25"), "Dec 25, 2023");
        assert_eq!(format_date("2024-05-01T23:30:00-05:00"), "May 1, 2024");
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(format_date(""), INVALID_DATE);
        assert_eq!(format_date("tomorrow"), INVALID_DATE);
        assert_eq!(format_date("2024-02-30"), INVALID_DATE);
    }

    #[test]
    fn test_table_keeps_all_rows_in_order() {
        let records = sample(9);
        let rows = table_rows(&records);
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].event_name, "Event 0");
        assert_eq!(rows[8].id, Some(RegistrationId::Number(9)));
        assert_eq!(rows[3].date, "May 1, 2024");
    }

    #[test]
    fn test_gallery_is_capped_prefix_of_table() {
        for n in [0, 1, 5, 6, 7, 20] {
            let records = sample(n);
            let rows = table_rows(&records);
            let cards = gallery_cards(&records);

            assert_eq!(cards.len(), n.min(GALLERY_LIMIT));
            for (card, row) in cards.iter().zip(rows.iter()) {
                assert_eq!(card.event_name, row.event_name);
                assert_eq!(card.date, row.date);
                assert_eq!(card.badge, row.badge);
            }
        }
    }

    #[test]
    fn test_gallery_columns() {
        assert_eq!(gallery_columns(40), 1);
        assert_eq!(gallery_columns(60), 2);
        assert_eq!(gallery_columns(99), 2);
        assert_eq!(gallery_columns(140), 3);
    }
}
