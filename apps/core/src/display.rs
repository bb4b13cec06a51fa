use chrono::{DateTime, Utc};
use url::Url;

use crate::model::{SearchCandidate, SourceKind};

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Favicon service url for the page's host. Empty when the url does not parse
/// or has no host.
pub fn favicon_url(page_url: &str) -> String {
    let Ok(parsed) = Url::parse(page_url) else {
        return String::new();
    };
    match parsed.host_str() {
        Some(host) => format!("{FAVICON_SERVICE}?domain={host}&sz=32"),
        None => String::new(),
    }
}

pub fn fallback_glyph(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Tab => "📄",
        SourceKind::Bookmark => "🔖",
        SourceKind::History => "🕒",
    }
}

/// Tabs report their own favicon; everything else goes through the service.
pub fn icon_for(candidate: &SearchCandidate) -> String {
    if let Some(icon) = candidate.fav_icon_url.as_deref().filter(|icon| !icon.is_empty()) {
        return icon.to_string();
    }
    favicon_url(candidate.url_or_empty())
}

/// `Oct 18, 2026` for a millisecond timestamp. Missing or out-of-range values
/// render as the epoch.
pub fn format_visit_date(last_visit_time_ms: Option<f64>) -> String {
    let millis = last_visit_time_ms
        .filter(|ms| ms.is_finite())
        .map(|ms| ms as i64)
        .unwrap_or(0);
    let visited: DateTime<Utc> = DateTime::from_timestamp_millis(millis).unwrap_or_default();
    visited.format("%b %-d, %Y").to_string()
}

/// Secondary line under a result's title.
pub fn subtitle(candidate: &SearchCandidate) -> String {
    match candidate.kind {
        SourceKind::History => format!(
            "{} - Visited {}",
            candidate.url_or_empty(),
            format_visit_date(candidate.last_visit_time)
        ),
        SourceKind::Tab | SourceKind::Bookmark => candidate.url_or_empty().to_string(),
    }
}
