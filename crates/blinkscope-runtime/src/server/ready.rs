//! Ready-marker detection in dev-server output.

use regex::Regex;
use url::Url;

/// Marker printed by the dev server once it is listening.
const READY_MARKER: &str = "- Local:";

/// Scans output lines for the first local-address announcement.
///
/// At most one ready URL is produced per scanner; every match after
/// the first is ignored.
pub struct ReadyScanner {
    pattern: Regex,
    target_url: Option<String>,
    seen: bool,
}

impl ReadyScanner {
    pub fn new(target_url: Option<String>) -> Self {
        // Marker, whitespace, then the localhost URL
        let pattern = Regex::new(r"- Local:\s+(http://localhost:\d+)").unwrap();
        Self {
            pattern,
            target_url,
            seen: false,
        }
    }

    /// Returns the serving URL when `line` carries the first
    /// recognizable ready announcement; `None` for every other line
    /// and for repeat announcements.
    pub fn scan(&mut self, line: &str) -> Option<String> {
        if self.seen || !line.contains(READY_MARKER) {
            return None;
        }
        let base = self.pattern.captures(line)?.get(1)?.as_str();
        self.seen = true;
        Some(self.serving_url(base))
    }

    /// Append the configured target as a URL-encoded `url` query
    /// parameter when one was supplied.
    fn serving_url(&self, base: &str) -> String {
        let Some(target) = self.target_url.as_deref() else {
            return base.to_string();
        };
        match Url::parse(base) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("url", target);
                url.to_string()
            }
            Err(_) => base.to_string(),
        }
    }
}
