//! server-info scraping
//!
//! `server-info?config` renders the loaded configuration as HTML, e.g.
//! `<tt>MaxClients <i>150</i></tt>`. Only the worker limit is extracted.

use regex::Regex;
use std::sync::LazyLock;

// Apache 2.4 renamed MaxClients to MaxRequestWorkers.
static MAX_CLIENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:MaxClients|MaxRequestWorkers) <i>(\d+)</i>").expect("valid regex")
});

/// First worker limit found in a line of server-info output
pub fn max_clients(line: &str) -> Option<&str> {
    MAX_CLIENTS
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
