//! Diagnostic HTML pages: daily usage table and operational self-check.

use tracker_core::{DailyUsage, StoreCounts, TrackerConfig};

/// Daily usage table, one row per day, newest first.
pub fn stats_page(hostname: &str, table: &[DailyUsage]) -> String {
    let mut out = String::new();
    out.push_str(&format!("<h1>Stats for tracker: {hostname}</h1>\n"));
    out.push_str("<table border>\n");
    out.push_str("<tr><td>Date</td><td>#Addresses</td><td>#Identifiers</td></tr>\n");
    for usage in table {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            usage.day, usage.addresses, usage.identifiers
        ));
    }
    out.push_str("</table>\n");
    out
}

/// Operational self-check: store reachability and effective settings.
pub fn config_page(config: &TrackerConfig, counts: StoreCounts) -> String {
    let mut out = String::new();
    out.push_str("<div>Tracker operational self-check.</div>\n");
    out.push_str(&format!(
        "Address store : OK ({} primary rows, {} alternate rows)<br>\n",
        counts.primary_rows, counts.alternate_rows
    ));
    out.push_str(&format!(
        "Record TTL : {} seconds<br>\n",
        config.record_ttl_secs
    ));
    if config.stats.enabled {
        out.push_str(&format!(
            "Stats reporting : enabled ({})<br>\n",
            config.stats.collector_url
        ));
    } else {
        out.push_str("Stats reporting : disabled<br>\n");
    }
    out.push_str(&format!("tracker : {}<br>\n", config.stats.hostname));
    out
}
