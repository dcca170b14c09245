//! Plain-text frames for each view. Pure functions of consumer state.

use chrono::{DateTime, Utc};
use parkcore::guidance::GuidanceFrame;
use parkcore::layout::{group_by_initial, partition, ExpandedSections, SectionNames};
use parkcore::model::{Basement, DirectionalCounts, Heading, OccupancySnapshot};
use parkcore::sync::{
    basement_share, basement_tally, format_last_updated, status_level, DataState, Feed,
    StatusLevel, BASEMENT_SHARES,
};

const BAR_WIDTH: usize = 30;

fn bar(fill: f32) -> String {
    let filled = ((fill.clamp(0.0, 1.0) * BAR_WIDTH as f32).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn link_label<T>(feed: &Feed<T>, online: &str) -> String {
    let link = if feed.connectivity().is_connected() {
        online
    } else {
        "Offline"
    };
    if feed.shows_spinner() {
        format!("{link} (refreshing...)")
    } else {
        link.to_string()
    }
}

fn error_banner<T>(feed: &Feed<T>, lines: &mut Vec<String>) {
    if let Some(error) = feed.error() {
        lines.push(format!("! {error}  [r] Retry"));
    }
}

fn status_word(level: StatusLevel) -> &'static str {
    match level {
        StatusLevel::Open => "open",
        StatusLevel::Full => "full",
        StatusLevel::Offline => "offline",
    }
}

/// Home screen: facility-wide availability from the occupied-count endpoint.
pub fn render_summary(feed: &Feed<OccupancySnapshot>) -> Vec<String> {
    let mut lines = vec![format!("First Parking  [{}]", link_label(feed, "Connected"))];
    error_banner(feed, &mut lines);

    let Some(snapshot) = feed.data() else {
        lines.push("Live Parking Availability: no data yet".into());
        return lines;
    };

    let level = status_level(feed.connectivity(), snapshot.available);
    lines.push(format!(
        "Live Parking Availability: {} / {} ({})",
        snapshot.available,
        snapshot.total,
        status_word(level)
    ));
    let fill = if snapshot.total == 0 {
        0.0
    } else {
        snapshot.available as f32 / snapshot.total as f32
    };
    lines.push(bar(fill));
    for (basement, ratio) in BASEMENT_SHARES {
        lines.push(format!(
            "Basement Level {}: {} spaces available",
            basement.level(),
            basement_share(snapshot.available, ratio)
        ));
    }
    lines
}

/// Map screen: sections of the selected basement with expanded grids.
pub fn render_map(
    feed: &Feed<OccupancySnapshot>,
    basement: Basement,
    names: &SectionNames,
    expanded: &ExpandedSections,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = vec![format!("Live Parking Map  [{}]", link_label(feed, "Live"))];
    error_banner(feed, &mut lines);

    let spots = feed.data().map(|s| s.spots.as_slice()).unwrap_or_default();
    let tally = basement_tally(spots, basement);
    let mut stats = format!("{basement} | Available: {}/{}", tally.available, tally.total);
    if feed.last_updated().is_some() {
        stats.push_str(&format!(
            " | Updated {}",
            format_last_updated(feed.last_updated(), now)
        ));
    }
    lines.push(stats);
    lines.push(bar(tally.fill()));
    lines.push(format!(
        "Legend: free ({}) occupied ({})",
        tally.available,
        tally.occupied()
    ));

    let layout = partition(spots, basement, names);
    if layout.is_empty() {
        lines.push(match feed.data_state() {
            DataState::NoData if !feed.connectivity().is_connected() => {
                "Unable to load parking data  [r] Reload".into()
            }
            _ => "No parking data available  [r] Reload".into(),
        });
        return lines;
    }

    lines.push("Entry".into());
    for section in layout.sections() {
        let open = expanded.is_expanded(section.index);
        lines.push(format!(
            "{} {} {} ({}/{} free)",
            if open { "v" } else { ">" },
            section.index,
            section.label,
            section.available(),
            section.spots.len()
        ));
        if open {
            for (initial, group) in group_by_initial(section.spots.iter().copied()) {
                let cells: Vec<String> = group
                    .iter()
                    .map(|spot| {
                        let code = spot.name.split_whitespace().next().unwrap_or(&spot.name);
                        if spot.reserved {
                            format!("x{code}")
                        } else {
                            format!(" {code}")
                        }
                    })
                    .collect();
                lines.push(format!("    {initial}: {}", cells.join(" ")));
            }
        }
    }
    lines.push("Exit".into());
    lines
}

/// Navigation screen: free spots per direction for the selected zone.
pub fn render_directional(feed: &Feed<DirectionalCounts>, zone: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "Live Directional Status for {zone}  [{}]",
        link_label(feed, "Live")
    )];
    error_banner(feed, &mut lines);
    for heading in Heading::ALL {
        let count = feed
            .data()
            .map(|counts| counts.get(heading).to_string())
            .unwrap_or_else(|| "-".into());
        lines.push(format!("  {} {:<5} {count}", heading.arrow(), heading.to_string()));
    }
    lines
}

pub fn render_guidance(frame: &GuidanceFrame, active: bool) -> Vec<String> {
    vec![
        format!("{} {}", frame.maneuver.glyph(), frame.instruction),
        format!("  {}", frame.distance),
        format!(
            "  {} step {}/{}{}",
            frame.progress(),
            frame.index + 1,
            frame.total,
            if active { "" } else { " (stopped)" }
        ),
    ]
}
