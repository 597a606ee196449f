//! Plain-text rendering of command output.

use std::fmt::Write as _;

use park_a_don_api_models::RiskAssessment;
use park_a_don_regulation::LegendEntry;
use park_a_don_zone::{HeatLayer, MapLayer};

pub fn legend_table(legend: &[LegendEntry]) -> String {
    let mut out = String::from("Parking Duration\n");
    for entry in legend {
        let _ = writeln!(out, "  {}  {}", entry.hex, entry.label);
    }
    out
}

/// Per-color counts, followed by the allowed count when the layer carries
/// availability.
pub fn layer_summary(layer: &MapLayer, total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} of {total} zones shown ({} without geometry)",
        layer.segments.len(),
        layer.unrenderable
    );
    for (color, count) in layer.counts_by_color() {
        let _ = writeln!(out, "  {:<12} {count:>6}", color.label());
    }
    if layer.segments.iter().any(|s| s.availability.is_some()) {
        let _ = writeln!(out, "  {:<12} {:>6}", "Allowed now", layer.allowed_count());
    }
    out
}

pub fn layer_details(layer: &MapLayer) -> String {
    let mut out = String::new();
    for segment in &layer.segments {
        let _ = writeln!(out, "\n[{}]\n{}", segment.color.label(), segment.summary);
    }
    out
}

pub fn heat_summary(heat: &HeatLayer) -> String {
    if heat.is_empty() {
        return "No ticket data\n".to_string();
    }
    format!(
        "{} ticket points (total weight {:.1})\n",
        heat.points.len(),
        heat.total_weight()
    )
}

pub fn risk_card(assessment: &RiskAssessment) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Risk: {} ({:.1})",
        assessment.risk_level, assessment.risk_score
    );
    if let Some(address) = &assessment.matched_address {
        let _ = writeln!(out, "Matched: {address}");
    }
    let _ = writeln!(out, "Zone: {}", assessment.zone_id);
    if let Some(peak) = &assessment.peak_info {
        let _ = writeln!(out, "Peak: {} at {}:00", peak.day, peak.hour);
    }
    if assessment.is_peak_time == Some(true) {
        let _ = writeln!(out, "Currently peak ticketing time");
    }
    if let Some(stats) = &assessment.statistics {
        let _ = writeln!(
            out,
            "Tickets: {} over {} days ({:.1}/day)",
            stats.total_tickets, stats.data_period_days, stats.tickets_per_day
        );
    }
    let _ = writeln!(out, "{}", assessment.recommendation);
    out
}
