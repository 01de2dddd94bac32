//! Plain-text rendering of the display state.

use cityweather_core::{ChartSeries, DisplayState};

const PLOT_WIDTH: usize = 30;

/// Temperature, description and icon, or the error that replaced them.
pub fn panel(state: &DisplayState) -> String {
    if let Some(error) = &state.error {
        return format!("{error}\n");
    }

    let mut lines = Vec::new();
    if let Some(city) = &state.city {
        lines.push(city.clone());
    }
    if let Some(temp) = &state.temperature_text {
        lines.push(format!("  {temp}"));
    }
    if let Some(description) = &state.description {
        lines.push(format!("  {description}"));
    }
    if let Some(url) = &state.icon_url {
        let saved = if state.icon.is_some() { " (saved)" } else { "" };
        lines.push(format!("  icon: {url}{saved}"));
    }

    terminate(lines)
}

/// Forecast as a table with one marker per point, placed by temperature.
pub fn chart(series: &ChartSeries) -> String {
    let mut lines = vec![series.title.clone()];

    let Some((lo, hi)) = series.y_range() else {
        lines.push("  (no forecast entries)".to_string());
        return terminate(lines);
    };

    let ticks = series.x_ticks();
    let tick_width = ticks.iter().map(String::len).max().unwrap_or(0).max(series.x_label.len());

    lines.push(format!("{:<tick_width$}  {}", series.x_label, series.y_label));
    lines.extend(ticks.iter().zip(&series.points).map(|(tick, point)| {
        let offset = marker_offset(point.temperature_celsius, lo, hi);
        format!("{tick:<tick_width$}  {:>6.1}  {}o", point.temperature_celsius, " ".repeat(offset))
    }));

    terminate(lines)
}

fn terminate(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn marker_offset(value: f64, lo: f64, hi: f64) -> usize {
    if hi - lo < f64::EPSILON {
        return PLOT_WIDTH / 2;
    }
    let ratio = (value - lo) / (hi - lo);
    (ratio * PLOT_WIDTH as f64).round() as usize
}
