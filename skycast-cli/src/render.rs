//! Plain-text rendering of lookups.

use std::fmt::Write;

use skycast_core::{HealthReadout, RenderState, ViewModel};

pub fn render_state(state: &RenderState) -> String {
    match state {
        RenderState::Ready(view) => render_view(view),
        RenderState::NoData { message, previous } => {
            let mut out = format!("No weather data: {message}\n");
            if let Some(previous) = previous {
                let _ = writeln!(out, "Last successful lookup: {}", previous.display_name);
            }
            out
        }
    }
}

pub fn render_view(view: &ViewModel) -> String {
    let t = view.temperature_label();
    let w = view.wind_label();
    let c = &view.current;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", view.display_name, title_case(&c.description));
    let _ = writeln!(
        out,
        "  {:.0}{t}, feels like {:.0}{t}",
        c.temperature, c.feels_like
    );
    let _ = writeln!(out, "  Humidity {}% · Wind {} {w}", c.humidity_pct, c.wind_speed);
    let _ = writeln!(out, "  Sunrise {} / Sunset {}", view.sunrise_local, view.sunset_local);
    let _ = writeln!(
        out,
        "  Coordinates {:.2}, {:.2} · Pressure {} hPa",
        c.coordinates.lat, c.coordinates.lon, c.pressure_hpa
    );
    if let Some(km) = view.visibility_km {
        let _ = writeln!(out, "  Visibility {km:.1} km");
    }

    let _ = write!(out, "  Theme {}", view.theme.background_id);
    if let Some(animation) = view.theme.animation_id {
        let _ = write!(out, " ({animation} animation)");
    }
    out.push('\n');

    let _ = writeln!(out, "\n{}-Day Forecast", view.daily.len());
    for day in &view.daily {
        let _ = writeln!(
            out,
            "  {}  {:>4.0}{t}  {:<13} wind {:.1} {w}",
            day.date.format("%a %d %b"),
            day.average_temperature,
            day.representative_condition,
            day.average_wind_speed
        );
    }

    if let Some(health) = &view.health {
        let _ = writeln!(out, "\n{}", health_line(health));
    }

    out
}

pub fn health_line(health: &HealthReadout) -> String {
    let latency = health
        .latest_latency_ms
        .map(|ms| format!("{ms:.0} ms"))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "Provider uptime {:.0}% over {} call(s), last latency {latency}",
        health.availability_ratio * 100.0,
        health.samples
    )
}

/// Uppercase the first letter of every word, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}
