//! Marker listings for the terminal.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use serde::Serialize;

use crate::bucket::ColorBucket;
use crate::marker::Marker;
use crate::models::Feature;

// ANSI codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// A feature together with the marker it renders to.
///
/// This is the normalized structure emitted in JSON/NDJSON output.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerRecord {
    pub id: Option<String>,
    pub time: Option<String>,
    pub magnitude: Option<f64>,
    pub place: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: Option<f64>,
    pub radius: f64,
    pub fill_color: ColorBucket,
}

impl From<&Feature> for MarkerRecord {
    fn from(f: &Feature) -> Self {
        let marker = Marker::from(f);
        Self {
            id: f.id.clone(),
            time: f.time().map(|t| t.to_rfc3339()),
            magnitude: f.properties.mag,
            place: f.properties.place.clone(),
            latitude: marker.position.lat,
            longitude: marker.position.lng,
            depth_km: f.depth_km(),
            radius: marker.style.radius,
            fill_color: marker.style.fill_color,
        }
    }
}

/// Write markers in human-readable format, colored by bucket.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, records: &[MarkerRecord]) -> io::Result<()> {
    for record in records {
        let color = record.fill_color.ansi();
        let mag = record
            .magnitude
            .map_or_else(|| "?".into(), |m| format!("{m:.1}"));
        let time = record.time.as_deref().unwrap_or("unknown");
        let place = record.place.as_deref().unwrap_or("Unknown location");

        writeln!(
            writer,
            "{color}{BOLD}M{mag:>4}{RESET} │ \
             {color}{:<6}{RESET} │ \
             {DIM}r={:>5.1}{RESET} │ \
             {:>7.2}, {:>8.2} │ \
             {time} │ {place}",
            record.fill_color.as_css(),
            record.radius,
            record.latitude,
            record.longitude,
        )?;
    }
    Ok(())
}

/// Write markers as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, records: &[MarkerRecord]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write markers as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, records: &[MarkerRecord]) -> io::Result<()> {
    for record in records {
        let json = serde_json::to_string(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write markers for `features` in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_markers<W: Write>(writer: &mut W, features: &[Feature], format: Format) -> io::Result<()> {
    let records: Vec<MarkerRecord> = features.iter().map(MarkerRecord::from).collect();
    match format {
        Format::Human => write_human(writer, &records),
        Format::Json => write_json(writer, &records),
        Format::Ndjson => write_ndjson(writer, &records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureCollection;
    use crate::models::tests::SAMPLE_FEED;

    fn sample() -> Vec<Feature> {
        let feed: FeatureCollection = serde_json::from_str(SAMPLE_FEED).unwrap();
        feed.features
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("human".parse::<Format>().unwrap(), Format::Human);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("ndjson".parse::<Format>().unwrap(), Format::Ndjson);
        assert!("invalid".parse::<Format>().is_err());
    }

    #[test]
    fn test_ndjson_one_line_per_feature() {
        let mut out = Vec::new();
        write_markers(&mut out, &sample(), Format::Ndjson).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["fill_color"], "Orange");
        assert_eq!(first["radius"], 22.5);
        assert_eq!(first["id"], "nc75000001");
        assert_eq!(first["time"], "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_json_array() {
        let mut out = Vec::new();
        write_markers(&mut out, &sample(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1]["fill_color"], "Red");
        assert!(items[3]["magnitude"].is_null());
    }

    #[test]
    fn test_human_lines() {
        let mut out = Vec::new();
        write_markers(&mut out, &sample(), Format::Human).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("10km NE of Town"));
        assert!(text.contains("Unknown location"));
    }
}
