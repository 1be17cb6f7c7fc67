//! Magnitude legend.

use crate::bucket::ColorBucket;

/// Lower bounds of the legend rows.
pub const BREAKPOINTS: [u8; 6] = [0, 1, 2, 3, 4, 5];

/// One legend row: a swatch and its magnitude range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub color: ColorBucket,
    pub label: String,
}

/// The legend control's content, built once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Build a legend from ascending breakpoints.
    ///
    /// Each row is colored like a magnitude one above its breakpoint and
    /// labeled `low–high`; the last row is open-ended (`5+`).
    #[must_use]
    pub fn from_breakpoints(breakpoints: &[u8]) -> Self {
        let entries = breakpoints
            .iter()
            .enumerate()
            .map(|(i, &low)| {
                let label = match breakpoints.get(i + 1) {
                    Some(high) => format!("{low}\u{2013}{high}"),
                    None => format!("{low}+"),
                };
                LegendEntry {
                    color: ColorBucket::for_magnitude(f64::from(low) + 1.0),
                    label,
                }
            })
            .collect();

        Self { entries }
    }

    /// Render the legend body as HTML fragments, one swatch per row.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    r#"<i style="background:{}"></i> {}"#,
                    entry.color.as_css(),
                    entry.label
                )
            })
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_entries() {
        let legend = Legend::from_breakpoints(&BREAKPOINTS);
        assert_eq!(legend.entries.len(), 6);
        assert_eq!(legend.entries[5].label, "5+");
        assert_eq!(legend.entries[0].label, "0\u{2013}1");
        assert_eq!(legend.entries[4].label, "4\u{2013}5");
    }

    #[test]
    fn test_entry_colors_match_buckets() {
        let colors: Vec<ColorBucket> = Legend::from_breakpoints(&BREAKPOINTS).entries.iter().map(|e| e.color).collect();
        assert_eq!(
            colors,
            vec![
                ColorBucket::Purple,
                ColorBucket::Blue,
                ColorBucket::Green,
                ColorBucket::Yellow,
                ColorBucket::Orange,
                ColorBucket::Red,
            ]
        );
    }

    #[test]
    fn test_html_fragments() {
        let html = Legend::from_breakpoints(&BREAKPOINTS).to_html();
        assert_eq!(html.matches("<i style=").count(), 6);
        assert!(html.starts_with(r#"<i style="background:Purple"></i> 0"#));
        assert!(html.ends_with(r#"<i style="background:Red"></i> 5+"#));
    }

    #[test]
    fn test_custom_breakpoints() {
        let legend = Legend::from_breakpoints(&[2, 6]);
        assert_eq!(legend.entries.len(), 2);
        assert_eq!(legend.entries[1].label, "6+");
        assert_eq!(legend.entries[0].color, ColorBucket::Green);
    }
}
