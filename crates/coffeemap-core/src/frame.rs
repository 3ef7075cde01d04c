// crates/coffeemap-core/src/frame.rs

//! Render-ready rows: what a choropleth layer needs for one view.

use crate::matcher::{MatchResult, MatchTier};
use crate::table::{CountryValue, Selection, TypeFilter};
use serde::Serialize;

/// One country on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    /// Name as it appears in the statistics.
    pub country: String,
    pub value: f64,
    /// Matched boundary region, if any.
    pub region: Option<String>,
    /// Region id handed to the renderer. Falls back to `country`, which no
    /// feature carries, so the renderer leaves it undrawn.
    pub plot_location: String,
    pub tier: Option<MatchTier>,
}

/// Aggregated values joined with their regions for one metric and selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethFrame {
    pub metric: String,
    pub selection: Selection,
    pub rows: Vec<FrameRow>,
}

impl ChoroplethFrame {
    pub fn build(
        metric: impl Into<String>,
        selection: &Selection,
        values: Vec<CountryValue>,
        matches: &MatchResult,
    ) -> Self {
        let rows = values
            .into_iter()
            .map(|CountryValue { country, value }| {
                let found = matches.get(&country).flatten();
                FrameRow {
                    region: found.map(|m| m.reference.clone()),
                    plot_location: matches.location(&country).to_owned(),
                    tier: found.map(|m| m.tier),
                    value,
                    country,
                }
            })
            .collect();

        Self {
            metric: metric.into(),
            selection: selection.clone(),
            rows,
        }
    }

    /// `"Export - 2019"`, or `"Export - 2019 (Robusta)"` with a type filter.
    pub fn title(&self) -> String {
        let mut title = format!("{} - {}", self.metric, self.selection.year_label);
        if let TypeFilter::Only(label) = &self.selection.coffee_type {
            title.push_str(&format!(" ({label})"));
        }
        title
    }

    /// Countries that will show as missing on the map.
    pub fn unmatched(&self) -> impl Iterator<Item = &FrameRow> {
        self.rows.iter().filter(|row| row.region.is_none())
    }

    pub fn matched_count(&self) -> usize {
        self.rows.iter().filter(|row| row.region.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ReferenceIndex;
    use crate::matcher::{resolve, Cutoff};

    #[test]
    fn rows_carry_region_or_placeholder() {
        let index = ReferenceIndex::build(["Viet Nam", "Brazil"]);
        let values = vec![
            CountryValue { country: "Atlantis".into(), value: 3.0 },
            CountryValue { country: "Brazil".into(), value: 10.0 },
            CountryValue { country: "Viet-Nam".into(), value: 4.5 },
        ];
        let matches = resolve(
            values.iter().map(|v| v.country.as_str()),
            &index,
            Cutoff::default(),
        );
        let selection = Selection::new("2019", TypeFilter::All);
        let frame = ChoroplethFrame::build("Export", &selection, values, &matches);

        assert_eq!(frame.rows.len(), 3);
        assert_eq!(frame.rows[0].plot_location, "Atlantis");
        assert_eq!(frame.rows[0].region, None);
        assert_eq!(frame.rows[1].tier, Some(MatchTier::Exact));
        assert_eq!(frame.rows[2].plot_location, "Viet Nam");
        assert_eq!(frame.rows[2].tier, Some(MatchTier::Normalized));
        assert_eq!(frame.matched_count(), 2);
        assert_eq!(frame.unmatched().count(), 1);
        assert_eq!(frame.title(), "Export - 2019");
    }

    #[test]
    fn title_mentions_type_filter() {
        let frame = ChoroplethFrame::build(
            "Production",
            &Selection::new("1990/91", TypeFilter::Only("Robusta".into())),
            Vec::new(),
            &MatchResult::default(),
        );
        assert_eq!(frame.title(), "Production - 1990/91 (Robusta)");
    }
}
