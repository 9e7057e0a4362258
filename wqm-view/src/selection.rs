//! Per-session selection state and the resolver that turns view-host events
//! into map and chart views.
//!
//! The resolver owns one [`SelectionState`] and a shared snapshot of the
//! canonical table. Each client session gets its own resolver; the table
//! itself is shared read-only.

use crate::projection::{project_chart, project_map, ChartView, MapView, PAGE_TITLE};
use crate::queries::{self, SiteSeries};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use wqm_core::canonical::CanonicalTable;
use wqm_core::error::ParseError;
use wqm_core::normalize::NormalizedResult;
use wqm_utils::dates::parse_iso_date;

/// What the user currently has selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SelectionState {
    pub selected_site_name: Option<String>,
    pub selected_date: Option<NaiveDate>,
    pub selected_parameters: BTreeSet<String>,
}

impl SelectionState {
    /// No site, the most recent E. coli date, and every known parameter.
    pub fn initial(table: &CanonicalTable) -> Self {
        Self {
            selected_site_name: None,
            selected_date: queries::available_dates(table).first().copied(),
            selected_parameters: table.parameters().iter().cloned().collect(),
        }
    }
}

/// A user interaction reported by the view host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SiteClicked { site_name: String },
    /// `date` is an ISO-8601 "YYYY-MM-DD" string, validated on apply.
    DateChosen { date: String },
    ParametersChosen { parameters: Vec<String> },
}

impl Event {
    /// Decode one JSON event, e.g. `{"event":"date_chosen","date":"2020-06-01"}`.
    pub fn from_json(input: &str) -> Result<Self, ParseError> {
        serde_json::from_str(input).map_err(|e| ParseError::InvalidEvent(e.to_string()))
    }
}

/// Everything the host renders after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    pub title: &'static str,
    pub parameters: Vec<String>,
    pub selected_parameters: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub selected_date: Option<NaiveDate>,
    pub selected_site_name: Option<String>,
    pub map: MapView,
    pub chart: ChartView,
}

#[derive(Debug, Clone)]
pub struct SelectionResolver {
    table: Arc<CanonicalTable>,
    state: SelectionState,
}

impl SelectionResolver {
    pub fn new(table: Arc<CanonicalTable>) -> Self {
        let state = SelectionState::initial(&table);
        Self { table, state }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn table(&self) -> &Arc<CanonicalTable> {
        &self.table
    }

    /// Point this session at a newer table snapshot, keeping its selections.
    pub fn rebind(&mut self, table: Arc<CanonicalTable>) {
        self.table = table;
    }

    /// Apply one event. A malformed payload is rejected and leaves the state untouched.
    pub fn apply(&mut self, event: Event) -> Result<(), ParseError> {
        match event {
            Event::SiteClicked { site_name } => {
                self.site_clicked(site_name);
                Ok(())
            }
            Event::DateChosen { date } => self.date_chosen(&date),
            Event::ParametersChosen { parameters } => {
                self.parameters_chosen(parameters);
                Ok(())
            }
        }
    }

    pub fn site_clicked(&mut self, site_name: impl Into<String>) {
        let site_name = site_name.into();
        debug!("selection: site clicked {:?}", site_name);
        self.state.selected_site_name = Some(site_name);
    }

    pub fn date_chosen(&mut self, date: &str) -> Result<(), ParseError> {
        let parsed = parse_iso_date(date).map_err(|source| {
            warn!("selection: rejected date {:?}: {}", date, source);
            ParseError::InvalidDate {
                input: date.to_string(),
                source,
            }
        })?;
        if !queries::has_ecoli_readings(&self.table, parsed) {
            debug!("selection: date {} has no E. coli readings", parsed);
        }
        self.state.selected_date = Some(parsed);
        Ok(())
    }

    pub fn parameters_chosen<I, S>(&mut self, parameters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.selected_parameters = parameters.into_iter().map(Into::into).collect();
        debug!(
            "selection: {} parameters chosen",
            self.state.selected_parameters.len()
        );
    }

    pub fn available_dates(&self) -> Vec<NaiveDate> {
        queries::available_dates(&self.table)
    }

    pub fn map_points(&self) -> Vec<&NormalizedResult> {
        queries::map_points(&self.table, self.state.selected_date)
    }

    pub fn chart_series(&self) -> Option<SiteSeries> {
        queries::chart_series(
            &self.table,
            self.state.selected_site_name.as_deref(),
            &self.state.selected_parameters,
        )
    }

    pub fn map_view(&self) -> MapView {
        project_map(self.map_points())
    }

    pub fn chart_view(&self) -> ChartView {
        project_chart(self.chart_series().as_ref(), self.state.selected_date)
    }

    pub fn views(&self) -> Views {
        Views {
            title: PAGE_TITLE,
            parameters: self.table.parameters().to_vec(),
            selected_parameters: self.state.selected_parameters.iter().cloned().collect(),
            dates: self.available_dates(),
            selected_date: self.state.selected_date,
            selected_site_name: self.state.selected_site_name.clone(),
            map: self.map_view(),
            chart: self.chart_view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_table;

    fn resolver() -> SelectionResolver {
        SelectionResolver::new(Arc::new(fixture_table()))
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let resolver = resolver();
        let state = resolver.state();
        assert_eq!(state.selected_site_name, None);
        assert_eq!(state.selected_date, Some(ymd(2020, 6, 8)));
        assert_eq!(state.selected_parameters.len(), 3);
        assert!(resolver.chart_series().is_none());
        assert_eq!(resolver.map_points().len(), 1);
    }

    #[test]
    fn test_initial_state_of_empty_table() {
        let resolver = SelectionResolver::new(Arc::new(CanonicalTable::default()));
        assert_eq!(resolver.state(), &SelectionState::default());
        assert!(resolver.map_view().points.is_empty());
        assert!(resolver.chart_view().series.is_empty());
    }

    #[test]
    fn test_site_and_date_events_drive_views() {
        let mut resolver = resolver();
        resolver
            .apply(Event::SiteClicked {
                site_name: "Boat Ramp B".to_string(),
            })
            .unwrap();
        resolver
            .apply(Event::DateChosen {
                date: "2020-06-01".to_string(),
            })
            .unwrap();

        let map = resolver.map_view();
        assert_eq!(map.points.len(), 2);

        let chart = resolver.chart_view();
        assert_eq!(chart.title.as_deref(), Some("Boat Ramp B"));
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.reference_line.unwrap().x, ymd(2020, 6, 1));
    }

    #[test]
    fn test_chart_is_not_date_filtered() {
        let mut resolver = resolver();
        resolver.site_clicked("Boat Ramp B");
        let before = resolver.chart_series();
        resolver.date_chosen("2020-05-20").unwrap();
        assert_eq!(resolver.chart_series(), before);
    }

    #[test]
    fn test_parameters_chosen_filters_chart() {
        let mut resolver = resolver();
        resolver.site_clicked("Beach A");
        resolver.parameters_chosen(["Total Phosphorus"]);
        let series = resolver.chart_series().unwrap();
        assert_eq!(series.by_parameter.len(), 1);
        assert!(series.by_parameter.contains_key("Total Phosphorus"));

        resolver.parameters_chosen(Vec::<String>::new());
        assert!(resolver.chart_series().is_none());
    }

    #[test]
    fn test_invalid_date_keeps_state() {
        let mut resolver = resolver();
        let before = resolver.state().clone();
        let err = resolver
            .apply(Event::DateChosen {
                date: "June 1st".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { .. }));
        assert_eq!(resolver.state(), &before);
    }

    #[test]
    fn test_unknown_date_and_site_resolve_to_empty_views() {
        let mut resolver = resolver();
        resolver.date_chosen("1999-01-01").unwrap();
        resolver.site_clicked("Nowhere");
        assert!(resolver.map_view().points.is_empty());
        assert!(resolver.chart_view().series.is_empty());
    }

    #[test]
    fn test_event_from_json() {
        let event = Event::from_json(r#"{"event":"parameters_chosen","parameters":["Enterococcus"]}"#).unwrap();
        assert_eq!(
            event,
            Event::ParametersChosen {
                parameters: vec!["Enterococcus".to_string()]
            }
        );
        assert!(matches!(
            Event::from_json(r#"{"event":"zoomed"}"#),
            Err(ParseError::InvalidEvent(_))
        ));
    }

    #[test]
    fn test_rebind_keeps_selection() {
        let mut resolver = resolver();
        resolver.site_clicked("Beach A");
        resolver.rebind(Arc::new(CanonicalTable::default()));
        assert_eq!(resolver.state().selected_site_name.as_deref(), Some("Beach A"));
        assert!(resolver.chart_series().unwrap().is_empty());
    }

    #[test]
    fn test_views_bundle() {
        let resolver = resolver();
        let views = resolver.views();
        assert_eq!(views.title, "E. coli Levels");
        assert_eq!(views.dates.len(), 3);
        assert_eq!(views.selected_date, Some(ymd(2020, 6, 8)));
        assert_eq!(views.parameters, views.selected_parameters);
        assert_eq!(views.map.points[0].label, "Beach A");
        assert!(views.chart.title.is_none());
    }
}
