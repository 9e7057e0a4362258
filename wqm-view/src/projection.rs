//! Renderer-neutral descriptions of the map and chart.
//!
//! Every struct derives `Serialize` so the view host can hand the JSON to
//! whatever draws markers and lines. Nothing here knows about pixels.

use crate::queries::SiteSeries;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use wqm_core::normalize::NormalizedResult;
use wqm_core::severity::{Color, SeverityLevel};
use wqm_utils::dates::format_date;

/// Fixed y-range of the chart and of the selected-date marker.
pub const CHART_Y_RANGE: [f64; 2] = [0.0, 20_000.0];

pub const PAGE_TITLE: &str = "E. coli Levels";

/// Fixed presentation settings of the sites map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapLayout {
    pub title: &'static str,
    pub style: &'static str,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub marker_size: u8,
}

pub const MAP_LAYOUT: MapLayout = MapLayout {
    title: "Sites",
    style: "carto-positron",
    center_lat: 42.3,
    center_lon: -71.2,
    zoom: 9,
    marker_size: 14,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    /// Site name, also the value reported back on click.
    pub label: String,
    pub color: Option<Color>,
    pub severity: Option<SeverityLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub points: Vec<MapPoint>,
    pub layout: MapLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: NaiveDateTime,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

/// Vertical marker at the selected date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub x: NaiveDate,
    pub y_min: f64,
    pub y_max: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    /// Selected site name; `None` when no site is selected.
    pub title: Option<String>,
    pub series: Vec<ChartSeries>,
    pub reference_line: Option<ReferenceLine>,
    pub y_range: [f64; 2],
}

pub fn project_map<'a, I>(results: I) -> MapView
where
    I: IntoIterator<Item = &'a NormalizedResult>,
{
    let points = results
        .into_iter()
        .map(|row| MapPoint {
            lat: row.latitude,
            lon: row.longitude,
            label: row.site_name.clone(),
            color: row.color,
            severity: row.severity,
        })
        .collect();
    MapView {
        points,
        layout: MAP_LAYOUT,
    }
}

/// Build the chart for a site's series. `None` series renders no lines but
/// still carries the reference marker when a date is given.
pub fn project_chart(series: Option<&SiteSeries>, reference_date: Option<NaiveDate>) -> ChartView {
    let (title, series) = match series {
        Some(site) => (
            Some(site.site_name.clone()),
            site.by_parameter
                .iter()
                .map(|(parameter, points)| ChartSeries {
                    label: parameter.clone(),
                    points: points
                        .iter()
                        .map(|p| ChartPoint {
                            x: p.datetime,
                            y: p.value,
                        })
                        .collect(),
                })
                .collect(),
        ),
        None => (None, Vec::new()),
    };

    let reference_line = reference_date.map(|date| ReferenceLine {
        x: date,
        y_min: CHART_Y_RANGE[0],
        y_max: CHART_Y_RANGE[1],
        label: format_date(&date),
    });

    ChartView {
        title,
        series,
        reference_line,
        y_range: CHART_Y_RANGE,
    }
}
