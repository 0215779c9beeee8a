use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::analysis::Projection;
use crate::config::ReportConfig;
use crate::models::CaseSeries;

/// Which y values the chart shows. Both are embedded; the viewer switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    Absolute,
    Percent,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [DisplayMode::Absolute, DisplayMode::Percent];

    /// Button text in the chart toolbar.
    pub fn button_label(&self) -> &'static str {
        match self {
            DisplayMode::Absolute => "Total cases",
            DisplayMode::Percent => "% of population",
        }
    }

    pub fn axis_title(&self) -> &'static str {
        match self {
            DisplayMode::Absolute => "Total cases",
            DisplayMode::Percent => "Cases (% of population)",
        }
    }

    pub fn tick_suffix(&self) -> &'static str {
        match self {
            DisplayMode::Absolute => "",
            DisplayMode::Percent => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStyle {
    Markers,
    Lines,
}

impl SeriesStyle {
    fn plotly_mode(&self) -> &'static str {
        match self {
            SeriesStyle::Markers => "markers",
            SeriesStyle::Lines => "lines",
        }
    }
}

/// One trace on the chart, carrying both display modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub style: SeriesStyle,
    pub dates: Vec<NaiveDate>,
    pub absolute: Vec<f64>,
    pub percent: Vec<f64>,
}

impl ChartSeries {
    pub fn values(&self, mode: DisplayMode) -> &[f64] {
        match mode {
            DisplayMode::Absolute => &self.absolute,
            DisplayMode::Percent => &self.percent,
        }
    }
}

/// Raw observations plus every projection, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub source: String,
    pub last_updated: NaiveDate,
    pub raw: ChartSeries,
    pub projections: Vec<ChartSeries>,
}

/// Assemble the chart: a marker series for all observations and one line
/// per projection.
pub fn build_chart(
    series: &CaseSeries,
    projections: &[Projection],
    config: &ReportConfig,
) -> Chart {
    let absolute: Vec<f64> = series.observations().iter().map(|o| o.cases_f64()).collect();
    let percent = absolute
        .iter()
        .map(|v| v / config.population * 100.0)
        .collect();

    let raw = ChartSeries {
        name: "All data".to_string(),
        style: SeriesStyle::Markers,
        dates: series.dates(),
        absolute,
        percent,
    };

    let projections = projections
        .iter()
        .map(|p| ChartSeries {
            name: p.label.clone(),
            style: SeriesStyle::Lines,
            dates: p.dates(),
            absolute: p.values(),
            percent: p.percents(),
        })
        .collect();

    Chart {
        title: config.title.clone(),
        source: config.source.clone(),
        last_updated: series.last_date(),
        raw,
        projections,
    }
}

impl Chart {
    /// Raw series first, then projections in configured order.
    pub fn all_series(&self) -> impl Iterator<Item = &ChartSeries> {
        std::iter::once(&self.raw).chain(self.projections.iter())
    }

    /// "Last updated Mar-31" style stamp from the final observation.
    pub fn last_updated_text(&self) -> String {
        format!("Last updated {}", self.last_updated.format("%b-%d"))
    }

    /// Title with attribution and update stamp on a smaller second line.
    pub fn composite_title(&self) -> String {
        format!(
            "{}<br><sub>Source: {} | {}</sub>",
            self.title,
            self.source,
            self.last_updated_text()
        )
    }

    fn traces(&self, mode: DisplayMode) -> Vec<Value> {
        self.all_series()
            .map(|s| {
                json!({
                    "type": "scatter",
                    "mode": s.style.plotly_mode(),
                    "name": s.name,
                    "x": s.dates,
                    "y": s.values(mode),
                })
            })
            .collect()
    }

    fn mode_button(&self, mode: DisplayMode) -> Value {
        let ys: Vec<&[f64]> = self.all_series().map(|s| s.values(mode)).collect();
        json!({
            "label": mode.button_label(),
            "method": "update",
            "args": [
                { "y": ys },
                {
                    "yaxis.title.text": mode.axis_title(),
                    "yaxis.ticksuffix": mode.tick_suffix(),
                },
            ],
        })
    }

    /// The plotly figure (`data` + `layout`), opening in absolute mode.
    pub fn to_plotly(&self) -> Value {
        let initial = DisplayMode::Absolute;
        let buttons: Vec<Value> = DisplayMode::ALL
            .iter()
            .map(|m| self.mode_button(*m))
            .collect();

        json!({
            "data": self.traces(initial),
            "layout": {
                "title": { "text": self.composite_title() },
                "xaxis": { "title": { "text": "Date" } },
                "yaxis": {
                    "type": "log",
                    "title": { "text": initial.axis_title() },
                    "ticksuffix": initial.tick_suffix(),
                },
                "annotations": [
                    {
                        "xref": "paper",
                        "yref": "paper",
                        "x": 1.0,
                        "y": 0.0,
                        "xanchor": "right",
                        "yanchor": "bottom",
                        "text": self.last_updated_text(),
                        "showarrow": false,
                    },
                    {
                        "xref": "paper",
                        "yref": "paper",
                        "x": 0.0,
                        "y": 1.0,
                        "xanchor": "left",
                        "yanchor": "top",
                        "text": format!("Source: {}", self.source),
                        "showarrow": false,
                    },
                ],
                "updatemenus": [{
                    "type": "buttons",
                    "direction": "left",
                    "showactive": true,
                    "active": 0,
                    "x": 0.0,
                    "xanchor": "left",
                    "y": 1.12,
                    "yanchor": "top",
                    "buttons": buttons,
                }],
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{project, FitWindow, TrendModel};
    use crate::io::read_csv_from_bytes;

    fn sample() -> (CaseSeries, Vec<Projection>, ReportConfig) {
        let series = read_csv_from_bytes(
            b"date,cases\n1-Mar,75\n2-Mar,100\n3-Mar,124\n4-Mar,158\n5-Mar,221\n",
            2020,
        )
        .unwrap();
        let config = ReportConfig {
            windows: vec![
                FitWindow::trailing(5, TrendModel::Exponential),
                FitWindow::trailing(3, TrendModel::Linear),
            ],
            ..ReportConfig::default()
        };
        let settings = config.projection_settings();
        let projections = config
            .windows
            .iter()
            .map(|w| project(&series, w, &settings).unwrap())
            .collect();
        (series, projections, config)
    }

    #[test]
    fn test_raw_series_starts_at_first_observation() {
        let (series, projections, config) = sample();
        let chart = build_chart(&series, &projections, &config);
        assert_eq!(chart.raw.dates[0], series.first_date());
        assert_eq!(chart.raw.style, SeriesStyle::Markers);
        assert_eq!(chart.raw.name, "All data");
        assert_eq!(chart.raw.absolute.len(), 5);
    }

    #[test]
    fn test_one_line_per_projection() {
        let (series, projections, config) = sample();
        let chart = build_chart(&series, &projections, &config);
        assert_eq!(chart.projections.len(), 2);
        assert!(chart.projections.iter().all(|s| s.style == SeriesStyle::Lines));
        assert_eq!(chart.projections[1].name, "Last 3 days (linear)");
        assert_eq!(chart.all_series().count(), 3);
    }

    #[test]
    fn test_raw_percent_is_share_of_population() {
        let (series, projections, config) = sample();
        let chart = build_chart(&series, &projections, &config);
        for (abs, pct) in chart.raw.absolute.iter().zip(&chart.raw.percent) {
            assert!((pct - abs / 330_000_000.0 * 100.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_title_and_stamp() {
        let (series, projections, config) = sample();
        let chart = build_chart(&series, &projections, &config);
        assert_eq!(chart.last_updated_text(), "Last updated Mar-05");
        let title = chart.composite_title();
        assert!(title.starts_with("Total coronavirus cases in the USA"));
        assert!(title.contains("worldometers.info"));
        assert!(title.contains("Last updated Mar-05"));
    }

    #[test]
    fn test_plotly_layout() {
        let (series, projections, config) = sample();
        let fig = build_chart(&series, &projections, &config).to_plotly();
        assert_eq!(fig["layout"]["yaxis"]["type"], "log");
        assert_eq!(fig["data"].as_array().unwrap().len(), 3);
        assert_eq!(fig["data"][0]["mode"], "markers");
        assert_eq!(fig["data"][1]["mode"], "lines");
        assert_eq!(fig["data"][0]["x"][0], "2020-03-01");
        assert_eq!(fig["layout"]["annotations"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_toggle_buttons_swap_data_and_axis() {
        let (series, projections, config) = sample();
        let chart = build_chart(&series, &projections, &config);
        let fig = chart.to_plotly();
        let buttons = fig["layout"]["updatemenus"][0]["buttons"].as_array().unwrap();
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0]["label"], "Total cases");
        assert_eq!(buttons[1]["label"], "% of population");
        assert_eq!(buttons[1]["method"], "update");
        assert_eq!(buttons[1]["args"][1]["yaxis.ticksuffix"], "%");

        let pct_ys = buttons[1]["args"][0]["y"].as_array().unwrap();
        assert_eq!(pct_ys.len(), 3);
        let first_pct = pct_ys[0][0].as_f64().unwrap();
        assert!((first_pct - chart.raw.percent[0]).abs() < 1e-15);

        let abs_ys = buttons[0]["args"][0]["y"].as_array().unwrap();
        assert_eq!(abs_ys[0][0].as_f64().unwrap(), 75.0);
    }
}
