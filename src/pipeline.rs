use crate::analysis::{Projection, TrendAnalyzer};
use crate::config::ReportConfig;
use crate::error::TrendError;
use crate::io;
use crate::models::CaseSeries;
use crate::visualization::{build_chart, write_html, Chart};

/// Everything produced by one read-fit-render pass.
#[derive(Debug, Clone)]
pub struct ReportRun {
    pub series: CaseSeries,
    pub projections: Vec<Projection>,
    pub chart: Chart,
}

/// Load the case table and fit every configured window.
pub fn fit_report(config: &ReportConfig) -> Result<(CaseSeries, Vec<Projection>), TrendError> {
    config.validate()?;
    let series = io::read_csv(&config.input, config.year)?;
    let analyzer = TrendAnalyzer::new(&series, config.projection_settings());
    let projections = analyzer.project_all(&config.windows)?;
    Ok((series, projections))
}

/// Run the full pipeline and write the HTML chart to `config.output`.
pub fn run_report(config: &ReportConfig) -> Result<ReportRun, TrendError> {
    let (series, projections) = fit_report(config)?;
    let chart = build_chart(&series, &projections, config);
    write_html(&chart, &config.plotly_cdn, &config.output)?;
    Ok(ReportRun {
        series,
        projections,
        chart,
    })
}
