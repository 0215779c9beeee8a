mod chart;
mod html;
mod tables;
mod viewer;

pub use chart::{build_chart, Chart, ChartSeries, DisplayMode, SeriesStyle};
pub use html::{render_html, write_html};
pub use tables::{
    format_projection_table, format_series_summary, print_projection_table, print_series_summary,
    thousands,
};
pub use viewer::Viewer;
