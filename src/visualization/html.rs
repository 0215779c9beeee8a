use std::path::Path;

use super::chart::Chart;
use crate::error::TrendError;

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a standalone HTML page for the chart.
///
/// plotly.js is loaded from `plotly_cdn`, not embedded.
pub fn render_html(chart: &Chart, plotly_cdn: &str) -> Result<String, TrendError> {
    // A "</script>" inside a label must not close the inline script.
    let figure = serde_json::to_string(&chart.to_plotly())?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<script src="{cdn}" charset="utf-8"></script>
</head>
<body>
<div id="case-trend-chart" style="width:100%;height:95vh;"></div>
<script>
var figure = {figure};
Plotly.newPlot("case-trend-chart", figure.data, figure.layout, {{"responsive": true}});
</script>
</body>
</html>
"#,
        title = escape_html(&chart.title),
        cdn = escape_html(plotly_cdn),
    ))
}

/// Render the chart and write it to `path`.
pub fn write_html(
    chart: &Chart,
    plotly_cdn: &str,
    path: impl AsRef<Path>,
) -> Result<(), TrendError> {
    let html = render_html(chart, plotly_cdn)?;
    std::fs::write(path.as_ref(), html)?;
    tracing::info!(path = %path.as_ref().display(), "wrote chart");
    Ok(())
}
