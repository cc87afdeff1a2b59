//! SVG line chart of the baseline and leveraged series.

use std::fs;

use crate::domain::comparison::ChartSeries;
use crate::domain::error::LevsimError;
use crate::domain::metrics::MetricsTable;
use crate::ports::report_port::ReportPort;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 420.0;
const PADDING: f64 = 60.0;
const LEGEND_ROW: f64 = 16.0;

const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

/// Maps values onto the vertical axis, linear or natural-log.
struct ValueAxis {
    log_scale: bool,
    floor: f64,
    min: f64,
    max: f64,
}

impl ValueAxis {
    fn new(series: &[ChartSeries], log_scale: bool) -> Self {
        let all = || series.iter().flat_map(|s| s.values.iter().copied());
        // Non-positive values cannot sit on a log axis; they are drawn at
        // the smallest positive value instead.
        let floor = all()
            .filter(|v| *v > 0.0)
            .fold(f64::INFINITY, f64::min);
        let floor = if floor.is_finite() { floor } else { 1.0 };

        let mut axis = ValueAxis {
            log_scale,
            floor,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        };
        for v in all() {
            let t = axis.transform(v);
            axis.min = axis.min.min(t);
            axis.max = axis.max.max(t);
        }
        axis
    }

    fn transform(&self, value: f64) -> f64 {
        if self.log_scale {
            value.max(self.floor).ln()
        } else {
            value
        }
    }

    fn untransform(&self, t: f64) -> f64 {
        if self.log_scale { t.exp() } else { t }
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = HEIGHT - 2.0 * PADDING;
        let range = self.max - self.min;
        let scale = if range > 0.0 { plot_height / range } else { 1.0 };
        HEIGHT - PADDING - (self.transform(value) - self.min) * scale
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn generate_chart_svg(
    series: &[ChartSeries],
    table: Option<&MetricsTable>,
    log_scale: bool,
) -> String {
    let points = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    if points == 0 {
        return format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}"><text x="{PADDING}" y="{PADDING}">No data available.</text></svg>"#
        );
    }

    let axis = ValueAxis::new(series, log_scale);
    let plot_width = WIDTH - 2.0 * PADDING;
    let scale_x = if points > 1 {
        plot_width / (points - 1) as f64
    } else {
        0.0
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\" font-size=\"11\">\n"
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    // Axes
    svg.push_str(&format!(
        "<line x1=\"{p}\" y1=\"{p}\" x2=\"{p}\" y2=\"{b}\" stroke=\"black\"/>\n\
         <line x1=\"{p}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"black\"/>\n",
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING,
    ));
    svg.push_str(&format!(
        "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\">{v:.2}</text>\n",
        x = PADDING - 4.0,
        y = PADDING + 4.0,
        v = axis.untransform(axis.max),
    ));
    svg.push_str(&format!(
        "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\">{v:.2}</text>\n",
        x = PADDING - 4.0,
        y = HEIGHT - PADDING,
        v = axis.untransform(axis.min),
    ));
    if log_scale {
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\">log scale</text>\n",
            x = PADDING,
            y = PADDING - 8.0,
        ));
    }

    if let Some(dates) = series.iter().map(|s| &s.dates).find(|d| !d.is_empty()) {
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\">{d}</text>\n",
            x = PADDING,
            y = HEIGHT - PADDING + 16.0,
            d = dates[0],
        ));
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\">{d}</text>\n",
            x = WIDTH - PADDING,
            y = HEIGHT - PADDING + 16.0,
            d = dates[dates.len() - 1],
        ));
    }

    for (idx, s) in series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let polyline: Vec<String> = s
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| format!("{:.1},{:.1}", PADDING + i as f64 * scale_x, axis.y(v)))
            .collect();
        svg.push_str(&format!(
            "<polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"1\" points=\"{}\"/>\n",
            polyline.join(" ")
        ));

        let legend_y = PADDING + 10.0 + idx as f64 * LEGEND_ROW;
        let legend_x = PADDING + 10.0;
        let end_value = table
            .and_then(|t| t.column(&s.label))
            .map(|c| format!(" (end {:.2})", c.end_value))
            .unwrap_or_default();
        svg.push_str(&format!(
            "<rect x=\"{legend_x:.1}\" y=\"{y:.1}\" width=\"10\" height=\"10\" fill=\"{color}\"/>\
             <text x=\"{tx:.1}\" y=\"{ty:.1}\">{label}{end_value}</text>\n",
            y = legend_y - 9.0,
            tx = legend_x + 14.0,
            ty = legend_y,
            label = escape(&s.label),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Writes the chart as a standalone `.svg` file.
pub struct SvgChartAdapter {
    pub log_scale: bool,
}

impl ReportPort for SvgChartAdapter {
    fn write(
        &self,
        table: &MetricsTable,
        series: &[ChartSeries],
        output_path: &str,
    ) -> Result<(), LevsimError> {
        let svg = generate_chart_svg(series, Some(table), self.log_scale);
        fs::write(output_path, svg)?;
        Ok(())
    }
}
