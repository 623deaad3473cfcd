//! HTML output format for the campaign dashboard
//!
//! A single self-contained page: embedded CSS, metric cards, an inline SVG
//! bar chart of mean sales, and the same tables as the text dashboard.

use crate::dataset::Observation;
use crate::report::AnalysisReport;
use crate::summary::GroupSummary;

const CHART_WIDTH: f64 = 480.0;
const CHART_HEIGHT: f64 = 240.0;
const CHART_MARGIN: f64 = 30.0;

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    report: &'a AnalysisReport,
    data_source: String,
}

impl<'a> HtmlOutput<'a> {
    /// Create a new HTML output formatter
    pub fn new(report: &'a AnalysisReport, data_source: impl Into<String>) -> Self {
        Self {
            report,
            data_source: data_source.into(),
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: right;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        tr:hover {
            background-color: #f0f0f0;
        }
        .metrics {
            display: flex;
            gap: 16px;
            margin-bottom: 20px;
        }
        .metric {
            flex: 1;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            padding: 16px;
            text-align: center;
        }
        .metric-label {
            font-size: 0.85em;
            color: #888;
        }
        .metric-value {
            font-size: 1.8em;
            font-weight: bold;
            color: #333;
        }
        .stats-table th {
            background-color: #5cb85c;
        }
        .reject {
            color: #cc0000;
            font-weight: bold;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        .bar {
            fill: #4a90d9;
        }
        .bar-best {
            fill: #5cb85c;
        }
        .recommendations li {
            margin-bottom: 6px;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn metric_card(label: &str, value: &str) -> String {
        format!(
            "        <div class=\"metric\"><div class=\"metric-label\">{}</div><div class=\"metric-value\">{}</div></div>\n",
            label, value
        )
    }

    fn table_header(headers: &[&str]) -> String {
        let cells: Vec<String> = headers.iter().map(|h| format!("<th>{}</th>", h)).collect();
        format!("        <tr>{}</tr>\n", cells.join(""))
    }

    fn table_row(cells: &[String]) -> String {
        let cells: Vec<String> = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
        format!("        <tr>{}</tr>\n", cells.join(""))
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let report = self.report;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>Marketing Campaign A/B Test Dashboard</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>Fast-Food Marketing Campaign A/B Test Analysis</h1>\n");

        html.push_str("    <div class=\"metrics\">\n");
        html.push_str(&Self::metric_card(
            "Total observations",
            &report.overview.rows.to_string(),
        ));
        html.push_str(&Self::metric_card(
            "Best promotion",
            &format!("Promotion {}", report.insight.best_group),
        ));
        html.push_str(&Self::metric_card(
            "Revenue lift",
            &format!("${:.2}k", report.insight.revenue_lift),
        ));
        html.push_str("    </div>\n");

        html.push_str("    <h2>Summary Statistics</h2>\n");
        html.push_str("    <table>\n");
        html.push_str(&Self::table_header(&[
            "Promotion",
            "Sample_Size",
            "Mean_Sales",
            "Std_Sales",
            "Total_Sales",
        ]));
        for s in &report.summaries {
            html.push_str(&Self::table_row(&[
                s.group.to_string(),
                s.count.to_string(),
                format!("{:.2}", s.mean),
                s.std_dev
                    .map(|sd| format!("{:.2}", sd))
                    .unwrap_or_else(|| "NaN".to_string()),
                format!("{:.2}", s.total),
            ]));
        }
        html.push_str("    </table>\n");

        html.push_str("    <h2>Average Sales by Promotion</h2>\n");
        html.push_str(&render_mean_chart(
            &report.summaries,
            report.insight.best_group,
        ));

        html.push_str("    <h2>Sales by Week</h2>\n");
        html.push_str("    <table>\n");
        html.push_str(&Self::table_header(&["week", "Promotion", "Mean"]));
        for cell in &report.weekly {
            html.push_str(&Self::table_row(&[
                cell.week.to_string(),
                cell.group.to_string(),
                format!("{:.2}", cell.mean),
            ]));
        }
        html.push_str("    </table>\n");

        html.push_str("    <h2>Sales by Market Size</h2>\n");
        html.push_str("    <table>\n");
        html.push_str(&Self::table_header(&["MarketSize", "Promotion", "Mean"]));
        for cell in &report.markets {
            html.push_str(&Self::table_row(&[
                cell.market_size.to_string(),
                cell.group.to_string(),
                format!("{:.2}", cell.mean),
            ]));
        }
        html.push_str("    </table>\n");

        html.push_str("    <h2>Sales Distribution by Promotion</h2>\n");
        html.push_str("    <table>\n");
        html.push_str(&Self::table_header(&[
            "Promotion",
            "Min",
            "Q1",
            "Median",
            "Q3",
            "Max",
        ]));
        for d in &report.distributions {
            html.push_str(&Self::table_row(&[
                d.group.to_string(),
                format!("{:.2}", d.min),
                format!("{:.2}", d.q1),
                format!("{:.2}", d.median),
                format!("{:.2}", d.q3),
                format!("{:.2}", d.max),
            ]));
        }
        html.push_str("    </table>\n");

        html.push_str(&self.render_statistical_tests());
        html.push_str(&self.render_recommendations());

        if let Some(raw) = &report.raw {
            html.push_str(&render_raw_table(raw));
        }

        html.push_str("    <div class=\"footer\">\n");
        html.push_str(&format!(
            "        Generated by abdash {} from {}\n",
            env!("CARGO_PKG_VERSION"),
            Self::escape_html(&self.data_source)
        ));
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }

    /// ANOVA and Tukey HSD tables
    fn render_statistical_tests(&self) -> String {
        let anova = &self.report.anova;
        let tukey = &self.report.tukey;
        let mut html = String::new();

        html.push_str("    <h2>Statistical Tests</h2>\n");
        html.push_str("    <table class=\"stats-table\">\n");
        html.push_str(&Self::table_header(&[
            "Source", "df", "Sum Sq", "Mean Sq", "F", "p-value",
        ]));
        html.push_str(&Self::table_row(&[
            "Promotion".to_string(),
            anova.df_between.to_string(),
            format!("{:.4}", anova.ss_between),
            format!("{:.4}", anova.ms_between),
            format!("{:.4}", anova.f_statistic),
            format!("{:.4}", anova.p_value),
        ]));
        html.push_str(&Self::table_row(&[
            "Residual".to_string(),
            anova.df_within.to_string(),
            format!("{:.4}", anova.ss_within),
            format!("{:.4}", anova.ms_within),
            String::new(),
            String::new(),
        ]));
        html.push_str("    </table>\n");
        html.push_str(&format!(
            "    <p>Significant difference: <strong>{}</strong></p>\n",
            if anova.significant { "Yes" } else { "No" }
        ));

        html.push_str(&format!(
            "    <h2>Tukey HSD (FWER={:.2})</h2>\n",
            tukey.alpha
        ));
        html.push_str("    <table class=\"stats-table\">\n");
        html.push_str(&Self::table_header(&[
            "group1", "group2", "meandiff", "p-adj", "lower", "upper", "reject",
        ]));
        for c in &tukey.comparisons {
            let reject = if c.reject {
                "<span class=\"reject\">True</span>".to_string()
            } else {
                "False".to_string()
            };
            html.push_str(&Self::table_row(&[
                c.group_a.to_string(),
                c.group_b.to_string(),
                format!("{:.4}", c.mean_diff),
                format!("{:.4}", c.p_adj),
                format!("{:.4}", c.lower),
                format!("{:.4}", c.upper),
                reject,
            ]));
        }
        html.push_str("    </table>\n");

        html
    }

    fn render_recommendations(&self) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Business Recommendations</h2>\n");
        html.push_str("    <ul class=\"recommendations\">\n");
        for line in self.report.recommendations() {
            html.push_str(&format!("        <li>{}</li>\n", Self::escape_html(&line)));
        }
        html.push_str("    </ul>\n");
        html
    }
}

/// Inline SVG bar chart of mean sales; the best group is highlighted
fn render_mean_chart(summaries: &[GroupSummary], best_group: u32) -> String {
    let mut svg = String::new();
    let max_mean = summaries.iter().map(|s| s.mean).fold(0.0_f64, f64::max);
    let slot = if summaries.is_empty() {
        0.0
    } else {
        (CHART_WIDTH - 2.0 * CHART_MARGIN) / summaries.len() as f64
    };
    let plot_height = CHART_HEIGHT - 2.0 * CHART_MARGIN;

    svg.push_str(&format!(
        "    <svg class=\"chart\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n",
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));

    for (i, s) in summaries.iter().enumerate() {
        let height = if max_mean > 0.0 {
            s.mean / max_mean * plot_height
        } else {
            0.0
        };
        let x = CHART_MARGIN + i as f64 * slot + slot * 0.15;
        let y = CHART_MARGIN + plot_height - height;
        let class = if s.group == best_group {
            "bar bar-best"
        } else {
            "bar"
        };

        svg.push_str(&format!(
            "        <rect class=\"{}\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"><title>Promotion {}: {:.2}</title></rect>\n",
            class,
            x,
            y,
            slot * 0.7,
            height,
            s.group,
            s.mean
        ));
        svg.push_str(&format!(
            "        <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\">{:.2}</text>\n",
            x + slot * 0.35,
            y - 4.0,
            s.mean
        ));
        svg.push_str(&format!(
            "        <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\">Promotion {}</text>\n",
            x + slot * 0.35,
            CHART_HEIGHT - CHART_MARGIN / 3.0,
            s.group
        ));
    }

    svg.push_str("    </svg>\n");
    svg
}

fn render_raw_table(raw: &[Observation]) -> String {
    let mut html = String::new();
    html.push_str("    <h2>Raw Data</h2>\n");
    html.push_str("    <table>\n");
    html.push_str(&HtmlOutput::table_header(&[
        "Promotion",
        "MarketSize",
        "LocationID",
        "week",
        "SalesInThousands",
    ]));
    for obs in raw {
        html.push_str(&HtmlOutput::table_row(&[
            obs.promotion.to_string(),
            obs.market_size.to_string(),
            obs.location_id.to_string(),
            obs.week.to_string(),
            format!("{:.2}", obs.sales),
        ]));
    }
    html.push_str("    </table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{alternating, dataset};
    use crate::tukey::DEFAULT_ALPHA;

    fn report() -> AnalysisReport {
        let ds = dataset(&[
            (1, alternating(50.0, 5.0, 30)),
            (2, alternating(55.0, 5.0, 30)),
            (3, alternating(60.0, 5.0, 30)),
        ]);
        AnalysisReport::build(&ds, DEFAULT_ALPHA).unwrap()
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(HtmlOutput::escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(HtmlOutput::escape_html("a&b"), "a&amp;b");
        assert_eq!(HtmlOutput::escape_html("\"test\""), "&quot;test&quot;");
        assert_eq!(HtmlOutput::escape_html("'test'"), "&#39;test&#39;");
    }

    #[test]
    fn test_html_output_basic_structure() {
        let report = report();
        let html = HtmlOutput::new(&report, "data.csv").to_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Summary Statistics"));
        assert!(html.contains("Tukey HSD (FWER=0.05)"));
    }

    #[test]
    fn test_metric_cards() {
        let report = report();
        let html = HtmlOutput::new(&report, "data.csv").to_html();

        assert!(html.contains("Total observations"));
        assert!(html.contains(">90<"));
        assert!(html.contains("Promotion 3"));
        assert!(html.contains("$10.00k"));
    }

    #[test]
    fn test_chart_has_one_bar_per_group() {
        let report = report();
        let html = HtmlOutput::new(&report, "data.csv").to_html();

        assert!(html.contains("<svg"));
        assert_eq!(html.matches("<rect ").count(), 3);
        assert_eq!(html.matches("bar bar-best").count(), 1);
    }

    #[test]
    fn test_data_source_escaped() {
        let report = report();
        let html = HtmlOutput::new(&report, "<evil>.csv").to_html();

        assert!(!html.contains("<evil>"));
        assert!(html.contains("&lt;evil&gt;.csv"));
    }

    #[test]
    fn test_raw_table_only_when_attached() {
        let ds = dataset(&[(1, vec![1.0, 2.0]), (2, vec![4.0, 6.0])]);
        let report = AnalysisReport::build(&ds, DEFAULT_ALPHA).unwrap();
        let html = HtmlOutput::new(&report, "data.csv").to_html();
        assert!(!html.contains("Raw Data"));

        let html = HtmlOutput::new(&report.clone().with_raw(&ds), "data.csv").to_html();
        assert!(html.contains("Raw Data"));
        assert!(html.contains("SalesInThousands"));
    }

    #[test]
    fn test_empty_chart() {
        let svg = render_mean_chart(&[], 1);
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("<rect"));
    }
}
