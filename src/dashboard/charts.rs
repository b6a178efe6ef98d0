//! Chart generation and rendering for the dashboard.
//!
//! The expense category breakdown is rendered as an ECharts donut chart.
//! The chart is generated as JSON configuration for the ECharts library and
//! rendered with a corresponding HTML container and JavaScript
//! initialization code.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{aggregate::CategoryShare, html::HeadElement};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the expense category breakdown donut chart.
pub(super) fn breakdown_chart(shares: &[CategoryShare]) -> Chart {
    Chart::new()
        .title(Title::new().text("Category Breakdown").left("center"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0%"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(
                    shares
                        .iter()
                        .map(|share| (share.total, share.label.as_str()))
                        .collect::<Vec<_>>(),
                ),
        )
}

/// Renders the HTML container for a dashboard chart.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[320px] rounded dark:bg-gray-100"
        {}
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

#[cfg(test)]
mod charts_tests {
    use crate::aggregate::CategoryShare;

    use super::breakdown_chart;

    #[test]
    fn chart_options_contain_every_category() {
        let shares = vec![
            CategoryShare {
                label: "Food & Dining".to_owned(),
                total: 30.0,
                percent: 30,
            },
            CategoryShare {
                label: "Travel".to_owned(),
                total: 70.0,
                percent: 70,
            },
        ];

        let options = breakdown_chart(&shares).to_string();

        assert!(options.contains("Food & Dining"));
        assert!(options.contains("Travel"));
    }
}
