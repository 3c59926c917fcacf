//! HTML templates for the web interface.

use crate::language::LanguageTag;
use crate::presenter::{ChartData, PresentationView};

/// Escape HTML special characters for safe rendering.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Base HTML page.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <main>
        <div class="title">{title}</div>
        <div class="subtitle">Paste a comment in any language to see the emotions it carries</div>
        {content}
    </main>
    <footer>moodscope</footer>
</body>
</html>"#,
        title = html_escape(title),
        content = content
    )
}

/// Message shown above the form (blank input, etc.).
pub struct Notice<'a> {
    pub class: &'a str,
    pub message: &'a str,
}

/// The analysis form, optionally followed by a notice and results.
pub fn index_page(text: &str, notice: Option<Notice<'_>>, results: Option<&str>) -> String {
    let notice = notice
        .map(|n| {
            format!(
                r#"<div class="{}">{}</div>"#,
                html_escape(n.class),
                html_escape(n.message)
            )
        })
        .unwrap_or_default();

    let content = format!(
        r#"<form method="post" action="/">
            <label for="text">Paste a comment (any language)</label>
            <textarea id="text" name="text" placeholder="Example: I feel proud and happy today!">{text}</textarea>
            <button type="submit">Analyze Emotion</button>
        </form>
        {notice}
        {results}"#,
        text = html_escape(text),
        notice = notice,
        results = results.unwrap_or("")
    );

    base_template("Multilingual Emotion Analyzer", &content)
}

/// Render the language line and the emotion card for one analysis.
pub fn results_section(language: &LanguageTag, view: &PresentationView) -> String {
    let language_line = format!(
        r#"<p class="language"><strong>Detected Language:</strong> <code>{}</code></p>"#,
        html_escape(&language.as_str().to_uppercase())
    );

    let body = match view {
        PresentationView::Failure { kind, message } => format!(
            r#"<div class="error"><strong>{}</strong>: {}</div>"#,
            kind,
            html_escape(message)
        ),
        PresentationView::Success {
            emotions,
            primary,
            valence,
            insight,
            chart,
        } => {
            let mut rows = String::new();
            for row in emotions {
                rows.push_str(&format!(
                    r#"<div class="emotion"><span>{label}</span><span>{percent}%</span></div>
                    <div class="progress"><span style="width:{percent}%"></span></div>
                    "#,
                    label = html_escape(&row.label),
                    percent = row.percent
                ));
            }

            format!(
                r#"<div class="card">
                <h2>Top Emotions</h2>
                {rows}
                <div class="primary">Primary Emotion: {primary} ({percent}%)</div>
                <p class="insight {valence}">{insight}</p>
                {chart}
                {table}
            </div>"#,
                rows = rows,
                primary = html_escape(&primary.label),
                percent = primary.percent,
                valence = valence.as_str(),
                insight = html_escape(insight),
                chart = chart_svg(chart),
                table = chart_table(chart)
            )
        }
    };

    format!("{}\n{}", language_line, body)
}

const BAR_HEIGHT: usize = 24;
const LABEL_WIDTH: usize = 120;
const PLOT_WIDTH: f64 = 360.0;

/// Horizontal bar chart of percentages as inline SVG.
pub fn chart_svg(chart: &ChartData) -> String {
    let height = chart.labels.len() * BAR_HEIGHT;
    let mut bars = String::new();

    for (i, (label, value)) in chart.labels.iter().zip(&chart.values).enumerate() {
        let y = i * BAR_HEIGHT;
        let width = (value.clamp(0.0, 100.0) / 100.0 * PLOT_WIDTH).round();
        bars.push_str(&format!(
            r#"<text x="0" y="{ty}">{label}</text><rect x="{x}" y="{y}" width="{width}" height="{h}" rx="4"></rect><text x="{vx}" y="{ty}">{value}%</text>"#,
            ty = y + BAR_HEIGHT / 2 + 4,
            label = html_escape(label),
            x = LABEL_WIDTH,
            y = y + 4,
            width = width,
            h = BAR_HEIGHT - 8,
            vx = LABEL_WIDTH as f64 + width + 6.0,
            value = value
        ));
    }

    format!(
        r#"<svg class="chart" role="img" aria-label="Emotion scores" width="100%" viewBox="0 0 {w} {h}">{bars}</svg>"#,
        w = LABEL_WIDTH as f64 + PLOT_WIDTH + 60.0,
        h = height,
        bars = bars
    )
}

/// The chart series as a plain table.
fn chart_table(chart: &ChartData) -> String {
    let rows: String = chart
        .labels
        .iter()
        .zip(&chart.values)
        .map(|(label, value)| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                html_escape(label),
                value
            )
        })
        .collect();
    format!(
        r#"<table class="chart-data"><thead><tr><th>Emotion</th><th>Score (%)</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}
