//! Standalone HTML page for one rendered view

use crate::render::Rendered;
use crate::style::escape_html;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, rendered: &Rendered, source_name: Option<&str>) -> io::Result<()> {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M");
    let source = source_name
        .map(|name| format!("{} · ", escape_html(name)))
        .unwrap_or_default();

    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Matrice en radar</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            color: #222222;
            background: #ffffff;
            line-height: 1.5;
        }}
        .container {{ max-width: 1000px; margin: 0 auto; padding: 2rem; }}
        .header {{ border-bottom: 1px solid #dddddd; margin-bottom: 1.5rem; padding-bottom: 0.75rem; }}
        .logo {{ font-size: 1.75rem; font-weight: 800; color: #14aeb0; }}
        .subtitle {{ color: #7d8590; font-size: 0.875rem; }}
        .chart {{ text-align: center; margin-bottom: 2rem; }}
        .chart svg {{ max-width: 100%; height: auto; }}
        h2 {{ font-size: 1.25rem; margin-bottom: 0.75rem; }}
    </style>
</head>
<body>
<div class="container">
    <div class="header">
        <div class="logo">Matrice en radar</div>
        <div class="subtitle">{source}{generated}</div>
    </div>
    <div class="chart">
{chart}
    </div>
    <h2>Tableau des données</h2>
{table}
</div>
</body>
</html>
"#,
        source = source,
        generated = generated,
        chart = rendered.chart_svg,
        table = rendered.table_html,
    )
}
