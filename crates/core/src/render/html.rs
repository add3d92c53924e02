use crate::domain::forecast::{ForecastRecord, ForecastReport};
use crate::render::format::{collapse_range, format_percent, format_yi, PLACEHOLDER};
use crate::time::report_period::CST_OFFSET_SECS;
use anyhow::{Context, Result};
use std::path::Path;

const TYPE_UP: [&str; 4] = ["预增", "扭亏", "略增", "续盈"];
const TYPE_DOWN: [&str; 4] = ["预减", "首亏", "略减", "续亏"];

/// Maps a forecast category to its table-cell CSS class.
pub fn predict_type_class(predict_type: Option<&str>) -> &'static str {
    match predict_type {
        Some(t) if TYPE_UP.contains(&t) => "type-up",
        Some(t) if TYPE_DOWN.contains(&t) => "type-down",
        _ => "",
    }
}

fn render_row(rec: &ForecastRecord) -> String {
    let notice_date = match rec.notice_date.as_deref() {
        // Keep the date portion of a timestamp string.
        Some(s) => s.get(..10).unwrap_or(s),
        None => PLACEHOLDER,
    };
    let code = rec.security_code.as_deref().unwrap_or(PLACEHOLDER);
    let name = rec.security_name.as_deref().unwrap_or(PLACEHOLDER);
    let market = rec.trade_market.as_deref().unwrap_or(PLACEHOLDER);
    let predict_type = rec.predict_type.as_deref().unwrap_or(PLACEHOLDER);
    let type_class = predict_type_class(rec.predict_type.as_deref());

    let profit = collapse_range(&format_yi(rec.profit_lower), &format_yi(rec.profit_upper));
    let amp = collapse_range(
        &format_percent(rec.amplitude_lower),
        &format_percent(rec.amplitude_upper),
    );

    format!(
        r#"        <tr>
          <td>{notice_date}</td>
          <td>{code}</td>
          <td>{name}</td>
          <td>{market}</td>
          <td class="{type_class}">{predict_type}</td>
          <td>{profit}</td>
          <td>{amp}</td>
        </tr>"#
    )
}

/// Renders the full report page. Records are emitted in the order given;
/// rank them before calling.
pub fn render_page(report: &ForecastReport) -> Result<String> {
    let rows: Vec<String> = report.records.iter().map(render_row).collect();
    let rows = rows.join("\n");

    let cst = chrono::FixedOffset::east_opt(CST_OFFSET_SECS).context("invalid CST offset")?;
    let update_time = report
        .generated_at
        .with_timezone(&cst)
        .format("%Y-%m-%d %H:%M:%S");

    let report_date = report.report_date;
    let count = report.records.len();

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>A股业绩预告</title>
  <link rel="stylesheet" href="style.css">
</head>
<body>
  <div class="container">
    <h1>A股业绩预告</h1>
    <p class="info">
      报告期：{report_date} | 数据来源：东方财富网 | 更新时间：{update_time}
    </p>
    <p class="info">共 {count} 条记录，按归母净利润同比增长从高到低排列</p>

    <div class="table-wrapper">
      <table>
        <thead>
          <tr>
            <th>披露日期</th>
            <th>股票代码</th>
            <th>公司名称</th>
            <th>交易市场</th>
            <th>预告性质</th>
            <th>预告净利润(亿)</th>
            <th>同比增长</th>
          </tr>
        </thead>
        <tbody>
{rows}
        </tbody>
      </table>
    </div>
  </div>
</body>
</html>"#
    ))
}

/// Renders and writes the report, overwriting any existing file.
pub fn write_report(report: &ForecastReport, path: &Path) -> Result<()> {
    let html = render_page(report)?;

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        }
    }

    std::fs::write(path, html)
        .with_context(|| format!("failed to write report to {}", path.display()))
}
