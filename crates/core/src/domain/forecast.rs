use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One earnings-forecast disclosure, as returned by the datacenter API.
///
/// Source data is trusted as-is: either bound of a range may be missing and
/// nothing guarantees lower <= upper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRecord {
    #[serde(rename = "NOTICE_DATE", default)]
    pub notice_date: Option<String>,
    #[serde(rename = "SECURITY_CODE", default)]
    pub security_code: Option<String>,
    #[serde(rename = "SECURITY_NAME_ABBR", default)]
    pub security_name: Option<String>,
    #[serde(rename = "TRADE_MARKET", default)]
    pub trade_market: Option<String>,
    #[serde(rename = "PREDICT_TYPE", default)]
    pub predict_type: Option<String>,

    /// Forecast net profit bounds, in yuan.
    #[serde(rename = "PREDICT_AMT_LOWER", default, deserialize_with = "de_lenient_num")]
    pub profit_lower: Option<f64>,
    #[serde(rename = "PREDICT_AMT_UPPER", default, deserialize_with = "de_lenient_num")]
    pub profit_upper: Option<f64>,

    /// Year-over-year growth bounds, in percent.
    #[serde(rename = "ADD_AMP_LOWER", default, deserialize_with = "de_lenient_num")]
    pub amplitude_lower: Option<f64>,
    #[serde(rename = "ADD_AMP_UPPER", default, deserialize_with = "de_lenient_num")]
    pub amplitude_upper: Option<f64>,
}

impl ForecastRecord {
    /// Ranking key: growth upper bound, falling back to the lower bound only
    /// when the upper is absent. Records with neither bound sort last.
    pub fn growth_sort_key(&self) -> f64 {
        self.amplitude_upper
            .or(self.amplitude_lower)
            .unwrap_or(f64::NEG_INFINITY)
    }
}

/// Sorts records by year-over-year growth, highest first. `sort_by` is
/// stable, so ties keep the fetch order (notice date then code, descending).
pub fn rank_by_growth(records: &mut [ForecastRecord]) {
    records.sort_by(|a, b| b.growth_sort_key().total_cmp(&a.growth_sort_key()));
}

/// The full report for one reporting period. Built fresh on every run.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub report_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ForecastRecord>,
}

/// Best-effort numeric extraction: JSON numbers pass through, numeric strings
/// are parsed, everything else is `None`.
pub fn parse_num(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return None;
            }
            t.parse::<f64>().ok()
        }
        _ => None,
    }
}

fn de_lenient_num<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(parse_num))
}
