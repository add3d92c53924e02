use crate::domain::forecast::ForecastRecord;
use serde::Deserialize;

/// Top-level envelope of the datacenter API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<ApiResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResult {
    #[serde(default)]
    pub data: Vec<ForecastRecord>,
    /// Server-reported total record count across all pages.
    #[serde(default)]
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_expected_envelope_shape() {
        let v = json!({
            "version": "d273...",
            "success": true,
            "message": "ok",
            "code": 0,
            "result": {
                "pages": 2,
                "count": 3,
                "data": [
                    {"SECURITY_CODE": "600519", "PREDICT_TYPE": "预增"}
                ]
            }
        });

        let env: ApiEnvelope = serde_json::from_value(v).unwrap();
        assert!(env.success);
        let result = env.result.unwrap();
        assert_eq!(result.count, 3);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].security_code.as_deref(), Some("600519"));
    }

    #[test]
    fn parses_failure_envelope_without_result() {
        let v = json!({"success": false, "message": "no data"});
        let env: ApiEnvelope = serde_json::from_value(v).unwrap();
        assert!(!env.success);
        assert_eq!(env.message.as_deref(), Some("no data"));
        assert!(env.result.is_none());
    }
}
