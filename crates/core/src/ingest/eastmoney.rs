use crate::config::Settings;
use crate::domain::forecast::ForecastRecord;
use crate::ingest::types::ApiEnvelope;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://datacenter-web.eastmoney.com/api/data/v1/get";
const REPORT_NAME: &str = "RPT_PUBLIC_OP_NEWPREDICT";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: usize = 500;

// A misbehaving server could keep inflating the reported total; cap the loop.
const DEFAULT_MAX_PAGES: u32 = 50;

/// Client for the EastMoney datacenter earnings-forecast dataset.
#[derive(Debug, Clone)]
pub struct EastmoneyClient {
    http: reqwest::Client,
    base_url: String,
    page_size: usize,
    max_pages: u32,
}

impl EastmoneyClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .eastmoney_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("EASTMONEY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let page_size = std::env::var("EASTMONEY_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let max_pages = std::env::var("EASTMONEY_MAX_PAGES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_PAGES);

        Self::new(base_url, page_size, max_pages, Duration::from_secs(timeout_secs))
    }

    /// Low-level constructor; tests point `base_url` at a mock server.
    pub fn new(
        base_url: String,
        page_size: usize,
        max_pages: u32,
        timeout: Duration,
    ) -> Result<Self> {
        anyhow::ensure!(page_size > 0, "page_size must be positive");
        anyhow::ensure!(max_pages > 0, "max_pages must be positive");

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .context("failed to build eastmoney http client")?;

        Ok(Self {
            http,
            base_url,
            page_size,
            max_pages,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    /// Fetches every page of forecasts for one reporting period.
    ///
    /// Partial-failure tolerant: a transport or parse error stops pagination
    /// and returns whatever was accumulated, it never surfaces to the caller.
    /// A `success: false` envelope or an empty page is a normal stop.
    pub async fn fetch_forecasts(&self, report_date: NaiveDate) -> Vec<ForecastRecord> {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let envelope = match self.fetch_page(report_date, page).await {
                Ok(env) => env,
                Err(err) => {
                    tracing::warn!(
                        page,
                        %report_date,
                        accumulated = records.len(),
                        error = %err,
                        "forecast page fetch failed; stopping pagination"
                    );
                    break;
                }
            };

            if !envelope.success {
                tracing::info!(
                    page,
                    %report_date,
                    server_message = envelope.message.as_deref().unwrap_or(""),
                    "server reported no result; stopping pagination"
                );
                break;
            }
            let Some(result) = envelope.result else {
                break;
            };
            if result.data.is_empty() {
                break;
            }

            records.extend(result.data);

            if page as usize * self.page_size >= result.count {
                break;
            }
            if page >= self.max_pages {
                tracing::warn!(
                    page,
                    reported_total = result.count,
                    accumulated = records.len(),
                    "max page count reached before server-reported total; stopping pagination"
                );
                break;
            }
            page += 1;
        }

        records
    }

    async fn fetch_page(&self, report_date: NaiveDate, page: u32) -> Result<ApiEnvelope> {
        let params = [
            ("reportName", REPORT_NAME.to_string()),
            ("columns", "ALL".to_string()),
            ("pageNumber", page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("sortColumns", "NOTICE_DATE,SECURITY_CODE".to_string()),
            ("sortTypes", "-1,-1".to_string()),
            ("filter", format!("(REPORT_DATE='{report_date}')")),
            ("source", "WEB".to_string()),
            ("client", "WEB".to_string()),
        ];

        let res = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .context("eastmoney request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read eastmoney response")?;
        if !status.is_success() {
            anyhow::bail!("eastmoney HTTP {status}: {text}");
        }

        serde_json::from_str::<ApiEnvelope>(&text).context("failed to parse eastmoney response")
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Accept", HeaderValue::from_static("*/*"));
    headers.insert(
        "Accept-Language",
        HeaderValue::from_static("zh-CN,zh;q=0.9"),
    );
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));
    headers.insert(
        "Referer",
        HeaderValue::from_static("https://data.eastmoney.com/"),
    );
    headers.insert(
        "User-Agent",
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        ),
    );
    headers
}
