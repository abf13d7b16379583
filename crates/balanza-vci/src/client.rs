//! VCI client implementation.

use balanza_traits::{BalanzaError, ColumnMap, DataProvider, Date, PeriodKind, RawTable};
use chrono::NaiveTime;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    PROVIDER, Result,
    columns::{VCI_UTC_OFFSET_MINUTES, default_columns},
    config::VciConfig,
    error::VciError,
    types::{GapChartRequest, GapChartSeries},
};

const GAP_CHART_PATH: &str = "/chart/OHLCChart/gap-chart";
const ONE_DAY: &str = "ONE_DAY";
const ORIGIN: &str = "https://trading.vietcap.com.vn";

/// Vietcap (VCI) API client.
///
/// Serves daily bars and vnstock-style financial ratios. Market cap comes
/// from the most recent quarterly ratio rows. Insider trades are not
/// available from this backend.
#[derive(Debug, Clone)]
pub struct VciClient {
    client: Client,
    config: VciConfig,
    columns: ColumnMap,
}

impl VciClient {
    /// Create a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: VciConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("balanza/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            config,
            columns: default_columns(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn with_headers(request: RequestBuilder) -> RequestBuilder {
        request
            .header(header::ORIGIN, ORIGIN)
            .header(header::REFERER, format!("{ORIGIN}/"))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = Self::with_headers(request).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(VciError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VciError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        debug!(what, bytes = text.len(), "response received");
        Ok(serde_json::from_str(&text)?)
    }

    /// Daily bars for `ticker` between `start` and `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn gap_chart(
        &self,
        ticker: &str,
        start: Date,
        end: Date,
    ) -> Result<Vec<GapChartSeries>> {
        let body = GapChartRequest {
            time_frame: ONE_DAY.to_string(),
            symbols: vec![ticker.to_uppercase()],
            from: local_midnight(start),
            to: local_midnight(end.succ_opt().unwrap_or(end)),
        };
        let request = self.client.post(self.url(GAP_CHART_PATH)).json(&body);
        self.send(request, "price history").await
    }

    /// Financial ratio records for `ticker`.
    ///
    /// Accepts either a bare array or an object wrapping it under `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is neither of
    /// those shapes.
    pub async fn financial_ratios(&self, ticker: &str, period: RatioPeriod) -> Result<Value> {
        let path = self.config.ratio_path_for(&ticker.to_uppercase());
        let request = self
            .client
            .get(self.url(&path))
            .query(&[("period", period.as_str())]);
        let value: Value = self.send(request, "financial ratios").await?;
        match value {
            Value::Object(mut map) => map.remove("data").ok_or(VciError::MissingPayload("data")),
            other @ (Value::Array(_) | Value::Null) => Ok(other),
            _ => Err(VciError::MissingPayload("data")),
        }
    }

    async fn ratio_table(
        &self,
        ticker: &str,
        period: RatioPeriod,
    ) -> balanza_traits::Result<RawTable> {
        match self.financial_ratios(ticker, period).await? {
            Value::Null => Ok(RawTable::new()),
            value => RawTable::from_json_value(value),
        }
    }
}

/// Reporting granularity of the ratio endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioPeriod {
    /// Fiscal years.
    Year,
    /// Fiscal quarters.
    Quarter,
}

impl RatioPeriod {
    /// Query value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "Y",
            Self::Quarter => "Q",
        }
    }
}

fn local_midnight(date: Date) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() - i64::from(VCI_UTC_OFFSET_MINUTES) * 60
}

impl DataProvider for VciClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_financial_rows(
        &self,
        ticker: &str,
        _report_period: Date,
        period_kind: PeriodKind,
        _limit: usize,
    ) -> balanza_traits::Result<RawTable> {
        let period = match period_kind {
            PeriodKind::Annual => RatioPeriod::Year,
            PeriodKind::Quarterly => RatioPeriod::Quarter,
            PeriodKind::Ttm => {
                return Err(BalanzaError::Unsupported {
                    provider: PROVIDER.to_string(),
                    operation: "trailing-twelve-month ratios",
                });
            }
        };
        self.ratio_table(ticker, period).await
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_price_rows(
        &self,
        ticker: &str,
        start: Date,
        end: Date,
    ) -> balanza_traits::Result<RawTable> {
        let mut series = self.gap_chart(ticker, start, end).await?;
        let wanted = ticker.trim().to_uppercase();
        let matched = series.iter().position(|s| {
            s.symbol
                .as_deref()
                .is_some_and(|sym| sym.trim().eq_ignore_ascii_case(&wanted))
        });
        // Bars carry no ticker column, so an unlabelled series is only
        // trusted when it is the sole one.
        let position = match matched {
            Some(position) => position,
            None if series.is_empty() => return Ok(RawTable::new()),
            None if series.len() == 1 && series[0].symbol.is_none() => 0,
            None => {
                return Err(BalanzaError::not_found(
                    PROVIDER,
                    format!("price history for {wanted}"),
                ));
            }
        };
        let series = series.swap_remove(position);

        let columns = series
            .into_columns()
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .collect();
        RawTable::from_columns(columns)
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_market_cap(&self, ticker: &str) -> balanza_traits::Result<RawTable> {
        self.ratio_table(ticker, RatioPeriod::Quarter).await
    }

    async fn fetch_insider_trades(
        &self,
        _ticker: &str,
        _end_date: Date,
        _limit: usize,
    ) -> balanza_traits::Result<RawTable> {
        Err(BalanzaError::Unsupported {
            provider: PROVIDER.to_string(),
            operation: "insider trades",
        })
    }
}
