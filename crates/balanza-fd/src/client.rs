//! financialdatasets.ai client implementation.

use balanza_traits::{ColumnMap, DataProvider, Date, PeriodKind, RawTable};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    PROVIDER, Result,
    columns::default_columns,
    config::FdConfig,
    error::FdError,
    types::{
        CompanyFactsResponse, FinancialMetricsResponse, InsiderTradesResponse, LINE_ITEMS,
        LineItemRequest, LineItemResponse, PricesResponse, Record,
    },
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-API-KEY";

/// Key used to join line items onto metric rows.
const JOIN_KEY: &str = "report_period";

/// financialdatasets.ai API client.
#[derive(Debug, Clone)]
pub struct FdClient {
    client: Client,
    config: FdConfig,
    columns: ColumnMap,
}

impl FdClient {
    /// Create a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: FdConfig) -> Result<Self> {
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

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &FdConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url,
            endpoint.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(endpoint));
        match &self.config.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Send a request and parse the JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FdError::RateLimitExceeded);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FdError::NotFound(endpoint.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FdError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        debug!(endpoint, bytes = text.len(), "response received");
        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.request(Method::GET, endpoint).query(query);
        self.send(request, endpoint).await
    }

    /// Financial metric rows for periods ending on or before `report_period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is missing.
    pub async fn financial_metrics(
        &self,
        ticker: &str,
        report_period: Date,
        period: PeriodKind,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let endpoint = "financial-metrics/";
        let query = [
            ("ticker", ticker.to_uppercase()),
            ("report_period_lte", report_period.to_string()),
            ("limit", limit.to_string()),
            ("period", period.as_str().to_string()),
        ];
        let response: FinancialMetricsResponse = self.get(endpoint, &query).await?;
        response
            .financial_metrics
            .ok_or(FdError::MissingPayload("financial_metrics"))
    }

    /// Search statement line items by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is missing.
    pub async fn search_line_items(
        &self,
        ticker: &str,
        line_items: &[&str],
        period: PeriodKind,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let endpoint = "financials/search/line-items";
        let body = LineItemRequest {
            tickers: vec![ticker.to_uppercase()],
            line_items: line_items.iter().map(ToString::to_string).collect(),
            period: period.as_str().to_string(),
            limit,
        };
        let request = self.request(Method::POST, endpoint).json(&body);
        let response: LineItemResponse = self.send(request, endpoint).await?;
        response
            .search_results
            .ok_or(FdError::MissingPayload("search_results"))
    }

    /// Insider trades filed on or before `end_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is missing.
    pub async fn insider_trades(
        &self,
        ticker: &str,
        end_date: Date,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let query = [
            ("ticker", ticker.to_uppercase()),
            ("filing_date_lte", end_date.to_string()),
            ("limit", limit.to_string()),
        ];
        let response: InsiderTradesResponse = self.get("insider-trades/", &query).await?;
        response
            .insider_trades
            .ok_or(FdError::MissingPayload("insider_trades"))
    }

    /// Company facts, including the current market capitalization.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is missing.
    pub async fn company_facts(&self, ticker: &str) -> Result<Record> {
        let query = [("ticker", ticker.to_uppercase())];
        let response: CompanyFactsResponse = self.get("company/facts/", &query).await?;
        response
            .company_facts
            .ok_or(FdError::MissingPayload("company_facts"))
    }

    /// Daily bars between `start` and `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is missing.
    pub async fn prices(&self, ticker: &str, start: Date, end: Date) -> Result<Vec<Record>> {
        let query = [
            ("ticker", ticker.to_uppercase()),
            ("interval", "day".to_string()),
            ("interval_multiplier", "1".to_string()),
            ("start_date", start.to_string()),
            ("end_date", end.to_string()),
        ];
        let response: PricesResponse = self.get("prices/", &query).await?;
        response.prices.ok_or(FdError::MissingPayload("prices"))
    }
}

impl DataProvider for FdClient {
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
        report_period: Date,
        period_kind: PeriodKind,
        limit: usize,
    ) -> balanza_traits::Result<RawTable> {
        let metrics = self
            .financial_metrics(ticker, report_period, period_kind, limit)
            .await?;
        let table = RawTable::from_records(metrics);

        match self
            .search_line_items(ticker, &LINE_ITEMS, period_kind, limit)
            .await
        {
            Ok(items) => Ok(table.left_join(&RawTable::from_records(items), JOIN_KEY)),
            Err(FdError::NotFound(what)) => {
                warn!(ticker, %what, "line items not found, using metrics only");
                Ok(table)
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_price_rows(
        &self,
        ticker: &str,
        start: Date,
        end: Date,
    ) -> balanza_traits::Result<RawTable> {
        let rows = self.prices(ticker, start, end).await?;
        Ok(RawTable::from_records(rows))
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_market_cap(&self, ticker: &str) -> balanza_traits::Result<RawTable> {
        let facts = self.company_facts(ticker).await?;
        Ok(RawTable::from_records(vec![facts]))
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_insider_trades(
        &self,
        ticker: &str,
        end_date: Date,
        limit: usize,
    ) -> balanza_traits::Result<RawTable> {
        let rows = self.insider_trades(ticker, end_date, limit).await?;
        Ok(RawTable::from_records(rows))
    }
}
