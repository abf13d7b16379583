//! Request and response shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /chart/OHLCChart/gap-chart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapChartRequest {
    /// Bar size, `ONE_DAY` for daily bars.
    pub time_frame: String,
    /// Symbols to chart.
    pub symbols: Vec<String>,
    /// Start, unix seconds.
    pub from: i64,
    /// End (exclusive), unix seconds.
    pub to: i64,
}

/// One symbol's bars, stored column-major.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GapChartSeries {
    /// Symbol the bars belong to.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Bar timestamps.
    #[serde(default)]
    pub t: Vec<Value>,
    /// Opens.
    #[serde(default)]
    pub o: Vec<Value>,
    /// Highs.
    #[serde(default)]
    pub h: Vec<Value>,
    /// Lows.
    #[serde(default)]
    pub l: Vec<Value>,
    /// Closes.
    #[serde(default)]
    pub c: Vec<Value>,
    /// Volumes.
    #[serde(default)]
    pub v: Vec<Value>,
}

impl GapChartSeries {
    /// Columns in `t,o,h,l,c,v` order.
    #[must_use]
    pub fn into_columns(self) -> Vec<(String, Vec<Value>)> {
        vec![
            ("t".to_string(), self.t),
            ("o".to_string(), self.o),
            ("h".to_string(), self.h),
            ("l".to_string(), self.l),
            ("c".to_string(), self.c),
            ("v".to_string(), self.v),
        ]
    }
}
