//! Fund data provider for mutual-fund NAV series and intraday estimates.
//!
//! The upstream serves two kinds of JavaScript documents:
//! - `pingzhongdata/{code}.js` declares `Data_netWorthTrend` (unit NAV points
//!   as `{"x": epoch_ms, "y": nav}`) and `Data_ACWorthTrend` (accumulated NAV
//!   as `[epoch_ms, nav]` pairs).
//! - `js/{code}.js` is a JSONP call `jsonpgz({...})` whose `gsz` field holds
//!   the intraday valuation estimate as a string.
//!
//! Both are fetched as plain text over HTTP and the relevant literal is cut
//! out and parsed as JSON.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{normalize_series, PricePoint, CASH_INSTRUMENT_CODE};
use crate::provider::{PriceProvider, ProviderCapabilities};

/// Provider ID constant
const PROVIDER_ID: &str = "FUND_DATA";

/// Unit NAV series variable
const NET_WORTH_VAR: &str = "Data_netWorthTrend";

/// Accumulated NAV series variable, used when the unit series is missing
const AC_WORTH_VAR: &str = "Data_ACWorthTrend";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`FundDataProvider`].
#[derive(Clone, Debug)]
pub struct FundDataProviderConfig {
    /// Base URL serving `pingzhongdata/{code}.js`
    pub history_base_url: String,
    /// Base URL serving `js/{code}.js`
    pub realtime_base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Timezone used to turn epoch timestamps into trading dates
    pub market_timezone: Tz,
}

impl Default for FundDataProviderConfig {
    fn default() -> Self {
        Self {
            history_base_url: "https://fund.eastmoney.com".to_string(),
            realtime_base_url: "https://fundgz.1234567.com.cn".to_string(),
            timeout: REQUEST_TIMEOUT,
            market_timezone: chrono_tz::Asia::Shanghai,
        }
    }
}

/// JSONP realtime payload
#[derive(Debug, Deserialize)]
struct RealtimeEstimate {
    #[allow(dead_code)]
    fundcode: Option<String>,
    /// Estimated NAV, as a decimal string
    gsz: Option<String>,
}

/// HTTP fund-data provider.
///
/// # Example
///
/// ```ignore
/// use fundpilot_market_data::{FundDataProvider, FundDataProviderConfig};
///
/// let provider = FundDataProvider::new(FundDataProviderConfig::default());
/// ```
pub struct FundDataProvider {
    client: Client,
    config: FundDataProviderConfig,
}

impl FundDataProvider {
    /// Create a new provider with the given connection settings.
    pub fn new(config: FundDataProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn history_url(&self, code: &str) -> String {
        format!(
            "{}/pingzhongdata/{}.js",
            self.config.history_base_url.trim_end_matches('/'),
            code
        )
    }

    fn realtime_url(&self, code: &str) -> String {
        format!(
            "{}/js/{}.js?rt={}",
            self.config.realtime_base_url.trim_end_matches('/'),
            code,
            Utc::now().timestamp_millis()
        )
    }

    async fn get_text(&self, url: &str, code: &str) -> Result<String, MarketDataError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(code.to_string()));
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} for {}", status, code),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PriceProvider for FundDataProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_historical: true,
            supports_realtime: true,
        }
    }

    async fn fetch_history(&self, code: &str) -> Result<Vec<PricePoint>, MarketDataError> {
        if code.is_empty() || code == CASH_INSTRUMENT_CODE {
            return Ok(Vec::new());
        }

        let body = self.get_text(&self.history_url(code), code).await?;
        let series = parse_history_script(&body, self.config.market_timezone)?;
        match series {
            Some(points) => {
                debug!("Fetched {} NAV points for {}", points.len(), code);
                Ok(points)
            }
            None => {
                warn!("No NAV series declared in payload for {}", code);
                Err(MarketDataError::SymbolNotFound(code.to_string()))
            }
        }
    }

    async fn fetch_realtime(&self, code: &str) -> Result<Decimal, MarketDataError> {
        if code == CASH_INSTRUMENT_CODE {
            return Ok(Decimal::ONE);
        }

        let body = self.get_text(&self.realtime_url(code), code).await?;
        parse_realtime_jsonp(&body, code)
    }
}

// ============================================================================
// Payload parsing
// ============================================================================

/// Parses a `pingzhongdata` script into a normalized series.
///
/// Returns `Ok(None)` when neither series variable is declared. The unit NAV
/// series wins; the accumulated series is only used when the unit series is
/// absent or empty.
pub(crate) fn parse_history_script(
    body: &str,
    tz: Tz,
) -> Result<Option<Vec<PricePoint>>, MarketDataError> {
    if let Some(literal) = extract_js_array(body, NET_WORTH_VAR) {
        let points = parse_net_worth_trend(literal, tz)?;
        if !points.is_empty() {
            return Ok(Some(normalize_series(points)));
        }
    }

    if let Some(literal) = extract_js_array(body, AC_WORTH_VAR) {
        let points = parse_ac_worth_trend(literal, tz)?;
        return Ok(Some(normalize_series(points)));
    }

    Ok(None)
}

/// Cuts the array literal assigned to `var_name` out of a script body.
fn extract_js_array<'a>(body: &'a str, var_name: &str) -> Option<&'a str> {
    let var_pos = body.find(var_name)?;
    let after_var = &body[var_pos + var_name.len()..];
    let eq_pos = after_var.find('=')?;
    let after_eq = &after_var[eq_pos + 1..];
    let open = after_eq.find('[')?;
    // Anything other than whitespace between '=' and '[' means a non-array value.
    if !after_eq[..open].trim().is_empty() {
        return None;
    }

    let literal = &after_eq[open..];
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in literal.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&literal[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_error(message: impl Into<String>) -> MarketDataError {
    MarketDataError::ParseError {
        provider: PROVIDER_ID.to_string(),
        message: message.into(),
    }
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn millis_from_value(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

fn parse_net_worth_trend(literal: &str, tz: Tz) -> Result<Vec<PricePoint>, MarketDataError> {
    let entries: Vec<Value> =
        serde_json::from_str(literal).map_err(|e| parse_error(format!("{NET_WORTH_VAR}: {e}")))?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let millis = millis_from_value(entry.get("x")?)?;
            let nav = decimal_from_value(entry.get("y")?)?;
            PricePoint::from_epoch_millis(millis, nav, tz)
        })
        .collect())
}

fn parse_ac_worth_trend(literal: &str, tz: Tz) -> Result<Vec<PricePoint>, MarketDataError> {
    let entries: Vec<Vec<Value>> =
        serde_json::from_str(literal).map_err(|e| parse_error(format!("{AC_WORTH_VAR}: {e}")))?;

    Ok(entries
        .iter()
        .filter_map(|pair| {
            let millis = millis_from_value(pair.first()?)?;
            let nav = decimal_from_value(pair.get(1)?)?;
            PricePoint::from_epoch_millis(millis, nav, tz)
        })
        .collect())
}

/// Parses a `jsonpgz({...});` document into the estimated NAV.
pub(crate) fn parse_realtime_jsonp(body: &str, code: &str) -> Result<Decimal, MarketDataError> {
    let open = body
        .find('(')
        .ok_or_else(|| parse_error("missing JSONP call"))?;
    let close = body
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| parse_error("unterminated JSONP call"))?;

    let inner = body[open + 1..close].trim();
    if inner.is_empty() {
        return Err(MarketDataError::NoData(code.to_string()));
    }

    let estimate: RealtimeEstimate =
        serde_json::from_str(inner).map_err(|e| parse_error(e.to_string()))?;
    let raw = estimate
        .gsz
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| MarketDataError::NoData(code.to_string()))?;

    Decimal::from_str(raw.trim()).map_err(|e| parse_error(format!("gsz '{}': {}", raw, e)))
}
