//! Provider capabilities.

/// Describes what a price provider can do.
///
/// Callers check these flags before fanning out requests so that a
/// history-only source is never asked for intraday valuations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Whether the provider returns full historical NAV series.
    pub supports_historical: bool,

    /// Whether the provider returns intraday valuation estimates.
    pub supports_realtime: bool,
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self {
            supports_historical: true,
            supports_realtime: true,
        }
    }
}
