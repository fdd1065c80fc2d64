//! The canonical usage event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cost::Usd;

/// One normalized unit of usage produced by a parser.
///
/// Token fields are `None` when the source does not expose them. The total is
/// taken verbatim when the source reports one, otherwise derived from whichever
/// of input/output are present. Cached tokens never count toward the total.
/// Cost is only what the tool itself recorded.
///
/// Events are built once with the `with_*` methods and then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    timestamp: Option<DateTime<Utc>>,
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
    cached_tokens: Option<u64>,
    explicit_total: Option<u64>,
    cost_usd: Option<Usd>,
    request_count: u64,
}

impl UsageEvent {
    /// Creates an event representing one request with no token data.
    pub fn new(timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            timestamp,
            input_tokens: None,
            output_tokens: None,
            cached_tokens: None,
            explicit_total: None,
            cost_usd: None,
            request_count: 1,
        }
    }

    /// Creates an event at a known instant.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self::new(Some(timestamp))
    }

    /// Sets the input token count.
    #[must_use]
    pub fn with_input(mut self, tokens: Option<u64>) -> Self {
        self.input_tokens = tokens;
        self
    }

    /// Sets the output token count.
    #[must_use]
    pub fn with_output(mut self, tokens: Option<u64>) -> Self {
        self.output_tokens = tokens;
        self
    }

    /// Sets the cached token count.
    #[must_use]
    pub fn with_cached(mut self, tokens: Option<u64>) -> Self {
        self.cached_tokens = tokens;
        self
    }

    /// Sets a total reported verbatim by the source.
    #[must_use]
    pub fn with_total(mut self, tokens: Option<u64>) -> Self {
        self.explicit_total = tokens;
        self
    }

    /// Sets the cost the source recorded.
    #[must_use]
    pub fn with_cost(mut self, cost: Option<Usd>) -> Self {
        self.cost_usd = cost;
        self
    }

    /// Sets the number of requests this event stands for.
    #[must_use]
    pub fn with_requests(mut self, count: u64) -> Self {
        self.request_count = count;
        self
    }

    /// When the usage happened, if the source recorded it.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Input tokens.
    pub fn input_tokens(&self) -> Option<u64> {
        self.input_tokens
    }

    /// Output tokens.
    pub fn output_tokens(&self) -> Option<u64> {
        self.output_tokens
    }

    /// Cached (read or written) tokens.
    pub fn cached_tokens(&self) -> Option<u64> {
        self.cached_tokens
    }

    /// Total tokens.
    pub fn total_tokens(&self) -> Option<u64> {
        if self.explicit_total.is_some() {
            return self.explicit_total;
        }
        match (self.input_tokens, self.output_tokens) {
            (None, None) => None,
            (input, output) => Some(input.unwrap_or(0).saturating_add(output.unwrap_or(0))),
        }
    }

    /// Recorded cost in USD.
    pub fn cost_usd(&self) -> Option<Usd> {
        self.cost_usd
    }

    /// Number of requests.
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// Returns true if any token field is known.
    pub fn has_tokens(&self) -> bool {
        self.input_tokens.is_some()
            || self.output_tokens.is_some()
            || self.cached_tokens.is_some()
            || self.explicit_total.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_total_derived_from_input_and_output() {
        let event = UsageEvent::at(ts()).with_input(Some(100)).with_output(Some(50));
        assert_eq!(event.total_tokens(), Some(150));
        assert_eq!(event.request_count(), 1);
    }

    #[test]
    fn test_explicit_total_wins() {
        let event = UsageEvent::at(ts())
            .with_input(Some(100))
            .with_output(Some(50))
            .with_total(Some(400));
        assert_eq!(event.total_tokens(), Some(400));
    }

    #[test]
    fn test_total_only_keeps_split_null() {
        let event = UsageEvent::at(ts()).with_total(Some(900));
        assert_eq!(event.input_tokens(), None);
        assert_eq!(event.output_tokens(), None);
        assert_eq!(event.total_tokens(), Some(900));
    }

    #[test]
    fn test_cached_not_in_total() {
        let event = UsageEvent::at(ts())
            .with_input(Some(10))
            .with_output(Some(5))
            .with_cached(Some(1000));
        assert_eq!(event.total_tokens(), Some(15));
    }

    #[test]
    fn test_no_tokens() {
        let event = UsageEvent::new(None).with_requests(4);
        assert!(!event.has_tokens());
        assert_eq!(event.total_tokens(), None);
        assert_eq!(event.request_count(), 4);
        assert!(event.timestamp().is_none());
    }
}
