//! Usage windows.
//!
//! A window is an additive sum over events. Token fields are nullable and
//! follow one rule everywhere: `None + None = None`, `None + Some(x) = Some(x)`,
//! `Some(a) + Some(b) = Some(a + b)`. A null is never turned into a zero by
//! summation, so a window's token field is null exactly when every
//! contributing event left it null. `cost_usd` follows the same rule.

use serde::{Deserialize, Serialize};

use super::cost::Usd;
use super::event::UsageEvent;

// ============================================================================
// Period
// ============================================================================

/// The four reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Current local calendar day.
    Today,
    /// Current week, starting Monday 00:00 local time.
    ThisWeek,
    /// Current local calendar month.
    ThisMonth,
    /// Every event, regardless of timestamp.
    Total,
}

impl Period {
    /// Returns all periods in display order.
    pub fn all() -> &'static [Period] {
        &[Self::Today, Self::ThisWeek, Self::ThisMonth, Self::Total]
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
            Self::Total => "Total",
        }
    }

    /// Returns the machine key used in JSON/CSV output.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
            Self::Total => "total",
        }
    }
}

// ============================================================================
// Usage Window
// ============================================================================

/// Sum of usage over one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindow {
    /// Input tokens (null when no contributing event reported them).
    pub input_tokens: Option<u64>,
    /// Output tokens.
    pub output_tokens: Option<u64>,
    /// Total tokens.
    pub total_tokens: Option<u64>,
    /// Cached tokens.
    pub cached_tokens: Option<u64>,
    /// Cost recorded by the tool, in USD.
    pub cost_usd: Option<Usd>,
    /// Number of requests.
    pub request_count: u64,
}

fn add_opt(acc: Option<u64>, value: Option<u64>) -> Option<u64> {
    match (acc, value) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0).saturating_add(b.unwrap_or(0))),
    }
}

fn add_cost(acc: Option<Usd>, value: Option<Usd>) -> Option<Usd> {
    match (acc, value) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or_default().saturating_add(b.unwrap_or_default())),
    }
}

impl UsageWindow {
    /// A window with every token field at zero. Cost stays null.
    pub fn zero() -> Self {
        Self {
            input_tokens: Some(0),
            output_tokens: Some(0),
            total_tokens: Some(0),
            cached_tokens: Some(0),
            cost_usd: None,
            request_count: 0,
        }
    }

    /// Adds one event to this window.
    pub fn add_event(&mut self, event: &UsageEvent) {
        self.input_tokens = add_opt(self.input_tokens, event.input_tokens());
        self.output_tokens = add_opt(self.output_tokens, event.output_tokens());
        self.total_tokens = add_opt(self.total_tokens, event.total_tokens());
        self.cached_tokens = add_opt(self.cached_tokens, event.cached_tokens());
        self.cost_usd = add_cost(self.cost_usd, event.cost_usd());
        self.request_count = self.request_count.saturating_add(event.request_count());
    }

    /// Merges another window into this one, field by field.
    pub fn merge(&mut self, other: &UsageWindow) {
        self.input_tokens = add_opt(self.input_tokens, other.input_tokens);
        self.output_tokens = add_opt(self.output_tokens, other.output_tokens);
        self.total_tokens = add_opt(self.total_tokens, other.total_tokens);
        self.cached_tokens = add_opt(self.cached_tokens, other.cached_tokens);
        self.cost_usd = add_cost(self.cost_usd, other.cost_usd);
        self.request_count = self.request_count.saturating_add(other.request_count);
    }

    /// Returns true if no event contributed to this window.
    pub fn is_empty(&self) -> bool {
        self.request_count == 0
            && self.input_tokens.is_none()
            && self.output_tokens.is_none()
            && self.total_tokens.is_none()
            && self.cached_tokens.is_none()
            && self.cost_usd.is_none()
    }
}

// ============================================================================
// Usage Windows
// ============================================================================

/// The four windows reported for each provider.
///
/// Each window is computed independently; `today` is not guaranteed to be a
/// subset of `this_week` (a Monday week can start in the previous month).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindows {
    /// Current local day.
    pub today: UsageWindow,
    /// Current Monday-start week.
    pub this_week: UsageWindow,
    /// Current calendar month.
    pub this_month: UsageWindow,
    /// All time.
    pub total: UsageWindow,
}

impl UsageWindows {
    /// Returns the window for a period.
    pub fn get(&self, period: Period) -> &UsageWindow {
        match period {
            Period::Today => &self.today,
            Period::ThisWeek => &self.this_week,
            Period::ThisMonth => &self.this_month,
            Period::Total => &self.total,
        }
    }

    /// Returns the mutable window for a period.
    pub fn get_mut(&mut self, period: Period) -> &mut UsageWindow {
        match period {
            Period::Today => &mut self.today,
            Period::ThisWeek => &mut self.this_week,
            Period::ThisMonth => &mut self.this_month,
            Period::Total => &mut self.total,
        }
    }

    /// Merges another set of windows into this one.
    pub fn merge(&mut self, other: &UsageWindows) {
        for &period in Period::all() {
            self.get_mut(period).merge(other.get(period));
        }
    }

    /// Replaces windows nothing contributed to with the zero value.
    ///
    /// Used for active providers that claim token capability: "no usage" is
    /// reported as zero tokens, while windows whose events lacked tokens keep
    /// their nulls.
    #[must_use]
    pub fn with_empty_as_zero(mut self) -> Self {
        for &period in Period::all() {
            let window = self.get_mut(period);
            if window.is_empty() {
                *window = UsageWindow::zero();
            }
        }
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
