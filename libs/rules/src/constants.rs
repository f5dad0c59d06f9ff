//! Fixed rule thresholds
//!
//! These are part of the audit policy and intentionally not configurable.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Currencies accepted for settlement
pub const ALLOWED_CURRENCIES: [&str; 3] = ["USD", "EUR", "INR"];

/// Currencies flagged as high risk by the security rule
pub const HIGH_RISK_CURRENCIES: [&str; 4] = ["BTC", "XXX", "AUD", "XMR"];

/// Literal, case-sensitive markers of script or SQL injection attempts
pub const INJECTION_MARKERS: [&str; 4] = ["<script>", "javascript:", "DROP TABLE", "UNION SELECT"];

/// Items above this quantity are outliers
pub const MAX_ITEM_QTY: i64 = 10_000;

/// Items above this unit price are outliers
pub const MAX_ITEM_PRICE: Decimal = dec!(10000000);

/// Allowed gap between declared and computed order totals
pub const TOTAL_TOLERANCE: Decimal = dec!(0.01);

/// How far past the evaluation time `created_at` may lie
pub const CREATED_AT_FUTURE_TOLERANCE_DAYS: i64 = 1;

/// Default number of valid-record summaries kept for reporting
pub const DEFAULT_MAX_VALID_SUMMARIES: usize = 5000;
