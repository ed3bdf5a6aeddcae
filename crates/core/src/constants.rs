/// Decimal places kept on rates derived by the reciprocal or pivot strategies.
pub const RATE_PRECISION: u32 = 4;

/// Decimal places kept on converted amounts.
pub const CONVERSION_PRECISION: u32 = 2;

/// Length of an ISO-4217 style currency code.
pub const CURRENCY_CODE_LEN: usize = 3;

/// Units a rate is denominated against when the caller does not say otherwise.
pub const DEFAULT_UNITS: u32 = 1;
