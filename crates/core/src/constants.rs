use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Prefix of canonical quote identifiers
pub const QUOTE_ID_PREFIX: &str = "P-";

/// Number of random digits in a quote identifier
pub const QUOTE_ID_DIGITS: usize = 8;

/// Width of the display-only version suffix
pub const QUOTE_VERSION_DIGITS: usize = 3;

/// Width of sequential client identifiers
pub const CLIENT_ID_DIGITS: usize = 4;

/// Attempts made when a freshly minted client ID collides
pub const CLIENT_ID_MAX_ATTEMPTS: usize = 3;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Fixed VAT rate applied to the HT total
pub const DEFAULT_VAT_RATE: Decimal = dec!(0.19);

/// Default margin rate, expressed as a fraction of the sell price
pub const DEFAULT_MARGIN_RATE: Decimal = dec!(0.20);

/// Multiplier applied to labor performed on weekends
pub const DEFAULT_WEEKEND_MULTIPLIER: Decimal = dec!(1.5);

/// Supplies are bought in euros and sold in dinars
pub const DEFAULT_SUPPLY_FROM_CURRENCY: &str = "EUR";
pub const DEFAULT_SUPPLY_TO_CURRENCY: &str = "TND";

/// Fallback supply exchange rate when no live rate is available
pub const DEFAULT_SUPPLY_EXCHANGE_RATE: Decimal = dec!(3.35);

/// Labor is costed and sold in dinars
pub const DEFAULT_LABOR_FROM_CURRENCY: &str = "TND";
pub const DEFAULT_LABOR_TO_CURRENCY: &str = "TND";

/// Fallback labor exchange rate
pub const DEFAULT_LABOR_EXCHANGE_RATE: Decimal = dec!(1);
