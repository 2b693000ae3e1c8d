use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Currency applied when a listing is created without one
pub const DEFAULT_CURRENCY: &str = "GBP";

/// Highest price a listing may ask for, in major units
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Decimal places allowed on a price
pub const MAX_PRICE_SCALE: u32 = 2;

/// Three-letter currency code, stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency(code));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positive exact-decimal amount paired with its currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    amount: Decimal,
    currency: Currency,
}

impl Price {
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, ValidationError> {
        Ok(Self {
            amount: validate_amount(amount)?,
            currency,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }
}

/// Check an amount is positive, capped and not more precise than cents.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice(amount.to_string()));
    }
    if amount > MAX_PRICE {
        return Err(ValidationError::PriceTooHigh {
            actual: amount.to_string(),
            max: MAX_PRICE.to_string(),
        });
    }

    let normalized = amount.normalize();
    if normalized.scale() > MAX_PRICE_SCALE {
        return Err(ValidationError::PriceTooPrecise {
            scale: normalized.scale(),
            max: MAX_PRICE_SCALE,
        });
    }

    Ok(amount)
}
