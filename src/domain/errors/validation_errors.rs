/// Validation errors for domain value objects and listing fields
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // ImageKey validation errors
    EmptyImageKey,
    ImageKeyTooLong {
        actual: usize,
        max: usize,
    },
    InvalidImageKeyCharacter(char),
    ImageKeyStartsWithSlash,
    ImageKeyContainsDoubleSlash,

    // Identifier validation errors
    InvalidIdentifier {
        kind: &'static str,
        value: String,
    },

    // Price validation errors
    NonPositivePrice(String),
    PriceTooHigh {
        actual: String,
        max: String,
    },
    PriceTooPrecise {
        scale: u32,
        max: u32,
    },
    InvalidCurrency(String),

    // Listing field validation errors
    FieldLength {
        field: &'static str,
        actual: usize,
        min: usize,
        max: usize,
    },
    InvalidField {
        field: String,
        value: String,
        expected: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ImageKey errors
            ValidationError::EmptyImageKey => write!(f, "Image key cannot be empty"),
            ValidationError::ImageKeyTooLong { actual, max } => {
                write!(f, "Image key too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidImageKeyCharacter(c) => {
                write!(f, "Invalid character in image key: '{}'", c.escape_default())
            }
            ValidationError::ImageKeyStartsWithSlash => {
                write!(f, "Image key cannot start with '/'")
            }
            ValidationError::ImageKeyContainsDoubleSlash => {
                write!(f, "Image key cannot contain '//'")
            }

            ValidationError::InvalidIdentifier { kind, value } => {
                write!(f, "Invalid {} identifier: '{}'", kind, value)
            }

            // Price errors
            ValidationError::NonPositivePrice(value) => {
                write!(f, "Price must be a positive amount, got {}", value)
            }
            ValidationError::PriceTooHigh { actual, max } => {
                write!(f, "Price {} exceeds the maximum of {}", actual, max)
            }
            ValidationError::PriceTooPrecise { scale, max } => {
                write!(
                    f,
                    "Price has {} decimal places (max: {})",
                    scale, max
                )
            }
            ValidationError::InvalidCurrency(code) => {
                write!(
                    f,
                    "Invalid currency code '{}': expected three uppercase letters",
                    code
                )
            }

            ValidationError::FieldLength {
                field,
                actual,
                min,
                max,
            } => {
                write!(
                    f,
                    "Field '{}' must be between {} and {} characters (got {})",
                    field, min, max, actual
                )
            }
            ValidationError::InvalidField {
                field,
                value,
                expected,
            } => {
                write!(
                    f,
                    "Invalid value for field '{}': '{}' (expected: {})",
                    field, value, expected
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
