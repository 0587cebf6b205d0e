//! no-loss-of-precision rule: Disallow number literals that lose precision.
//!
//! A literal loses precision when the double it evaluates to no longer
//! spells the digits that were written. Decimal literals are compared digit
//! by digit in normalized scientific form; binary, octal and hexadecimal
//! literals lose precision when their value needs more than 53 significant
//! bits or overflows to infinity.
//!
//! Numeric separators are ignored.

use loomlint_ast::{LiteralValue, Node};
use loomlint_core::{ListenerMap, Report, Rule, RuleContext, RuleError, RuleMeta};
use serde_json::json;

const MESSAGES: &[(&str, &str)] = &[(
    "noLossOfPrecision",
    "This number literal will lose precision at runtime.",
)];

/// `toPrecision` stops at 100 digits; anything longer cannot round-trip.
const MAX_DECIMAL_PRECISION: usize = 100;

/// Significand bits of an IEEE 754 double, counting the implicit bit.
const SIGNIFICAND_BITS: usize = 53;

/// Values of 2^1024 and up overflow to infinity.
const MAX_BIT_LENGTH: usize = 1024;

/// Disallows number literals that lose precision.
pub struct NoLossOfPrecision {
    meta: RuleMeta,
}

impl NoLossOfPrecision {
    pub const NAME: &'static str = "no-loss-of-precision";

    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new(Self::NAME, MESSAGES)
                .description("Disallow literal numbers that lose precision")
                .recommended()
                .schema(json!([])),
        }
    }
}

impl Default for NoLossOfPrecision {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoLossOfPrecision {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create<'a>(&self, _context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
        ListenerMap::stateless()
            .on("Literal", |_, node, context| {
                if loses_precision(node) {
                    context.report(Report::node(node, "noLossOfPrecision"))?;
                }
                Ok(())
            })
            .build()
    }
}

fn loses_precision(node: &Node<'_>) -> bool {
    let Some(literal) = node.literal() else {
        return false;
    };
    let LiteralValue::Number(value) = literal.value else {
        return false;
    };
    if value.is_nan() {
        return false;
    }

    let raw = literal.raw.replace('_', "");
    match radix_digits(&raw) {
        Some((digits, radix)) => radix_loses_precision(digits, radix),
        None => decimal_loses_precision(&raw, value),
    }
}

/// Splits a non-decimal literal into its digits and radix.
fn radix_digits(raw: &str) -> Option<(&str, u32)> {
    match raw.get(..2) {
        Some("0x" | "0X") => Some((&raw[2..], 16)),
        Some("0o" | "0O") => Some((&raw[2..], 8)),
        Some("0b" | "0B") => Some((&raw[2..], 2)),
        _ if raw.len() > 1
            && raw.starts_with('0')
            && raw[1..].bytes().all(|b| matches!(b, b'0'..=b'7')) =>
        {
            Some((&raw[1..], 8))
        }
        _ => None,
    }
}

fn radix_loses_precision(digits: &str, radix: u32) -> bool {
    let bits_per_digit = radix.trailing_zeros() as usize;
    let bits: String = digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .map(|d| format!("{d:0width$b}", width = bits_per_digit))
        .collect();

    let significant = bits.trim_start_matches('0');
    let bit_length = significant.len();
    let significant_bits = significant.trim_end_matches('0').len();

    significant_bits > SIGNIFICAND_BITS || bit_length > MAX_BIT_LENGTH
}

/// A decimal number as `d.ddd × 10^exponent`, with `digits` holding every
/// written significant digit.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scientific {
    digits: String,
    exponent: i64,
}

impl Scientific {
    /// Normalizes decimal literal text such as `123.0e34` or `.5`.
    ///
    /// Integer coefficients drop trailing zeros; fractional coefficients keep
    /// them, since `1.50` asks for three digits.
    fn from_literal(raw: &str) -> Self {
        let (coefficient, exponent) = match raw.split_once(['e', 'E']) {
            Some((coefficient, exponent)) => (coefficient, parse_exponent(exponent)),
            None => (raw, 0),
        };

        let normalized = if coefficient.contains('.') {
            Self::from_fraction(coefficient)
        } else {
            Self::from_integer(coefficient)
        };

        Self {
            exponent: normalized.exponent.saturating_add(exponent),
            ..normalized
        }
    }

    fn from_integer(integer: &str) -> Self {
        let trimmed = integer.trim_start_matches('0');
        Self {
            digits: trimmed.trim_end_matches('0').to_string(),
            exponent: trimmed.len() as i64 - 1,
        }
    }

    fn from_fraction(fraction: &str) -> Self {
        let trimmed = fraction.trim_start_matches('0');
        if let Some(decimals) = trimmed.strip_prefix('.') {
            let significant = decimals.trim_start_matches('0');
            return Self {
                digits: significant.to_string(),
                exponent: significant.len() as i64 - decimals.len() as i64 - 1,
            };
        }

        let point = trimmed.find('.').unwrap_or(trimmed.len());
        Self {
            digits: trimmed.replacen('.', "", 1),
            exponent: point as i64 - 1,
        }
    }

    /// Formats `value` with `precision` significant digits.
    fn from_value(value: f64, precision: usize) -> Option<Self> {
        let formatted = format!("{:.*e}", precision.saturating_sub(1), value);
        let (mantissa, exponent) = formatted.split_once('e')?;
        Some(Self {
            digits: mantissa.replacen('.', "", 1),
            exponent: exponent.parse().ok()?,
        })
    }
}

fn parse_exponent(exponent: &str) -> i64 {
    exponent.parse().unwrap_or(if exponent.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn decimal_loses_precision(raw: &str, value: f64) -> bool {
    let written = Scientific::from_literal(raw);
    let precision = written.digits.len();
    if precision == 0 {
        return false;
    }
    if precision > MAX_DECIMAL_PRECISION || !value.is_finite() {
        return true;
    }

    Scientific::from_value(value, precision).is_none_or(|stored| stored != written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("123e34", "123", 36)]
    #[case("123.0e34", "1230", 36)]
    #[case("12300000000000000000000000", "123", 25)]
    #[case("0.00000000000000000000000123", "123", -24)]
    #[case(".1230000000000000000000000", "1230000000000000000000000", -1)]
    #[case("019.5", "195", 1)]
    #[case("0195", "195", 2)]
    #[case("9007199254740.993e3", "9007199254740993", 15)]
    #[case("5.", "5", 0)]
    #[case("2e999", "2", 999)]
    fn test_scientific_from_literal(
        #[case] raw: &str,
        #[case] digits: &str,
        #[case] exponent: i64,
    ) {
        assert_eq!(
            Scientific::from_literal(raw),
            Scientific {
                digits: digits.to_string(),
                exponent
            }
        );
    }

    #[rstest]
    #[case(123e34, 3, "123", 36)]
    #[case(0.123, 4, "1230", -1)]
    #[case(9007199254740992.0, 16, "9007199254740992", 15)]
    fn test_scientific_from_value(
        #[case] value: f64,
        #[case] precision: usize,
        #[case] digits: &str,
        #[case] exponent: i64,
    ) {
        assert_eq!(
            Scientific::from_value(value, precision),
            Some(Scientific {
                digits: digits.to_string(),
                exponent
            })
        );
    }

    #[rstest]
    #[case("9007199254740993", 9007199254740992.0, true)]
    #[case("9007199254740991", 9007199254740991.0, false)]
    #[case("123.456", 123.456, false)]
    #[case("1.0000000000000000000000123", 1.0, true)]
    #[case("2e999", f64::INFINITY, true)]
    #[case("0.000", 0.0, false)]
    #[case("0e10", 0.0, false)]
    #[case("1e-400", 0.0, true)]
    #[case("0.1e-330", 0.0, true)]
    fn test_decimal_loses_precision(#[case] raw: &str, #[case] value: f64, #[case] expected: bool) {
        assert_eq!(decimal_loses_precision(raw, value), expected);
    }

    #[rstest]
    #[case("11111111111111111111111111111111111111111111111111111", 2, false)]
    #[case("100000000000000000000000000000000000000000000000000001", 2, true)]
    #[case("377777777777777777", 8, false)]
    #[case("400000000000000001", 8, true)]
    #[case("1FFFFFFFFFFFFF", 16, false)]
    #[case("20000000000001", 16, true)]
    #[case("0001", 16, false)]
    fn test_radix_loses_precision(#[case] digits: &str, #[case] radix: u32, #[case] expected: bool) {
        assert_eq!(radix_loses_precision(digits, radix), expected);
    }

    #[test]
    fn test_huge_power_of_two_overflows() {
        let digits = format!("1{}", "0".repeat(1024));
        assert!(radix_loses_precision(&digits, 2));
        assert!(!radix_loses_precision(&digits[..1024], 2));
    }

    #[rstest]
    #[case("0x1F", Some(("1F", 16)))]
    #[case("0o17", Some(("17", 8)))]
    #[case("0B1", Some(("1", 2)))]
    #[case("0777", Some(("777", 8)))]
    #[case("0195", None)]
    #[case("0", None)]
    #[case("12", None)]
    fn test_radix_digits(#[case] raw: &str, #[case] expected: Option<(&str, u32)>) {
        assert_eq!(radix_digits(raw), expected);
    }
}
