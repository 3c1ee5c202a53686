use std::{fmt, ops::Neg};

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ResultEngine};

/// Signed money amount represented as **integer minor units** plus a
/// currency code.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// shares, balances) to avoid floating-point drift.
///
/// The value is signed:
/// - positive = is owed / credit
/// - negative = owes / debit
///
/// Arithmetic is checked: operations on mismatched currencies fail with
/// [`EngineError::CurrencyMismatch`] and overflow fails with
/// [`EngineError::InvalidAmount`]. No operation ever produces a fractional
/// minor unit; proportional splits hand leftover units out explicitly (see
/// [`Money::distribute`]).
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(12_34, Currency::Usd);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34 USD");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more fraction digits than the currency carries):
///
/// ```rust
/// use engine::{Currency, Money};
///
/// assert_eq!(Money::parse("10", Currency::Usd).unwrap().minor(), 1000);
/// assert_eq!(Money::parse("10,5", Currency::Usd).unwrap().minor(), 1050);
/// assert!(Money::parse("12.345", Currency::Usd).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// The zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.minor
    }

    /// Returns the currency of the amount.
    #[must_use]
    pub const fn currency(self) -> Currency {
        self.currency
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.minor == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.minor > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.minor < 0
    }

    /// Absolute value.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self {
            minor: self.minor.abs(),
            currency: self.currency,
        }
    }

    fn ensure_same_currency(self, rhs: Money) -> ResultEngine<()> {
        if self.currency != rhs.currency {
            return Err(EngineError::CurrencyMismatch(format!(
                "expected {}, got {}",
                self.currency.code(),
                rhs.currency.code()
            )));
        }
        Ok(())
    }

    /// Checked addition. Fails on currency mismatch or overflow.
    pub fn add(self, rhs: Money) -> ResultEngine<Money> {
        self.ensure_same_currency(rhs)?;
        let minor = self
            .minor
            .checked_add(rhs.minor)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
        Ok(Money::new(minor, self.currency))
    }

    /// Checked subtraction. Fails on currency mismatch or overflow.
    pub fn subtract(self, rhs: Money) -> ResultEngine<Money> {
        self.ensure_same_currency(rhs)?;
        let minor = self
            .minor
            .checked_sub(rhs.minor)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
        Ok(Money::new(minor, self.currency))
    }

    /// Multiplies by `numerator / denominator`, rounding toward negative
    /// infinity.
    ///
    /// The intermediate product is computed in 128 bits, so the only
    /// overflow case is a result outside the `i64` range. The discarded
    /// fraction is the caller's responsibility; split strategies hand it
    /// out with the largest-remainder rule.
    pub fn multiply_by_ratio(self, numerator: i64, denominator: i64) -> ResultEngine<Money> {
        if denominator <= 0 {
            return Err(EngineError::InvalidAmount(
                "denominator must be > 0".to_string(),
            ));
        }
        let product = i128::from(self.minor) * i128::from(numerator);
        let minor = i64::try_from(product.div_euclid(i128::from(denominator)))
            .map_err(|_| EngineError::InvalidAmount("amount too large".to_string()))?;
        Ok(Money::new(minor, self.currency))
    }

    /// Splits the amount into `n` parts that sum back to it **exactly**.
    ///
    /// Each part gets `floor(amount / n)`; the remaining minor units are
    /// handed out one-by-one to the first parts, so the caller's ordering of
    /// recipients decides who absorbs the rounding.
    pub fn distribute(self, n: usize) -> ResultEngine<Vec<Money>> {
        if n == 0 {
            return Err(EngineError::InvalidAmount(
                "cannot distribute among zero recipients".to_string(),
            ));
        }
        let count = i64::try_from(n)
            .map_err(|_| EngineError::InvalidAmount("too many recipients".to_string()))?;
        let base = self.minor.div_euclid(count);
        let remainder = self.minor.rem_euclid(count);

        let mut parts = Vec::with_capacity(n);
        for index in 0..count {
            let extra = i64::from(index < remainder);
            parts.push(Money::new(base + extra, self.currency));
        }
        Ok(parts)
    }

    /// Parses a decimal string into an amount of the given currency.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`. Rejects more fraction digits than the currency's minor
    /// units with [`EngineError::ParseError`].
    pub fn parse(s: &str, currency: Currency) -> ResultEngine<Money> {
        let empty = || EngineError::ParseError("empty amount".to_string());
        let invalid = || EngineError::ParseError("invalid amount".to_string());
        let overflow = || EngineError::ParseError("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let major: i64 = major_str.parse().map_err(|_| invalid())?;

        let scale = usize::from(currency.minor_units());
        let frac: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac_str) => {
                if !frac_str.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac_str.len() > scale {
                    return Err(EngineError::ParseError("too many decimals".to_string()));
                }
                let parsed: i64 = frac_str.parse().map_err(|_| invalid())?;
                parsed * 10i64.pow((scale - frac_str.len()) as u32)
            }
        };

        let unit = 10i64.pow(scale as u32);
        let total = major
            .checked_mul(unit)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;
        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money::new(signed, currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let unit = 10u64.pow(u32::from(self.currency.minor_units()));
        let major = abs / unit;
        let frac = abs % unit;
        let width = usize::from(self.currency.minor_units());
        write!(
            f,
            "{sign}{major}.{frac:0width$} {}",
            self.currency.code(),
            width = width
        )
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money::new(-self.minor, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_amounts() {
        assert_eq!(Money::new(0, Currency::Usd).to_string(), "0.00 USD");
        assert_eq!(Money::new(1, Currency::Usd).to_string(), "0.01 USD");
        assert_eq!(Money::new(1050, Currency::Eur).to_string(), "10.50 EUR");
        assert_eq!(Money::new(-1050, Currency::Gbp).to_string(), "-10.50 GBP");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(Money::parse("10", Currency::Usd).unwrap().minor(), 1000);
        assert_eq!(Money::parse("10.5", Currency::Usd).unwrap().minor(), 1050);
        assert_eq!(Money::parse("10,50", Currency::Usd).unwrap().minor(), 1050);
        assert_eq!(Money::parse("-0.01", Currency::Usd).unwrap().minor(), -1);
        assert_eq!(Money::parse("+1.00", Currency::Usd).unwrap().minor(), 100);
        assert_eq!(Money::parse("  2.30 ", Currency::Usd).unwrap().minor(), 230);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(matches!(
            Money::parse("12.345", Currency::Usd),
            Err(EngineError::ParseError(_))
        ));
        assert!(Money::parse("", Currency::Usd).is_err());
        assert!(Money::parse("1.2.3", Currency::Usd).is_err());
        assert!(Money::parse("ten", Currency::Usd).is_err());
    }

    #[test]
    fn add_rejects_currency_mismatch() {
        let usd = Money::new(100, Currency::Usd);
        let eur = Money::new(100, Currency::Eur);
        assert!(matches!(
            usd.add(eur),
            Err(EngineError::CurrencyMismatch(_))
        ));
        assert_eq!(usd.add(usd).unwrap().minor(), 200);
    }

    #[test]
    fn distribute_sums_exactly() {
        let parts = Money::new(1000, Currency::Usd).distribute(3).unwrap();
        let minors: Vec<i64> = parts.iter().map(|p| p.minor()).collect();
        assert_eq!(minors, vec![334, 333, 333]);
        assert_eq!(minors.iter().sum::<i64>(), 1000);
    }

    #[test]
    fn distribute_rejects_zero_recipients() {
        assert!(Money::new(100, Currency::Usd).distribute(0).is_err());
    }

    #[test]
    fn multiply_by_ratio_floors() {
        let amount = Money::new(1001, Currency::Usd);
        assert_eq!(amount.multiply_by_ratio(5000, 10_000).unwrap().minor(), 500);
        assert_eq!(amount.multiply_by_ratio(1, 1).unwrap().minor(), 1001);
        assert!(amount.multiply_by_ratio(1, 0).is_err());
    }
}
