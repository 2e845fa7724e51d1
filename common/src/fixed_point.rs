use core::fmt;

const fn pow10(exp: u8) -> u32 {
    let mut value = 1u32;
    let mut i = 0;
    while i < exp {
        value *= 10;
        i += 1;
    }
    value
}

/// Integer value scaled by `10^-exponent`, printed with a fixed number of
/// fraction digits. Extra digits are truncated, never rounded.
///
/// # Example
/// ```rust
/// use common::FixedPoint;
/// // 5123 mV printed as volts with two decimals
/// let s = format!("{}", FixedPoint::new(5123, 3, 2));
/// assert_eq!(s, "5.12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    value: i32,
    exponent: u8,
    decimals: u8,
}

impl FixedPoint {
    pub const fn new(value: i32, exponent: u8, decimals: u8) -> Self {
        Self {
            value,
            exponent,
            decimals,
        }
    }

    /// Millivolts rendered as volts with two decimals.
    pub const fn millis(value: i32) -> Self {
        Self::new(value, 3, 2)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divisor = pow10(self.exponent);
        let abs = self.value.unsigned_abs();
        if self.value < 0 {
            f.write_str("-")?;
        }
        write!(f, "{}", abs / divisor)?;
        if self.decimals == 0 {
            return Ok(());
        }

        let fraction = abs % divisor;
        let shown = if self.decimals <= self.exponent {
            fraction / pow10(self.exponent - self.decimals)
        } else {
            fraction * pow10(self.decimals - self.exponent)
        };
        write!(f, ".{:0width$}", shown, width = self.decimals as usize)
    }
}

/// Upper-case hex code with a `0x` prefix, zero padded to an even digit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexCode(pub u32);

impl HexCode {
    pub const fn digits(&self) -> usize {
        let mut digits = 2;
        while digits < 8 && (self.0 >> (digits * 4)) != 0 {
            digits += 2;
        }
        digits
    }
}

impl fmt::Display for HexCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:0width$X}", self.0, width = self.digits())
    }
}
