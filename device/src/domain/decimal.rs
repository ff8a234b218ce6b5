use core::fmt::{Display, Formatter};

const MAX_PLACES: u8 = 6;

/// Fixed-point rendering of a float with a set number of decimal places.
///
/// Ties round half away from zero, so `0.25` with one place prints `0.3` and
/// `46.5` with none prints `47`. Scaling and rounding happen in `f64`, where a
/// scaled `f32` is exact, so values just below a tie are not pushed over it.
/// The float-to-integer cast saturates, which keeps the printed width bounded
/// for any input, NaN included.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Decimal {
    value: f32,
    places: u8,
}

impl Decimal {
    pub fn new(value: f32, places: u8) -> Self {
        Self {
            value,
            places: places.min(MAX_PLACES),
        }
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let scale = 10u64.pow(self.places as u32);
        let scaled = self.value as f64 * scale as f64;
        let rounded = if scaled >= 0.0 {
            (scaled + 0.5) as i64
        } else {
            (scaled - 0.5) as i64
        };

        let magnitude = rounded.unsigned_abs();
        if rounded < 0 {
            f.write_str("-")?;
        }
        if self.places == 0 {
            write!(f, "{}", magnitude)
        } else {
            write!(
                f,
                "{}.{:0width$}",
                magnitude / scale,
                magnitude % scale,
                width = self.places as usize
            )
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_one_place() {
        assert_eq!("21.3", Decimal::new(21.34, 1).to_string());
        assert_eq!("0.5", Decimal::new(0.5, 1).to_string());
        assert_eq!("-50.0", Decimal::new(-50.0, 1).to_string());
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!("0.3", Decimal::new(0.25, 1).to_string());
        assert_eq!("-0.3", Decimal::new(-0.25, 1).to_string());
        assert_eq!("47", Decimal::new(46.5, 0).to_string());
        assert_eq!("-12", Decimal::new(-11.5, 0).to_string());
    }

    #[test]
    fn test_just_below_tie_rounds_down() {
        assert_eq!("0", Decimal::new(0.49999997, 0).to_string());
        assert_eq!("0", Decimal::new(-0.49999997, 0).to_string());
        assert_eq!("47", Decimal::new(47.499996, 0).to_string());
        assert_eq!("0.0", Decimal::new(0.049999997, 1).to_string());
    }

    #[test]
    fn test_small_negative_rounds_to_unsigned_zero() {
        assert_eq!("0.0", Decimal::new(-0.04, 1).to_string());
        assert_eq!("0", Decimal::new(-0.4, 0).to_string());
    }

    #[test]
    fn test_non_finite_stays_bounded() {
        assert_eq!("0.0", Decimal::new(f32::NAN, 1).to_string());
        assert!(Decimal::new(f32::INFINITY, 1).to_string().len() <= 21);
    }
}
