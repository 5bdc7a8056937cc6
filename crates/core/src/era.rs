use serde::{Deserialize, Serialize};
use std::fmt;

/// Reiwa 1 began in 2019, so the Gregorian year is `2018 + era_year`.
const REIWA_EPOCH: i32 = 2018;

/// A year+month expressed in the Reiwa era, as printed on timecard headers
/// (`R6年4月分`, `令和6年4月分`). Timecards cover a month, not a day, so this
/// carries no day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReiwaMonth {
    era_year: u8,
    month: u8,
}

impl ReiwaMonth {
    /// `None` for era year 0 or a month outside 1–12.
    pub fn new(era_year: u8, month: u8) -> Option<Self> {
        if era_year == 0 || month == 0 || month > 12 {
            return None;
        }
        Some(ReiwaMonth { era_year, month })
    }

    pub fn era_year(self) -> u8 {
        self.era_year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn gregorian_year(self) -> i32 {
        REIWA_EPOCH + i32::from(self.era_year)
    }
}

impl fmt::Display for ReiwaMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.gregorian_year(), self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reiwa_six_is_2024() {
        let m = ReiwaMonth::new(6, 4).unwrap();
        assert_eq!(m.gregorian_year(), 2024);
    }

    #[test]
    fn reiwa_one_is_2019() {
        assert_eq!(ReiwaMonth::new(1, 5).unwrap().gregorian_year(), 2019);
    }

    #[test]
    fn display_is_year_dash_padded_month() {
        assert_eq!(ReiwaMonth::new(6, 4).unwrap().to_string(), "2024-04");
        assert_eq!(ReiwaMonth::new(7, 12).unwrap().to_string(), "2025-12");
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(ReiwaMonth::new(6, 0).is_none());
        assert!(ReiwaMonth::new(6, 13).is_none());
    }

    #[test]
    fn rejects_era_year_zero() {
        assert!(ReiwaMonth::new(0, 4).is_none());
    }
}
