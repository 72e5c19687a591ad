//! Fiscal year parsing and date-window derivation.
//!
//! Indian statutory fiscal years run April 1 through March 31 and are
//! labelled with the two calendar years they span, e.g. `2025-26`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};

/// A parsed fiscal year with its derived date window.
///
/// # Example
///
/// ```
/// use audit_engine::models::FiscalYear;
/// use chrono::NaiveDate;
///
/// let fy = FiscalYear::parse("2025-26").unwrap();
/// assert_eq!(fy.start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
/// assert_eq!(fy.end_date, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// The original label, e.g. "2025-26".
    pub label: String,
    /// First day of the window (April 1 of the start year).
    pub start_date: NaiveDate,
    /// Last day of the window (March 31 of the following year).
    pub end_date: NaiveDate,
}

impl FiscalYear {
    /// Parses a fiscal year label of the form `YYYY-YY` into a date window.
    ///
    /// The four-digit start year and the two-digit suffix must name
    /// consecutive calendar years.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFiscalYear` if the label is not of the form `YYYY-YY`
    /// or the two parts are not consecutive years.
    pub fn parse(label: &str) -> AuditResult<Self> {
        let invalid = || AuditError::InvalidFiscalYear {
            label: label.to_string(),
        };

        let (start_part, end_part) = label.split_once('-').ok_or_else(invalid)?;
        if start_part.len() != 4 || end_part.len() != 2 {
            return Err(invalid());
        }

        let start_year: i32 = start_part.parse().map_err(|_| invalid())?;
        let end_suffix: i32 = end_part.parse().map_err(|_| invalid())?;
        if (start_year + 1) % 100 != end_suffix {
            return Err(invalid());
        }

        let start_date = NaiveDate::from_ymd_opt(start_year, 4, 1).ok_or_else(invalid)?;
        let end_date = NaiveDate::from_ymd_opt(start_year + 1, 3, 31).ok_or_else(invalid)?;

        Ok(Self {
            label: label.to_string(),
            start_date,
            end_date,
        })
    }

    /// Returns true if the date falls inside the fiscal-year window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns the final month of the window as (year, month), used by the
    /// period-concentration control check.
    pub fn final_month(&self) -> (i32, u32) {
        (self.end_date.year(), self.end_date.month())
    }
}
