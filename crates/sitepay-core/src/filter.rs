//! The filter evaluator: decides which requests a dashboard query selects.
//!
//! All criteria are optional and combine as a conjunction; an absent
//! criterion imposes no constraint. The month criterion compares only the
//! calendar year and month of the request date.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

use crate::{error::Error, request::{RequestDetails, Urgency}};

// ─── YearMonth ───────────────────────────────────────────────────────────────

/// A calendar year-month, parsed from and rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
  pub year:  i32,
  pub month: u32,
}

impl YearMonth {
  /// The year-month a date falls in.
  pub fn of(date: NaiveDate) -> Self {
    Self { year: date.year(), month: date.month() }
  }
}

impl FromStr for YearMonth {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    let invalid = || Error::InvalidMonth(s.to_owned());
    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
      return Err(invalid());
    }
    Ok(Self { year, month })
  }
}

impl fmt::Display for YearMonth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

// ─── RequestFilter ───────────────────────────────────────────────────────────

/// Optional selection criteria for the dashboard query.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFilter {
  pub worksite_id: Option<i64>,
  pub supplier_id: Option<i64>,
  pub urgency:     Option<Urgency>,
  pub month:       Option<YearMonth>,
}

impl RequestFilter {
  /// Whether `details` satisfies every present criterion.
  pub fn matches(&self, details: &RequestDetails) -> bool {
    let r = &details.request;
    self.worksite_id.is_none_or(|id| r.worksite_id == id)
      && self.supplier_id.is_none_or(|id| r.supplier_id == id)
      && self.urgency.is_none_or(|u| r.urgency == u)
      && self.month.is_none_or(|m| YearMonth::of(r.date) == m)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    request::Request,
    supplier::Supplier,
    worksite::Worksite,
  };

  fn details(worksite_id: i64, supplier_id: i64, urgency: Urgency, date: &str) -> RequestDetails {
    RequestDetails {
      request:  Request {
        id: 1,
        worksite_id,
        supplier_id,
        description: "Ciment".into(),
        amount: 5000.0,
        urgency,
        comment: None,
        date: date.parse().unwrap(),
      },
      worksite: Worksite {
        id:       worksite_id,
        name:     "Chantier A".into(),
        manager:  "Jean Dupont".into(),
        location: "Casablanca".into(),
      },
      supplier: Supplier {
        id:       supplier_id,
        name:     "Fournisseur Alpha".into(),
        category: "Matériaux".into(),
      },
      payments: vec![],
    }
  }

  #[test]
  fn empty_filter_matches_everything() {
    let filter = RequestFilter::default();
    assert!(filter.matches(&details(1, 2, Urgency::Urgent, "2024-07-01")));
    assert!(filter.matches(&details(9, 9, Urgency::Normal, "1999-01-31")));
  }

  #[test]
  fn worksite_criterion_is_exact() {
    let filter = RequestFilter { worksite_id: Some(1), ..Default::default() };
    assert!(filter.matches(&details(1, 2, Urgency::Normal, "2024-07-01")));
    assert!(!filter.matches(&details(2, 2, Urgency::Normal, "2024-07-01")));
  }

  #[test]
  fn month_criterion_ignores_the_day() {
    let filter = RequestFilter {
      month: Some("2024-07".parse().unwrap()),
      ..Default::default()
    };
    assert!(filter.matches(&details(1, 1, Urgency::Normal, "2024-07-01")));
    assert!(filter.matches(&details(1, 1, Urgency::Normal, "2024-07-31")));
    assert!(!filter.matches(&details(1, 1, Urgency::Normal, "2024-06-15")));
  }

  #[test]
  fn criteria_combine_as_a_conjunction() {
    let filter = RequestFilter {
      worksite_id: Some(1),
      urgency:     Some(Urgency::Urgent),
      ..Default::default()
    };
    assert!(filter.matches(&details(1, 2, Urgency::Urgent, "2024-07-01")));
    assert!(!filter.matches(&details(1, 2, Urgency::Normal, "2024-07-01")));
    assert!(!filter.matches(&details(2, 2, Urgency::Urgent, "2024-07-01")));
  }

  #[test]
  fn year_month_parses_and_displays() {
    let ym: YearMonth = "2024-07".parse().unwrap();
    assert_eq!(ym, YearMonth { year: 2024, month: 7 });
    assert_eq!(ym.to_string(), "2024-07");
  }

  #[test]
  fn year_month_rejects_garbage() {
    assert!("2024".parse::<YearMonth>().is_err());
    assert!("2024-13".parse::<YearMonth>().is_err());
    assert!("2024-00".parse::<YearMonth>().is_err());
    assert!("abcd-ef".parse::<YearMonth>().is_err());
  }
}
