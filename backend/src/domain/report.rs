//! Revenue report rows.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DateWindow, Month, PropertyId, Rwf};

/// Revenue received in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// `YYYY-MM`.
    pub month: String,
    /// Sum of distinct payments dated in the month.
    pub revenue: Rwf,
}

/// Revenue per month across a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    /// Window covered.
    pub window: DateWindow,
    /// Property the report is limited to, if any.
    pub property_id: Option<PropertyId>,
    /// One entry per month touched by the window, oldest first.
    pub months: Vec<MonthlyRevenue>,
    /// Sum of `months`.
    pub total: Rwf,
}

impl RevenueReport {
    /// Build from zero-filled monthly totals.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    /// use chrono::NaiveDate;
    /// use icumbi::domain::{DateWindow, Month, RevenueReport, Rwf};
    ///
    /// let window = DateWindow::new(
    ///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
    /// )
    /// .unwrap();
    /// let totals = BTreeMap::from([
    ///     (Month::new(2024, 1).unwrap(), Rwf::new(10)),
    ///     (Month::new(2024, 2).unwrap(), Rwf::ZERO),
    /// ]);
    /// let report = RevenueReport::from_totals(window, None, totals);
    /// assert_eq!(report.months[1].month, "2024-02");
    /// assert_eq!(report.total, Rwf::new(10));
    /// ```
    #[must_use]
    pub fn from_totals(
        window: DateWindow,
        property_id: Option<PropertyId>,
        totals: BTreeMap<Month, Rwf>,
    ) -> Self {
        let months: Vec<MonthlyRevenue> = totals
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenue {
                month: month.to_string(),
                revenue,
            })
            .collect();
        let total = months.iter().map(|m| m.revenue).sum();
        Self {
            window,
            property_id,
            months,
            total,
        }
    }
}
