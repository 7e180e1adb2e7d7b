//! Long-format chart tables derived from a finished schedule. The plotting
//! layer renders these; this module stops at the tidy data plus the two
//! caller-supplied fill colors.

use crate::schedule::{round_cents, AmortizationSchedule};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Series {
    CumulativePrincipal,
    CumulativeInterest,
    PrincipalPayment,
    InterestPayment,
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Series::CumulativePrincipal => "Cumulative Principal",
            Series::CumulativeInterest => "Cumulative Interest",
            Series::PrincipalPayment => "Principal Payment",
            Series::InterestPayment => "Interest Payment",
        };
        f.write_str(label)
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartRow {
    pub payment: u32,
    pub series: Series,
    pub amount: f64,
}

/// One chart's worth of data: the long-format table and the fill colors for
/// the principal and interest series, in that order.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartData {
    pub rows: Vec<ChartRow>,
    pub fills: [String; 2],
}

/// Running totals of principal and interest per payment, for a stacked-area
/// chart of where the money has gone so far.
pub fn amount_paid_over_time(
    schedule: &AmortizationSchedule,
    principal_fill: &str,
    interest_fill: &str,
) -> ChartData {
    let mut rows = Vec::with_capacity(schedule.rows().len() * 2);
    let mut running = 0.;
    for row in schedule.rows() {
        running += row.principal;
        rows.push(ChartRow {
            payment: row.payment,
            series: Series::CumulativePrincipal,
            amount: round_cents(running),
        });
    }
    running = 0.;
    for row in schedule.rows() {
        running += row.interest;
        rows.push(ChartRow {
            payment: row.payment,
            series: Series::CumulativeInterest,
            amount: round_cents(running),
        });
    }
    ChartData {
        rows,
        fills: [principal_fill.to_string(), interest_fill.to_string()],
    }
}

/// Per-payment principal/interest amounts for a 100%-stacked composition
/// chart. Zero amounts are dropped so skipped and already-paid-off periods
/// leave no column.
pub fn payment_composition(
    schedule: &AmortizationSchedule,
    principal_fill: &str,
    interest_fill: &str,
) -> ChartData {
    let mut rows = Vec::with_capacity(schedule.rows().len() * 2);
    for row in schedule.rows() {
        if row.principal != 0. {
            rows.push(ChartRow {
                payment: row.payment,
                series: Series::PrincipalPayment,
                amount: row.principal,
            });
        }
    }
    for row in schedule.rows() {
        if row.interest != 0. {
            rows.push(ChartRow {
                payment: row.payment,
                series: Series::InterestPayment,
                amount: row.interest,
            });
        }
    }
    ChartData {
        rows,
        fills: [principal_fill.to_string(), interest_fill.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::{amount_paid_over_time, payment_composition, Series};
    use crate::schedule::{build_schedule, LoanTerms};
    use chrono::NaiveDate;
    use test_log::test;

    const GREEN: &str = "#00693e";
    const GOLD: &str = "#f4c430";

    fn one_year_terms() -> LoanTerms {
        LoanTerms {
            principal: 12000.,
            annual_rate: 12.,
            term_years: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_series_labels() {
        assert_eq!(Series::CumulativePrincipal.to_string(), "Cumulative Principal");
        assert_eq!(Series::CumulativeInterest.to_string(), "Cumulative Interest");
        assert_eq!(Series::PrincipalPayment.to_string(), "Principal Payment");
        assert_eq!(Series::InterestPayment.to_string(), "Interest Payment");
    }

    #[test]
    fn test_amount_paid_over_time() {
        let schedule = build_schedule(&one_year_terms(), None, None).unwrap();
        let chart = amount_paid_over_time(&schedule, GREEN, GOLD);

        assert_eq!(chart.rows.len(), 24);
        assert_eq!(chart.fills, [GREEN.to_string(), GOLD.to_string()]);

        let principal: Vec<_> = chart
            .rows
            .iter()
            .filter(|r| r.series == Series::CumulativePrincipal)
            .collect();
        let interest: Vec<_> = chart
            .rows
            .iter()
            .filter(|r| r.series == Series::CumulativeInterest)
            .collect();
        assert_eq!(principal.len(), 12);
        assert_eq!(interest.len(), 12);

        assert_eq!(principal[0].payment, 1);
        assert_eq!(principal[0].amount, 946.19);
        assert_eq!(principal[1].amount, 1901.84);
        // all principal repaid by the last payment
        assert_eq!(principal[11].amount, 12000.0);
        assert_eq!(interest[0].amount, 120.0);
        assert_eq!(interest[1].amount, 230.54);
        assert_eq!(interest[11].amount, 794.24);

        // running totals never decrease
        for pair in principal.windows(2) {
            assert!(pair[0].amount <= pair[1].amount);
        }
        for pair in interest.windows(2) {
            assert!(pair[0].amount <= pair[1].amount);
        }
    }

    #[test]
    fn test_payment_composition_drops_zero_rows() {
        let terms = one_year_terms();
        let mut overrides: Vec<Option<f64>> = vec![None; 12];
        overrides[5] = Some(0.);

        let schedule = build_schedule(&terms, Some(&overrides), None).unwrap();
        let chart = payment_composition(&schedule, GREEN, GOLD);

        // the skipped month contributes no column at all
        assert_eq!(chart.rows.len(), 22);
        assert!(chart.rows.iter().all(|r| r.amount != 0.));
        assert!(chart.rows.iter().all(|r| r.payment != 6));

        let schedule = build_schedule(&terms, None, None).unwrap();
        let chart = payment_composition(&schedule, GREEN, GOLD);
        assert_eq!(chart.rows.len(), 24);
        assert_eq!(chart.rows[0].series, Series::PrincipalPayment);
        assert_eq!(chart.rows[0].amount, 946.19);
        assert_eq!(chart.rows[12].series, Series::InterestPayment);
        assert_eq!(chart.rows[12].amount, 120.0);
    }

    #[test]
    fn test_payment_composition_after_early_payoff() {
        let terms = one_year_terms();
        let mut overrides: Vec<Option<f64>> = vec![None; 12];
        overrides[1] = Some(12000.);

        let schedule = build_schedule(&terms, Some(&overrides), None).unwrap();
        let chart = payment_composition(&schedule, GREEN, GOLD);

        // only the two real payments survive, in both series
        assert_eq!(chart.rows.len(), 4);
        let payments: Vec<u32> = chart.rows.iter().map(|r| r.payment).collect();
        assert_eq!(payments, vec![1, 2, 1, 2]);
    }
}
