use chrono::{Months, NaiveDate};
use log::trace;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("principal must be positive, got {0}")]
    NonPositivePrincipal(f64),
    #[error("term must be at least one year")]
    ZeroTerm,
    #[error("expected {expected} payment overrides, found {found}")]
    OverrideLength { expected: usize, found: usize },
    #[error("expected {expected} notes, found {found}")]
    NotesLength { expected: usize, found: usize },
    #[error("no representable date {months} months after {start}")]
    DateOverflow { start: NaiveDate, months: u32 },
}

/// Immutable inputs to one schedule calculation.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanTerms {
    pub principal: f64,
    /// Annual interest rate in percent (i.e., 7.0 for 7%).
    pub annual_rate: f64,
    pub term_years: u32,
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn n_payments(&self) -> u32 {
        self.term_years * 12
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12. / 100.
    }

    /// Level monthly payment from the annuity formula. A zero rate
    /// degenerates the formula, so that case amortizes straight-line.
    pub fn standard_payment(&self) -> f64 {
        let rate = self.monthly_rate();
        let n_payments = self.n_payments() as f64;
        if rate == 0. {
            self.principal / n_payments
        } else {
            let factor = (1. + rate).powf(n_payments);
            self.principal * (rate * factor) / (factor - 1.)
        }
    }
}

/// One row of the amortization table. Monetary fields are rounded to
/// cents once the full table is assembled.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaymentRow {
    pub payment: u32,
    pub amount: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
    pub note: String,
    pub date: NaiveDate,
}

impl fmt::Display for PaymentRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pmt number {}, date {}, payment ${:.2}, principal ${:.2}, interest ${:.2}, ending balance ${:.2}",
            self.payment, self.date, self.amount, self.principal, self.interest, self.balance
        )?;
        if !self.note.is_empty() {
            write!(f, " ({})", self.note)?;
        }
        Ok(())
    }
}

/// One entry of the three-column payment calendar.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledPayment {
    pub date: NaiveDate,
    pub amount: f64,
    pub note: String,
}

impl fmt::Display for ScheduledPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ${:.2}", self.date, self.amount)?;
        if !self.note.is_empty() {
            write!(f, " ({})", self.note)?;
        }
        Ok(())
    }
}

/// The full table for one [`LoanTerms`] + overrides combination. Produced
/// whole by [`build_schedule`]; every view below is a read-only projection.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationSchedule {
    rows: Vec<PaymentRow>,
}

impl AmortizationSchedule {
    pub fn rows(&self) -> &[PaymentRow] {
        &self.rows
    }

    /// Date/amount/note projection, row order preserved.
    pub fn payment_schedule(&self) -> Vec<ScheduledPayment> {
        self.rows
            .iter()
            .map(|row| ScheduledPayment {
                date: row.date,
                amount: row.amount,
                note: row.note.clone(),
            })
            .collect()
    }

    /// Sum of all payment amounts, rounded to cents.
    pub fn total_paid(&self) -> f64 {
        round_cents(self.rows.iter().map(|row| row.amount).sum())
    }

    pub fn show(&self) {
        for row in &self.rows {
            println!("{}", row);
        }
    }
}

pub fn interest_amount(amount_financed: f64, total_paid: f64) -> f64 {
    round_cents(total_paid - amount_financed)
}

/// Interest share of the total paid, to the nearest whole percent. A loan
/// with nothing paid yet has no interest share, so zero total is 0%.
pub fn percent_interest(amount_financed: f64, total_paid: f64) -> i64 {
    if total_paid == 0. {
        return 0;
    }
    ((total_paid - amount_financed) / total_paid * 100.).round() as i64
}

pub(crate) fn round_cents(amt: f64) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 100.).round() / 100.
    }
}

/// Monthly payment dates: one per month for `term_years * 12` months,
/// starting one calendar month after `start_date` on the same day of the
/// month. Each date is advanced from `start_date` directly, so a day that
/// overflows a short month clamps to month-end (Jan 31 -> Feb 29/28) but
/// resurfaces in later long months.
pub fn payment_dates(
    start_date: NaiveDate,
    term_years: u32,
) -> Result<Vec<NaiveDate>, ScheduleError> {
    let n_months = term_years * 12;
    let mut dates = Vec::with_capacity(n_months as usize);
    for i in 1..=n_months {
        let date = start_date
            .checked_add_months(Months::new(i))
            .ok_or(ScheduleError::DateOverflow {
                start: start_date,
                months: i,
            })?;
        dates.push(date);
    }
    Ok(dates)
}

/// Build the full amortization table.
///
/// `overrides` fixes individual payment amounts (`Some(0.)` skips a payment
/// and capitalizes that month's interest); `None` entries fall back to the
/// standard annuity payment. `notes` attaches free text per row. Both must
/// have exactly `term_years * 12` entries when present.
///
/// The loop carries the balance in full precision; rounding to cents is
/// applied once over the assembled table so rounding error never compounds
/// into later balances.
pub fn build_schedule(
    terms: &LoanTerms,
    overrides: Option<&[Option<f64>]>,
    notes: Option<&[String]>,
) -> Result<AmortizationSchedule, ScheduleError> {
    if terms.principal <= 0. {
        return Err(ScheduleError::NonPositivePrincipal(terms.principal));
    }
    if terms.term_years == 0 {
        return Err(ScheduleError::ZeroTerm);
    }
    let n_payments = terms.n_payments() as usize;
    if let Some(overrides) = overrides {
        if overrides.len() != n_payments {
            return Err(ScheduleError::OverrideLength {
                expected: n_payments,
                found: overrides.len(),
            });
        }
    }
    if let Some(notes) = notes {
        if notes.len() != n_payments {
            return Err(ScheduleError::NotesLength {
                expected: n_payments,
                found: notes.len(),
            });
        }
    }

    let monthly_rate = terms.monthly_rate();
    let standard_payment = terms.standard_payment();
    let scheduled: Vec<f64> = match overrides {
        Some(overrides) => overrides
            .iter()
            .map(|amt| amt.unwrap_or(standard_payment))
            .collect(),
        None => vec![standard_payment; n_payments],
    };
    let dates = payment_dates(terms.start_date, terms.term_years)?;

    let mut rows: Vec<PaymentRow> = Vec::with_capacity(n_payments);
    let mut balance = terms.principal;

    for number in 1..=n_payments {
        let (amount, principal, interest) = if balance == 0. {
            // loan already paid off; remaining rows are placeholders
            (0., 0., 0.)
        } else if number == n_payments {
            // final payment trues up to full payoff regardless of schedule
            let interest = balance * monthly_rate;
            let amount = balance + interest;
            let principal = amount - interest;
            balance = (balance - principal).max(0.);
            (amount, principal, interest)
        } else if scheduled[number - 1] == 0. {
            // skipped payment: accrued interest capitalizes into the balance
            let interest = balance * monthly_rate;
            balance += interest;
            (0., 0., 0.)
        } else {
            let interest = balance * monthly_rate;
            let amount = scheduled[number - 1];
            let principal = amount - interest;
            balance = (balance - principal).max(0.);
            (amount, principal, interest)
        };
        trace!(
            "pmt # {}, amount {}, interest {}, end bal {}",
            number,
            amount,
            interest,
            balance
        );
        rows.push(PaymentRow {
            payment: number as u32,
            amount,
            principal,
            interest,
            balance,
            note: notes.map(|n| n[number - 1].clone()).unwrap_or_default(),
            date: dates[number - 1],
        });
    }

    // single cosmetic rounding pass over the finished table
    for row in &mut rows {
        row.amount = round_cents(row.amount);
        row.principal = round_cents(row.principal);
        row.interest = round_cents(row.interest);
        row.balance = round_cents(row.balance);
    }

    Ok(AmortizationSchedule { rows })
}
