//! Loan amortization engine.
//!
//! [`schedule`] builds the month-by-month amortization table from loan terms
//! and optional per-payment overrides, plus the derived payment calendar and
//! totals. [`chart`] reshapes a finished schedule into long-format tables for
//! an external plotting layer.

pub mod chart;
pub mod schedule;
