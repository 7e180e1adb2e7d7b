use amortize::schedule::{
    build_schedule, interest_amount, percent_interest, LoanTerms, ScheduleError,
};
use chrono::NaiveDate;
use log::info;
use simple_logger::SimpleLogger;

fn main() -> Result<(), ScheduleError> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let terms = LoanTerms {
        principal: 12000.,
        annual_rate: 12.,
        term_years: 1,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    };

    let schedule = build_schedule(&terms, None, None)?;
    schedule.show();

    let total = schedule.total_paid();
    info!(
        "total paid ${:.2}, interest ${:.2} ({}% of total)",
        total,
        interest_amount(terms.principal, total),
        percent_interest(terms.principal, total)
    );
    Ok(())
}
