use analytics::{AnalyticsEngine, IrParameters, summarize};
use chrono::NaiveDate;
use core_types::{ColumnKey, IrVariant};
use timeseries::{DEFAULT_INDEX, TimeSeriesTable, merge_all};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
}

fn instrument_table(instrument: &str, dates: Vec<NaiveDate>, closes: Vec<f64>) -> TimeSeriesTable {
    let mut table = TimeSeriesTable::new(DEFAULT_INDEX, dates).unwrap();
    table
        .insert_column(ColumnKey::close(instrument), closes)
        .unwrap();
    table
}

fn engine(benchmark: &str, window: usize) -> AnalyticsEngine {
    AnalyticsEngine::new(IrParameters {
        benchmark: benchmark.to_string(),
        window,
        risk_free_rate: 0.01,
    })
}

/// 200 daily closes: X rises linearly from 100 to 300, Y stays at 150.
fn linear_vs_flat() -> TimeSeriesTable {
    let dates: Vec<NaiveDate> = start().iter_days().take(200).collect();
    let x = (0..200).map(|i| 100.0 + 200.0 * i as f64 / 199.0).collect();
    let y = vec![150.0; 200];

    let calendar = TimeSeriesTable::calendar(dates[0], dates[199]).unwrap();
    merge_all(
        &[
            calendar,
            instrument_table("X", dates.clone(), x),
            instrument_table("Y", dates, y),
        ],
        "Date",
        "Date",
    )
    .unwrap()
}

#[test]
fn rising_instrument_has_positive_information_ratio_against_flat_benchmark() {
    let mut table = linear_vs_flat();
    let symbols = vec!["X".to_string(), "Y".to_string()];

    let report = engine("Y", 50).run(&mut table, &symbols);

    assert!(report.skipped.is_empty());
    let (_, ir) = table.column_by_name("X_Y_IR_50").expect("bare IR column");
    assert_eq!(ir.len(), 200);

    // Before the first full return window the differential is identically zero.
    assert!(ir[..50].iter().all(|v| v.is_nan()));
    for (row, value) in ir.iter().enumerate().skip(50) {
        assert!(value.is_finite(), "row {row} is undefined");
        assert!(*value > 0.0, "row {row} is {value}");
    }
}

#[test]
fn flat_benchmark_has_no_risk_adjusted_ratio() {
    let mut table = linear_vs_flat();
    let symbols = vec!["X".to_string(), "Y".to_string()];

    engine("Y", 50).run(&mut table, &symbols);

    // A constant price has zero return dispersion, so its Sharpe ratio, and with it
    // the risk-adjusted information ratio, is undefined throughout.
    let (_, sharpe) = table.column_by_name("Y_Close_SR_50").unwrap();
    assert!(sharpe.iter().all(|v| v.is_nan()));
    let (_, ira) = table.column_by_name("X_Y_IRA_50").unwrap();
    assert!(ira.iter().all(|v| v.is_nan()));
}

#[test]
fn benchmark_against_itself_adds_no_column() {
    let mut table = linear_vs_flat();
    let width = table.width();

    let report = engine("Y", 50).run(&mut table, &["Y".to_string()]);

    assert!(report.computed.is_empty());
    assert!(report.skipped.is_empty());
    assert_eq!(table.width(), width);
}

#[test]
fn future_prices_never_change_past_ratios() {
    let dates: Vec<NaiveDate> = start().iter_days().take(120).collect();
    let a: Vec<f64> = (0..120)
        .map(|i| 100.0 + (i as f64 / 5.0).sin() * 4.0 + i as f64 * 0.3)
        .collect();
    let b: Vec<f64> = (0..120).map(|i| 90.0 + (i as f64 / 7.0).cos() * 3.0).collect();

    let mut a_shocked = a.clone();
    for price in &mut a_shocked[100..] {
        *price *= 3.0;
    }

    let mut ratios = Vec::new();
    for a_closes in [a, a_shocked] {
        let mut table = merge_all(
            &[
                instrument_table("A", dates.clone(), a_closes),
                instrument_table("B", dates.clone(), b.clone()),
            ],
            "Date",
            "Date",
        )
        .unwrap();
        engine("B", 20).run(&mut table, &["A".to_string()]);
        ratios.push(table.column_by_name("A_B_IRA_20").unwrap().1.to_vec());
    }

    for row in 0..100 {
        let (before, after) = (ratios[0][row], ratios[1][row]);
        assert!(
            before.to_bits() == after.to_bits(),
            "row {row} changed from {before} to {after}"
        );
    }
    assert_ne!(ratios[0][110], ratios[1][110]);
}

#[test]
fn gaps_between_trading_days_are_carried_forward() {
    // A trades on even days, B on days divisible by three; the calendar covers all days.
    let days: Vec<NaiveDate> = start().iter_days().take(90).collect();
    let a_dates: Vec<NaiveDate> = days.iter().copied().step_by(2).collect();
    let b_dates: Vec<NaiveDate> = days.iter().copied().step_by(3).collect();
    let a_closes = (0..a_dates.len()).map(|i| 50.0 + i as f64).collect();
    let b_closes = (0..b_dates.len()).map(|i| 70.0 + (i % 4) as f64).collect();

    let mut table = merge_all(
        &[
            TimeSeriesTable::calendar(days[0], days[89]).unwrap(),
            instrument_table("A", a_dates, a_closes),
            instrument_table("B", b_dates, b_closes),
        ],
        "Date",
        "Date",
    )
    .unwrap();

    assert_eq!(table.len(), 90);
    let a = table.column(&ColumnKey::close("A")).unwrap();
    // Odd days repeat the previous even day.
    assert_eq!(a[1], a[0]);
    assert_eq!(a[3], a[2]);

    let report = engine("B", 10).run(&mut table, &["A".to_string(), "B".to_string()]);
    let summaries = summarize(&table, &report.computed);

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].variant, IrVariant::Bare);
    assert_eq!(summaries[1].variant, IrVariant::RiskAdjusted);
    assert!(summaries.iter().all(|s| s.observations > 0));
    assert_eq!(summaries[0].histogram.counts.iter().sum::<usize>(), summaries[0].observations);
}
