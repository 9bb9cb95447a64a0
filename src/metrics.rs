use std::collections::BTreeSet;

use log::debug;

use chrono::NaiveDate;

use super::groups::{first_difference, per_million, rescale_by_max, Grouped};
use super::join::JoinedRow;
use super::Country;


/// One row of the daily dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
	pub country: Country,
	pub date: NaiveDate,
	pub total_cases: i64,
	pub recovered_cases: i64,
	pub pop: u64,
	pub active_cases: i64,
	pub new_cases: i64,
	pub new_per_mil: f64,
	/// `None` where the country's maximum of `new_cases` is not positive.
	pub new_rescale: Option<f64>,
	pub active_per_mil: f64,
}


/// Active cases of one observation. Countries in `no_recovered` do not report
/// recoveries, so their difference would just repeat the total; it is forced
/// to zero instead.
pub fn active_cases(country: &str, total: i64, recovered: i64, no_recovered: &BTreeSet<Country>) -> i64 {
	if no_recovered.contains(country) {
		0
	} else {
		total - recovered
	}
}

/// Derive the daily metrics. Rows are grouped by country and sorted by date
/// before differencing; the input order does not matter.
pub fn derive_daily(rows: Vec<JoinedRow>, no_recovered: &BTreeSet<Country>) -> Vec<DailyRecord> {
	let grouped = Grouped::by_key(rows, |r| r.country.clone())
		.sorted_by_key(|r| r.date)
		.map_groups(|country, rows| {
			let totals: Vec<i64> = rows.iter().map(|r| r.total_cases).collect();
			let new_cases = first_difference(&totals[..]);
			let rescaled = rescale_by_max(&new_cases[..]);
			if rescaled.iter().all(Option::is_none) {
				debug!("{}: no positive new cases, rescale undefined", country);
			}
			rows.into_iter()
				.zip(new_cases.into_iter().zip(rescaled.into_iter()))
				.map(|(r, (new_cases, new_rescale))| {
					let active = active_cases(&r.country, r.total_cases, r.recovered_cases, no_recovered);
					DailyRecord{
						new_per_mil: per_million(new_cases, r.pop),
						active_per_mil: per_million(active, r.pop),
						country: r.country,
						date: r.date,
						total_cases: r.total_cases,
						recovered_cases: r.recovered_cases,
						pop: r.pop,
						active_cases: active,
						new_cases,
						new_rescale,
					}
				})
				.collect::<Vec<DailyRecord>>()
		});
	grouped.into_rows()
}


#[cfg(test)]
mod tests {
	use super::*;

	fn row(country: &str, day: u32, total: i64, recovered: i64, pop: u64) -> JoinedRow {
		JoinedRow{
			country: country.into(),
			date: NaiveDate::from_ymd(2020, 4, day),
			total_cases: total,
			recovered_cases: recovered,
			pop,
		}
	}

	fn none() -> BTreeSet<Country> {
		BTreeSet::new()
	}

	#[test]
	fn testland_round_trip() {
		let rows = vec![
			row("TestLand", 1, 10, 2, 1_000_000),
			row("TestLand", 2, 15, 3, 1_000_000),
			row("TestLand", 3, 15, 3, 1_000_000),
		];
		let daily = derive_daily(rows, &none());
		let new: Vec<i64> = daily.iter().map(|r| r.new_cases).collect();
		let per_mil: Vec<f64> = daily.iter().map(|r| r.new_per_mil).collect();
		let rescale: Vec<Option<f64>> = daily.iter().map(|r| r.new_rescale).collect();
		let active: Vec<i64> = daily.iter().map(|r| r.active_cases).collect();
		assert_eq!(new, vec![0, 5, 0]);
		assert_eq!(per_mil, vec![0.0, 5.0, 0.0]);
		assert_eq!(rescale, vec![Some(0.0), Some(1.0), Some(0.0)]);
		assert_eq!(active, vec![8, 12, 12]);
		assert_eq!(daily[1].active_per_mil, 12.0);
	}

	#[test]
	fn unsorted_input_is_sorted_before_differencing() {
		let rows = vec![
			row("A", 3, 15, 0, 1_000_000),
			row("A", 1, 10, 0, 1_000_000),
			row("A", 2, 12, 0, 1_000_000),
		];
		let daily = derive_daily(rows, &none());
		let dates: Vec<u32> = daily.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
		let new: Vec<i64> = daily.iter().map(|r| r.new_cases).collect();
		assert_eq!(dates, vec![1, 2, 3]);
		assert_eq!(new, vec![0, 2, 3]);
	}

	#[test]
	fn groups_do_not_leak_into_each_other() {
		let rows = vec![
			row("B", 1, 100, 0, 2_000_000),
			row("A", 1, 10, 0, 1_000_000),
			row("B", 2, 140, 0, 2_000_000),
			row("A", 2, 11, 0, 1_000_000),
		];
		let daily = derive_daily(rows, &none());
		assert_eq!(daily.len(), 4);
		assert_eq!(daily[0].country.as_str(), "A");
		assert_eq!(daily[0].new_cases, 0);
		assert_eq!(daily[1].new_cases, 1);
		assert_eq!(daily[2].country.as_str(), "B");
		// first row of B is not diffed against the last row of A
		assert_eq!(daily[2].new_cases, 0);
		assert_eq!(daily[3].new_cases, 40);
		assert_eq!(daily[3].new_per_mil, 20.0);
		assert_eq!(daily[1].new_rescale, Some(1.0));
		assert_eq!(daily[3].new_rescale, Some(1.0));
	}

	#[test]
	fn no_recovered_override_forces_active_to_zero() {
		let overrides: BTreeSet<Country> = vec![Country::from("Netherlands")].into_iter().collect();
		let rows = vec![
			row("Netherlands", 1, 100, 0, 17_000_000),
			row("Netherlands", 2, 130, 0, 17_000_000),
			row("Germany", 1, 100, 10, 83_000_000),
		];
		let daily = derive_daily(rows, &overrides);
		for r in daily.iter() {
			if r.country.as_str() == "Netherlands" {
				assert_eq!(r.active_cases, 0);
				assert_eq!(r.active_per_mil, 0.0);
			} else {
				assert_eq!(r.active_cases, r.total_cases - r.recovered_cases);
			}
		}
	}

	#[test]
	fn negative_corrections_pass_through() {
		let rows = vec![
			row("A", 1, 10, 0, 1_000_000),
			row("A", 2, 20, 0, 1_000_000),
			row("A", 3, 15, 0, 1_000_000),
		];
		let daily = derive_daily(rows, &none());
		assert_eq!(daily[2].new_cases, -5);
		assert_eq!(daily[2].new_per_mil, -5.0);
		assert_eq!(daily[2].new_rescale, Some(-0.5));
	}

	#[test]
	fn flat_series_has_undefined_rescale() {
		let rows = vec![
			row("A", 1, 10, 0, 1_000_000),
			row("A", 2, 10, 0, 1_000_000),
		];
		let daily = derive_daily(rows, &none());
		assert!(daily.iter().all(|r| r.new_rescale.is_none()));
		assert!(daily.iter().all(|r| r.new_cases == 0));
	}
}
