use std::collections::BTreeSet;

use log::debug;

use chrono::{Datelike, NaiveDate};

use super::groups::{per_million, rescale_by_max, Grouped};
use super::metrics::DailyRecord;
use super::report::{Finding, Report};
use super::Country;


/// One row of the weekly dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyRecord {
	pub country: Country,
	/// ISO 8601 week number, without the year.
	pub week: u32,
	pub total_cases: i64,
	pub recovered_cases: i64,
	pub active_cases: i64,
	pub new_cases: i64,
	pub pop: u64,
	pub new_per_mil: f64,
	pub new_rescale: Option<f64>,
	pub active_per_mil: f64,
}


pub fn iso_week(date: NaiveDate) -> u32 {
	date.iso_week().week()
}


fn aggregate_bucket(country: &Country, week: u32, days: &[DailyRecord], report: &mut Report) -> Option<WeeklyRecord> {
	let first = days.first()?;
	let mut rec = WeeklyRecord{
		country: country.clone(),
		week,
		total_cases: first.total_cases,
		recovered_cases: first.recovered_cases,
		active_cases: first.active_cases,
		new_cases: 0,
		pop: first.pop,
		new_per_mil: 0.0,
		new_rescale: None,
		active_per_mil: 0.0,
	};
	let mut years = BTreeSet::new();
	for day in days.iter() {
		rec.total_cases = rec.total_cases.max(day.total_cases);
		rec.recovered_cases = rec.recovered_cases.max(day.recovered_cases);
		rec.active_cases = rec.active_cases.max(day.active_cases);
		rec.new_cases += day.new_cases;
		years.insert(day.date.iso_week().year());
	}
	if years.len() > 1 {
		report.push(Finding::WeekCollision{
			country: country.clone(),
			week,
			years: years.into_iter().collect(),
		});
	}
	Some(rec)
}

/// Aggregate the daily dataset into (country, week number) buckets.
///
/// Cumulative columns take the maximum of the week, `new_cases` the sum, the
/// population the first value. Per-million and rescaled columns are derived
/// again from the weekly values; the rescale maximum is taken over the weeks
/// of each country.
///
/// Buckets are keyed by week number only. Input spanning more than one ISO
/// year merges same-numbered weeks of different years; every such bucket is
/// reported as a [`Finding::WeekCollision`].
pub fn aggregate_weekly(daily: &[DailyRecord], report: &mut Report) -> Vec<WeeklyRecord> {
	let buckets = Grouped::by_key(daily.iter().cloned(), |r| (r.country.clone(), iso_week(r.date)))
		.sorted_by_key(|r| r.date);

	let mut weeks = Vec::with_capacity(buckets.len());
	for ((country, week), days) in buckets.iter() {
		if let Some(rec) = aggregate_bucket(country, *week, days, report) {
			weeks.push(rec);
		}
	}

	let by_country = Grouped::by_key(weeks, |r| r.country.clone())
		.sorted_by_key(|r| r.week)
		.map_groups(|_, mut weeks| {
			let new_cases: Vec<i64> = weeks.iter().map(|r| r.new_cases).collect();
			let rescaled = rescale_by_max(&new_cases[..]);
			for (rec, new_rescale) in weeks.iter_mut().zip(rescaled.into_iter()) {
				rec.new_per_mil = per_million(rec.new_cases, rec.pop);
				rec.active_per_mil = per_million(rec.active_cases, rec.pop);
				rec.new_rescale = new_rescale;
			}
			weeks
		});
	let result = by_country.into_rows();
	debug!("aggregated {} daily rows into {} weekly rows", daily.len(), result.len());
	result
}
