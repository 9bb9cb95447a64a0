use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use covid_tidy::{derive_daily, aggregate_weekly, Country, JoinedRow, Report};


fn cumulative(increments: &[i64], start: i64) -> Vec<i64> {
	let mut acc = start;
	increments.iter().map(|inc| {
		acc += inc;
		acc
	}).collect()
}

fn joined(country: &str, totals: &[i64], pop: u64) -> Vec<JoinedRow> {
	let start = NaiveDate::from_ymd(2020, 1, 22);
	totals.iter().zip(start.iter_days()).map(|(t, date)| JoinedRow{
		country: country.into(),
		date,
		total_cases: *t,
		recovered_cases: t / 3,
		pop,
	}).collect()
}


proptest! {
	#[test]
	fn new_cases_telescope_to_the_total_increase(
		increments in prop::collection::vec(-50i64..500, 1..120),
		start in 0i64..10_000,
	) {
		let totals = cumulative(&increments, start);
		let daily = derive_daily(joined("A", &totals, 1_000_000), &BTreeSet::new());
		prop_assert_eq!(daily[0].new_cases, 0);
		let sum: i64 = daily.iter().map(|r| r.new_cases).sum();
		prop_assert_eq!(sum, totals[totals.len()-1] - totals[0]);
	}

	#[test]
	fn rescale_stays_in_unit_range_for_non_decreasing_totals(
		increments in prop::collection::vec(0i64..1000, 1..120),
		pop in 1u64..100_000_000,
	) {
		let totals = cumulative(&increments, 0);
		let daily = derive_daily(joined("A", &totals, pop), &BTreeSet::new());
		let any_positive = daily.iter().any(|r| r.new_cases > 0);
		for r in daily.iter() {
			match r.new_rescale {
				Some(v) => {
					prop_assert!(any_positive);
					prop_assert!((0.0..=1.0).contains(&v), "{} out of range", v);
				},
				None => prop_assert!(!any_positive),
			}
			prop_assert_eq!(r.active_cases, r.total_cases - r.recovered_cases);
		}
	}

	#[test]
	fn weekly_new_cases_preserve_the_daily_sum(
		a in prop::collection::vec(0i64..1000, 1..60),
		b in prop::collection::vec(0i64..1000, 1..60),
	) {
		let mut rows = joined("A", &cumulative(&a, 0), 1_000);
		rows.extend(joined("B", &cumulative(&b, 0), 2_000));
		let no_recovered: BTreeSet<Country> = vec![Country::from("B")].into_iter().collect();
		let daily = derive_daily(rows, &no_recovered);
		let mut report = Report::new();
		let weekly = aggregate_weekly(&daily, &mut report);

		prop_assert!(report.is_empty());
		for country in ["A", "B"].iter() {
			let d: i64 = daily.iter().filter(|r| r.country.as_str() == *country).map(|r| r.new_cases).sum();
			let w: i64 = weekly.iter().filter(|r| r.country.as_str() == *country).map(|r| r.new_cases).sum();
			prop_assert_eq!(d, w);
		}
		prop_assert!(weekly.iter().filter(|r| r.country.as_str() == "B").all(|r| r.active_cases == 0));
	}
}
