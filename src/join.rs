use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};

use chrono::NaiveDate;

use super::config::{PipelineConfig, Source};
use super::error::Error;
use super::reshape::TidySeries;
use super::report::{Finding, Report};
use super::sources::{population_count, PopulationTable};
use super::Country;


/// Confirmed and recovered totals of one country on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRow {
	pub country: Country,
	pub date: NaiveDate,
	pub total_cases: i64,
	pub recovered_cases: i64,
}

/// A [`CaseRow`] with the population of its country attached.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
	pub country: Country,
	pub date: NaiveDate,
	pub total_cases: i64,
	pub recovered_cases: i64,
	pub pop: u64,
}


fn index_series(series: &TidySeries) -> Result<BTreeMap<(&Country, NaiveDate), i64>, Error> {
	let mut result = BTreeMap::new();
	for v in series.values.iter() {
		if result.insert((&v.country, v.date), v.value).is_some() {
			return Err(Error::DuplicateKey{
				source_table: series.source,
				key: format!("{} {}", v.country, v.date),
			})
		}
	}
	Ok(result)
}

/// Inner join of the two case series on (country, date), in the order of
/// the confirmed series. Keys present on one side only are dropped and
/// their number is reported per side.
pub fn join_series(confirmed: &TidySeries, recovered: &TidySeries, report: &mut Report) -> Result<Vec<CaseRow>, Error> {
	let confirmed_index = index_series(confirmed)?;
	let recovered_index = index_series(recovered)?;

	let mut result = Vec::with_capacity(confirmed.values.len());
	let mut confirmed_only = 0;
	for v in confirmed.values.iter() {
		match recovered_index.get(&(&v.country, v.date)) {
			Some(r) => result.push(CaseRow{
				country: v.country.clone(),
				date: v.date,
				total_cases: v.value,
				recovered_cases: *r,
			}),
			None => confirmed_only += 1,
		}
	}
	let recovered_only = recovered_index.keys().filter(|k| !confirmed_index.contains_key(*k)).count();

	if confirmed_only > 0 {
		report.push(Finding::UnmatchedKeys{source: confirmed.source, count: confirmed_only});
	}
	if recovered_only > 0 {
		report.push(Finding::UnmatchedKeys{source: recovered.source, count: recovered_only});
	}
	debug!("joined {} case rows", result.len());
	Ok(result)
}


/// Population per allow-listed country, one value each.
#[derive(Debug, Clone, Default)]
pub struct PopulationIndex {
	by_country: BTreeMap<Country, u64>,
}

impl PopulationIndex {
	/// Deduplicate the location table. The same (location, population) pair
	/// repeated over many snapshot rows collapses into one; a location with
	/// two different populations cannot be joined without fanning out rows
	/// and is rejected. Rows without a value are skipped.
	pub fn build(table: &PopulationTable, config: &PipelineConfig) -> Result<Self, Error> {
		let mut by_country: BTreeMap<Country, u64> = BTreeMap::new();
		for row in table.rows.iter() {
			if !config.is_selected(&row.location) {
				continue
			}
			let value = match row.population {
				Some(v) => population_count(&row.location, v)?,
				None => continue,
			};
			match by_country.get(&row.location) {
				Some(existing) if *existing != value => {
					return Err(Error::DuplicateKey{
						source_table: Source::Population,
						key: format!("{} ({} vs. {})", row.location, existing, value),
					})
				},
				Some(_) => (),
				None => {
					by_country.insert(row.location.clone(), value);
				},
			}
		}
		info!("population known for {} countries", by_country.len());
		Ok(Self{by_country})
	}

	pub fn get(&self, country: &str) -> Option<u64> {
		self.by_country.get(country).copied()
	}

	pub fn len(&self) -> usize {
		self.by_country.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_country.is_empty()
	}
}

impl<C: Into<Country>> std::iter::FromIterator<(C, u64)> for PopulationIndex {
	fn from_iter<I: IntoIterator<Item = (C, u64)>>(iter: I) -> Self {
		Self{
			by_country: iter.into_iter().map(|(c, v)| (c.into(), v)).collect(),
		}
	}
}


/// Inner join on country. Rows of countries without population are dropped
/// and each such country is reported once.
pub fn join_population(rows: Vec<CaseRow>, population: &PopulationIndex, report: &mut Report) -> Vec<JoinedRow> {
	let mut missing: BTreeSet<Country> = BTreeSet::new();
	let mut result = Vec::with_capacity(rows.len());
	for row in rows.into_iter() {
		let pop = match population.get(&row.country) {
			Some(p) => p,
			None => {
				missing.insert(row.country);
				continue
			},
		};
		result.push(JoinedRow{
			country: row.country,
			date: row.date,
			total_cases: row.total_cases,
			recovered_cases: row.recovered_cases,
			pop,
		});
	}
	for country in missing.into_iter() {
		report.push(Finding::MissingPopulation{country});
	}
	result
}
