use std::collections::BTreeSet;

use log::debug;

use chrono::NaiveDate;

use super::config::{PipelineConfig, Source};
use super::error::Error;
use super::report::{Finding, Report};
use super::sources::{WideRow, WideTable};
use super::Country;


/// One observation of a tidy case series.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyValue {
	pub country: Country,
	pub date: NaiveDate,
	pub value: i64,
}

#[derive(Debug, Clone)]
pub struct TidySeries {
	pub source: Source,
	pub values: Vec<TidyValue>,
}

impl TidySeries {
	pub fn countries(&self) -> BTreeSet<&Country> {
		self.values.iter().map(|v| &v.country).collect()
	}
}


/// Country-level rows of allow-listed countries. Rows describing provinces or
/// overseas territories are dropped. A country with two country-level rows
/// would produce duplicate keys downstream and is rejected.
pub fn select_rows<'t>(table: &'t WideTable, config: &PipelineConfig) -> Result<Vec<&'t WideRow>, Error> {
	let mut seen: BTreeSet<&Country> = BTreeSet::new();
	let mut result = Vec::new();
	for row in table.rows.iter() {
		if !row.is_country_level() || !config.is_selected(&row.country) {
			continue
		}
		if !seen.insert(&row.country) {
			return Err(Error::DuplicateKey{
				source_table: table.source,
				key: row.country.to_string(),
			})
		}
		result.push(row);
	}
	Ok(result)
}

/// Filter the wide table and turn it into one value per (country, date).
///
/// Allow-listed countries without a country-level row are reported, so that
/// a spelling difference against the allow-list cannot go unnoticed.
pub fn melt(table: &WideTable, config: &PipelineConfig, report: &mut Report) -> Result<TidySeries, Error> {
	let rows = select_rows(table, config)?;
	let mut values = Vec::with_capacity(rows.len() * table.dates.len());
	for row in rows.iter() {
		let counts = table.counts(row)?;
		for (date, v) in table.dates.iter().zip(counts.iter()) {
			values.push(TidyValue{
				country: row.country.clone(),
				date: *date,
				value: *v,
			});
		}
	}
	let series = TidySeries{source: table.source, values};

	let present = series.countries();
	for country in config.countries.iter() {
		if !present.contains(country) {
			report.push(Finding::MissingCountry{
				source: table.source,
				country: country.clone(),
			});
		}
	}
	debug!("{}: melted {} countries into {} values", table.source, present.len(), series.values.len());
	Ok(series)
}
