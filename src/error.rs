use std::io;

use chrono::NaiveDate;

use thiserror::Error;

use super::config::Source;
use super::fetch::FetchError;
use super::report::Finding;
use super::Country;


#[derive(Debug, Error)]
pub enum Error {
	#[error("i/o error: {0}")]
	Io(#[from] io::Error),
	#[error("malformed csv: {0}")]
	Csv(#[from] csv::Error),
	#[error("failed to fetch source: {0}")]
	Fetch(#[from] FetchError),
	#[error("{source_table}: missing column {column:?}")]
	MissingColumn{
		source_table: Source,
		column: &'static str,
	},
	#[error("{source_table}: column {header:?} is neither an id column nor a M/D/YY date")]
	BadDateHeader{
		source_table: Source,
		header: String,
	},
	#[error("{source_table}: invalid count {value:?} for {country} at {date}")]
	BadCount{
		source_table: Source,
		country: Country,
		date: NaiveDate,
		value: String,
	},
	#[error("population: invalid value {value} for {country}")]
	BadPopulation{
		country: Country,
		value: f64,
	},
	#[error("{source_table}: duplicate key {key}")]
	DuplicateKey{
		source_table: Source,
		key: String,
	},
	#[error("validation failed: {}", format_findings(.0))]
	Validation(Vec<Finding>),
}

fn format_findings(findings: &[Finding]) -> String {
	let parts: Vec<String> = findings.iter().map(|f| f.to_string()).collect();
	parts.join("; ")
}
