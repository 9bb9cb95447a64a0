use std::fmt;

use log::warn;

use super::config::Source;
use super::Country;


/// A data inconsistency detected during a run which does not by itself make
/// the output wrong, but which the consumer has to know about.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
	/// An allow-listed country has no country-level row in a case table.
	MissingCountry{
		source: Source,
		country: Country,
	},
	/// Number of (country, date) keys present only in this case series and
	/// therefore dropped by the inner join.
	UnmatchedKeys{
		source: Source,
		count: usize,
	},
	/// A country with case data but no population; dropped by the join.
	MissingPopulation{
		country: Country,
	},
	/// The final daily dataset covers fewer countries than the allow-list.
	CountryCount{
		expected: usize,
		actual: usize,
	},
	/// A (country, week number) bucket received dates from several ISO years.
	WeekCollision{
		country: Country,
		week: u32,
		years: Vec<i32>,
	},
}

impl fmt::Display for Finding {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::MissingCountry{source, country} => write!(f, "{}: no country-level row for {:?}", source, country),
			Self::UnmatchedKeys{source, count} => write!(f, "{}: {} country/date keys without counterpart dropped by join", source, count),
			Self::MissingPopulation{country} => write!(f, "population: no value for {:?}, country dropped", country),
			Self::CountryCount{expected, actual} => write!(f, "daily dataset covers {} of {} selected countries", actual, expected),
			Self::WeekCollision{country, week, years} => write!(f, "{:?}: week {} mixes dates of ISO years {:?}", country, week, years),
		}
	}
}


#[derive(Debug, Clone, Default)]
pub struct Report {
	findings: Vec<Finding>,
}

impl Report {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, finding: Finding) {
		warn!("{}", finding);
		self.findings.push(finding);
	}

	pub fn findings(&self) -> &[Finding] {
		&self.findings[..]
	}

	pub fn into_findings(self) -> Vec<Finding> {
		self.findings
	}

	pub fn is_empty(&self) -> bool {
		self.findings.is_empty()
	}

	pub fn missing_countries(&self, source: Source) -> Vec<&Country> {
		self.findings.iter().filter_map(|f| match f {
			Finding::MissingCountry{source: s, country} if *s == source => Some(country),
			_ => None,
		}).collect()
	}
}
