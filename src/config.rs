use std::collections::BTreeSet;
use std::env;
use std::fmt;

use enum_map::{enum_map, Enum, EnumMap};

use super::Country;


/// Countries the datasets are produced for.
pub static SELECTED_COUNTRIES: [&str; 13] = [
	"Germany",
	"Austria",
	"Netherlands",
	"Spain",
	"Czech Republic",
	"Italy",
	"United Kingdom",
	"Poland",
	"Belgium",
	"Denmark",
	"Turkey",
	"Greece",
	"Croatia",
];

/// Countries which do not report recovered cases. Their active case count is
/// forced to zero instead of being derived from a recovered series of zeroes.
pub static NO_RECOVERED_DATA: [&str; 2] = [
	"Netherlands",
	"United Kingdom",
];


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Source {
	Population,
	Confirmed,
	Recovered,
}

pub static ALL_SOURCES: [Source; 3] = [
	Source::Population,
	Source::Confirmed,
	Source::Recovered,
];

impl Source {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Population => "population",
			Self::Confirmed => "confirmed",
			Self::Recovered => "recovered",
		}
	}

	pub fn default_url(&self) -> &'static str {
		match self {
			Self::Population => "https://covid.ourworldindata.org/data/owid-covid-data.csv",
			Self::Confirmed => "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv",
			Self::Recovered => "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_recovered_global.csv",
		}
	}

	pub fn env_var(&self) -> &'static str {
		match self {
			Self::Population => "COVID_POPULATION_URL",
			Self::Confirmed => "COVID_CONFIRMED_URL",
			Self::Recovered => "COVID_RECOVERED_URL",
		}
	}

	/// File name used when the source is mirrored to a local directory.
	pub fn file_name(&self) -> &'static str {
		match self {
			Self::Population => "population.csv",
			Self::Confirmed => "confirmed_global.csv",
			Self::Recovered => "recovered_global.csv",
		}
	}
}

impl fmt::Display for Source {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}


/// Where each of the three raw tables is read from. A location is either a
/// filesystem path (optionally gzipped) or an http(s) URL.
#[derive(Debug, Clone)]
pub struct SourceSet {
	locations: EnumMap<Source, String>,
}

impl SourceSet {
	pub fn defaults() -> Self {
		Self{
			locations: EnumMap::from(|src: Source| src.default_url().to_string()),
		}
	}

	pub fn from_env() -> Self {
		let mut result = Self::defaults();
		for src in ALL_SOURCES.iter() {
			if let Ok(v) = env::var(src.env_var()) {
				result.set(*src, v);
			}
		}
		result
	}

	pub fn new(population: String, confirmed: String, recovered: String) -> Self {
		Self{
			locations: enum_map! {
				Source::Population => population.clone(),
				Source::Confirmed => confirmed.clone(),
				Source::Recovered => recovered.clone(),
			},
		}
	}

	pub fn get(&self, src: Source) -> &str {
		&self.locations[src]
	}

	pub fn set(&mut self, src: Source, location: String) {
		self.locations[src] = location;
	}

	pub fn iter(&self) -> impl Iterator<Item = (Source, &str)> + '_ {
		self.locations.iter().map(|(src, loc)| (src, loc.as_str()))
	}
}


#[derive(Debug, Clone)]
pub struct PipelineConfig {
	/// Allow-list of countries, in the order they are reported.
	pub countries: Vec<Country>,
	/// Countries whose active cases are forced to zero.
	pub no_recovered: BTreeSet<Country>,
	/// Turn any report finding into a hard error.
	pub strict: bool,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self{
			countries: SELECTED_COUNTRIES.iter().map(|c| Country::from(*c)).collect(),
			no_recovered: NO_RECOVERED_DATA.iter().map(|c| Country::from(*c)).collect(),
			strict: false,
		}
	}
}

impl PipelineConfig {
	pub fn new<I: IntoIterator<Item = S>, J: IntoIterator<Item = S>, S: Into<Country>>(countries: I, no_recovered: J) -> Self {
		Self{
			countries: countries.into_iter().map(Into::into).collect(),
			no_recovered: no_recovered.into_iter().map(Into::into).collect(),
			strict: false,
		}
	}

	pub fn from_env() -> Self {
		let mut result = Self::default();
		result.strict = match env::var("COVID_STRICT") {
			Ok(v) => v == "1" || v.eq_ignore_ascii_case("true"),
			Err(_) => false,
		};
		result
	}

	pub fn is_selected(&self, country: &str) -> bool {
		self.countries.iter().any(|c| c.as_str() == country)
	}

	pub fn has_recovered_data(&self, country: &str) -> bool {
		!self.no_recovered.contains(country)
	}
}
