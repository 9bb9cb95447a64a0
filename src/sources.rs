use std::io;

use log::debug;

use serde::{de, Deserialize, Deserializer};

use chrono::naive::NaiveDate;

use smartstring::alias::{String as SmartString};

use super::config::Source;
use super::error::Error;
use super::progress::{CountMeter, ProgressSink};
use super::Country;


pub static PROVINCE_COLUMN: &str = "Province/State";
pub static COUNTRY_COLUMN: &str = "Country/Region";
pub static LAT_COLUMN: &str = "Lat";
pub static LONG_COLUMN: &str = "Long";
pub static WIDE_DATE_FORMAT: &str = "%m/%d/%y";

pub static POPULATION_LOCATION_COLUMN: &str = "location";
pub static POPULATION_VALUE_COLUMN: &str = "population";


/// Parse a wide-table date header such as `1/22/20`.
pub fn parse_wide_date(s: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(s.trim(), WIDE_DATE_FORMAT).ok()
}

fn column_index(source: Source, headers: &csv::StringRecord, column: &'static str) -> Result<usize, Error> {
	match headers.iter().position(|h| h.trim() == column) {
		Some(i) => Ok(i),
		None => Err(Error::MissingColumn{source_table: source, column}),
	}
}


#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
	pub country: Country,
	/// `None` for the row describing the country itself.
	pub province: Option<SmartString>,
	/// Raw cells, one per entry of the table's `dates`. They are only parsed
	/// for rows which are actually used, see [`WideTable::counts`].
	pub cells: Vec<SmartString>,
}

impl WideRow {
	pub fn is_country_level(&self) -> bool {
		self.province.is_none()
	}
}


/// A cumulative case table in the one-column-per-date layout.
#[derive(Debug, Clone)]
pub struct WideTable {
	pub source: Source,
	pub dates: Vec<NaiveDate>,
	pub rows: Vec<WideRow>,
}

impl WideTable {
	pub fn from_reader<R: io::Read, S: ProgressSink + ?Sized>(
			s: &mut S,
			source: Source,
			r: R,
	) -> Result<Self, Error> {
		let mut r = csv::Reader::from_reader(r);
		let headers = r.headers()?.clone();
		let country_col = column_index(source, &headers, COUNTRY_COLUMN)?;
		let province_col = column_index(source, &headers, PROVINCE_COLUMN)?;
		let id_cols = [
			country_col,
			province_col,
			column_index(source, &headers, LAT_COLUMN)?,
			column_index(source, &headers, LONG_COLUMN)?,
		];

		let mut date_cols = Vec::with_capacity(headers.len());
		let mut dates = Vec::with_capacity(headers.len());
		for (i, h) in headers.iter().enumerate() {
			if id_cols.contains(&i) {
				continue
			}
			match parse_wide_date(h) {
				Some(d) => {
					date_cols.push(i);
					dates.push(d);
				},
				None => return Err(Error::BadDateHeader{source_table: source, header: h.into()}),
			}
		}

		let mut rows = Vec::new();
		let mut pm = CountMeter::new(s);
		let mut n = 0;
		for (i, row) in r.records().enumerate() {
			let rec = row?;
			let country: Country = rec.get(country_col).unwrap_or("").trim().into();
			let province = match rec.get(province_col).map(str::trim) {
				Some(p) if !p.is_empty() => Some(SmartString::from(p)),
				_ => None,
			};
			let cells = date_cols.iter()
				.map(|col| SmartString::from(rec.get(*col).unwrap_or("").trim()))
				.collect();
			rows.push(WideRow{country, province, cells});
			if i % 100 == 99 {
				pm.update(i+1);
			}
			n = i+1;
		}
		pm.finish(n);
		debug!("{}: read {} rows over {} dates", source, rows.len(), dates.len());
		Ok(Self{source, dates, rows})
	}

	/// Cumulative counts of `row`. Every cell must be a non-negative integer.
	pub fn counts(&self, row: &WideRow) -> Result<Vec<i64>, Error> {
		let mut values = Vec::with_capacity(self.dates.len());
		for (raw, date) in row.cells.iter().zip(self.dates.iter()) {
			match parse_count(raw) {
				Some(v) => values.push(v),
				None => return Err(Error::BadCount{
					source_table: self.source,
					country: row.country.clone(),
					date: *date,
					value: raw.to_string(),
				}),
			}
		}
		Ok(values)
	}
}

fn parse_count(s: &str) -> Option<i64> {
	let v = s.trim().parse::<i64>().ok()?;
	if v < 0 {
		return None
	}
	Some(v)
}


fn maybe_population<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
	where D: Deserializer<'de>
{
	let s = String::deserialize(deserializer)?;
	let s = s.trim();
	if s.is_empty() {
		return Ok(None)
	}
	Ok(Some(s.parse::<f64>().map_err(de::Error::custom)?))
}


/// One row of the location metadata table. The table carries many more
/// columns, only these two are read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPopulationRow {
	pub location: Country,
	#[serde(deserialize_with = "maybe_population")]
	pub population: Option<f64>,
}


#[derive(Debug, Clone)]
pub struct PopulationTable {
	pub rows: Vec<RawPopulationRow>,
}

impl PopulationTable {
	pub fn from_reader<R: io::Read, S: ProgressSink + ?Sized>(s: &mut S, r: R) -> Result<Self, Error> {
		let mut r = csv::Reader::from_reader(r);
		{
			let headers = r.headers()?;
			column_index(Source::Population, headers, POPULATION_LOCATION_COLUMN)?;
			column_index(Source::Population, headers, POPULATION_VALUE_COLUMN)?;
		}
		let mut rows = Vec::new();
		let mut pm = CountMeter::new(s);
		let mut n = 0;
		for (i, row) in r.deserialize().enumerate() {
			let rec: RawPopulationRow = row?;
			rows.push(rec);
			if i % 10000 == 9999 {
				pm.update(i+1);
			}
			n = i+1;
		}
		pm.finish(n);
		debug!("population: read {} rows", rows.len());
		Ok(Self{rows})
	}
}


/// Convert a population cell to a head count. Rejects fractions, negative
/// values and zero, which would break the per-million normalization.
pub fn population_count(country: &Country, v: f64) -> Result<u64, Error> {
	if !v.is_finite() || v < 1.0 || v.fract() != 0.0 || v > (u64::MAX as f64) {
		return Err(Error::BadPopulation{country: country.clone(), value: v})
	}
	Ok(v as u64)
}
