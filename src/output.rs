use std::io;

use serde::{Deserialize, Serialize};

use chrono::NaiveDate;

use super::error::Error;
use super::metrics::DailyRecord;
use super::progress::{ProgressSink, StepMeter};
use super::weekly::WeeklyRecord;
use super::Country;


/// Serialized form of a [`DailyRecord`].
///
/// The first, unnamed column is a positional row index. It carries no data
/// and consumers must not join on it. An undefined `new_rescale` is written
/// as an empty field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
	#[serde(rename = "")]
	pub index: usize,
	#[serde(rename = "Country")]
	pub country: Country,
	#[serde(rename = "Date")]
	pub date: NaiveDate,
	pub total_cases: i64,
	pub recovered_cases: i64,
	#[serde(rename = "Pop")]
	pub pop: u64,
	pub active_cases: i64,
	pub new_cases: i64,
	pub new_per_mil: f64,
	pub new_rescale: Option<f64>,
	pub active_per_mil: f64,
}

impl DailyRow {
	pub fn new(index: usize, rec: &DailyRecord) -> Self {
		Self{
			index,
			country: rec.country.clone(),
			date: rec.date,
			total_cases: rec.total_cases,
			recovered_cases: rec.recovered_cases,
			pop: rec.pop,
			active_cases: rec.active_cases,
			new_cases: rec.new_cases,
			new_per_mil: rec.new_per_mil,
			new_rescale: rec.new_rescale,
			active_per_mil: rec.active_per_mil,
		}
	}
}


/// Serialized form of a [`WeeklyRecord`]. `Date` holds the ISO week number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRow {
	#[serde(rename = "")]
	pub index: usize,
	#[serde(rename = "Country")]
	pub country: Country,
	#[serde(rename = "Date")]
	pub week: u32,
	pub total_cases: i64,
	pub recovered_cases: i64,
	pub active_cases: i64,
	pub new_cases: i64,
	#[serde(rename = "Pop")]
	pub pop: u64,
	pub new_per_mil: f64,
	pub new_rescale: Option<f64>,
	pub active_per_mil: f64,
}

impl WeeklyRow {
	pub fn new(index: usize, rec: &WeeklyRecord) -> Self {
		Self{
			index,
			country: rec.country.clone(),
			week: rec.week,
			total_cases: rec.total_cases,
			recovered_cases: rec.recovered_cases,
			active_cases: rec.active_cases,
			new_cases: rec.new_cases,
			pop: rec.pop,
			new_per_mil: rec.new_per_mil,
			new_rescale: rec.new_rescale,
			active_per_mil: rec.active_per_mil,
		}
	}
}


pub fn write_daily<W: io::Write, S: ProgressSink + ?Sized>(s: &mut S, w: W, records: &[DailyRecord]) -> Result<(), Error> {
	let mut w = csv::Writer::from_writer(w);
	let mut pm = StepMeter::new(s, records.len());
	for (i, rec) in records.iter().enumerate() {
		w.serialize(DailyRow::new(i, rec))?;
		if i % 1000 == 999 {
			pm.update(i+1);
		}
	}
	w.flush()?;
	pm.finish();
	Ok(())
}

pub fn write_weekly<W: io::Write, S: ProgressSink + ?Sized>(s: &mut S, w: W, records: &[WeeklyRecord]) -> Result<(), Error> {
	let mut w = csv::Writer::from_writer(w);
	let mut pm = StepMeter::new(s, records.len());
	for (i, rec) in records.iter().enumerate() {
		w.serialize(WeeklyRow::new(i, rec))?;
		if i % 1000 == 999 {
			pm.update(i+1);
		}
	}
	w.flush()?;
	pm.finish();
	Ok(())
}
