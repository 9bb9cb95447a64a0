use log::{info, warn};

use super::config::{PipelineConfig, Source, SourceSet};
use super::error::Error;
use super::fetch;
use super::ioutil::open_location;
use super::join::{join_population, join_series, PopulationIndex};
use super::metrics::{derive_daily, DailyRecord};
use super::progress::ProgressSink;
use super::report::{Finding, Report};
use super::reshape::melt;
use super::sources::{PopulationTable, WideTable};
use super::weekly::{aggregate_weekly, WeeklyRecord};


/// The three parsed source tables a run starts from.
#[derive(Debug, Clone)]
pub struct RawInputs {
	pub population: PopulationTable,
	pub confirmed: WideTable,
	pub recovered: WideTable,
}

impl RawInputs {
	pub fn load<S: ProgressSink + ?Sized>(s: &mut S, sources: &SourceSet) -> Result<Self, Error> {
		let client = fetch::Client::new();
		let population = {
			info!("loading population from {}", sources.get(Source::Population));
			let r = open_location(&client, sources.get(Source::Population))?;
			PopulationTable::from_reader(s, r)?
		};
		let confirmed = {
			info!("loading confirmed cases from {}", sources.get(Source::Confirmed));
			let r = open_location(&client, sources.get(Source::Confirmed))?;
			WideTable::from_reader(s, Source::Confirmed, r)?
		};
		let recovered = {
			info!("loading recovered cases from {}", sources.get(Source::Recovered));
			let r = open_location(&client, sources.get(Source::Recovered))?;
			WideTable::from_reader(s, Source::Recovered, r)?
		};
		Ok(Self{population, confirmed, recovered})
	}
}


#[derive(Debug, Clone)]
pub struct PipelineOutput {
	pub daily: Vec<DailyRecord>,
	pub weekly: Vec<WeeklyRecord>,
	pub report: Report,
}


/// Run all transformation stages on the parsed inputs.
///
/// Schema and key violations abort with an error. Everything else that was
/// lost or merged on the way is listed in the returned report; with
/// `config.strict` a non-empty report is an error instead.
pub fn run(inputs: &RawInputs, config: &PipelineConfig) -> Result<PipelineOutput, Error> {
	let mut report = Report::new();

	let confirmed = melt(&inputs.confirmed, config, &mut report)?;
	let recovered = melt(&inputs.recovered, config, &mut report)?;
	let cases = join_series(&confirmed, &recovered, &mut report)?;

	let population = PopulationIndex::build(&inputs.population, config)?;
	if population.is_empty() {
		warn!("population table has no usable entry for any selected country");
	}
	let joined = join_population(cases, &population, &mut report);

	let daily = derive_daily(joined, &config.no_recovered);
	let covered = {
		let mut countries: Vec<_> = daily.iter().map(|r| &r.country).collect();
		countries.dedup();
		countries.len()
	};
	if covered != config.countries.len() {
		report.push(Finding::CountryCount{
			expected: config.countries.len(),
			actual: covered,
		});
	}

	let weekly = aggregate_weekly(&daily, &mut report);
	info!("produced {} daily and {} weekly rows for {} countries", daily.len(), weekly.len(), covered);

	if config.strict && !report.is_empty() {
		return Err(Error::Validation(report.into_findings()))
	}
	Ok(PipelineOutput{daily, weekly, report})
}
