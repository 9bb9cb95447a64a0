use std::fs::File;
use std::io;
use std::path::Path;

use covid_tidy;
use covid_tidy::{DailyRecord, PipelineConfig, RawInputs, SourceSet, WeeklyRecord};


fn usage(argv0: &str) -> ! {
	eprintln!("usage: {} [<population> <confirmed> <recovered>] <daily.csv> <weekly.csv>", argv0);
	eprintln!();
	eprintln!("Inputs may be paths, .gz paths or http(s) URLs. Without inputs, the");
	eprintln!("COVID_POPULATION_URL, COVID_CONFIRMED_URL and COVID_RECOVERED_URL");
	eprintln!("environment variables or the public defaults are used.");
	std::process::exit(2)
}

fn writeback_daily<P: AsRef<Path>>(path: P, records: &[DailyRecord]) -> Result<(), covid_tidy::Error> {
	let w = io::BufWriter::new(File::create(path)?);
	covid_tidy::write_daily(&mut *covid_tidy::default_output(), w, records)
}

fn writeback_weekly<P: AsRef<Path>>(path: P, records: &[WeeklyRecord]) -> Result<(), covid_tidy::Error> {
	let w = io::BufWriter::new(File::create(path)?);
	covid_tidy::write_weekly(&mut *covid_tidy::default_output(), w, records)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let (sources, daily_out, weekly_out) = match argv.len() {
		6 => (
			SourceSet::new(argv[1].clone(), argv[2].clone(), argv[3].clone()),
			&argv[4],
			&argv[5],
		),
		3 => (SourceSet::from_env(), &argv[1], &argv[2]),
		_ => usage(&argv[0]),
	};
	let config = PipelineConfig::from_env();

	println!("loading source tables ...");
	let inputs = RawInputs::load(&mut *covid_tidy::default_output(), &sources)?;

	println!("crunching ...");
	let output = covid_tidy::run(&inputs, &config)?;
	for finding in output.report.findings() {
		println!("warning: {}", finding);
	}

	println!("writing daily dataset ({} rows) ...", output.daily.len());
	writeback_daily(daily_out, &output.daily)?;

	println!("writing weekly dataset ({} rows) ...", output.weekly.len());
	writeback_weekly(weekly_out, &output.weekly)?;

	Ok(())
}
