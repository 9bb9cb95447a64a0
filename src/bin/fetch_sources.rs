use std::fs;
use std::path::PathBuf;

use covid_tidy::{fetch, SourceSet};


fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	if argv.len() != 2 {
		eprintln!("usage: {} <target-directory>", argv[0]);
		std::process::exit(2)
	}
	let target = PathBuf::from(&argv[1]);
	fs::create_dir_all(&target)?;

	let client = fetch::Client::new();
	let sources = SourceSet::from_env();
	for (src, location) in sources.iter() {
		if !covid_tidy::is_remote(location) {
			println!("skipping {}: {} is not a URL", src, location);
			continue
		}
		let path = target.join(src.file_name());
		println!("fetching {} to {} ...", src, path.display());
		let n = covid_tidy::write_atomically(&path, |w| -> Result<u64, covid_tidy::Error> {
			Ok(client.download(location, w)?)
		})?;
		println!("  {} bytes", n);
	}
	Ok(())
}
