use std::io;
use std::io::{Read, Write};
use std::fs;
use std::path::{Path, PathBuf};

use bytes::Buf;

use flate2;

use super::error::Error;
use super::fetch;


pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	match path.extension() {
		Some(x) if x == "gz" => {
			Ok(Box::new(flate2::read::GzDecoder::new(fs::File::open(path)?)))
		},
		_ => Ok(Box::new(fs::File::open(path)?)),
	}
}

pub fn is_remote(location: &str) -> bool {
	location.starts_with("http://") || location.starts_with("https://")
}

/// Open a source location: http(s) URLs are downloaded in full, anything else
/// is treated as a path. A `.gz` suffix enables decompression either way.
pub fn open_location(client: &fetch::Client, location: &str) -> Result<Box<dyn Read>, Error> {
	if !is_remote(location) {
		return Ok(magic_open(location)?)
	}
	let body = client.get(location)?.reader();
	if location.ends_with(".gz") {
		Ok(Box::new(flate2::read::GzDecoder::new(body)))
	} else {
		Ok(Box::new(body))
	}
}

fn partial_path(path: &Path) -> PathBuf {
	let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
	name.push(".part");
	path.with_file_name(name)
}

/// Write `path` through `f`. The data goes to `<path>.part` first and is
/// renamed into place once `f` succeeded; on failure the partial file is
/// removed and `path` is left untouched.
pub fn write_atomically<P, T, E, F>(path: P, f: F) -> Result<T, E>
	where P: AsRef<Path>,
		  E: From<io::Error>,
		  F: FnOnce(&mut io::BufWriter<fs::File>) -> Result<T, E>,
{
	let path = path.as_ref();
	let tmp = partial_path(path);
	let result = fs::File::create(&tmp).map_err(E::from).and_then(|file| -> Result<T, E> {
		let mut w = io::BufWriter::new(file);
		let v = f(&mut w)?;
		w.flush()?;
		Ok(v)
	});
	match result {
		Ok(v) => {
			fs::rename(&tmp, path)?;
			Ok(v)
		},
		Err(e) => {
			let _ = fs::remove_file(&tmp);
			Err(e)
		},
	}
}
