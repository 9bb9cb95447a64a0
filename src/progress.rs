use std::io;
use std::io::Write;
use std::time;

use log::warn;


pub trait ProgressSink {
	fn update(&mut self, done: usize, total: Option<usize>);
	fn finish(&mut self, done: usize, total: Option<usize>);
}


/// Carriage-return based meter for interactive terminals.
///
/// Output errors are logged once; the meter stays silent afterwards.
pub struct TtyProgress<W: Write = io::Stdout> {
	out: W,
	broken: bool,
	t0: time::Instant,
	tprev: time::Instant,
	iprev: usize,
}

impl TtyProgress {
	pub fn new() -> Self {
		Self::with_writer(io::stdout())
	}
}

impl<W: Write> TtyProgress<W> {
	pub fn with_writer(out: W) -> Self {
		let now = time::Instant::now();
		Self{
			out,
			broken: false,
			t0: now,
			tprev: now,
			iprev: 0,
		}
	}

	pub fn into_inner(self) -> W {
		self.out
	}

	fn emit(&mut self, line: String) {
		if self.broken {
			return
		}
		let out = &mut self.out;
		if let Err(e) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
			warn!("progress output failed, disabling it: {}", e);
			self.broken = true;
		}
	}
}

impl<W: Write> ProgressSink for TtyProgress<W> {
	fn update(&mut self, done: usize, total: Option<usize>) {
		let now = time::Instant::now();
		let dt = (now - self.tprev).as_secs_f64();
		let rate = done.saturating_sub(self.iprev) as f64 / dt;
		let line = match total {
			Some(n) => {
				let frac = (done as f64) / (n.max(1) as f64);
				format!("{:6.0}% [{:6.2}/s]\r", frac * 100.0, rate)
			},
			None => format!("{:12} [{:6.2}/s]\r", done, rate),
		};
		self.emit(line);
		self.iprev = done;
		self.tprev = now;
	}

	fn finish(&mut self, done: usize, total: Option<usize>) {
		let dt = (time::Instant::now() - self.t0).as_secs_f64();
		let rate = done as f64 / dt;
		let line = match total {
			Some(_) => format!("{:6.0}% [{:6.2}/s]\n", 100.0, rate),
			None => format!("{:12} [{:6.2}/s]\n", done, rate),
		};
		self.emit(line);
	}
}


/// For pipes and log files: stay silent until the end, then print a summary.
pub struct SummaryProgress;

impl ProgressSink for SummaryProgress {
	fn update(&mut self, _done: usize, _total: Option<usize>) {}

	fn finish(&mut self, done: usize, _total: Option<usize>) {
		println!("  {} done", done);
	}
}


pub struct NullProgress;

impl ProgressSink for NullProgress {
	fn update(&mut self, _done: usize, _total: Option<usize>) {}
	fn finish(&mut self, _done: usize, _total: Option<usize>) {}
}


pub fn default_output() -> Box<dyn ProgressSink> {
	if isatty::stdout_isatty() {
		Box::new(TtyProgress::new())
	} else {
		Box::new(SummaryProgress)
	}
}


/// Progress over a stream of unknown length.
pub struct CountMeter<'s, S: ProgressSink + ?Sized> {
	sink: &'s mut S,
}

impl<'s, S: ProgressSink + ?Sized> CountMeter<'s, S> {
	pub fn new(sink: &'s mut S) -> Self {
		Self{sink}
	}

	pub fn update(&mut self, done: usize) {
		self.sink.update(done, None)
	}

	pub fn finish(self, done: usize) {
		self.sink.finish(done, None)
	}
}


/// Progress over a known number of steps.
pub struct StepMeter<'s, S: ProgressSink + ?Sized> {
	sink: &'s mut S,
	total: usize,
}

impl<'s, S: ProgressSink + ?Sized> StepMeter<'s, S> {
	pub fn new(sink: &'s mut S, total: usize) -> Self {
		Self{sink, total}
	}

	pub fn update(&mut self, done: usize) {
		self.sink.update(done, Some(self.total))
	}

	pub fn finish(self) {
		self.sink.finish(self.total, Some(self.total))
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	struct ClosedPipe {
		writes: usize,
	}

	impl Write for ClosedPipe {
		fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
			self.writes += 1;
			Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn tty_progress_writes_carriage_return_lines() {
		let mut p = TtyProgress::with_writer(Vec::new());
		{
			let mut m = StepMeter::new(&mut p, 4);
			m.update(2);
			m.finish();
		}
		let text = String::from_utf8(p.into_inner()).unwrap();
		let mut lines = text.split('\r');
		assert!(lines.next().unwrap().trim_start().starts_with("50%"));
		assert!(text.ends_with("/s]\n"));
		assert!(text.contains("100%"));
	}

	#[test]
	fn tty_progress_stops_writing_after_an_error() {
		let mut p = TtyProgress::with_writer(ClosedPipe{writes: 0});
		{
			let mut m = CountMeter::new(&mut p);
			m.update(100);
			m.update(200);
			m.finish(250);
		}
		assert_eq!(p.into_inner().writes, 1);
	}
}
