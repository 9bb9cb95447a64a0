use smartstring::alias::{String as SmartString};

pub mod fetch;
mod ioutil;
mod config;
mod error;
mod groups;
mod join;
mod metrics;
mod output;
mod pipeline;
mod progress;
mod report;
mod reshape;
mod sources;
mod weekly;

pub use ioutil::{magic_open, open_location, is_remote, write_atomically};
pub use config::*;
pub use error::Error;
pub use groups::*;
pub use join::*;
pub use metrics::*;
pub use output::*;
pub use pipeline::*;
pub use progress::*;
pub use report::*;
pub use reshape::*;
pub use sources::*;
pub use weekly::*;


/// Country names as spelled in the source tables.
pub type Country = SmartString;
