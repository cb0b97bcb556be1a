//! tidyfolder - organize the contents of a folder
//!
//! This library moves the files of a single folder around according to one of
//! four policies: into category folders by extension, into folders named after
//! their creation year, into a "Unique Files" folder keeping one copy of each
//! distinct content, or out of every subfolder into the folder itself. Files
//! are never overwritten; name clashes get a numeric suffix.

pub mod cli;
pub mod config;
pub mod digest;
pub mod file_category;
pub mod file_organizer;
pub mod organizer;
pub mod output;
pub mod progress;
pub mod report;
pub mod timestamps;

pub use config::{CompiledFilters, ConfigError, Settings};
pub use file_category::CategoryTable;
pub use file_organizer::{FileOrganizer, MoveRecord, OrganizeError, OrganizeResult};
pub use organizer::Organizer;
pub use progress::{NoProgress, ProgressObserver};
pub use report::{Report, RunSummary, SummaryValue};
pub use timestamps::{CreationTimeSource, FsCreationTime};

pub use cli::{Cli, OrganizeCommand, RunOptions, run_cli};
