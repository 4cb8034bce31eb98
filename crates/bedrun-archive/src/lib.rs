//! Server archive handling: validation, extraction, discovery, and world
//! backups.
//!
//! - `inspect.rs` - archive listing and required-entry validation
//! - `sanitize.rs` - entry path sanitization (zip-slip prevention)
//! - `extract.rs` - extraction with unix-mode handling
//! - `locate.rs` - discovery of manually uploaded archives
//! - `backup.rs` - recursive world backups

pub use backup::{BackupReport, backup_dir, backup_file_name};
pub use error::{Error, Result};
pub use extract::{ensure_executable, extract, remove_installed};
pub use inspect::{ArchiveReport, inspect};
pub use locate::{list_archives, locate_archive};
pub use sanitize::sanitize_entry_path;

mod backup;
mod error;
mod extract;
mod inspect;
mod locate;
mod sanitize;
