//! Resolve where favorites are kept.

use std::{env, path::PathBuf};

use anyhow::anyhow;
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "keithckyeung";
const APPLICATION: &str = "book-library";

pub(crate) const DATA_DIR_ENV: &str = "BOOK_LIBRARY_DATA_DIR";

/// Returns the data directory, preferring `BOOK_LIBRARY_DATA_DIR` over the
/// platform default. An empty variable counts as unset.
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow!("unable to determine a data directory for {APPLICATION}"))?;
    Ok(dirs.data_local_dir().to_path_buf())
}
