//! Storage initialization
//!
//! Handles first-run setup: directories, empty snapshot files and an
//! optional starting profile.

use serde_json::json;

use super::file_io::write_json_atomic;
use crate::config::FiscallyPaths;
use crate::error::FiscallyError;
use crate::models::Profile;

/// Initialize storage for a fresh installation
///
/// Existing snapshot files are left untouched. The profile is only written
/// when one is given.
pub fn initialize_storage(
    paths: &FiscallyPaths,
    profile: Option<&Profile>,
) -> Result<(), FiscallyError> {
    paths.ensure_directories()?;

    if !paths.transactions_file().exists() {
        write_json_atomic(paths.transactions_file(), &json!({ "transactions": [] }))?;
    }

    if !paths.goals_file().exists() {
        write_json_atomic(paths.goals_file(), &json!({ "goals": [] }))?;
    }

    if let Some(profile) = profile {
        write_json_atomic(paths.profile_file(), profile)?;
    }

    Ok(())
}
