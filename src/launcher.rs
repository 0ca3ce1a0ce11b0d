//! Opening the generated deck in the user's browser.

use std::io;
use std::path::Path;

use log::{info, warn};

/// Opens `path` with the system's default handler.
///
/// Launching is best effort: the document already exists on disk, so a
/// failure is logged and returned for reporting but must not fail the run.
pub fn open_document(path: &Path) -> io::Result<()> {
    let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    match open::that(&target) {
        Ok(()) => {
            info!("opened {} in the default viewer", target.display());
            Ok(())
        }
        Err(err) => {
            warn!("could not open {}: {err}", target.display());
            Err(err)
        }
    }
}
