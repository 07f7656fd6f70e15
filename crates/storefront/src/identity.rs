//! Client session identity.
//!
//! The client keeps one [`SessionId`] for its whole lifetime so the API server
//! can scope cart, wishlist, and orders to it. The id is stored in a small
//! file and regenerated only when that file is missing or blank.

use std::io;
use std::path::Path;

use bazaar_core::SessionId;

/// Load the session id stored at `path`, creating and saving a new one if the
/// file is missing or empty.
///
/// # Errors
///
/// Returns an I/O error if the file exists but cannot be read, or if a new id
/// cannot be written.
pub fn load_or_create(path: &Path) -> io::Result<SessionId> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            if let Some(id) = SessionId::parse(&contents) {
                tracing::debug!(path = %path.display(), "Reusing stored session id");
                return Ok(id);
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let id = SessionId::generate();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, id.as_str())?;
    tracing::info!(path = %path.display(), "Created new session id");
    Ok(id)
}
