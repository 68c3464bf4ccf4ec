//! Recursive directory removal

use super::listing::{EntryKind, is_dot_placeholder};
use super::{Response, SmbClient, classify_structural, wrap};
use crate::error::SmbError;

impl SmbClient {
    /// Remove directory `dir` (a name in the current directory) with all its
    /// contents, depth first
    ///
    /// Stops at the first child that cannot be removed and returns its
    /// response; remaining siblings are left alone. The working directory is
    /// restored before returning either way.
    pub(super) fn remove_tree(&mut self, dir: &str) -> Result<Response, SmbError> {
        let entered = self.change_dir(dir)?;
        if entered.is_failure() {
            return Ok(entered);
        }

        let emptied = self.remove_children();
        let restored = self.change_dir("..");

        match emptied {
            Ok(None) => {}
            Ok(Some(failure)) => return Ok(failure),
            Err(e) => return Err(e),
        }
        let restored = restored?;
        if restored.is_failure() {
            return Ok(restored);
        }

        let raw = self.session.ask(&wrap("rmdir", [dir]))?;
        let response = classify_structural(&raw);
        tracing::debug!(dir = %dir, success = response.is_success(), "rmdir");
        Ok(response)
    }

    /// Delete everything in the current directory; the first failure is returned
    fn remove_children(&mut self) -> Result<Option<Response>, SmbError> {
        let listing = self.list("*")?;

        for (name, entry) in &listing {
            let response = match entry.kind {
                EntryKind::File => self.delete(name)?,
                EntryKind::Directory if is_dot_placeholder(name) => continue,
                EntryKind::Directory => self.remove_tree(name)?,
            };
            if response.is_failure() {
                tracing::debug!(name = %name, message = %response.message(), "Aborting removal");
                return Ok(Some(response));
            }
        }

        Ok(None)
    }
}
