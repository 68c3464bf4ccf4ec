//! Running an operation from inside a file's parent directories

use super::{Response, SmbClient};
use crate::error::SmbError;

/// Remote path separator
const SEPARATOR: char = '/';

impl SmbClient {
    /// Enter the parent directories of `path`, run `operation` on the leaf
    /// name, then step back out
    ///
    /// Parents are entered one `cd` at a time. If one cannot be entered its
    /// response (or error) is returned and `operation` does not run. Every
    /// directory that was entered is left again with `cd ..`, whether
    /// `operation` succeeded, failed or returned an error.
    pub fn with_file_context<F>(&mut self, path: &str, operation: F) -> Result<Response, SmbError>
    where
        F: FnOnce(&mut Self, &str) -> Result<Response, SmbError>,
    {
        let mut components: Vec<&str> = path.split(SEPARATOR).filter(|c| !c.is_empty()).collect();
        let leaf = components.pop().unwrap_or_default();

        let mut depth = 0;
        let mut result = None;
        for dir in components {
            match self.change_dir(dir) {
                Ok(response) if response.is_success() => depth += 1,
                entered => {
                    result = Some(entered);
                    break;
                }
            }
        }

        let result = result.unwrap_or_else(|| operation(self, leaf));
        self.leave(depth);
        result
    }

    /// Step `depth` directories up; failures are logged, not returned
    fn leave(&mut self, depth: usize) {
        for _ in 0..depth {
            match self.change_dir("..") {
                Ok(response) if response.is_success() => {}
                Ok(response) => {
                    tracing::warn!(message = %response.message(), "Failed to restore directory");
                }
                Err(e) => tracing::warn!(error = %e, "Failed to restore directory"),
            }
        }
    }
}
