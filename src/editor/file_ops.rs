//! File operations: save.

use super::Editor; // editor state
use anyhow::{Context, Result}; // anyhow error handling
use std::fs::File; // file handle
use std::io::BufWriter; // buffered writing

impl Editor {
    /// Save the buffer to the session's file, reporting the outcome on the status line.
    ///
    /// Returns whether the save succeeded; a failure never stops the editor.
    pub fn save(&mut self) -> bool {
        match self.write_file() {
            Ok(()) => {
                tracing::info!(
                    target: "io",
                    file = %self.file_path.display(),
                    line_count = self.buf.line_count(),
                    "file_saved"
                );
                self.set_status("saved successfully");
                true
            }
            Err(e) => {
                tracing::error!(target: "io", error = ?e, "save_failed");
                self.set_status("error: save unsuccessful");
                false
            }
        }
    }

    /// Uses streaming write to avoid allocating the entire file as a String.
    fn write_file(&self) -> Result<()> {
        let path = &self.file_path;
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        self.buf
            .write_to(BufWriter::new(file))
            .with_context(|| format!("Failed writing {}", path.display()))
    }
}
