//! Per-run accounting of filesystem work and skipped files.

use std::path::PathBuf;

/// A single file operation that failed and was skipped.
#[derive(Debug)]
pub struct SkippedFile {
    /// Source path the operation was reading from.
    pub source: PathBuf,
    /// Underlying I/O error.
    pub error: std::io::Error,
}

/// Aggregated outcome of one assembly run.
///
/// Individual copy failures never abort a run; they are collected here and
/// surfaced once at the end instead of disappearing into the log.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files installed into the output tree.
    pub files_installed: usize,
    /// Relative symlinks created for versioned libraries.
    pub links_created: usize,
    /// Directories created.
    pub dirs_created: usize,
    /// Operations that failed and were skipped.
    pub skipped: Vec<SkippedFile>,
}

impl RunReport {
    /// Record a successful file installation.
    pub fn installed(&mut self) {
        self.files_installed += 1;
    }

    /// Record a created symlink.
    pub fn linked(&mut self) {
        self.links_created += 1;
    }

    /// Record a created directory.
    pub fn dir_created(&mut self) {
        self.dirs_created += 1;
    }

    /// Record a failed, skipped operation.
    pub fn skip(&mut self, source: PathBuf, error: std::io::Error) {
        self.skipped.push(SkippedFile { source, error });
    }

    /// Whether every attempted operation succeeded.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files installed, {} links, {} directories, {} skipped",
            self.files_installed,
            self.links_created,
            self.dirs_created,
            self.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_start_clean() {
        let report = RunReport::default();
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "0 files installed, 0 links, 0 directories, 0 skipped");
    }

    #[test]
    fn skipped_operations_are_retained() {
        let mut report = RunReport::default();
        report.installed();
        report.installed();
        report.linked();
        report.skip(
            PathBuf::from("/src/missing.so"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );

        assert!(!report.is_clean());
        assert_eq!(report.files_installed, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].source, PathBuf::from("/src/missing.so"));
    }
}
