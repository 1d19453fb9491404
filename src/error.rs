//! Error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Proper exit codes for CI/CD

use std::path::PathBuf;
use thiserror::Error;

/// bundlemap errors with contextual suggestions
#[derive(Error, Debug)]
pub enum BundlemapError {
    /// Stats file could not be read
    #[error("Stats file not found: {path}")]
    StatsNotFound {
        /// Path to the stats file
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Stats file is not valid stats JSON
    #[error("Failed to parse stats JSON: {path}")]
    StatsParse {
        /// Path to the stats file
        path: PathBuf,
        #[source]
        /// JSON error source
        source: serde_json::Error,
    },

    /// Exclusion pattern did not compile
    #[error("Invalid exclude pattern: '{pattern}'")]
    InvalidExcludePattern {
        /// The offending pattern
        pattern: String,
        #[source]
        /// Regex error source
        source: regex::Error,
    },

    /// Gzip computation failed for one node's source
    #[error("Failed to compress source of '{label}'")]
    Compression {
        /// Asset or node label whose compression failed
        label: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl BundlemapError {
    /// Get actionable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::StatsNotFound { .. } => Some(
                "Generate a stats file with your bundler first (e.g. webpack --profile --json > stats.json)"
                    .to_string(),
            ),
            Self::StatsParse { .. } => {
                Some("Ensure the file is the bundler's stats JSON output, not a bundle".to_string())
            }
            Self::InvalidExcludePattern { .. } => {
                Some("Exclude patterns are regular expressions; check the syntax".to_string())
            }
            Self::Compression { .. } => None,
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes following sysexits.h conventions.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StatsNotFound { .. } => 66, // EX_NOINPUT
            Self::StatsParse { .. } => 65,    // EX_DATAERR
            Self::InvalidExcludePattern { .. } => 64, // EX_USAGE
            Self::Compression { .. } => 1,    // Generic error
            Self::Io { .. } => 74,            // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        // Main error message
        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        // Try to downcast to BundlemapError for suggestions
        if let Some(bm_error) = error.downcast_ref::<BundlemapError>() {
            if let Some(suggestion) = bm_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(bm_error) = error.downcast_ref::<BundlemapError>() {
            bm_error.exit_code()
        } else {
            1 // Generic error
        }
    }
}
