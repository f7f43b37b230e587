use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Every failure aborts the whole batch; there is no partial-result mode.
/// Each variant names the offending file and the expectation it broke.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no stage export files were found")]
    EmptyInput,

    #[error("{identifier}: file name has no `-<digits>-` stage number")]
    MalformedIdentifier { identifier: String },

    #[error("{file}: missing required column `{column}`")]
    SchemaMismatch { file: String, column: String },

    #[error("{file}: line {line}, column `{column}`: `{value}` is not a finite number")]
    NumericParse {
        file: String,
        /// 1-based line in the file, header and units row included.
        line: usize,
        column: String,
        value: String,
    },

    #[error("{file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
