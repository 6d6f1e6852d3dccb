//! Error types for the `kindred` binary.

use std::path::PathBuf;

use kindred_graph::GraphError;
use kindred_persist::PersistError;

/// Anything a command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A graph operation was rejected.
    #[error("{source}")]
    Graph {
        /// The underlying graph error.
        #[from]
        source: GraphError,
    },

    /// Loading, saving, or decoding a document failed.
    #[error("{source}")]
    Persist {
        /// The underlying persistence error.
        #[from]
        source: PersistError,
    },

    /// A file named on the command line does not exist.
    #[error("no such file: {}", path.display())]
    MissingFile {
        /// The path that was given.
        path: PathBuf,
    },
}
