use std::path::PathBuf;

use thiserror::Error;

use crate::task::TaskId;

// Invalid stored values (unknown theme, missing locale) are not errors;
// they default and queue a warning. These are the conditions that must
// not be masked.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("no task with id {id}")]
    TaskNotFound { id: TaskId },

    #[error("task blob at {path} is corrupt: {source}")]
    CorruptTaskBlob {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("preferences store I/O failure at {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed preferences line {line} in {path}: {text}")]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        text: String,
    },
}
