use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create staging file in {}", .path.display())]
    Create {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write staging file {}", .path.display())]
    Write {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move staging file into {}", .path.display())]
    Persist {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
