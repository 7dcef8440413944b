/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open or manipulate the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the volume payload.
    #[error("Failed to decode the volume file. {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Error to encode the volume payload.
    #[error("Failed to encode the volume file. {0}")]
    EncodeError(#[from] bincode::error::EncodeError),
}
