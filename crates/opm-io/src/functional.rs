use std::path::Path;

use opm_volume::Volume;

use crate::error::IoError;

/// Reads a volume from the given file path.
///
/// The file is the bincode encoding of shape, strides and raw `f32`
/// samples, as produced by [`write_volume`].
///
/// # Arguments
///
/// * `file_path` - The path to the volume file.
///
/// # Returns
///
/// The decoded volume.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or does
/// not decode to a valid volume.
pub fn read_volume(file_path: impl AsRef<Path>) -> Result<Volume<f32>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    let (volume, _) = bincode::decode_from_slice(&bytes, bincode::config::standard())?;
    Ok(volume)
}

/// Writes a volume to the given file path.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `volume` - The volume to serialize.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn write_volume(file_path: impl AsRef<Path>, volume: &Volume<f32>) -> Result<(), IoError> {
    let bytes = bincode::encode_to_vec(volume, bincode::config::standard())?;
    std::fs::write(file_path, bytes)?;
    Ok(())
}
