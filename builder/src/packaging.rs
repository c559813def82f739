//! Packaging of the compiled shared object for release upload.
//!
//! Produces a zip archive holding a single `<name>.so` entry at the archive
//! root, named per [`crate::naming::PackageName`].

use crate::exec::{CommandExecutor, command_line};
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use thiserror::Error;

/// Directory `make` writes the shared object into.
pub const MODULES_DIR: &str = "modules";

/// Unix permissions recorded for the shared object entry.
const SHARED_OBJECT_MODE: u32 = 0o755;

/// Errors arising from packaging operations.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// The build did not leave the expected shared object behind.
    #[error("shared object not found at {path}; did the build produce it?")]
    SharedObjectMissing {
        /// Where the shared object was expected.
        path: Utf8PathBuf,
    },

    /// Writing the zip archive failed.
    #[error("zip error during packaging: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An I/O operation failed (reading the shared object, writing the archive).
    #[error("I/O error during packaging: {0}")]
    Io(#[from] std::io::Error),
}

/// Log a listing of the modules directory.
///
/// The listing is diagnostic only; a failure is logged and otherwise ignored.
pub fn list_modules(executor: &dyn CommandExecutor) {
    let args = ["-l", MODULES_DIR];
    match executor.run("ls", &args) {
        Ok(output) if output.status.success() => {
            info!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
        }
        Ok(output) => warn!(
            "`{}` failed with {}: {}",
            command_line("ls", &args),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(err) => warn!("could not list {MODULES_DIR}: {err}"),
    }
}

/// Compute the SHA-256 digest of a file as lowercase hex.
///
/// # Errors
///
/// Returns [`PackagingError::Io`] if the file cannot be read.
pub fn compute_sha256(path: &Utf8Path) -> Result<String, PackagingError> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Zip `shared_object` into `package_path`.
///
/// The archive holds one deflated entry named after the shared object's
/// filename, with directory components dropped and mode `0755`. An existing
/// file at `package_path` is replaced.
///
/// # Errors
///
/// Returns [`PackagingError::SharedObjectMissing`] if `shared_object` is not
/// a file, or a zip/I/O error if the archive cannot be written.
pub fn package_shared_object(
    shared_object: &Utf8Path,
    package_path: &Utf8Path,
) -> Result<(), PackagingError> {
    let Some(entry_name) = shared_object.file_name().filter(|_| shared_object.is_file()) else {
        return Err(PackagingError::SharedObjectMissing {
            path: shared_object.to_owned(),
        });
    };

    info!("Packaging {shared_object} into {package_path}");
    let mut source = fs::File::open(shared_object)?;
    let mut archive = zip::ZipWriter::new(fs::File::create(package_path)?);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(SHARED_OBJECT_MODE);
    archive.start_file(entry_name, options)?;
    std::io::copy(&mut source, &mut archive)?;
    archive.finish()?;

    info!("{package_path} sha256: {}", compute_sha256(package_path)?);
    Ok(())
}
