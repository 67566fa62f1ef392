// Unpacking of the prebuilt auxiliary-tool release (`.tar.gz`).

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::log_debug;
use colored::Colorize;

/// Unpacks the gzipped tarball `src` into `dest/extracted` and returns that directory.
pub fn extract_tar_gz(src: &Path, dest: &Path) -> io::Result<PathBuf> {
    log_debug!(
        "[Archive] Extracting {} into {}",
        src.display().to_string().blue(),
        dest.display().to_string().cyan()
    );

    let extracted_path = dest.join("extracted");
    fs::create_dir_all(&extracted_path)?;

    let decompressor = GzDecoder::new(File::open(src)?);
    let mut archive = Archive::new(decompressor);
    archive.unpack(&extracted_path)?;

    log_debug!(
        "[Archive] Contents available at {}",
        extracted_path.display().to_string().green()
    );
    Ok(extracted_path)
}
