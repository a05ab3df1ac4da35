//! The `link-grib` command.
//!
//! `ungrib` reads its input through links named `GRIBFILE.AAA`,
//! `GRIBFILE.AAB`, ... in the run directory. This links every file of a
//! source directory under those names, in file name order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};
use walkdir::WalkDir;

const LINK_PREFIX: &str = "GRIBFILE.";
const SUFFIX_LETTERS: usize = 3;

/// Number of distinct three-letter suffixes.
pub const MAX_LINKS: usize = 26 * 26 * 26;

#[derive(Args, Debug)]
pub struct LinkGribArgs {
    /// Directory with the GRIB files
    #[arg(long, value_name = "DIR", default_value = "/gfs/model_data")]
    pub source_directory: PathBuf,

    /// Directory where the GRIBFILE links are written
    #[arg(long, value_name = "DIR", default_value = "/run")]
    pub target_directory: PathBuf,
}

pub fn run(args: &LinkGribArgs) -> Result<()> {
    let links = link_grib(&args.source_directory, &args.target_directory)?;
    info!(
        count = links.len(),
        target = %args.target_directory.display(),
        "Linked GRIB files"
    );
    Ok(())
}

/// Link name for the `index`-th file: 0 is `GRIBFILE.AAA`, 1 is
/// `GRIBFILE.AAB`, 26 is `GRIBFILE.ABA`.
pub fn link_name(index: usize) -> Option<String> {
    if index >= MAX_LINKS {
        return None;
    }
    let mut suffix = [b'A'; SUFFIX_LETTERS];
    let mut rest = index;
    for slot in suffix.iter_mut().rev() {
        *slot = b'A' + (rest % 26) as u8;
        rest /= 26;
    }
    Some(format!("{}{}", LINK_PREFIX, String::from_utf8_lossy(&suffix)))
}

/// Regular files directly inside `dir`, sorted by name. Hidden files are
/// skipped.
fn grib_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read directory {:?}", dir))?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || entry.file_type().is_dir() {
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}

/// Create one link per file of `source` inside `target`. Returns the
/// created link paths.
pub fn link_grib(source: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let source = fs::canonicalize(source)
        .with_context(|| format!("Source directory {:?} not found", source))?;
    let files = grib_files(&source)?;
    anyhow::ensure!(
        files.len() <= MAX_LINKS,
        "Too many GRIB files in {:?}: {} (at most {})",
        source,
        files.len(),
        MAX_LINKS
    );

    let mut links = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        let name = link_name(index).context("GRIB link names exhausted")?;
        let link = target.join(name);
        symlink(file, &link)
            .with_context(|| format!("Failed to link {:?} to {:?}", file, link))?;
        debug!(file = %file.display(), link = %link.display(), "Linked GRIB file");
        links.push(link);
    }
    Ok(links)
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(not(unix))]
fn symlink(_original: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symbolic links are only supported on unix",
    ))
}
