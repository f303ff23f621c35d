/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains some common helper functions for dealing with file I/O

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{debug, Config};
use crate::error::CqlError;

/// Get a file for reading or writing, this resolves relative files against the working directory
pub(crate) fn get_filepath(filename: &str, workdir: Option<&Path>) -> PathBuf {
    if filename == "-" {
        //designates stdin or stdout
        return filename.into();
    }
    let path = if let Some(stripped) = filename.strip_prefix("file://") {
        PathBuf::from(stripped)
    } else {
        PathBuf::from(filename)
    };
    if path.is_absolute() {
        path
    } else {
        if let Some(workdir) = workdir {
            let path = workdir.join(&path);
            if path.is_file() {
                //should also work with symlinks
                return path;
            }
        }
        //final fallback is simply relative to the current working directory
        path
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file(filename: &str, config: &Config) -> Result<File, CqlError> {
    let found_filename = get_filepath(filename, config.workdir());
    debug(config, || format!("open_file: {:?}", found_filename));
    File::open(found_filename.as_path()).map_err(|e| {
        CqlError::IOError(
            e,
            found_filename.to_string_lossy().into_owned(),
            "Opening file for reading failed",
        )
    })
}

/// Auxiliary function to help open files
pub(crate) fn create_file(filename: &str, config: &Config) -> Result<File, CqlError> {
    let found_filename = match config.workdir() {
        Some(workdir) if filename != "-" && !Path::new(filename).is_absolute() => {
            workdir.join(filename)
        }
        _ => get_filepath(filename, None),
    };
    debug(config, || format!("create_file: {:?}", found_filename));
    File::create(found_filename.as_path()).map_err(|e| {
        CqlError::IOError(
            e,
            found_filename.to_string_lossy().into_owned(),
            "Opening file for writing failed",
        )
    })
}

/// Auxiliary function to help open files
pub(crate) fn open_file_reader(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn BufRead>, CqlError> {
    if filename == "-" {
        //read from stdin
        Ok(Box::new(std::io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(open_file(filename, config)?)))
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file_writer(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn Write>, CqlError> {
    if filename == "-" {
        //write to stdout
        Ok(Box::new(std::io::stdout().lock()))
    } else {
        Ok(Box::new(BufWriter::new(create_file(filename, config)?)))
    }
}
