/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`Config`] that governs compilation, and the [`Configurable`] trait
//! for types that carry one.

use sealed::sealed;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CqlError;
use crate::file::*;
use crate::json::ToJson;
use crate::types::*;

pub trait Configurable: Sized {
    //// Obtain the configuration
    fn config(&self) -> &Config;

    //// Obtain the configuration mutably
    fn config_mut(&mut self) -> &mut Config;

    ///Builder pattern to associate a configuration
    fn with_config(mut self, config: Config) -> Self {
        self.set_config(config);
        self
    }

    ///Setter to associate a configuration
    fn set_config(&mut self, config: Config) -> &mut Self;
}

/// This holds the configuration for compilation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Debug mode
    pub(crate) debug: bool,

    /// The working directory
    pub(crate) workdir: Option<PathBuf>,

    /// Maximum number of ignorable positions that may be skipped between sequence elements, used when an ignore clause is installed without an explicit bound
    pub(crate) max_skip_length: usize,

    /// Output compact JSON when serialising plans (rather than pretty-printed)
    pub(crate) compact: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            workdir: None,
            max_skip_length: 1,
            compact: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug mode. In debug mode, verbose output will be printed to standard error output
    pub fn with_debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    /// Is debug mode enabled or not?
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Sets the working directory, relative file names are resolved against it
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    ///  Return the working directory, if set
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_ref().map(|x| x.as_path())
    }

    /// Sets the maximum number of ignorable positions to skip, used by [`crate::Compiler::with_ignore()`]
    pub fn with_max_skip_length(mut self, value: usize) -> Self {
        self.max_skip_length = value;
        self
    }

    pub fn max_skip_length(&self) -> usize {
        self.max_skip_length
    }

    /// Output compact JSON rather than pretty-printed JSON
    pub fn with_compact(mut self, value: bool) -> Self {
        self.compact = value;
        self
    }

    pub fn compact(&self) -> bool {
        self.compact
    }

    /// Loads configuration from a JSON file
    pub fn from_file(filename: &str) -> Result<Self, CqlError> {
        let reader = open_file_reader(filename, &Config::default())?;
        let deserializer = &mut serde_json::Deserializer::from_reader(reader);
        let result: Result<Self, _> = serde_path_to_error::deserialize(deserializer);
        result
            .map_err(|e| CqlError::JsonError(e, filename.to_string(), "Reading config from file"))
    }

    /// Loads configuration from a JSON string
    pub fn from_json_str(string: &str) -> Result<Self, CqlError> {
        let deserializer = &mut serde_json::Deserializer::from_str(string);
        let result: Result<Self, _> = serde_path_to_error::deserialize(deserializer);
        result.map_err(|e| {
            CqlError::JsonError(e, "(string)".to_string(), "Reading config from string")
        })
    }
}

/// Prints a debug message to standard error output if debug mode is enabled.
/// The message is only constructed when it will actually be printed.
pub(crate) fn debug<F>(config: &Config, message_func: F)
where
    F: FnOnce() -> String,
{
    if config.debug {
        eprintln!("[CQL DEBUG] {}", message_func());
    }
}

#[sealed]
impl TypeInfo for Config {
    fn typeinfo() -> Type {
        Type::Config
    }
}

impl ToJson for Config {}
