/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`ToJson`] and [`FromJson`] traits that are used
//! to ship plans (and configurations) to and from an out-of-process execution engine.

use crate::config::{debug, Config};
use crate::error::CqlError;
use crate::file::*;
use crate::types::*;

pub trait ToJson
where
    Self: TypeInfo + serde::Serialize,
{
    /// Writes a serialisation to any writer
    /// Lower-level function
    fn to_json_writer<W>(&self, writer: W, compact: bool) -> Result<(), CqlError>
    where
        W: std::io::Write,
    {
        match compact {
            false => serde_json::to_writer_pretty(writer, &self).map_err(|e| {
                CqlError::SerializationError(format!(
                    "Writing {} to file: {}",
                    Self::typeinfo(),
                    e
                ))
            }),
            true => serde_json::to_writer(writer, &self).map_err(|e| {
                CqlError::SerializationError(format!(
                    "Writing {} to file: {}",
                    Self::typeinfo(),
                    e
                ))
            }),
        }
    }

    /// Writes this structure to a file, compactness is determined by the `config`
    fn to_json_file(&self, filename: &str, config: &Config) -> Result<(), CqlError> {
        debug(config, || {
            format!("{}.to_file: filename={:?}", Self::typeinfo(), filename)
        });
        let writer = open_file_writer(filename, config)?;
        self.to_json_writer(writer, config.compact())
    }

    /// Serializes this structure to one string, compactness is determined by the `config`
    fn to_json_string(&self, config: &Config) -> Result<String, CqlError> {
        if config.compact() {
            serde_json::to_string(&self)
        } else {
            serde_json::to_string_pretty(&self)
        }
        .map_err(|e| {
            CqlError::SerializationError(format!(
                "Writing {} to string: {}",
                Self::typeinfo(),
                e
            ))
        })
    }
}

pub trait FromJson
where
    Self: TypeInfo + serde::de::DeserializeOwned,
{
    fn from_json_file(filename: &str, config: &Config) -> Result<Self, CqlError> {
        debug(config, || {
            format!("{}.from_file: filename={:?}", Self::typeinfo(), filename)
        });
        let reader = open_file_reader(filename, config)?;
        let deserializer = &mut serde_json::Deserializer::from_reader(reader);
        let result: Result<Self, _> = serde_path_to_error::deserialize(deserializer);
        result.map_err(|e| {
            CqlError::JsonError(e, filename.to_string(), "Reading plan from file")
        })
    }

    fn from_json_str(string: &str) -> Result<Self, CqlError> {
        let deserializer = &mut serde_json::Deserializer::from_str(string);
        let result: Result<Self, _> = serde_path_to_error::deserialize(deserializer);
        result.map_err(|e| {
            CqlError::JsonError(e, "(string)".to_string(), "Reading plan from string")
        })
    }
}
