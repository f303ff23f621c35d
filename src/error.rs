/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the error type shared by all condition builders, the lowering to span queries,
//! and the (de)serialisation of configurations and plans.

use std::error::Error;
use std::fmt;
use std::io;

// ------------------------------ ERROR DEFINITIONS & IMPLEMENTATIONS -------------------------------------------------------------

#[derive(Debug)]
pub enum CqlError {
    /// An occurrence range `{min,max}` where `min > max` or `max < 1`
    IllegalOccurrence(usize, usize, &'static str),

    /// A position atom where start lies beyond end
    IllegalPosition(usize, usize, &'static str),

    /// A variable was referenced that is not defined in the variables mapping
    UndefinedVariable(String, &'static str),

    /// A variable was referenced more than once within the same query
    VariableReused(String, &'static str),

    /// There is nothing to lower: an empty sentence, an empty sequence or a composite without alternatives
    NoCondition(&'static str),

    /// The condition was already simplified and may no longer be mutated
    AlreadySimplified(&'static str),

    /// A regular expression atom does not compile (pattern, message, context)
    RegexError(String, String, &'static str),

    IOError(io::Error, String, &'static str),
    JsonError(
        serde_path_to_error::Error<serde_json::Error>,
        String,
        &'static str,
    ),
    SerializationError(String),
}

impl CqlError {
    /// Returns true if this error stems from invalid user input (as opposed to I/O or serialisation failures).
    /// Validation errors abort the compilation of the whole query.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::IllegalOccurrence(..)
                | Self::IllegalPosition(..)
                | Self::UndefinedVariable(..)
                | Self::VariableReused(..)
                | Self::NoCondition(..)
                | Self::AlreadySimplified(..)
                | Self::RegexError(..)
        )
    }
}

impl From<&CqlError> for String {
    /// Returns the error message as a String
    fn from(error: &CqlError) -> String {
        match error {
            CqlError::IllegalOccurrence(min, max, contextmsg) => format!(
                "IllegalOccurrence: Illegal number {{{},{}}} ({})",
                min, max, contextmsg
            ),
            CqlError::IllegalPosition(start, end, contextmsg) => format!(
                "IllegalPosition: Illegal position range {}-{} ({})",
                start, end, contextmsg
            ),
            CqlError::UndefinedVariable(name, contextmsg) => format!(
                "UndefinedVariable: Variable ${} is not defined ({})",
                name, contextmsg
            ),
            CqlError::VariableReused(name, contextmsg) => format!(
                "VariableReused: Variable ${} can only be used once per query ({})",
                name, contextmsg
            ),
            CqlError::NoCondition(contextmsg) => {
                format!("NoCondition: no condition ({})", contextmsg)
            }
            CqlError::AlreadySimplified(contextmsg) => format!(
                "AlreadySimplified: condition was already simplified and can not be modified ({})",
                contextmsg
            ),
            CqlError::RegexError(pattern, msg, contextmsg) => format!(
                "RegexError: Invalid regular expression /{}/: {} ({})",
                pattern, msg, contextmsg
            ),
            CqlError::IOError(err, filename, contextmsg) => format!(
                "IOError: {} for {}: {}",
                contextmsg, filename, err
            ),
            CqlError::JsonError(err, filename, contextmsg) => format!(
                "JsonError: Parsing JSON failed for {}: {} ({})",
                filename, err, contextmsg
            ),
            CqlError::SerializationError(msg) => format!("SerializationError: {}", msg),
        }
    }
}

impl fmt::Display for CqlError {
    /// Formats the error message for printing
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let errmsg: String = String::from(self);
        write!(f, "[CqlError] {}", errmsg)
    }
}

impl Error for CqlError {}
