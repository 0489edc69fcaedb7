//! Error handling for the pcoord CLI

use std::path::PathBuf;
use thiserror::Error;

/// User-facing failures that come with suggestions
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("No database named '{name}' in {listing}")]
    UnknownDatabase { name: String, listing: PathBuf, available: Vec<String> },

    #[error("Invalid argument '{argument}': {message}")]
    Argument { argument: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn parse<S: Into<String>>(file: S, message: S) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn argument<A: Into<String>, M: Into<String>>(argument: A, message: M) -> Self {
        Self::Argument {
            argument: argument.into(),
            message: message.into(),
        }
    }
}

impl From<pcoord_core::Error> for CliError {
    fn from(err: pcoord_core::Error) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the path is correct: {}\n\
                 • A database directory must contain a data.csv file\n\
                 • Database listings must end in .json",
                path.display()
            ));
        }

        CliError::UnknownDatabase { available, .. } => {
            if available.is_empty() {
                message.push_str("\n\nThe listing contains no databases");
            } else {
                message.push_str("\n\nAvailable databases:");
                for name in available {
                    message.push_str(&format!("\n • {}", name));
                }
            }
        }

        CliError::Argument { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Numeric brushes are written dim=lo:hi\n\
                 • Categorical brushes are written dim=value1,value2\n\
                 • Query targets are written dim=value\n\
                 • Run 'pcoord info' to list dimension names and kinds",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your pcoord.toml configuration file\n\
                 • Use 'pcoord config --example' to generate a sample configuration",
            );
        }

        CliError::Io { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check that the file exists and is readable\n\
                 • Pass --config to point at another configuration file",
            );
        }

        CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Every row of data.csv needs one cell per header column\n\
                 • The first line of data.csv must be the header",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
