//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use pathpipe::{Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) {
    use std::io::{self, Write};

    let payload = match serde_json::to_string_pretty(response) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("Failed to serialize response: {}", e);
            return;
        }
    };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Exit gracefully on SIGPIPE
    let _ = writeln!(handle, "{}", payload);
}

pub fn print_result<T: Serialize>(result: Result<T>) {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

/// Map an error to a process exit code: user-fixable input problems get 2,
/// missing entities 3, everything else 1.
pub fn exit_code_for_error(err: &Error) -> i32 {
    match err {
        Error::PipelineDecode { .. } | Error::PipelineTooComplex | Error::Validation(_) => 2,
        Error::UnresolvedPlugin(_) | Error::CommandNotFound(_) => 3,
        _ => 1,
    }
}
