//! Where the text to relay comes from.

use std::io::IsTerminal;
use std::path::PathBuf;

use tokio::io::AsyncReadExt;

use crate::error::{AppError, AppResult};

pub const NO_INPUT_MESSAGE: &str = "notify-relay works with stdin or file using --data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// Use `data` when given, otherwise stdin as long as it is piped.
    pub fn detect(data: Option<PathBuf>) -> AppResult<Self> {
        match data {
            Some(path) => Ok(InputSource::File(path)),
            None if std::io::stdin().is_terminal() => Err(AppError::input(NO_INPUT_MESSAGE)),
            None => Ok(InputSource::Stdin),
        }
    }
}

/// Read the whole input. Invalid UTF-8 is replaced rather than rejected.
pub async fn read_input(source: &InputSource) -> AppResult<String> {
    let bytes = match source {
        InputSource::File(path) => tokio::fs::read(path)
            .await
            .map_err(|e| AppError::io(format!("reading {}", path.display()), e))?,
        InputSource::Stdin => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .map_err(|e| AppError::io("reading stdin", e))?;
            buf
        }
    };

    let text = String::from_utf8_lossy(&bytes).into_owned();
    tracing::debug!(bytes = bytes.len(), source = ?source, "input read");
    Ok(text)
}
