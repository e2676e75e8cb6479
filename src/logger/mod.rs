//! Logging built on `tracing-subscriber`
//!
//! Console output goes to stderr so stdout stays free for echoed chunks.
//! File output supports the full, compact and json formats with size-based
//! rotation.

pub mod config;
pub mod error;
pub mod rotation;
pub(crate) mod writer;


pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use writer::RotatingFileWriter;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` overrides the configured level when it is set.
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;
    if !config.has_outputs() {
        return Ok(());
    }

    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);

    // The file layer goes first, otherwise ANSI codes in span fields leak into
    // the file. https://github.com/tokio-rs/tracing/issues/1817
    if let Some(file) = &config.file {
        layers.push(file_layer(file)?);
    }
    if let Some(stderr) = config.stderr {
        layers.push(stderr_layer(stderr));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::Init {
            message: e.to_string(),
        })
}

fn stderr_layer(output: StderrOutput) -> BoxedLayer {
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(output.ansi && std::io::stderr().is_terminal())
        .with_target(true)
        .boxed()
}

fn file_layer(log_file: &LogFile) -> Result<BoxedLayer, LoggerError> {
    let writer = RotatingFileWriter::new(log_file)?;
    let layer = fmt::layer().with_ansi(false).with_writer(writer);
    Ok(match log_file.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}
