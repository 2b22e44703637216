//! Console sink: formats each record with an output template and writes it
//! to stdout.

use super::{OutputHint, Sink};
use crate::definition::DEFAULT_LOCALE;
use crate::error::SinkError;
use async_trait::async_trait;
use emit_template::{FunctionLibrary, RenderContext, RenderState, Template};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use tracing::{error, warn};

/// Output format used when none is configured.
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "{{value}}\n";

/// Output format used in kcat mode.
pub const KCAT_OUTPUT_TEMPLATE: &str = "{{key}},{{value}}\n";

pub struct ConsoleSink {
    format: Template,
    state: Mutex<RenderState>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink writing to stdout.
    pub fn new(output_template: &str) -> Result<Self, SinkError> {
        Self::with_writer(output_template, Box::new(std::io::stdout()))
    }

    /// Console sink writing to an arbitrary writer.
    pub fn with_writer(
        output_template: &str,
        out: Box<dyn Write + Send>,
    ) -> Result<Self, SinkError> {
        let format = Template::parse("output", output_template, &FunctionLibrary::standard())
            .map_err(|e| SinkError::Config(e.to_string()))?;

        Ok(Self {
            format,
            state: Mutex::new(RenderState::new(0)),
            out: Mutex::new(out),
        })
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    async fn produce(&self, key: &[u8], value: &[u8], _hint: Option<&OutputHint>) {
        let key = String::from_utf8_lossy(key);
        let value = String::from_utf8_lossy(value);
        let context = RenderContext::new(DEFAULT_LOCALE).with_record(&key, &value);

        let line = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let rendered = self.format.render(&mut state, &context);
            state.advance();
            rendered
        };

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to format console output: {e}");
                return;
            }
        };

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = out.write_all(line.as_bytes()) {
            error!("Failed to write to console: {e}");
        }
    }

    async fn close(&self) -> Result<(), SinkError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.flush()?;
        Ok(())
    }
}
