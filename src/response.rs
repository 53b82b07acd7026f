//! # Pipeline Responses
//!
//! Outbound message handed back to the pipeline host, plus the transport that
//! delivers it.
//!
//! A response is a flat JSON object of fields with a disposition flag:
//!
//! ```text
//! {"content": "boom", "disposition": "abort"}    pipeline terminates
//! {"body": "done",    "disposition": "normal"}   pipeline continues
//! ```

use crate::error::BundleResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;

/// Field an aborting response carries its message in
pub const CONTENT_FIELD: &str = "content";
/// Field a stopping response carries its message in
pub const BODY_FIELD: &str = "body";

/// Whether the pipeline continues after this response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    #[default]
    Normal,
    Abort,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Normal => f.write_str("normal"),
            Disposition::Abort => f.write_str("abort"),
        }
    }
}

/// Delivers responses to the pipeline host.
pub trait ResponseTransport: Send + Sync {
    fn transmit(&self, response: &Response) -> BundleResult<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(flatten)]
    fields: Map<String, Value>,
    disposition: Disposition,
    #[serde(skip)]
    sent: bool,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_content(&mut self, content: impl Into<Value>) {
        self.insert(CONTENT_FIELD, content);
    }

    pub fn content(&self) -> Option<&Value> {
        self.get(CONTENT_FIELD)
    }

    /// Set an arbitrary field; `disposition` is reserved.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if key == "disposition" {
            tracing::warn!("Ignoring attempt to set reserved response field 'disposition'");
            return;
        }
        self.fields.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Mark this response as terminating the pipeline.
    pub fn abort(&mut self) {
        self.disposition = Disposition::Abort;
    }

    pub fn is_aborted(&self) -> bool {
        self.disposition == Disposition::Abort
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Transmit the response. Only the first call reaches the transport.
    pub fn send(&mut self, transport: &dyn ResponseTransport) -> BundleResult<()> {
        if self.sent {
            tracing::debug!("Response already sent - skipping");
            return Ok(());
        }

        // the transport sees the response as sent; cleared again if delivery fails
        self.sent = true;
        if let Err(error) = transport.transmit(self) {
            self.sent = false;
            return Err(error);
        }

        tracing::debug!(disposition = %self.disposition, "Response sent");
        Ok(())
    }

    pub fn to_json(&self) -> BundleResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Writes each response as a single JSON line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutTransport;

impl StdoutTransport {
    pub fn new() -> Self {
        Self
    }

    fn write_to<W: Write>(response: &Response, writer: &mut W) -> BundleResult<()> {
        let payload = response.to_json()?;
        writeln!(writer, "{payload}")?;
        writer.flush()?;
        Ok(())
    }
}

impl ResponseTransport for StdoutTransport {
    fn transmit(&self, response: &Response) -> BundleResult<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        Self::write_to(response, &mut handle)
    }
}
