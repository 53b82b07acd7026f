use cog_bundle::{BundleResult, Response, ResponseTransport};
use parking_lot::Mutex;

/// Transport that keeps every transmitted response for inspection.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: Mutex<Vec<Response>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn responses(&self) -> Vec<Response> {
        self.responses.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.responses.lock().len()
    }

    /// Serialized form of every transmitted response.
    pub fn wire(&self) -> Vec<serde_json::Value> {
        self.responses
            .lock()
            .iter()
            .map(|response| serde_json::to_value(response).expect("response serializes"))
            .collect()
    }
}

impl ResponseTransport for RecordingTransport {
    fn transmit(&self, response: &Response) -> BundleResult<()> {
        self.responses.lock().push(response.clone());
        Ok(())
    }
}
