use crate::app::runtime::{HostBridge, PostRequest};
use crate::error::BridgeError;
use serde_json::Value;

/// Bridge double that records every POST instead of writing to a host.
#[derive(Debug, Default)]
pub(crate) struct RecordingBridge {
    pub requests: Vec<PostRequest>,
    pub fail: bool,
}

impl RecordingBridge {
    pub fn failing() -> Self {
        Self {
            requests: Vec::new(),
            fail: true,
        }
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.requests
            .iter()
            .map(|request| request.body.clone())
            .collect()
    }
}

impl HostBridge for RecordingBridge {
    fn post(&mut self, request: &PostRequest) -> Result<String, BridgeError> {
        if self.fail {
            return Err(BridgeError::Closed);
        }
        self.requests.push(request.clone());
        Ok(self.requests.len().to_string())
    }
}
