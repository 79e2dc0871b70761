use serde::Deserialize;

use crate::error::{Result, XferError};

/// Index 0 is reserved for the metadata fragment; payload blocks are 1..=N.
pub const METADATA_INDEX: u32 = 0;

/// One scanned record: `{ "index": <int>, "data": "<base64>" }`, with an
/// optional `"total"` count hint carried by some producers.
#[derive(Debug, Clone, Deserialize)]
pub struct Fragment {
    pub index: u32,
    #[serde(default)]
    pub total: Option<u32>,
    pub data: String,
}

impl Fragment {
    /// Strict parse: a missing or mis-typed `index`/`data` field is a
    /// `Format` error, exactly like unparsable text.
    pub fn parse(text: &str) -> Result<Self> {
        let frag: Fragment = serde_json::from_str(text.trim())
            .map_err(|e| XferError::Format(format!("bad fragment record: {e}")))?;
        if frag.data.is_empty() {
            return Err(XferError::Format("fragment record with empty data".into()));
        }
        Ok(frag)
    }

    pub fn is_metadata(&self) -> bool {
        self.index == METADATA_INDEX
    }
}
