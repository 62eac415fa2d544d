// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenFile {
    /// Title shown by the portal's dialog
    pub title: String,
    /// Percent-decode returned `file://` URIs instead of stripping the scheme verbatim
    pub decode_uris: bool,
}

impl Default for OpenFile {
    fn default() -> Self {
        Self {
            title: "Open File".to_string(),
            decode_uris: false,
        }
    }
}
