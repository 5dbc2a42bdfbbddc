use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ViewParams {
    #[schemars(description = "Target path (e.g. 'notes.md'). Omit to list the whole memory directory.")]
    pub path: Option<String>,

    #[schemars(description = "First line to show (0-based)")]
    pub start_line: Option<usize>,

    #[schemars(description = "Last line to show (0-based, inclusive)")]
    pub end_line: Option<usize>,
}
