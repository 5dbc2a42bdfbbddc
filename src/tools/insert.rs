use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct InsertParams {
    #[schemars(description = "Target file path (e.g. 'notes.md')")]
    pub path: String,

    #[schemars(description = "0-based line index to insert at")]
    pub insert_line: usize,

    #[schemars(description = "Text to insert")]
    pub insert_text: String,
}
