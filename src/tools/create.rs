use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateParams {
    #[schemars(description = "Target file path (e.g. 'notes.md')")]
    pub path: String,

    #[schemars(description = "File content to write")]
    #[serde(default)]
    pub file_text: String,
}
