use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StrReplaceParams {
    #[schemars(description = "Target file path (e.g. 'notes.md')")]
    pub path: String,

    #[schemars(description = "Text to replace; must occur exactly once in the file")]
    pub old_str: String,

    #[schemars(description = "Replacement text")]
    pub new_str: String,
}
