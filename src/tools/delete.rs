use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteParams {
    #[schemars(description = "Path to delete (e.g. 'notes.md' or 'folder'). Directories are deleted recursively.")]
    pub path: String,
}
