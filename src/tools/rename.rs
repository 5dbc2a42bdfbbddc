use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RenameParams {
    #[schemars(description = "Source path to rename or move (e.g. 'old_notes.md')")]
    pub old_path: String,

    #[schemars(description = "Destination path (e.g. 'archive/notes.md'); must not exist")]
    pub new_path: String,
}
