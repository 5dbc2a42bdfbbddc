//! MCP `memory_stats` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `memory_stats` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MemoryStatsParams {
    /// How many of the strongest file pairs to list.
    #[schemars(description = "Number of strongest co-visited pairs to include (default: 10)")]
    pub top: Option<usize>,
}
