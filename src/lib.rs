//! File-based memory for AI agents with associative recall, served over MCP.
//!
//! memdir is an [MCP](https://modelcontextprotocol.io/) server that stores an
//! agent's memory as plain files under one directory. On top of the file tools it
//! learns which files are used together: every time a session touches a file, the
//! file is paired with everything that session touched before it, and reading a
//! file lists its strongest associations.
//!
//! | Tool | Access | Co-visitation |
//! |------|--------|---------------|
//! | `view` | read | recorded, returns related files |
//! | `create`, `str_replace`, `insert` | write | recorded silently |
//! | `delete`, `rename`, `clear_all_memory` | none | not tracked |
//!
//! # Architecture
//!
//! - **Storage**: plain files under the memory directory; the co-visitation graph is
//!   one JSON document (`_covis.json`) rewritten atomically after every change
//! - **Sessions**: one per client connection, held in memory and swept by volume
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`files`]: Path guard and sandboxed file operations
//! - [`recall`]: Associative recall: sessions, co-visitation graph, persistence, recommendations

pub mod config;
pub mod files;
pub mod recall;
