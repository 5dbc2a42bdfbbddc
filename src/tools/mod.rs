pub mod create;
pub mod delete;
pub mod insert;
pub mod memory_stats;
pub mod rename;
pub mod str_replace;
pub mod view;

use create::CreateParams;
use delete::DeleteParams;
use insert::InsertParams;
use memory_stats::MemoryStatsParams;
use rename::RenameParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use std::sync::Arc;
use str_replace::StrReplaceParams;
use view::ViewParams;

use crate::files::MemoryFiles;

/// The memdir MCP tool handler. One instance serves one client connection and
/// carries that connection's session id, so co-visitation is measured per
/// connection while the file layer and recorder are shared.
#[derive(Clone)]
pub struct MemdirTools {
    tool_router: ToolRouter<Self>,
    files: Arc<MemoryFiles>,
    session_id: Arc<str>,
}

impl MemdirTools {
    /// Run a blocking file operation off the async runtime with this
    /// connection's session id.
    async fn blocking<F>(&self, op: &'static str, f: F) -> Result<String, String>
    where
        F: FnOnce(&MemoryFiles, &str) -> anyhow::Result<String> + Send + 'static,
    {
        let files = Arc::clone(&self.files);
        let session = Arc::clone(&self.session_id);
        tokio::task::spawn_blocking(move || f(files.as_ref(), session.as_ref()))
            .await
            .map_err(|e| format!("{op} task failed: {e}"))?
            .map_err(|e| {
                tracing::debug!(op, error = %e, "tool call rejected");
                format!("{e:#}")
            })
    }
}

#[tool_router]
impl MemdirTools {
    pub fn new(files: Arc<MemoryFiles>) -> Self {
        let session_id: Arc<str> = uuid::Uuid::now_v7().to_string().into();
        tracing::info!(session = %session_id, "client session opened");
        Self {
            tool_router: Self::tool_router(),
            files,
            session_id,
        }
    }

    /// View a directory tree or file content, with related files for reads.
    #[tool(
        description = "View the memory directory tree or a file's contents with an optional 0-based line range. File views list related files that were often used together with this one.",
        annotations(title = "View memory content", read_only_hint = true, open_world_hint = false)
    )]
    async fn view(&self, Parameters(params): Parameters<ViewParams>) -> Result<String, String> {
        tracing::info!(path = ?params.path, "view called");
        self.blocking("view", move |files, session| {
            files.view(
                params.path.as_deref(),
                params.start_line,
                params.end_line,
                Some(session),
            )
        })
        .await
    }

    /// Create or overwrite a memory file.
    #[tool(
        description = "Create a new memory file or overwrite an existing one. Parent directories are created as needed.",
        annotations(title = "Create or overwrite memory file", read_only_hint = false, open_world_hint = false)
    )]
    async fn create(&self, Parameters(params): Parameters<CreateParams>) -> Result<String, String> {
        tracing::info!(path = %params.path, len = params.file_text.len(), "create called");
        self.blocking("create", move |files, session| {
            files.create(&params.path, &params.file_text, Some(session))
        })
        .await
    }

    /// Replace a unique substring in a memory file.
    #[tool(
        description = "Replace text in a memory file. old_str must occur exactly once.",
        annotations(title = "Replace text in memory file", read_only_hint = false, open_world_hint = false)
    )]
    async fn str_replace(
        &self,
        Parameters(params): Parameters<StrReplaceParams>,
    ) -> Result<String, String> {
        tracing::info!(path = %params.path, "str_replace called");
        self.blocking("str_replace", move |files, session| {
            files.str_replace(&params.path, &params.old_str, &params.new_str, Some(session))
        })
        .await
    }

    /// Insert text at a 0-based line.
    #[tool(
        description = "Insert text into a memory file before the given 0-based line index.",
        annotations(title = "Insert text into memory file", read_only_hint = false, open_world_hint = false)
    )]
    async fn insert(&self, Parameters(params): Parameters<InsertParams>) -> Result<String, String> {
        tracing::info!(path = %params.path, line = params.insert_line, "insert called");
        self.blocking("insert", move |files, session| {
            files.insert(
                &params.path,
                params.insert_line,
                &params.insert_text,
                Some(session),
            )
        })
        .await
    }

    /// Delete a memory file or directory.
    #[tool(
        description = "Delete a memory file or directory (directories recursively).",
        annotations(title = "Delete memory file or directory", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn delete(&self, Parameters(params): Parameters<DeleteParams>) -> Result<String, String> {
        tracing::info!(path = %params.path, "delete called");
        self.blocking("delete", move |files, _| files.delete(&params.path))
            .await
    }

    /// Rename or move a memory file or directory.
    #[tool(
        description = "Rename or move a memory file or directory. The destination must not exist.",
        annotations(title = "Rename or move memory file/directory", read_only_hint = false, open_world_hint = false)
    )]
    async fn rename(&self, Parameters(params): Parameters<RenameParams>) -> Result<String, String> {
        tracing::info!(from = %params.old_path, to = %params.new_path, "rename called");
        self.blocking("rename", move |files, _| {
            files.rename(&params.old_path, &params.new_path)
        })
        .await
    }

    /// Remove every memory file and directory.
    #[tool(
        description = "Clear all memory files and directories.",
        annotations(title = "Clear all memory", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn clear_all_memory(&self) -> Result<String, String> {
        tracing::info!("clear_all_memory called");
        self.blocking("clear_all_memory", |files, _| files.clear_all())
            .await
    }

    /// Report co-visitation statistics.
    #[tool(
        description = "Get associative-memory statistics: tracked files, co-visited pairs, strongest pairs, active sessions.",
        annotations(title = "Memory statistics", read_only_hint = true, open_world_hint = false)
    )]
    async fn memory_stats(
        &self,
        Parameters(params): Parameters<MemoryStatsParams>,
    ) -> Result<String, String> {
        tracing::info!("memory_stats called");
        let top = params.top.unwrap_or(10);
        self.blocking("memory_stats", move |files, _| {
            let stats = files.recorder().stats(top)?;
            Ok(serde_json::to_string(&stats)?)
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for MemdirTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "memdir is a file-based memory server. Use view to browse and read memory files, \
                 create/str_replace/insert to write them. Reading a file lists related files \
                 that were previously used together with it."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
