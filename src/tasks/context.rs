//! Shared state handed to every task.
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Shared context for task execution.
pub struct Context {
    /// Resolved roots and manifest.
    pub config: Arc<Config>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Stop at the first failure instead of continuing past it.
    pub strict: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("source_root", &self.config.source_root)
            .field("dest_root", &self.config.dest_root)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("strict", &self.strict)
            .field("executor", &self.executor)
            .field("fs_ops", &self.fs_ops)
            .finish()
    }
}

impl Context {
    /// Creates a new context backed by the real filesystem.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        log: Arc<dyn Log>,
        dry_run: bool,
        strict: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            config,
            log,
            dry_run,
            strict,
            executor,
            fs_ops: Arc::new(SystemFileSystemOps),
        }
    }

    /// Source root of the files to install.
    #[must_use]
    pub fn source_root(&self) -> &std::path::Path {
        &self.config.source_root
    }

    /// Place an absolute manifest destination under the destination root.
    #[must_use]
    pub fn destination(&self, destination: &std::path::Path) -> PathBuf {
        self.config.destination_path(destination)
    }

    /// Create a copy of this context with a different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            log,
            dry_run: self.dry_run,
            strict: self.strict,
            executor: Arc::clone(&self.executor),
            fs_ops: Arc::clone(&self.fs_ops),
        }
    }

    /// Create a copy of this context with a different [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            log: Arc::clone(&self.log),
            dry_run: self.dry_run,
            strict: self.strict,
            executor: Arc::clone(&self.executor),
            fs_ops,
        }
    }
}
