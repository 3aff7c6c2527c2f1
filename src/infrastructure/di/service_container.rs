//! Service container for dependency injection
//!
//! Wires up the session, renderers and I/O adapters.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::{describe, Session, TreeId};
use crate::config::Settings;
use crate::domain::LayoutEngine;
use crate::infrastructure::render::{Renderer, SvgRenderer, TextRenderer};
use crate::infrastructure::traits::{FileSystem, RealFileSystem, Selector, SkimSelector};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding settings and I/O abstractions.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Interactive choice of factor pairs
    pub selector: Arc<dyn Selector>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SkimSelector))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            selector,
        }
    }

    /// Fresh session laid out per settings.
    pub fn session(&self) -> Session {
        Session::new(LayoutEngine::new(self.settings.layout.clone()))
    }

    pub fn text_renderer(&self) -> TextRenderer {
        TextRenderer {
            color: self.settings.color,
        }
    }

    /// Resolves relative paths against the configured output directory.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.settings.output_dir.join(path)
        }
    }

    /// Renders one tree as SVG and writes it; returns the written path.
    pub fn write_svg(&self, session: &Session, tree: TreeId, path: &Path) -> InfraResult<PathBuf> {
        let canvas = session.canvas(tree)?;
        let scene = describe(tree, canvas, session.layout().config());
        let target = self.output_path(path);
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.exists(parent) {
                self.fs
                    .create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
        }
        self.fs
            .write(&target, &SvgRenderer.render(&scene))
            .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
        debug!("wrote svg for tree {tree} to {}", target.display());
        Ok(target)
    }
}
