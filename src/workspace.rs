//! The open dashboard: an [`Editor`] bound to a [`DashboardStore`] entry,
//! with debounced autosave.
//!
//! Nothing runs in the background. The host calls [`Workspace::tick`] from
//! its event loop or a timer; each tick performs at most one save.

use crate::autosave::SaveScheduler;
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::store::{self, Dashboard, DashboardPayload, DashboardStore, DashboardSummary};
use chrono::Utc;
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

/// Name of the dashboard created when the store is empty.
pub const DEFAULT_DASHBOARD_NAME: &str = "Default Dashboard";

/// Outcome of the most recent save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saved,
    /// The store refused the save; it is retried after the next debounce.
    Failed { message: String },
}

/// An exported dashboard, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: String,
}

pub struct Workspace<S: DashboardStore> {
    store: S,
    editor: Editor,
    current: Option<DashboardSummary>,
    scheduler: SaveScheduler,
    status: SaveStatus,
}

impl<S: DashboardStore> Workspace<S> {
    pub fn new(store: S, config: EditorConfig) -> Self {
        Self {
            store,
            editor: Editor::new(config),
            current: None,
            scheduler: SaveScheduler::new(config.save_debounce()),
            status: SaveStatus::Idle,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn current(&self) -> Option<&DashboardSummary> {
        self.current.as_ref()
    }

    /// Id of the open dashboard; hosts remember it for the next start.
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|d| d.id.as_str())
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn has_pending_save(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// When the host should call [`tick`](Self::tick) next.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.scheduler.deadline(now)
    }

    // ------------------------------------------------------------------
    // Dashboard lifecycle
    // ------------------------------------------------------------------

    /// Open the remembered dashboard if it still exists, else the newest
    /// one, else a fresh default dashboard. Returns the id opened.
    pub fn initialize(&mut self, last_id: Option<&str>) -> Result<String> {
        let dashboards = self.store.list()?;
        let remembered = last_id.filter(|id| dashboards.iter().any(|d| d.id == *id));
        match remembered.or_else(|| dashboards.first().map(|d| d.id.as_str())) {
            Some(id) => {
                let id = id.to_string();
                self.load(&id)?;
                Ok(id)
            }
            None => self.create(DEFAULT_DASHBOARD_NAME),
        }
    }

    pub fn list(&self) -> Result<Vec<DashboardSummary>> {
        self.store.list()
    }

    /// Create an empty dashboard and open it.
    pub fn create(&mut self, name: &str) -> Result<String> {
        let dashboard = self.store.create(name, None)?;
        info!(dashboard = %dashboard.id, name, "dashboard created");
        let id = dashboard.id.clone();
        self.open(dashboard);
        Ok(id)
    }

    /// Replace the editor contents with a stored dashboard. A pending save
    /// of the previous dashboard is dropped.
    pub fn load(&mut self, id: &str) -> Result<()> {
        let dashboard = self.store.get(id)?;
        self.open(dashboard);
        Ok(())
    }

    fn open(&mut self, dashboard: Dashboard) {
        self.scheduler.cancel();
        self.status = SaveStatus::Idle;
        self.current = Some(dashboard.summary());
        info!(dashboard = %dashboard.id, name = %dashboard.name, "dashboard opened");
        self.editor.replace_graph(dashboard.data.into_graph());
    }

    /// Delete a dashboard other than the open one.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        if self.current_id() == Some(id) {
            return Err(Error::CurrentDashboard { id: id.to_string() });
        }
        self.store.delete(id)?;
        info!(dashboard = %id, "dashboard deleted");
        Ok(())
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        let updated = self.store.update(id, Some(name), None)?;
        if let Some(current) = self.current.as_mut().filter(|c| c.id == id) {
            *current = updated.summary();
        }
        info!(dashboard = %id, name, "dashboard renamed");
        Ok(())
    }

    /// The open dashboard as a downloadable JSON document.
    pub fn export(&self) -> Result<ExportedFile> {
        let current = self.current.as_ref().ok_or(Error::NoDashboard)?;
        let dashboard = Dashboard {
            id: current.id.clone(),
            name: current.name.clone(),
            data: DashboardPayload::from_graph(self.editor.graph()),
            created_at: current.created_at.clone(),
            updated_at: current.updated_at.clone(),
        };
        Ok(ExportedFile {
            file_name: store::export_file_name(&dashboard.name, Utc::now().date_naive()),
            contents: store::export_document(&dashboard)?,
        })
    }

    /// Store a copy of an exported document and open it.
    pub fn import(&mut self, text: &str) -> Result<String> {
        let imported = self.store.import(store::import_document(text))?;
        info!(dashboard = %imported.id, name = %imported.name, "dashboard imported");
        let id = imported.id.clone();
        self.open(imported);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Collect the editor's latest change and save if one is due.
    ///
    /// Returns true when a save was attempted. A failed save leaves the
    /// graph alone and is retried one debounce period later.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(change) = self.editor.take_change() {
            self.scheduler.record(change, now);
        }
        if !self.scheduler.take_due(now) {
            return false;
        }
        if let Err(e) = self.save_now() {
            if e.is_recoverable() {
                self.scheduler.schedule(now);
            }
        }
        true
    }

    /// Write the graph to the store right away.
    pub fn save_now(&mut self) -> Result<()> {
        let result = self.write();
        self.status = match &result {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                warn!(error = %e, "save failed");
                SaveStatus::Failed { message: e.to_string() }
            }
        };
        result
    }

    fn write(&mut self) -> Result<()> {
        let id = self.current.as_ref().map(|c| c.id.clone()).ok_or(Error::NoDashboard)?;
        let payload = DashboardPayload::from_graph(self.editor.graph());
        let saved = self.store.update(&id, None, Some(payload))?;
        self.current = Some(saved.summary());
        Ok(())
    }

    /// Flush any unsaved change and give the store back.
    ///
    /// If the flush fails the workspace comes back with the error, its
    /// graph intact and the save still pending, so the caller can retry.
    pub fn close(mut self) -> std::result::Result<S, (Self, Error)> {
        let dirty = self.editor.take_change().is_some() | self.scheduler.take_any();
        if dirty {
            if let Err(e) = self.save_now() {
                self.scheduler.schedule_immediate();
                return Err((self, e));
            }
        }
        Ok(self.store)
    }
}

impl<S: DashboardStore> fmt::Debug for Workspace<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("current", &self.current)
            .field("status", &self.status)
            .field("pending_save", &self.scheduler.is_pending())
            .finish_non_exhaustive()
    }
}
