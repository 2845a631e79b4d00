use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::model::{TaskId, normalize_record};
use crate::net::{ApiClient, UpdatePatch};
use crate::ops::state::ListState;

/// Orchestrates optimistic mutation against the remote service.
///
/// Owns the [`ListState`] behind an `Rc<RefCell<_>>` shared with rendering
/// code. Every operation applies its local change first, then awaits the
/// network and reconciles. Borrows are always released before an await, so
/// concurrently spawned operations interleave only at suspension points.
///
/// Failure recovery follows two paths: create/toggle/edit failures resync
/// the whole list from the server; delete failures roll the snapshot back
/// directly, since the only mutation since the snapshot was the removal.
#[derive(Clone)]
pub struct Controller {
    client: ApiClient,
    state: Rc<RefCell<ListState>>,
}

impl Controller {
    pub fn new(client: ApiClient) -> Controller {
        Controller {
            client,
            state: Rc::new(RefCell::new(ListState::default())),
        }
    }

    /// Shared handle for rendering code.
    pub fn state(&self) -> Rc<RefCell<ListState>> {
        Rc::clone(&self.state)
    }

    /// Startup fetch: blocks mutating UI affordances via the loading flag
    /// until the list settles one way or the other.
    pub async fn initial_load(&self) {
        self.state.borrow_mut().set_loading(true);
        self.refresh().await;
        self.state.borrow_mut().set_loading(false);
    }

    /// Fetch the full list and replace local state wholesale.
    pub async fn refresh(&self) {
        self.state.borrow_mut().begin_op();
        self.fetch_replace().await;
    }

    /// Recovery refresh after a failed mutation. Re-fetches ground truth
    /// but leaves the just-surfaced banner in place.
    async fn resync(&self) {
        self.fetch_replace().await;
    }

    async fn fetch_replace(&self) {
        match self.client.list().await {
            Ok(records) => self.state.borrow_mut().replace_all(&records),
            Err(e) => self.state.borrow_mut().fail(e.to_string()),
        }
    }

    /// Create a task. The trimmed title is validated here; an empty title
    /// is a silent no-op with no network call.
    pub async fn add(&self, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            return;
        }

        let local_id = {
            let mut state = self.state.borrow_mut();
            state.begin_op();
            state.insert_placeholder(title.to_string())
        };
        info!(title, "optimistic add");

        match self.client.create(title).await {
            Ok(record) => match normalize_record(&record) {
                Some(task) => self.state.borrow_mut().resolve_placeholder(&local_id, task),
                None => {
                    self.state
                        .borrow_mut()
                        .fail("created record has no identifier".to_string());
                    self.resync().await;
                }
            },
            Err(e) => {
                self.state.borrow_mut().fail(e.to_string());
                // the wholesale replace discards the placeholder
                self.resync().await;
            }
        }
    }

    /// Flip completion. No-op for placeholder rows and rows already saving.
    pub async fn toggle(&self, id: &TaskId) {
        let Some(remote_id) = id.as_remote().map(str::to_string) else {
            return;
        };

        let completed = {
            let mut state = self.state.borrow_mut();
            if !state.mark_saving(id) {
                return;
            }
            state.begin_op();
            let completed = !state.find(id).map(|t| t.completed).unwrap_or(false);
            state.set_completed(id, completed);
            completed
        };
        info!(%id, completed, "optimistic toggle");

        match self
            .client
            .update(&remote_id, &UpdatePatch::completed(completed))
            .await
        {
            // local state already matches the server
            Ok(_) => self.state.borrow_mut().clear_saving(id),
            Err(e) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.clear_saving(id);
                    state.fail(e.to_string());
                }
                self.resync().await;
            }
        }
    }

    /// Retitle a task. Returns false when nothing was submitted (empty
    /// trimmed title, placeholder row, or a mutation already in flight) so
    /// the caller can keep its edit affordance open.
    pub async fn edit(&self, id: &TaskId, new_title: &str) -> bool {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return false;
        }
        let Some(remote_id) = id.as_remote().map(str::to_string) else {
            return false;
        };

        {
            let mut state = self.state.borrow_mut();
            if !state.mark_saving(id) {
                return false;
            }
            state.begin_op();
            state.set_title(id, new_title.to_string());
        }
        info!(%id, new_title, "optimistic retitle");

        match self
            .client
            .update(&remote_id, &UpdatePatch::title(new_title))
            .await
        {
            Ok(_) => self.state.borrow_mut().clear_saving(id),
            Err(e) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.clear_saving(id);
                    state.fail(e.to_string());
                }
                self.resync().await;
            }
        }
        true
    }

    /// Remove a task. On failure the snapshot is restored at its original
    /// index; no resync, the prior in-memory state is known-correct apart
    /// from the attempted removal.
    pub async fn delete(&self, id: &TaskId) {
        let Some(remote_id) = id.as_remote().map(str::to_string) else {
            return;
        };

        let removed = {
            let mut state = self.state.borrow_mut();
            if !state.mark_saving(id) {
                return;
            }
            state.begin_op();
            match state.remove(id) {
                Some(removed) => removed,
                None => return,
            }
        };
        info!(%id, "optimistic delete");

        match self.client.delete(&remote_id).await {
            Ok(()) => {}
            Err(e) => {
                let mut state = self.state.borrow_mut();
                state.restore(removed);
                state.clear_saving(id);
                state.fail(e.to_string());
            }
        }
    }
}
