//! Row dropdown menus with outside-click dismissal.
//!
//! A [`DropdownGroup`] stands for one list on screen. Each row registers a
//! [`DropdownHandle`] for as long as it is mounted; dropping the handle
//! unregisters it. The group is the only click listener, so mounting and
//! unmounting rows never leaves listeners behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Identifies one registered dropdown within its group.
pub type DropdownId = u64;

#[derive(Debug, Default)]
struct GroupState {
    next_id: DropdownId,
    open: BTreeMap<DropdownId, bool>,
}

/// The set of dropdowns in one list. Clones share the set.
#[derive(Debug, Clone, Default)]
pub struct DropdownGroup {
    state: Arc<Mutex<GroupState>>,
}

impl DropdownGroup {
    /// Empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a row's dropdown, initially closed.
    pub fn register(&self) -> DropdownHandle {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.open.insert(id, false);
        DropdownHandle {
            id,
            group: self.clone(),
        }
    }

    /// Rows currently mounted.
    pub fn registered_count(&self) -> usize {
        self.state.lock().open.len()
    }

    /// Dropdowns currently open.
    pub fn open_count(&self) -> usize {
        self.state.lock().open.values().filter(|open| **open).count()
    }

    /// A click landed somewhere on the page. `inside` names the dropdown
    /// whose bounds contain it, if any; every other dropdown closes.
    pub fn dispatch_click(&self, inside: Option<DropdownId>) {
        for (id, open) in self.state.lock().open.iter_mut() {
            if Some(*id) != inside {
                *open = false;
            }
        }
    }
}

/// One row's dropdown. Unregisters on drop.
#[derive(Debug)]
pub struct DropdownHandle {
    id: DropdownId,
    group: DropdownGroup,
}

impl DropdownHandle {
    /// Id to pass to [`DropdownGroup::dispatch_click`] for clicks inside
    /// this row's menu.
    pub fn id(&self) -> DropdownId {
        self.id
    }

    /// Whether the menu is showing.
    pub fn is_open(&self) -> bool {
        self.group
            .state
            .lock()
            .open
            .get(&self.id)
            .copied()
            .unwrap_or(false)
    }

    /// Flip the menu. Opening it closes every other menu in the group.
    ///
    /// The toggle click itself is not dispatched to the group.
    pub fn toggle(&self) -> bool {
        let mut state = self.group.state.lock();
        let now_open = !state.open.get(&self.id).copied().unwrap_or(false);
        if now_open {
            for open in state.open.values_mut() {
                *open = false;
            }
        }
        state.open.insert(self.id, now_open);
        now_open
    }

    /// Close the menu.
    pub fn close(&self) {
        if let Some(open) = self.group.state.lock().open.get_mut(&self.id) {
            *open = false;
        }
    }
}

impl Drop for DropdownHandle {
    fn drop(&mut self) {
        self.group.state.lock().open.remove(&self.id);
    }
}
