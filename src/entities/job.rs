// 🛠️ Job Entity - Work billed to a customer
//
// Kept minimal: a job belongs to exactly one customer (by GUID) and
// shows up in that customer's job list. Created and destroyed through
// the business so both tables stay in sync.

use crate::business::{BusinessId, BusinessObject, ModuleKind, Ref};
use crate::guid::Guid;

/// Shared handle to a job owned by a business
pub type JobRef = Ref<Job>;

#[derive(Debug)]
pub struct Job {
    /// Stable identity; only the owning business may overwrite it
    guid: Guid,

    /// Owning business (by value)
    business: BusinessId,

    /// GUID of the customer the job is billed to
    owner: Guid,

    /// Job number
    id: String,

    /// Display name; also the printable form
    name: String,

    /// Customer's own reference (PO number etc.)
    reference: String,

    /// Inactive jobs are hidden from active-only job lists
    active: bool,

    /// Set by any setter since creation or the last commit
    dirty: bool,
}

impl Job {
    pub(crate) fn new(business: BusinessId, owner: Guid) -> Self {
        Job {
            guid: Guid::new(),
            business,
            owner,
            id: String::new(),
            name: String::new(),
            reference: String::new(),
            active: true,
            dirty: false,
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        self.dirty = true;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.dirty = true;
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.reference = reference.into();
        self.dirty = true;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.dirty = true;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// GUID of the owning customer
    pub fn owner(&self) -> Guid {
        self.owner
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn commit_edit(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn set_owner(&mut self, owner: Guid) {
        self.owner = owner;
    }

    pub(crate) fn replace_guid(&mut self, guid: Guid) {
        self.guid = guid;
    }
}

impl BusinessObject for Job {
    const KIND: ModuleKind = ModuleKind::Job;

    fn guid(&self) -> Guid {
        self.guid
    }

    fn business(&self) -> BusinessId {
        self.business
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn printable(&self) -> String {
        self.name.clone()
    }
}
