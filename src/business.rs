// 🏢 Business - Owning context for business objects
//
// "Identity persists, values change"
//
// The business creates, owns and indexes every record made against it.
// One strongly-typed table per entity kind (no string-keyed dispatch):
// - Customers: GUID → shared customer handle
// - Jobs:      GUID → shared job handle
//
// Handles are Arc<RwLock<T>>. Two handles refer to the same record iff
// Arc::ptr_eq holds, which is what lookups guarantee.

use crate::entities::{Customer, CustomerRef, Job, JobRef};
use crate::guid::Guid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Shared handle to a record owned by a business
pub type Ref<T> = Arc<RwLock<T>>;

/// Read-lock a record, recovering the guard if a writer panicked
pub fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write-lock a record, recovering the guard if a writer panicked
pub fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessError {
    #[error("record not registered: {0}")]
    NotFound(Guid),

    #[error("GUID already in use: {0}")]
    GuidInUse(Guid),
}

// ============================================================================
// MODULE KIND
// ============================================================================

/// Entity kind tag partitioning the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Customer,
    Job,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 2] = [ModuleKind::Customer, ModuleKind::Job];

    /// Engine module name for this kind
    pub fn module_name(&self) -> &'static str {
        match self {
            ModuleKind::Customer => "gncCustomer",
            ModuleKind::Job => "gncJob",
        }
    }

    /// Resolve an engine module name; unknown names have no kind
    pub fn from_module_name(name: &str) -> Option<ModuleKind> {
        Self::ALL.into_iter().find(|kind| kind.module_name() == name)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.module_name())
    }
}

// ============================================================================
// BUSINESS OBJECT TRAIT
// ============================================================================

pub(crate) mod sealed {
    use super::{Business, EntityTable, Ref};
    use crate::guid::Guid;

    pub trait Sealed: Sized {
        /// The table of `business` holding records of this kind
        fn table(business: &Business) -> &EntityTable<Self>;

        /// Overwrite the identity. Only the business calls this, after re-keying.
        fn assign_guid(&mut self, guid: Guid);

        /// Unlink the record from related records before it is dropped
        fn detach(record: &Ref<Self>, business: &Business);
    }
}

/// A record kind the business can own, list, look up and print
pub trait BusinessObject: sealed::Sealed {
    const KIND: ModuleKind;

    fn guid(&self) -> Guid;

    /// Owning business (back-reference by value)
    fn business(&self) -> BusinessId;

    fn is_active(&self) -> bool;

    /// Human-readable form
    fn printable(&self) -> String;
}

/// Kind-erased record handle, for callers dispatching on a `ModuleKind`
#[derive(Debug, Clone)]
pub enum BusinessRef {
    Customer(CustomerRef),
    Job(JobRef),
}

impl BusinessRef {
    pub fn kind(&self) -> ModuleKind {
        match self {
            BusinessRef::Customer(_) => ModuleKind::Customer,
            BusinessRef::Job(_) => ModuleKind::Job,
        }
    }

    pub fn guid(&self) -> Guid {
        match self {
            BusinessRef::Customer(c) => read(c).guid(),
            BusinessRef::Job(j) => read(j).guid(),
        }
    }

    pub fn printable(&self) -> String {
        match self {
            BusinessRef::Customer(c) => read(c).printable(),
            BusinessRef::Job(j) => read(j).printable(),
        }
    }

    /// Same record (pointer identity), not merely equal values
    pub fn same_record(&self, other: &BusinessRef) -> bool {
        match (self, other) {
            (BusinessRef::Customer(a), BusinessRef::Customer(b)) => Arc::ptr_eq(a, b),
            (BusinessRef::Job(a), BusinessRef::Job(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// ENTITY TABLE
// ============================================================================

/// GUID-indexed table of records of one kind
pub struct EntityTable<T> {
    entries: RwLock<HashMap<Guid, Ref<T>>>,
}

impl<T: BusinessObject> EntityTable<T> {
    fn new() -> Self {
        EntityTable {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, record: Ref<T>) {
        let guid = read(&record).guid();
        write(&self.entries).insert(guid, record);
    }

    fn get(&self, guid: &Guid) -> Option<Ref<T>> {
        read(&self.entries).get(guid).cloned()
    }

    /// Remove `record` if it is the one registered under its GUID
    fn remove(&self, record: &Ref<T>) -> Option<Ref<T>> {
        let guid = read(record).guid();
        let mut entries = write(&self.entries);
        match entries.get(&guid) {
            Some(existing) if Arc::ptr_eq(existing, record) => entries.remove(&guid),
            _ => None,
        }
    }

    fn rekey(&self, record: &Ref<T>, new_guid: Guid) -> Result<(), BusinessError> {
        let old_guid = read(record).guid();
        if old_guid == new_guid {
            return Ok(());
        }

        let mut entries = write(&self.entries);
        if entries.contains_key(&new_guid) {
            return Err(BusinessError::GuidInUse(new_guid));
        }
        match entries.get(&old_guid) {
            Some(existing) if Arc::ptr_eq(existing, record) => {}
            _ => return Err(BusinessError::NotFound(old_guid)),
        }

        entries.remove(&old_guid);
        write(record).assign_guid(new_guid);
        entries.insert(new_guid, Arc::clone(record));
        Ok(())
    }

    /// Records sorted by GUID, optionally only the active ones
    fn list(&self, include_inactive: bool) -> Vec<Ref<T>> {
        let entries = read(&self.entries);
        let mut records: Vec<(Guid, Ref<T>)> = entries
            .iter()
            .filter(|(_, record)| include_inactive || read(record).is_active())
            .map(|(guid, record)| (*guid, Arc::clone(record)))
            .collect();

        records.sort_by_key(|(guid, _)| *guid);
        records.into_iter().map(|(_, record)| record).collect()
    }

    fn count(&self, include_inactive: bool) -> usize {
        let entries = read(&self.entries);
        if include_inactive {
            return entries.len();
        }
        entries.values().filter(|record| read(record).is_active()).count()
    }
}

// ============================================================================
// BUSINESS
// ============================================================================

/// Identity of a business context. The default is the nil id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessId(Guid);

impl BusinessId {
    pub fn new() -> Self {
        BusinessId(Guid::new())
    }

    pub fn guid(&self) -> Guid {
        self.0
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Owning context: creates, owns and indexes business records
pub struct Business {
    id: BusinessId,
    customers: EntityTable<Customer>,
    jobs: EntityTable<Job>,
}

impl Business {
    /// Create an empty business with a fresh identity
    pub fn new() -> Self {
        Self::with_id(BusinessId::new())
    }

    pub fn with_id(id: BusinessId) -> Self {
        debug!(business = %id, "business created");
        Business {
            id,
            customers: EntityTable::new(),
            jobs: EntityTable::new(),
        }
    }

    pub fn id(&self) -> BusinessId {
        self.id
    }

    // ------------------------------------------------------------------------
    // Creation / destruction
    // ------------------------------------------------------------------------

    /// Create and register a new customer
    pub fn create_customer(&self) -> CustomerRef {
        let customer = Arc::new(RwLock::new(Customer::new(self.id)));
        debug!(business = %self.id, guid = %read(&customer).guid(), "customer created");
        self.customers.insert(Arc::clone(&customer));
        customer
    }

    /// Create a job for `owner`, register it and append it to the owner's job list.
    /// The owner must be a live customer registered in this business.
    pub fn create_job(&self, owner: &CustomerRef) -> Result<JobRef, BusinessError> {
        let owner_guid = read(owner).guid();
        match self.customers.get(&owner_guid) {
            Some(registered) if Arc::ptr_eq(&registered, owner) => {}
            _ => {
                warn!(business = %self.id, owner = %owner_guid, "job owner not registered");
                return Err(BusinessError::NotFound(owner_guid));
            }
        }

        let job = Arc::new(RwLock::new(Job::new(self.id, owner_guid)));
        debug!(business = %self.id, guid = %read(&job).guid(), owner = %owner_guid, "job created");
        self.jobs.insert(Arc::clone(&job));
        write(owner).add_job(Arc::clone(&job));
        Ok(job)
    }

    /// Deregister a record. Returns the removed handle, None if it was not registered here.
    pub fn destroy<T: BusinessObject>(&self, record: &Ref<T>) -> Option<Ref<T>> {
        let removed = T::table(self).remove(record)?;
        T::detach(&removed, self);
        debug!(business = %self.id, kind = %T::KIND, guid = %read(&removed).guid(), "record destroyed");
        Some(removed)
    }

    pub fn destroy_customer(&self, customer: &CustomerRef) -> Option<CustomerRef> {
        self.destroy(customer)
    }

    pub fn destroy_job(&self, job: &JobRef) -> Option<JobRef> {
        self.destroy(job)
    }

    /// Administrative identity overwrite; re-keys the table. Does not mark dirty.
    pub fn set_guid<T: BusinessObject>(&self, record: &Ref<T>, guid: Guid) -> Result<(), BusinessError> {
        T::table(self).rekey(record, guid).map_err(|err| {
            warn!(business = %self.id, kind = %T::KIND, error = %err, "GUID overwrite rejected");
            err
        })
    }

    // ------------------------------------------------------------------------
    // Typed queries
    // ------------------------------------------------------------------------

    /// Every record of kind `T`, or only the active ones
    pub fn get_list<T: BusinessObject>(&self, include_inactive: bool) -> Vec<Ref<T>> {
        T::table(self).list(include_inactive)
    }

    /// Exact-match lookup; returns the registered handle itself
    pub fn lookup<T: BusinessObject>(&self, guid: &Guid) -> Option<Ref<T>> {
        let found = T::table(self).get(guid);
        trace!(kind = %T::KIND, guid = %guid, found = found.is_some(), "lookup");
        found
    }

    pub fn printable<T: BusinessObject>(&self, record: &Ref<T>) -> String {
        read(record).printable()
    }

    pub fn customers(&self) -> Vec<CustomerRef> {
        self.get_list(true)
    }

    pub fn jobs(&self) -> Vec<JobRef> {
        self.get_list(true)
    }

    // ------------------------------------------------------------------------
    // Kind-dispatched queries
    // ------------------------------------------------------------------------

    pub fn get_list_by_kind(&self, kind: ModuleKind, include_inactive: bool) -> Vec<BusinessRef> {
        match kind {
            ModuleKind::Customer => self
                .customers
                .list(include_inactive)
                .into_iter()
                .map(BusinessRef::Customer)
                .collect(),
            ModuleKind::Job => self
                .jobs
                .list(include_inactive)
                .into_iter()
                .map(BusinessRef::Job)
                .collect(),
        }
    }

    /// List by engine module name; an unknown module yields an empty list
    pub fn get_list_by_module_name(&self, module_name: &str, include_inactive: bool) -> Vec<BusinessRef> {
        match ModuleKind::from_module_name(module_name) {
            Some(kind) => self.get_list_by_kind(kind, include_inactive),
            None => Vec::new(),
        }
    }

    pub fn lookup_by_kind(&self, kind: ModuleKind, guid: &Guid) -> Option<BusinessRef> {
        match kind {
            ModuleKind::Customer => self.lookup::<Customer>(guid).map(BusinessRef::Customer),
            ModuleKind::Job => self.lookup::<Job>(guid).map(BusinessRef::Job),
        }
    }

    /// Printable form of `record`; None when it is not of `kind`
    pub fn printable_by_kind(&self, kind: ModuleKind, record: &BusinessRef) -> Option<String> {
        if record.kind() != kind {
            return None;
        }
        Some(record.printable())
    }

    pub fn count(&self, kind: ModuleKind, include_inactive: bool) -> usize {
        match kind {
            ModuleKind::Customer => self.customers.count(include_inactive),
            ModuleKind::Job => self.jobs.count(include_inactive),
        }
    }
}

impl Default for Business {
    fn default() -> Self {
        Self::new()
    }
}

impl sealed::Sealed for Customer {
    fn table(business: &Business) -> &EntityTable<Self> {
        &business.customers
    }

    fn assign_guid(&mut self, guid: Guid) {
        self.replace_guid(guid);
    }

    fn detach(record: &Ref<Self>, business: &Business) {
        // Jobs go with their owner
        let jobs = write(record).release();
        for job in jobs {
            business.jobs.remove(&job);
        }
    }
}

impl sealed::Sealed for Job {
    fn table(business: &Business) -> &EntityTable<Self> {
        &business.jobs
    }

    fn assign_guid(&mut self, guid: Guid) {
        self.replace_guid(guid);
    }

    fn detach(record: &Ref<Self>, business: &Business) {
        let owner = read(record).owner();
        if let Some(customer) = business.customers.get(&owner) {
            write(&customer).remove_job(record);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
