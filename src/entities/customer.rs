// 🧾 Customer Entity - Typed fields + dirty tracking
//
// "Customer name is a VALUE (can change), Customer GUID is IDENTITY"
//
// Each customer has:
// - Stable identity (GUID), only overwritten by the owning business
// - Typed values: id, name, notes, terms, discount, credit, tax_included, active
// - Billing + shipping addresses (always present)
// - Jobs billed to this customer
// - A dirty flag set by every setter call since creation or the last commit
//
// Once destroyed, a customer ignores setters and never reports dirty.

use crate::business::{read, write, Business, BusinessId, BusinessObject, ModuleKind, Ref};
use crate::entities::address::Address;
use crate::entities::job::JobRef;
use crate::guid::Guid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Shared handle to a customer owned by a business
pub type CustomerRef = Ref<Customer>;

// ============================================================================
// CUSTOMER ENTITY
// ============================================================================

#[derive(Debug)]
pub struct Customer {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    /// Stable identity; only the owning business may overwrite it
    guid: Guid,

    /// Owning business (by value, never a pointer)
    business: BusinessId,

    // ========================================================================
    // VALUES
    // ========================================================================
    /// Customer number, e.g. "000042"
    id: String,

    /// Display name; also the printable form
    name: String,

    /// Free-form notes
    notes: String,

    /// Payment terms in days
    terms: i32,

    /// Discount granted on invoices (exact decimal)
    discount: Decimal,

    /// Credit limit (exact decimal)
    credit: Decimal,

    /// Prices already include tax
    tax_included: bool,

    /// Inactive customers are hidden from active-only listings
    active: bool,

    /// Billing address (always present)
    addr: Address,

    /// Shipping address (always present)
    ship_addr: Address,

    /// Jobs billed to this customer
    jobs: Vec<JobRef>,

    // ========================================================================
    // STATE
    // ========================================================================
    /// Set by any setter since creation or the last commit
    dirty: bool,

    /// Set once the business has destroyed this customer
    destroyed: bool,

    created_at: DateTime<Utc>,

    /// Time of the last setter call
    modified_at: DateTime<Utc>,

    // ========================================================================
    // METADATA (slot frame)
    // ========================================================================
    /// Extensible key/value slots
    metadata: serde_json::Value,
}

/// Tracked setter: overwrite the field and mark dirty; ignored once destroyed
macro_rules! set_tracked {
    ($self:ident . $field:ident = $value:expr) => {{
        if $self.destroyed {
            return;
        }
        $self.$field = $value;
        $self.mark_dirty();
    }};
}

impl Customer {
    /// Create a customer in `business`. An absent business yields no customer.
    pub fn create(business: Option<&Business>) -> Option<CustomerRef> {
        business.map(Business::create_customer)
    }

    /// Fresh, clean customer. Registration is the business's job.
    pub(crate) fn new(business: BusinessId) -> Self {
        let now = Utc::now();

        Customer {
            guid: Guid::new(),
            business,
            id: String::new(),
            name: String::new(),
            notes: String::new(),
            terms: 0,
            discount: Decimal::ZERO,
            credit: Decimal::ZERO,
            tax_included: false,
            active: true,
            addr: Address::new(),
            ship_addr: Address::new(),
            jobs: Vec::new(),
            dirty: false,
            destroyed: false,
            created_at: now,
            modified_at: now,
            metadata: serde_json::json!({}),
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.modified_at = Utc::now();
    }

    // ------------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------------

    pub fn set_id(&mut self, id: impl Into<String>) {
        set_tracked!(self.id = id.into());
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        set_tracked!(self.name = name.into());
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        set_tracked!(self.notes = notes.into());
    }

    pub fn set_terms(&mut self, terms: i32) {
        set_tracked!(self.terms = terms);
    }

    pub fn set_discount(&mut self, discount: Decimal) {
        set_tracked!(self.discount = discount);
    }

    pub fn set_credit(&mut self, credit: Decimal) {
        set_tracked!(self.credit = credit);
    }

    pub fn set_tax_included(&mut self, tax_included: bool) {
        set_tracked!(self.tax_included = tax_included);
    }

    pub fn set_active(&mut self, active: bool) {
        set_tracked!(self.active = active);
    }

    /// Store a slot value under `key`
    pub fn set_metadata(&mut self, key: &str, value: serde_json::Value) {
        if self.destroyed {
            return;
        }
        if let Some(slots) = self.metadata.as_object_mut() {
            slots.insert(key.to_string(), value);
            self.mark_dirty();
        }
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn terms(&self) -> i32 {
        self.terms
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    pub fn credit(&self) -> Decimal {
        self.credit
    }

    pub fn tax_included(&self) -> bool {
        self.tax_included
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn addr(&self) -> &Address {
        &self.addr
    }

    pub fn ship_addr(&self) -> &Address {
        &self.ship_addr
    }

    /// Address changes count toward the customer's dirty state
    pub fn addr_mut(&mut self) -> &mut Address {
        &mut self.addr
    }

    pub fn ship_addr_mut(&mut self) -> &mut Address {
        &mut self.ship_addr
    }

    pub fn metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    // ------------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------------

    /// Always false once destroyed
    pub fn is_dirty(&self) -> bool {
        !self.destroyed && (self.dirty || self.addr.is_dirty() || self.ship_addr.is_dirty())
    }

    /// Clean checkpoint: clears the customer's and both addresses' dirty flags
    pub fn commit_edit(&mut self) {
        self.dirty = false;
        self.addr.commit_edit();
        self.ship_addr.commit_edit();
    }

    /// True once the owning business has destroyed this customer
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ------------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------------

    /// Jobs billed to this customer, optionally only the active ones
    pub fn joblist(&self, active_only: bool) -> Vec<JobRef> {
        self.jobs
            .iter()
            .filter(|job| !active_only || read(job).active())
            .cloned()
            .collect()
    }

    pub(crate) fn add_job(&mut self, job: JobRef) {
        if self.jobs.iter().any(|existing| Arc::ptr_eq(existing, &job)) {
            return;
        }
        self.jobs.push(job);
    }

    pub(crate) fn remove_job(&mut self, job: &JobRef) {
        self.jobs.retain(|existing| !Arc::ptr_eq(existing, job));
    }

    // ------------------------------------------------------------------------
    // Business-only bookkeeping
    // ------------------------------------------------------------------------

    /// New identity; jobs follow their owner
    pub(crate) fn replace_guid(&mut self, guid: Guid) {
        self.guid = guid;
        for job in &self.jobs {
            write(job).set_owner(guid);
        }
    }

    /// Mark destroyed, drop the addresses and hand back the job list
    pub(crate) fn release(&mut self) -> Vec<JobRef> {
        self.destroyed = true;
        self.dirty = false;
        self.addr = Address::new();
        self.ship_addr = Address::new();
        std::mem::take(&mut self.jobs)
    }
}

impl BusinessObject for Customer {
    const KIND: ModuleKind = ModuleKind::Customer;

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

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn create_test_customer() -> (Business, CustomerRef) {
        let business = Business::new();
        let customer = business.create_customer();
        (business, customer)
    }

    #[test]
    fn test_create_without_business_is_none() {
        assert!(Customer::create(None).is_none());
    }

    #[test]
    fn test_create_defaults() {
        let business = Business::new();
        let customer = Customer::create(Some(&business)).unwrap();
        let customer = customer.read().unwrap();

        assert_eq!(customer.business(), business.id());
        assert!(customer.active());
        assert!(!customer.tax_included());
        assert!(!customer.is_dirty());
        assert!(!customer.is_destroyed());
        assert_eq!(customer.terms(), 0);
        assert_eq!(customer.discount(), Decimal::ZERO);
        assert!(customer.addr().is_empty());
        assert!(customer.ship_addr().is_empty());
        assert!(customer.joblist(true).is_empty());
    }

    #[test]
    fn test_string_setters_mark_dirty() {
        let (_business, customer) = create_test_customer();
        let mut customer = customer.write().unwrap();

        customer.set_id("000042");
        assert!(customer.is_dirty());
        customer.set_name("Acme Corp");
        customer.set_notes("Net 30, pays late");

        assert_eq!(customer.id(), "000042");
        assert_eq!(customer.name(), "Acme Corp");
        assert_eq!(customer.notes(), "Net 30, pays late");
    }

    #[test]
    fn test_numeric_setters_exact() {
        let (_business, customer) = create_test_customer();
        let mut customer = customer.write().unwrap();

        customer.set_discount(dec!(17));
        assert!(customer.is_dirty());
        customer.set_credit(dec!(1000.10));

        assert_eq!(customer.discount(), dec!(17));
        assert_eq!(customer.credit(), dec!(1000.10));
        assert_eq!(customer.credit() - dec!(1000), dec!(0.10));
    }

    #[test]
    fn test_terms_setter() {
        let (_business, customer) = create_test_customer();
        let mut customer = customer.write().unwrap();

        customer.set_terms(17);
        assert!(customer.is_dirty());
        assert_eq!(customer.terms(), 17);
    }

    #[test]
    fn test_bool_setters_last_value_wins() {
        let (_business, customer) = create_test_customer();
        let mut customer = customer.write().unwrap();

        customer.set_tax_included(false);
        customer.set_tax_included(true);
        customer.set_tax_included(false);
        assert!(customer.is_dirty());
        assert!(!customer.tax_included());

        customer.set_active(false);
        customer.set_active(true);
        assert!(customer.active());
    }

    #[test]
    fn test_default_value_setter_dirties_fresh_customer() {
        let setters: Vec<(&str, fn(&mut Customer))> = vec![
            ("id", |c| c.set_id("")),
            ("name", |c| c.set_name("")),
            ("notes", |c| c.set_notes("")),
            ("terms", |c| c.set_terms(0)),
            ("discount", |c| c.set_discount(Decimal::ZERO)),
            ("credit", |c| c.set_credit(Decimal::ZERO)),
            ("tax_included", |c| c.set_tax_included(false)),
            ("active", |c| c.set_active(true)),
        ];

        for (field, set) in setters {
            let (_business, customer) = create_test_customer();
            let mut customer = customer.write().unwrap();
            assert!(!customer.is_dirty(), "{} started dirty", field);

            set(&mut customer);
            assert!(customer.is_dirty(), "{} setter left customer clean", field);
        }
    }

    #[test]
    fn test_same_value_after_commit_marks_dirty() {
        let (_business, customer) = create_test_customer();
        let mut customer = customer.write().unwrap();

        customer.set_name("Acme Corp");
        customer.commit_edit();
        assert!(!customer.is_dirty());

        customer.set_name("Acme Corp");
        assert!(customer.is_dirty());
        assert_eq!(customer.name(), "Acme Corp");
    }

    #[test]
    fn test_address_change_dirties_customer() {
        let (_business, customer) = create_test_customer();
        let mut customer = customer.write().unwrap();

        customer.ship_addr_mut().set_addr1("1 Dock Rd");
        assert!(customer.is_dirty());
        assert_eq!(customer.ship_addr().addr1(), "1 Dock Rd");

        customer.commit_edit();
        assert!(!customer.is_dirty());
        assert!(!customer.ship_addr().is_dirty());
    }

    #[test]
    fn test_metadata_slots() {
        let (_business, customer) = create_test_customer();
        let mut customer = customer.write().unwrap();

        customer.set_metadata("currency", serde_json::json!("USD"));
        assert!(customer.is_dirty());
        assert_eq!(customer.metadata("currency"), Some(&serde_json::json!("USD")));
        assert!(customer.metadata("missing").is_none());

        customer.commit_edit();
        assert!(!customer.is_dirty());
        customer.set_metadata("currency", serde_json::json!("MXN"));
        assert!(customer.is_dirty());
        assert_eq!(customer.metadata("currency"), Some(&serde_json::json!("MXN")));
    }

    #[test]
    fn test_modified_at_advances_on_change() {
        let (_business, customer) = create_test_customer();
        let mut customer = customer.write().unwrap();
        let created = customer.created_at();

        customer.set_notes("updated");
        assert!(customer.modified_at() >= created);
    }

    #[test]
    fn test_printable_is_name() {
        let (business, customer) = create_test_customer();
        customer.write().unwrap().set_name("Globex");

        assert_eq!(business.printable(&customer), "Globex");
    }

    #[test]
    fn test_joblist_active_filter() {
        let (business, customer) = create_test_customer();
        let open = business.create_job(&customer).unwrap();
        let closed = business.create_job(&customer).unwrap();
        closed.write().unwrap().set_active(false);

        let active = customer.read().unwrap().joblist(true);
        assert_eq!(active.len(), 1);
        assert!(Arc::ptr_eq(&active[0], &open));

        assert_eq!(customer.read().unwrap().joblist(false).len(), 2);
    }

    #[test]
    fn test_destroy_then_lookup_is_none() {
        let (business, customer) = create_test_customer();
        assert!(!customer.read().unwrap().is_dirty());

        customer.write().unwrap().set_name("Acme");
        assert!(customer.read().unwrap().is_dirty());
        assert_eq!(customer.read().unwrap().name(), "Acme");

        let guid = customer.read().unwrap().guid();
        business.destroy_customer(&customer);
        assert!(business.lookup::<Customer>(&guid).is_none());
    }

    #[test]
    fn test_setters_ignored_after_destroy() {
        let (business, customer) = create_test_customer();
        customer.write().unwrap().set_name("Acme");
        business.destroy_customer(&customer);

        let mut customer = customer.write().unwrap();
        assert!(customer.is_destroyed());
        assert!(!customer.is_dirty());

        customer.set_name("ghost");
        customer.set_terms(30);
        customer.set_metadata("currency", serde_json::json!("USD"));

        assert_eq!(customer.name(), "Acme");
        assert_eq!(customer.terms(), 0);
        assert!(customer.metadata("currency").is_none());
        assert!(!customer.is_dirty());
    }

    #[test]
    fn test_destroy_drops_addresses() {
        let (business, customer) = create_test_customer();
        {
            let mut customer = customer.write().unwrap();
            customer.addr_mut().set_addr1("12 Main St");
            customer.ship_addr_mut().set_email("ship@acme.test");
        }
        business.destroy_customer(&customer);

        let customer = customer.read().unwrap();
        assert!(customer.addr().is_empty());
        assert!(customer.ship_addr().is_empty());
        assert!(customer.joblist(false).is_empty());
    }
}
