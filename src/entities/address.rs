// 📮 Address - Sub-object owned by a customer
//
// A customer carries two of these (billing + shipping). They are VALUES
// owned by the customer, not registry entries, but they track their own
// dirty flag so the owner knows when they changed.

use serde::{Deserialize, Serialize};

/// Postal/contact address with change tracking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    name: String,
    addr1: String,
    addr2: String,
    addr3: String,
    addr4: String,
    phone: String,
    fax: String,
    email: String,

    #[serde(skip)]
    dirty: bool,
}

/// Generates a getter + dirty-marking setter pair for a string field
macro_rules! address_field {
    ($get:ident, $set:ident) => {
        pub fn $get(&self) -> &str {
            &self.$get
        }

        pub fn $set(&mut self, value: impl Into<String>) {
            self.$get = value.into();
            self.dirty = true;
        }
    };
}

impl Address {
    /// Empty, clean address
    pub fn new() -> Self {
        Self::default()
    }

    address_field!(name, set_name);
    address_field!(addr1, set_addr1);
    address_field!(addr2, set_addr2);
    address_field!(addr3, set_addr3);
    address_field!(addr4, set_addr4);
    address_field!(phone, set_phone);
    address_field!(fax, set_fax);
    address_field!(email, set_email);

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag (clean checkpoint)
    pub fn commit_edit(&mut self) {
        self.dirty = false;
    }

    /// All address lines that are not blank, in order
    pub fn lines(&self) -> Vec<&str> {
        [&self.addr1, &self.addr2, &self.addr3, &self.addr4]
            .into_iter()
            .map(|line| line.as_str())
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.lines().is_empty()
            && self.phone.is_empty()
            && self.fax.is_empty()
            && self.email.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
