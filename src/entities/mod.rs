// Entity Models
//
// Each entity has:
// - Stable identity (GUID) assigned at creation
// - Typed values behind change-tracking setters
// - An owning business that indexes it by GUID

pub mod address;
pub mod customer;
pub mod job;

pub use address::Address;
pub use customer::{Customer, CustomerRef};
pub use job::{Job, JobRef};
