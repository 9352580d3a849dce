// Business Core - Customer records and the business registry
// Exposes all modules for use in the check CLI and tests

pub mod guid;
pub mod business;
pub mod entities;
pub mod harness;
pub mod config;

// Re-export commonly used types
pub use guid::Guid;
pub use business::{
    read, write,
    Business, BusinessError, BusinessId, BusinessObject, BusinessRef,
    EntityTable, ModuleKind, Ref,
};
pub use entities::{
    Address,
    Customer, CustomerRef,
    Job, JobRef,
};
pub use harness::{
    CheckSummary, Checker, RandomSource,
    run_customer_suite,
};
pub use config::CheckArgs;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
