// ✅ Check Harness - Named pass/fail checks over the customer module
//
// Every check is recorded by name and the run keeps going after a
// failure. The aggregate result becomes the process exit code.

use crate::business::{read, write, Business, BusinessObject, BusinessRef, ModuleKind};
use crate::entities::{Customer, CustomerRef};
use crate::guid::Guid;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// CHECKER
// ============================================================================

/// Aggregate of a check run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckSummary {
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<String>,
}

impl CheckSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Records named pass/fail results without aborting on failure
#[derive(Debug, Default)]
pub struct Checker {
    summary: CheckSummary,
    verbose: bool,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print a line for every passing check
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Record `message` as passed if `condition` holds, failed otherwise
    pub fn check(&mut self, condition: bool, message: &str) -> bool {
        if condition {
            self.success(message);
        } else {
            warn!(check = message, "check failed");
            println!("FAILED: {}", message);
            self.summary.failed += 1;
            self.summary.failures.push(message.to_string());
        }
        condition
    }

    pub fn success(&mut self, message: &str) {
        if self.verbose {
            println!("passed: {}", message);
        }
        self.summary.passed += 1;
    }

    pub fn summary(&self) -> &CheckSummary {
        &self.summary
    }

    pub fn print_summary(&self) {
        let summary = &self.summary;
        if summary.all_passed() {
            println!("Executed {} checks. All checks passed.", summary.total());
        } else {
            println!(
                "Executed {} checks. {} of them failed:",
                summary.total(),
                summary.failed
            );
            for failure in &summary.failures {
                println!("  ✗ {}", failure);
            }
        }
    }

    /// 0 when nothing failed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.summary.all_passed() {
            0
        } else {
            1
        }
    }
}

// ============================================================================
// RANDOM TEST DATA
// ============================================================================

/// Seeded generator for check data
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        RandomSource {
            rng: StdRng::from_entropy(),
        }
    }

    /// Non-empty alphanumeric string, 1 to 20 characters
    pub fn random_string(&mut self) -> String {
        let len = self.rng.gen_range(1..=20);
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    pub fn random_boolean(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

// ============================================================================
// CUSTOMER SUITE
// ============================================================================

/// Set one field on a fresh customer and check dirty state + read-back.
/// Leaves the customer inactive. Returns the customer created.
fn check_field<V, S, G>(
    checker: &mut Checker,
    business: &Business,
    message: &str,
    values: &[V],
    set: S,
    get: G,
) -> CustomerRef
where
    V: Clone + PartialEq,
    S: Fn(&mut Customer, V),
    G: Fn(&Customer) -> V,
{
    let customer = business.create_customer();

    checker.check(!read(&customer).is_dirty(), "test if start dirty");
    for value in values {
        set(&mut *write(&customer), value.clone());
    }
    checker.check(read(&customer).is_dirty(), "test dirty later");

    let expected = values.last().cloned();
    checker.check(expected.is_some() && Some(get(&*read(&customer))) == expected, message);

    write(&customer).set_active(false);
    customer
}

/// Customer module checks: creation, accessors, identity, listing, printable, lookup
pub fn run_customer_suite(checker: &mut Checker, random: &mut RandomSource) {
    info!("running customer checks");
    let business = Business::new();
    // Customers created and never destroyed
    let mut count = 0usize;

    // Creation / destruction
    {
        checker.check(Customer::create(None).is_none(), "customer create NULL");
        let customer = Customer::create(Some(&business));
        checker.check(customer.is_some(), "customer create");
        if let Some(customer) = customer {
            checker.check(read(&customer).business() == business.id(), "getbusiness");
            checker.check(business.destroy_customer(&customer).is_some(), "destroy");
        }
        checker.success("create/destroy");
    }

    // Setters / getters; each leaves its customer inactive
    let text = random.random_string();
    check_field(checker, &business, "Id", &[text], |c, v| c.set_id(v), |c| c.id().to_string());
    count += 1;
    let text = random.random_string();
    check_field(checker, &business, "Name", &[text], |c, v| c.set_name(v), |c| c.name().to_string());
    count += 1;
    let text = random.random_string();
    check_field(checker, &business, "Notes", &[text], |c, v| c.set_notes(v), |c| c.notes().to_string());
    count += 1;

    check_field(checker, &business, "Terms", &[17], Customer::set_terms, Customer::terms);
    count += 1;

    let num = Decimal::from(17);
    check_field(checker, &business, "Discount", &[num], Customer::set_discount, Customer::discount);
    count += 1;
    check_field(checker, &business, "Credit", &[num], Customer::set_credit, Customer::credit);
    count += 1;

    let flag = random.random_boolean();
    check_field(
        checker,
        &business,
        "TaxIncluded",
        &[false, true, flag],
        Customer::set_tax_included,
        Customer::tax_included,
    );
    count += 1;
    let flag = random.random_boolean();
    let last = check_field(
        checker,
        &business,
        "Active",
        &[false, true, flag],
        Customer::set_active,
        Customer::active,
    );
    count += 1;

    checker.check(read(&last).addr().is_empty(), "Addr");
    checker.check(read(&last).ship_addr().is_empty(), "ShipAddr");

    // GUID overwrite
    let guid = Guid::new();
    let customer = business.create_customer();
    count += 1;
    checker.check(business.set_guid(&customer, guid).is_ok(), "set guid");
    checker.check(read(&customer).guid() == guid, "guid compare");

    // Listing
    {
        let all = business.get_list_by_module_name(ModuleKind::Customer.module_name(), true);
        checker.check(!all.is_empty(), "getList all");
        checker.check(all.len() == count, "correct length: all");

        let active = business.get_list_by_module_name(ModuleKind::Customer.module_name(), false);
        checker.check(!active.is_empty(), "getList active");
        checker.check(active.len() == 1, "correct length: active");
    }

    // Printable
    {
        let name = random.random_string();
        write(&customer).set_name(name.clone());
        let record = BusinessRef::Customer(Arc::clone(&customer));
        let printable = business.printable_by_kind(ModuleKind::Customer, &record);
        checker.check(printable.is_some(), "Printable NULL?");
        checker.check(printable.as_deref() == Some(name.as_str()), "Printable equals");
    }

    checker.check(read(&customer).joblist(true).is_empty(), "joblist empty");

    // Entity table
    {
        let guid = read(&customer).guid();
        let found = business.lookup::<Customer>(&guid);
        checker.check(
            found.is_some_and(|found| Arc::ptr_eq(&found, &customer)),
            "Entity Table",
        );
        checker.check(business.lookup::<Customer>(&Guid::new()).is_none(), "lookup unknown");
    }

    // Destroyed customers leave the table
    {
        let customer = business.create_customer();
        checker.check(!read(&customer).is_dirty(), "fresh customer clean");
        write(&customer).set_name("Acme");
        checker.check(read(&customer).is_dirty(), "dirty after rename");
        checker.check(read(&customer).name() == "Acme", "name read back");
        let guid = read(&customer).guid();
        business.destroy_customer(&customer);
        checker.check(business.lookup::<Customer>(&guid).is_none(), "lookup after destroy");
    }

    debug!(summary = ?checker.summary(), "customer checks done");
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_exit_code() {
        let mut checker = Checker::new();
        assert_eq!(checker.exit_code(), 0);

        checker.check(true, "passes");
        assert_eq!(checker.exit_code(), 0);

        checker.check(false, "fails");
        checker.check(true, "still runs");
        assert_eq!(checker.exit_code(), 1);

        let summary = checker.summary();
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures, vec!["fails".to_string()]);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_random_source_is_reproducible() {
        let mut a = RandomSource::seeded(7);
        let mut b = RandomSource::seeded(7);

        let text = a.random_string();
        assert_eq!(text, b.random_string());
        assert!(!text.is_empty() && text.len() <= 20);
        assert_eq!(a.random_boolean(), b.random_boolean());
    }

    #[test]
    fn test_check_field_reports_mismatch() {
        let business = Business::new();
        let mut checker = Checker::new();

        // Getter ignores the setter, so read-back must fail
        check_field(&mut checker, &business, "Broken", &[5], Customer::set_terms, |_| 0);

        assert_eq!(checker.summary().failures, vec!["Broken".to_string()]);
    }

    #[test]
    fn test_customer_suite_passes() {
        for seed in [0, 1, 42] {
            let mut checker = Checker::new();
            let mut random = RandomSource::seeded(seed);

            run_customer_suite(&mut checker, &mut random);

            assert!(checker.summary().all_passed(), "{:?}", checker.summary().failures);
            assert_eq!(checker.exit_code(), 0);
        }
    }
}
