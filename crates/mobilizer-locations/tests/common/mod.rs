//! Common test utilities for mobilizer-locations integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use mobilizer_locations::{DelimitationValidator, InMemoryLocationStore, SeedService};

/// A small tuple dump: two states, two duplicated delimitations, one row with
/// a non-numeric LGA code and one with the delimitation missing.
pub const TUPLE_DUMP: &str = "\
(1, 20, 1, 1, 'Kofar Yamma Pri. Sch.'),
(1, 20, 1, 1, 'Gidan Sarki'),
(1, 20, 1, 2, 'Kasuwa'),
(1, 20, 1, 2, 'Kofar Yamma Pri. Sch.'),
(1, 25, 3, 7, 'Oja Oba'),
(1, 25, x, 7, 'Broken LGA'),
(1, 25, 3, 7),
(1, 25, 3, 7, 'Oja Oba');
";

/// The same kind of data as CSV, with a byte order mark and mixed-case headers.
pub const CSV_DUMP: &str = "\u{feff}Country_Code,State_Code,LGA_Code,Ward_Code,Delimitation\n\
1,20,1,1,Kofar Yamma Pri. Sch.\n\
1,20,1,1,Gidan Sarki\n\
1,20,1,2,Kofar Yamma Pri. Sch.\n\
1,20,one,2,Bad Row\n";

/// Test context containing an isolated store and a service over it.
pub struct TestContext {
    pub store: Arc<InMemoryLocationStore>,
    pub service: SeedService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_validator(DelimitationValidator::new())
    }

    pub fn with_validator(validator: DelimitationValidator) -> Self {
        let store = Arc::new(InMemoryLocationStore::new());
        Self {
            service: SeedService::new(store.clone(), validator),
            store,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
