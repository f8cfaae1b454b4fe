//! Location reference data for Mobilizer.
//!
//! This crate owns the country → polling unit hierarchy:
//!
//! - [`record`] - Parsing raw delimitation records from tuple dumps and CSV
//! - [`validator`] - Duplicate reporting over a batch (always a dry run)
//! - [`hierarchy`] - The in-memory location table and its parent-chain invariant
//! - [`seed`] - Duplicate-free hierarchy construction with deterministic ids
//! - [`store`] - [`store::LocationStore`] trait and an in-memory backend
//! - [`service`] - [`service::SeedService`], tying the above together
//!
//! # Example
//!
//! ```
//! use mobilizer_locations::{read_tuple_lines, DelimitationValidator};
//!
//! let records = read_tuple_lines("(1, 1, 1, 1, 'A'),\n(1, 1, 1, 2, 'B'),\n(1, 1, 1, 3, 'A'),");
//! let report = DelimitationValidator::new().validate(&records).unwrap();
//! assert_eq!(report.unique_count, 2);
//! assert_eq!(report.duplicate_count, 1);
//! ```

pub mod error;
pub mod hierarchy;
pub mod record;
pub mod seed;
pub mod service;
pub mod store;
pub mod validator;

pub use error::{HierarchyError, LocationError, Result};
pub use hierarchy::{LocationHierarchy, LocationNode};
pub use record::{
    parse_tuple_line, read_csv_records, read_tuple_bytes, read_tuple_lines, DelimitationRecord,
    RawRecord, SkipReason,
};
pub use seed::{build_hierarchy, location_id, SeedBuilder, SeedSummary};
pub use service::{SeedMode, SeedOutcome, SeedService};
pub use store::{InMemoryLocationStore, LocationStore};
pub use validator::{
    tally, DelimitationValidator, DuplicateReport, DuplicateValue, UnparseableRow,
    DEFAULT_MAX_ROWS,
};
