//! Core domain logic for the call log.
//!
//! This crate contains the fundamental types and logic for:
//! - Grouping: collapsing adjacent calls into rows and bucketing them by day
//! - Number equivalence: loose phone number and SIP address comparison
//! - Records: the call-history entries grouping consumes

pub mod call_type;
mod day_group;
mod grouping;
pub mod number;
mod record;
pub mod types;

pub use call_type::{CallType, UnknownCallType};
pub use day_group::{DayGroup, day_group_of};
pub use grouping::{
    CallGroup, CallLogGrouper, DayGroups, GroupingMode, GroupingResult, SectionHeader,
    compute_groups, compute_single_item_groups, should_group,
};
pub use number::{numbers_equivalent, phone_numbers_equivalent, sip_addresses_equivalent};
pub use record::{CallLogEntry, CallRecord, validate_entries};
pub use types::{CallId, ValidationError};
