//! Compensation records and the derivations that keep their fields
//! consistent: equity annualisation, package aggregation and the
//! bonus amount / bonus months pair.

pub mod aggregate;
pub mod bonus;
pub mod record;

pub use aggregate::{aggregate, IncreaseStats, PackageAggregate};
pub use bonus::{bonus_months_display, set_bonus_amount, set_bonus_months};
pub use record::{CompensationRecord, RecordField, DEFAULT_VESTING_YEARS};
