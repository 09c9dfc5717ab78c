//! Domain models for ClearPath.
//!
//! - `VehicleIdentifier`: the (year, make, model) triple a lookup runs against
//! - `RecallRecord`: one registry recall notice, validated at the JSON boundary
//! - `RiskVerdict`: the RED/YELLOW classification plus plain-language summary

pub mod recall;
pub mod vehicle;
pub mod verdict;

pub use recall::RecallRecord;
pub use vehicle::VehicleIdentifier;
pub use verdict::{RiskLevel, RiskVerdict};
