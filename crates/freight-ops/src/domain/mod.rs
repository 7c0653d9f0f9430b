//! Value records shared by the calculators and agents.

mod compliance;
mod lane;
mod load;
mod settlement;

pub use compliance::{DutyStatus, FuelPurchase, MileageRecord};
pub use lane::{LaneQuery, LaneRate};
pub use load::{Load, LoadDetails, LoadError, Location};
pub use settlement::{Advance, DriverContract, Expense, ExpenseType, PayType};
