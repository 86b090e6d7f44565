pub mod calendar;
pub mod day;
pub mod filter;
pub mod messaging;
pub mod reports;
pub mod table;
