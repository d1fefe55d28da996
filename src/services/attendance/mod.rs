pub mod ledger;

pub use ledger::record_day;
