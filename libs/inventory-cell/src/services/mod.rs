pub mod dispense;
pub mod ledger;
