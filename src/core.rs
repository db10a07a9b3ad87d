pub mod appliance;
pub mod engine;
pub mod flag;
pub mod ledger;
pub mod month;
pub mod period;
pub mod reading;
pub mod session;
pub mod stats;
pub mod tariff;
