pub mod date_range;
pub mod plan;
pub mod pricing;
pub mod profile;
pub mod rates;
pub mod reading;
