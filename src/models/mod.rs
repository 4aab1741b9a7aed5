pub mod bill;
pub mod invoice;
pub mod item;
pub mod partner;
pub mod unit;
pub mod vat_rate;
