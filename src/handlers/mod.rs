pub mod bill;
pub mod bill_record;
pub mod invoice;
pub mod invoice_record;
pub mod item;
pub mod partner;
pub mod stock;
pub mod unit;
pub mod vat_rate;
