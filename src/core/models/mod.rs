pub mod authorized_keys;
pub mod key_type;
pub mod provision_report;
