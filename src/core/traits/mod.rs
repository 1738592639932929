pub mod account;
pub mod config_patcher;
pub mod fetcher;
pub mod key_store;
pub mod service;
