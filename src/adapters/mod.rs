pub mod fetch;
pub mod key_stores;
pub mod system;
