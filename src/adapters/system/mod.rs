pub mod account_manager;
pub mod command;
pub mod privilege;
pub mod service_controller;
pub mod sshd_config_file;
