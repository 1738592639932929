pub mod key_merger;
pub mod provisioner;
pub mod source_resolver;
pub mod sshd_hardener;
