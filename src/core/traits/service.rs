use crate::core::errors::Result;

/// Port for restarting the SSH daemon.
pub trait ServiceController: Send + Sync {
    /// Restart the first unit in `units` that accepts the restart, falling
    /// back to the init system's generic service command. Returns a
    /// description of what was restarted.
    fn restart(&self, units: &[String]) -> Result<String>;
}
