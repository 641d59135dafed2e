//! Usage access permission.
//!
//! The engine never consults these; callers check access before querying.

/// Grants or denies access to usage data.
pub trait PermissionGate {
    /// Whether usage access is currently granted.
    fn has_permission(&self) -> bool;

    /// Asks for usage access.
    ///
    /// Fire-and-forget: there is no completion signal and no guarantee that
    /// access will be granted. Callers re-check [`Self::has_permission`] later.
    fn request_permission(&self);
}

/// Identifies the platform the engine runs on, as `"<os> <arch>"`.
pub fn platform_version() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}
