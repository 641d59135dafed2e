//! Permission command for inspecting and changing usage access.

use anyhow::Result;
use clap::Subcommand;
use ut_core::PermissionGate;

use crate::Config;
use crate::permission::MarkerPermission;

/// Usage access actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum PermissionAction {
    /// Show whether usage access is granted.
    Status,
    /// Ask for usage access. Returns immediately; check `status` afterwards.
    Request,
    /// Grant usage access.
    Grant,
    /// Revoke usage access.
    Revoke,
}

pub fn run(action: PermissionAction, config: &Config) -> Result<()> {
    let gate = MarkerPermission::new(&config.permission_marker);
    match action {
        PermissionAction::Status => {
            println!("{}", status_line(gate.has_permission()));
        }
        PermissionAction::Request => gate.request_permission(),
        PermissionAction::Grant => {
            gate.grant()?;
            println!("{}", status_line(true));
        }
        PermissionAction::Revoke => {
            gate.revoke()?;
            println!("{}", status_line(false));
        }
    }
    Ok(())
}

const fn status_line(granted: bool) -> &'static str {
    if granted {
        "usage access: granted"
    } else {
        "usage access: not granted"
    }
}
