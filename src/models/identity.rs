use std::fmt;

use alloy_primitives::Address;

/// The role a connected wallet plays in the migration. Set explicitly at
/// bind time and checked against the current step before any step action
/// is permitted; never inferred from which step happens to be current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletRole {
    /// Holds the positions being migrated; approves and exposes them.
    Source,
    /// Receives the positions; accepts the delegated credit.
    Recipient,
}

impl fmt::Display for WalletRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletRole::Source => f.write_str("source"),
            WalletRole::Recipient => f.write_str("recipient"),
        }
    }
}

/// The currently connected signing identity. At most one binding exists at
/// any instant; the session holds `Option<IdentityBinding>` and `None`
/// means disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityBinding {
    pub role: WalletRole,
    pub account: Address,
}

impl IdentityBinding {
    pub fn new(role: WalletRole, account: Address) -> Self {
        Self { role, account }
    }
}
