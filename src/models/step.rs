use std::fmt;

use super::identity::WalletRole;

/// The four ordered phases of a migration. Exactly one is current per
/// session, and the current step only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum MigrationStep {
    ApproveATokens = 1,
    ApproveDebtPositions = 2,
    TransferTokens = 3,
    Complete = 4,
}

impl MigrationStep {
    pub const FIRST: MigrationStep = MigrationStep::ApproveATokens;

    /// The step after this one. `Complete` is terminal and returns itself.
    pub fn next(self) -> MigrationStep {
        match self {
            MigrationStep::ApproveATokens => MigrationStep::ApproveDebtPositions,
            MigrationStep::ApproveDebtPositions => MigrationStep::TransferTokens,
            MigrationStep::TransferTokens => MigrationStep::Complete,
            MigrationStep::Complete => MigrationStep::Complete,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Which wallet must be connected for this step's action. This is the
    /// single place the step-to-role mapping lives.
    ///
    /// The source wallet approves its own collateral; the recipient wallet
    /// approves the credit delegation for the incoming debt and then
    /// executes the transfer of the already-approved positions. `Complete`
    /// has no action and therefore no required role.
    pub fn required_role(self) -> Option<WalletRole> {
        match self {
            MigrationStep::ApproveATokens => Some(WalletRole::Source),
            MigrationStep::ApproveDebtPositions => Some(WalletRole::Recipient),
            MigrationStep::TransferTokens => Some(WalletRole::Recipient),
            MigrationStep::Complete => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MigrationStep::ApproveATokens => "approve aTokens",
            MigrationStep::ApproveDebtPositions => "approve debt positions",
            MigrationStep::TransferTokens => "transfer tokens",
            MigrationStep::Complete => "complete",
        }
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_advance_in_order_and_complete_is_terminal() {
        let mut step = MigrationStep::FIRST;
        let mut seen = vec![step.number()];
        for _ in 0..5 {
            step = step.next();
            seen.push(step.number());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 4, 4]);
    }

    #[test]
    fn step_numbers_stay_in_range() {
        let mut step = MigrationStep::FIRST;
        for _ in 0..10 {
            assert!((1..=4).contains(&step.number()));
            step = step.next();
        }
    }

    #[test]
    fn role_table_is_explicit() {
        assert_eq!(
            MigrationStep::ApproveATokens.required_role(),
            Some(WalletRole::Source)
        );
        assert_eq!(
            MigrationStep::ApproveDebtPositions.required_role(),
            Some(WalletRole::Recipient)
        );
        assert_eq!(
            MigrationStep::TransferTokens.required_role(),
            Some(WalletRole::Recipient)
        );
        assert_eq!(MigrationStep::Complete.required_role(), None);
    }
}
