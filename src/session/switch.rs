/// State of the wallet-switch confirmation surface.
///
/// The prompt has exactly two outbound transitions, both driven by the
/// session: disconnect the current identity (prompt stays open) and
/// connect the recipient (prompt closes on success). Non-dismissibility is
/// a protocol invariant: there is no third transition, so incidental
/// dismissal gestures cannot close it.
#[derive(Debug, Clone, Default)]
pub struct SwitchPrompt {
    open: bool,
}

impl SwitchPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the prompt. Idempotent.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// An incidental dismissal gesture (escape, backdrop click). Has no
    /// effect on the prompt state; returns whether the prompt closed,
    /// which is always `false`.
    pub fn dismiss(&mut self) -> bool {
        false
    }

    /// Close the prompt. Reached only through a successful recipient
    /// connect, which is why this is not part of the public surface.
    pub(crate) fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissal_never_closes_an_open_prompt() {
        let mut prompt = SwitchPrompt::new();
        prompt.open();
        for _ in 0..3 {
            assert!(!prompt.dismiss());
            assert!(prompt.is_open());
        }
    }

    #[test]
    fn only_close_ends_the_prompt() {
        let mut prompt = SwitchPrompt::new();
        assert!(!prompt.is_open());
        prompt.open();
        prompt.open();
        assert!(prompt.is_open());
        prompt.close();
        assert!(!prompt.is_open());
    }
}
