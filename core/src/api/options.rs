/// Engine-level switches.
///
/// Both default to on. Turning either off never changes a result, only how
/// it is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Fold constant subexpressions into literals at compile time.
    pub optimizer: bool,
    /// Evaluate through compiled bytecode after the first `calc()`. When off,
    /// every `calc()` re-parses the formula.
    pub bytecode: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            optimizer: true,
            bytecode: true,
        }
    }
}
