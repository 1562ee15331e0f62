/// Contract violations raised by the core scanners.
///
/// These are programmer errors detected at the API boundary. Malformed markup is
/// never an error: the parser just reports fewer events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Cannot parse an empty document")]
    EmptyDocument,
    #[error("Cannot insert an empty pattern")]
    EmptyPattern,
    #[error("Trie must be compiled before matching")]
    NotCompiled,
    #[error("Trie is already compiled")]
    AlreadyCompiled,
}
