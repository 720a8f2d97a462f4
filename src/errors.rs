use thiserror::Error;

/// Every pipeline stage raises; nothing downgrades to a warning except the
/// template pruning in `scaffold`, which is best-effort by contract.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("missing credential: {0}")] MissingCredential(String),
    #[error("retrieval failed: {0}")] Retrieval(String),
    #[error("generation failed: {0}")] Generation(String),
    #[error("malformed model response: {0}")] MalformedResponse(ParseFailure),
    #[error("scaffold failed: {0}")] Scaffold(String),
    #[error("dependency install failed: {0}")] DependencyInstall(String),
}

/// Named failure states of the response scanner, one per parsing step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no fenced code block in response")] MissingOpeningFence,
    #[error("fenced code block is not terminated")] MissingClosingFence,
    #[error("fenced code block is empty")] EmptyBlock,
    #[error("no class declaration in code block")] MissingClassMarker,
    #[error("class declaration carries no name")] EmptyClassName,
}

impl From<ParseFailure> for ForgeError {
    fn from(f: ParseFailure) -> Self {
        ForgeError::MalformedResponse(f)
    }
}
