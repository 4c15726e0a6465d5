use crate::communication::CommunicationError;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Non-recoverable: {0:?}")]
    NonRecoverable(anyhow::Error),
    #[error("Rotator did not answer: {0:?}")]
    Unresponsive(anyhow::Error),
}

impl From<CommunicationError> for GeneratorError {
    fn from(e: CommunicationError) -> Self {
        match e {
            CommunicationError::TimedOut => GeneratorError::Unresponsive(e.into()),
            CommunicationError::Io(_) | CommunicationError::Port(_) => {
                GeneratorError::NonRecoverable(e.into())
            }
        }
    }
}

impl From<std::io::Error> for GeneratorError {
    fn from(e: std::io::Error) -> Self {
        GeneratorError::NonRecoverable(e.into())
    }
}
