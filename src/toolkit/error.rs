use thiserror::Error;

/// Errors raised at the boundary with the external modeling toolkit.
#[derive(Debug, Error)]
pub enum Error {
    /// The toolkit executable could not be started.
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Communication with a running toolkit process failed.
    #[error("I/O error while talking to '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The toolkit process exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The SMILES could not be parsed or embedded in 3D.
    #[error("failed to embed '{smiles}': {detail}")]
    Embed { smiles: String, detail: String },

    /// Conformer generation produced no usable output.
    #[error("conformer generation failed: {0}")]
    Conformers(String),

    /// The toolkit's structure output could not be read.
    #[error("could not read toolkit output: {0}")]
    Output(#[from] crate::io::Error),

    /// The call observed its cancellation token and stopped the toolkit.
    #[error("toolkit call cancelled")]
    Cancelled,
}

impl Error {
    pub fn embed(smiles: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Embed {
            smiles: smiles.into(),
            detail: detail.into(),
        }
    }

    pub fn conformers(detail: impl Into<String>) -> Self {
        Self::Conformers(detail.into())
    }
}
