//! Signing Session Context
//!
//! Request inputs (path, digest) and the output slot for one signing
//! operation. The command layer fills in the request, hands the context to
//! [`sign_message`](crate::signing::sign_message) and reads the signature
//! back. Callers serialize access; a context is never shared between
//! in-flight operations.

use crate::crypto::path::DerivationPath;
use crate::signing::Signature;

#[derive(Debug, Clone)]
pub struct SessionContext {
    path: DerivationPath,
    digest: [u8; 32],
    signature: Option<Signature>,
}

impl SessionContext {
    pub fn new(path: DerivationPath, digest: [u8; 32]) -> Self {
        Self {
            path,
            digest,
            signature: None,
        }
    }

    /// Start a new request, clearing any previous signature.
    pub fn reset(&mut self, path: DerivationPath, digest: [u8; 32]) {
        self.path = path;
        self.digest = digest;
        self.signature = None;
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Signature from the last successful `sign_message`, if any
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub(crate) fn set_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }
}
