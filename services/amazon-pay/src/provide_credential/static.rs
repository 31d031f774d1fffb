use crate::Credential;
use paysign_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides a key pair known up front.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider from a public key id and a PEM
    /// encoded private key.
    ///
    /// The key is parsed right away, so an invalid key is reported here.
    pub fn new(public_key_id: &str, private_key_pem: &str) -> Result<Self> {
        Ok(Self {
            credential: Credential::from_pem(public_key_id, private_key_pem)?,
        })
    }

    /// Create a new StaticCredentialProvider from an already parsed credential.
    pub fn from_credential(credential: Credential) -> Self {
        Self { credential }
    }
}

impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}
