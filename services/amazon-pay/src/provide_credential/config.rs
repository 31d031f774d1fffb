use crate::{Config, Credential};
use log::debug;
use paysign_core::{Context, Error, ProvideCredential, Result};
use std::sync::Arc;

/// ConfigCredentialProvider loads the key pair named by a [`Config`].
///
/// `private_key` takes precedence over `private_key_path`. Returns `None` if
/// the config has no public key id or no key at all.
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new `ConfigCredentialProvider` instance.
    pub fn new(cfg: Arc<Config>) -> Self {
        Self { config: cfg }
    }

    fn load_pem(&self, ctx: &Context) -> Result<Option<String>> {
        if let Some(pem) = self.config.private_key.as_ref().filter(|v| !v.is_empty()) {
            return Ok(Some(pem.clone()));
        }
        let Some(path) = self
            .config
            .private_key_path
            .as_deref()
            .filter(|v| !v.is_empty())
        else {
            return Ok(None);
        };

        let path = ctx.expand_home_dir(path).ok_or_else(|| {
            Error::credential_invalid(format!(
                "private key path {path} needs a home dir but none was found"
            ))
        })?;
        debug!("loading private key from {path}");
        let pem = ctx.file_read_as_string(&path).map_err(|e| {
            Error::credential_invalid(format!("failed to read private key from {path}"))
                .with_source(e)
        })?;
        Ok(Some(pem))
    }
}

impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(public_key_id) = self.config.public_key_id.as_ref().filter(|v| !v.is_empty())
        else {
            return Ok(None);
        };
        let Some(pem) = self.load_pem(ctx)? else {
            return Ok(None);
        };

        Credential::from_pem(public_key_id, &pem).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysign_core::StaticEnv;
    use paysign_file_read_std::StdFileRead;
    use std::collections::HashMap;
    use std::io::Write;

    const PRIVATE_KEY: &str = include_str!("../../testdata/private_key.pem");

    #[test]
    fn test_inline_key() {
        let provider = ConfigCredentialProvider::new(Arc::new(Config {
            public_key_id: Some("AGPLVMDL3RNVV3X7MM3YUZ2V".to_string()),
            private_key: Some(PRIVATE_KEY.to_string()),
            private_key_path: Some("/ignored".to_string()),
            ..Default::default()
        }));

        let cred = provider
            .provide_credential(&Context::new())
            .unwrap()
            .unwrap();
        assert_eq!(cred.public_key_id, "AGPLVMDL3RNVV3X7MM3YUZ2V");
    }

    #[test]
    fn test_key_file_in_home_dir() {
        let home = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(home.path().join("private.pem")).unwrap();
        f.write_all(PRIVATE_KEY.as_bytes()).unwrap();

        let ctx = Context::new()
            .with_file_read(StdFileRead)
            .with_env(StaticEnv {
                home_dir: Some(home.path().to_path_buf()),
                envs: HashMap::new(),
            });
        let provider = ConfigCredentialProvider::new(Arc::new(Config {
            public_key_id: Some("AGPLVMDL3RNVV3X7MM3YUZ2V".to_string()),
            private_key_path: Some("~/private.pem".to_string()),
            ..Default::default()
        }));

        assert!(provider.provide_credential(&ctx).unwrap().is_some());
    }

    #[test]
    fn test_missing_key_file() {
        let ctx = Context::new().with_file_read(StdFileRead);
        let provider = ConfigCredentialProvider::new(Arc::new(Config {
            public_key_id: Some("AGPLVMDL3RNVV3X7MM3YUZ2V".to_string()),
            private_key_path: Some("/definitely/not/here.pem".to_string()),
            ..Default::default()
        }));

        let err = provider.provide_credential(&ctx).unwrap_err();
        assert!(err.is_credential_error());
    }

    #[test]
    fn test_nothing_configured() {
        let provider = ConfigCredentialProvider::new(Arc::new(Config::default()));
        assert!(provider
            .provide_credential(&Context::new())
            .unwrap()
            .is_none());
    }
}
