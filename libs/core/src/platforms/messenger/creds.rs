use std::fmt;

/// Secrets a Messenger page integration needs.
#[derive(Clone, PartialEq, Eq)]
pub struct MessengerCredentials {
    pub app_secret: String,
    pub verify_token: String,
    pub page_access_token: String,
}

impl fmt::Debug for MessengerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessengerCredentials")
            .field("app_secret", &"<redacted>")
            .field("verify_token", &"<redacted>")
            .field("page_access_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        let creds = MessengerCredentials {
            app_secret: "s3cret".into(),
            verify_token: "tok".into(),
            page_access_token: "EAAG".into(),
        };
        let printed = format!("{creds:?}");
        assert!(!printed.contains("s3cret"));
        assert!(!printed.contains("EAAG"));
    }
}
