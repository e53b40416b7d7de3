//! Per-tenant subject fixtures.
//!
//! Each constructor captures the claim set a tenant's mock asserts about the
//! test subject, including what the provider leaves out: Twitter has no
//! email, Google/Spotify/Facebook no username, Microsoft no UPN, Apple
//! neither names nor username.

/// The subject a mock provider authenticates.
#[derive(Debug, Clone)]
pub struct SubjectFixture {
    pub auth_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

impl SubjectFixture {
    #[must_use]
    pub fn github() -> Self {
        Self {
            // Numeric on the wire; must survive as a string
            auth_id: "1234".to_string(),
            email: Some("github@example.com".to_string()),
            first_name: Some("Foo".to_string()),
            last_name: Some("Bar".to_string()),
            user_name: Some("GithubUser".to_string()),
        }
    }

    #[must_use]
    pub fn twitter() -> Self {
        Self {
            auth_id: "USERID".to_string(),
            email: None,
            first_name: Some("Foo".to_string()),
            last_name: Some("Bar".to_string()),
            user_name: Some("TwitterUser".to_string()),
        }
    }

    #[must_use]
    pub fn google() -> Self {
        Self {
            auth_id: "USERID".to_string(),
            email: Some("google@example.com".to_string()),
            first_name: Some("Foo".to_string()),
            last_name: Some("Bar".to_string()),
            user_name: None,
        }
    }

    #[must_use]
    pub fn spotify() -> Self {
        Self {
            auth_id: "USERID".to_string(),
            email: Some("spotify@example.com".to_string()),
            first_name: Some("Foo".to_string()),
            last_name: Some("Bar".to_string()),
            user_name: None,
        }
    }

    #[must_use]
    pub fn microsoft() -> Self {
        Self {
            auth_id: "USERID".to_string(),
            email: Some("microsoft@example.com".to_string()),
            first_name: Some("Foo".to_string()),
            last_name: Some("Bar".to_string()),
            // No UPN claim in the mock; the relying party falls back to
            // the email address
            user_name: None,
        }
    }

    #[must_use]
    pub fn facebook() -> Self {
        Self {
            auth_id: "USERID".to_string(),
            email: Some("facebook@example.com".to_string()),
            first_name: Some("Foo".to_string()),
            last_name: Some("Bar".to_string()),
            user_name: None,
        }
    }

    #[must_use]
    pub fn apple() -> Self {
        Self {
            auth_id: "USERID".to_string(),
            email: Some("apple@example.com".to_string()),
            first_name: None,
            last_name: None,
            user_name: None,
        }
    }

    /// Combined display name, for providers that report one field.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_joins_name_parts() {
        assert_eq!(SubjectFixture::github().display_name().unwrap(), "Foo Bar");
        assert!(SubjectFixture::apple().display_name().is_none());
    }

    #[test]
    fn twitter_has_no_email() {
        assert!(SubjectFixture::twitter().email.is_none());
    }

    #[test]
    fn microsoft_has_no_explicit_username() {
        assert!(SubjectFixture::microsoft().user_name.is_none());
    }
}
