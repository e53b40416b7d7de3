//! Test harness for `portcullis-oidc`.
//!
//! Provides in-process mock identity providers (one wiremock server per
//! tenant, configured per test, no ambient global setup), generated RSA
//! keys for ID-token signing, per-tenant subject fixtures, and a
//! redirect-following cookie client with a bounded walk and the
//! https-to-http downgrade rule used in plaintext test environments.

pub mod client;
pub mod fixtures;
pub mod keys;
pub mod provider;

pub use client::{downgrade_scheme, CookieJar, FlowClient, FlowError, FlowResponse, DEFAULT_MAX_HOPS};
pub use fixtures::SubjectFixture;
pub use keys::TestKeyPair;
pub use provider::{
    MockIdentityProvider, MockProviderConfig, TEST_APPLE_KEY_ID, TEST_APPLE_PRIVATE_KEY,
    TEST_APPLE_TEAM_ID,
};
