//! Public-key access data for the bexio API.

use std::fmt;

/// The four values that authenticate a public-key API call.
///
/// `company_id`, `user_id` and `public_key` are always present. The
/// signature is optional and never stored empty: an empty string means
/// "send no `Signature` header".
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    company_id: String,
    user_id: String,
    public_key: String,
    signature: Option<String>,
}

impl Credentials {
    pub fn new(
        company_id: impl Into<String>,
        user_id: impl Into<String>,
        public_key: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            user_id: user_id.into(),
            public_key: public_key.into(),
            signature: non_empty(signature.into()),
        }
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn set_company_id(&mut self, company_id: impl Into<String>) {
        self.company_id = company_id.into();
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn set_public_key(&mut self, public_key: impl Into<String>) {
        self.public_key = public_key.into();
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Replace the signature. An empty string clears it.
    pub fn set_signature(&mut self, signature: impl Into<String>) {
        self.signature = non_empty(signature.into());
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// The public key and signature are secrets; keep them out of logs and panics.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("company_id", &self.company_id)
            .field("user_id", &self.user_id)
            .field("public_key", &"<redacted>")
            .field("signature", &self.signature.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
