/// Metadata about an incoming request against the bill store.
///
/// Contains the request identifier and the optional principal. A request
/// without a principal comes from an unauthenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// Authenticated principal, if any
    pub principal: Option<Principal>,
}

impl RequestMeta {
    /// Creates request metadata for an authenticated caller.
    pub fn authenticated(request_id: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            principal: Some(Principal::new(uid)),
        }
    }

    /// Creates request metadata for a caller with no credentials.
    pub fn unauthenticated(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            principal: None,
        }
    }

    /// Returns the principal only if it is actually authenticated.
    ///
    /// A principal carrying an empty id is treated the same as no principal.
    pub fn authenticated_principal(&self) -> Option<&Principal> {
        self.principal.as_ref().filter(|p| p.is_authenticated())
    }
}

/// An identity issued by the external auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    /// Unique identifier (the auth provider's uid)
    pub id: String,
}

impl Principal {
    /// Creates a principal from an auth uid.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// An empty uid signals an unauthenticated caller.
    pub fn is_authenticated(&self) -> bool {
        !self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_uid_is_not_authenticated() {
        assert!(!Principal::new("").is_authenticated());
        assert!(Principal::new("alice").is_authenticated());
    }

    #[test]
    fn authenticated_principal_filters_empty_uid() {
        let meta = RequestMeta::authenticated("req-1", "");
        assert!(meta.principal.is_some());
        assert!(meta.authenticated_principal().is_none());

        let meta = RequestMeta::authenticated("req-2", "alice");
        assert_eq!(meta.authenticated_principal().map(|p| p.id.as_str()), Some("alice"));
    }

    #[test]
    fn unauthenticated_meta_has_no_principal() {
        let meta = RequestMeta::unauthenticated("req-anon");
        assert_eq!(meta.request_id, "req-anon");
        assert!(meta.authenticated_principal().is_none());
    }
}
