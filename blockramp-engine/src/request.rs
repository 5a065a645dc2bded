//! Minimal per-request context.
//!
//! Only the fields the decision function needs: URL path, admin flag, the
//! `post` and `post_type` query parameters, and the host's admin root
//! prefix. Everything else about the host request lifecycle stays with the
//! host.

use blockramp_types::PostId;

/// Snapshot of the current HTTP request, supplied by the host.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// URL path of the request, e.g. `/wp-admin/post.php`.
    pub path: String,
    /// Whether this is an admin request (as opposed to front-end).
    pub is_admin: bool,
    /// Raw `post` query parameter, if present.
    pub post: Option<String>,
    /// Raw `post_type` query parameter, if present.
    pub post_type: Option<String>,
    /// Admin root path prefix, e.g. `wp-admin`.
    pub admin_root: String,
}

impl RequestContext {
    /// Creates a context with no query parameters.
    #[must_use]
    pub fn new(path: &str, is_admin: bool, admin_root: &str) -> Self {
        Self {
            path: path.to_string(),
            is_admin,
            post: None,
            post_type: None,
            admin_root: admin_root.to_string(),
        }
    }

    /// Sets the raw `post` query parameter.
    #[must_use]
    pub fn with_post(mut self, raw: &str) -> Self {
        self.post = Some(raw.to_string());
        self
    }

    /// Sets the raw `post_type` query parameter.
    #[must_use]
    pub fn with_post_type(mut self, raw: &str) -> Self {
        self.post_type = Some(raw.to_string());
        self
    }

    /// Resolves the request's post id. Absent, non-numeric or non-positive
    /// values all mean "no post".
    #[must_use]
    pub fn post_id(&self) -> Option<PostId> {
        self.post.as_deref().and_then(PostId::parse)
    }

    /// Whether the request path is one of the given admin screens.
    ///
    /// Empty screen names are skipped so a bare admin root never matches.
    #[must_use]
    pub fn matches_screen(&self, screens: &[String]) -> bool {
        let root = self.admin_root.trim_matches('/');
        screens
            .iter()
            .filter(|screen| !screen.is_empty())
            .any(|screen| self.path == format!("/{root}/{screen}"))
    }
}
