//! Post registry collaborator.
//!
//! The host CMS owns post-type registration; the core only needs a lookup
//! from post id to post type and the supported/public type sets.

use blockramp_types::{PostId, PostTypeSlug};
use std::collections::{BTreeMap, BTreeSet};

/// Read-only view of the host's post and post-type registry.
pub trait PostRegistry {
    /// Resolves the post type of an existing post, `None` for unknown ids.
    fn post_type_of(&self, id: PostId) -> Option<PostTypeSlug>;

    /// Post types that can host the block editor: those with an editor UI
    /// and REST visibility.
    fn supported_post_types(&self) -> BTreeSet<PostTypeSlug>;

    /// All public, non-builtin post types.
    fn public_post_types(&self) -> BTreeSet<PostTypeSlug>;

    /// Public post types that cannot host the block editor.
    fn unsupported_post_types(&self) -> BTreeSet<PostTypeSlug> {
        let public = self.public_post_types();
        let supported = self.supported_post_types();
        public.difference(&supported).cloned().collect()
    }
}

/// Fixed registry for tests and embedders whose type set is known up front.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    posts: BTreeMap<PostId, PostTypeSlug>,
    supported: BTreeSet<PostTypeSlug>,
    public: BTreeSet<PostTypeSlug>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a post type as supported (it is implicitly public too).
    #[must_use]
    pub fn with_supported(mut self, slug: PostTypeSlug) -> Self {
        self.public.insert(slug.clone());
        self.supported.insert(slug);
        self
    }

    /// Registers a public post type without editor support.
    #[must_use]
    pub fn with_public(mut self, slug: PostTypeSlug) -> Self {
        self.public.insert(slug);
        self
    }

    /// Registers an existing post and its type.
    #[must_use]
    pub fn with_post(mut self, id: PostId, slug: PostTypeSlug) -> Self {
        self.posts.insert(id, slug);
        self
    }
}

impl PostRegistry for StaticRegistry {
    fn post_type_of(&self, id: PostId) -> Option<PostTypeSlug> {
        self.posts.get(&id).cloned()
    }

    fn supported_post_types(&self) -> BTreeSet<PostTypeSlug> {
        self.supported.clone()
    }

    fn public_post_types(&self) -> BTreeSet<PostTypeSlug> {
        self.public.clone()
    }
}
