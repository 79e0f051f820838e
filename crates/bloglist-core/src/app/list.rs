//! In-memory post collection and its presentation order.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::models::{Post, Session};

/// The authoritative post collection plus per-post expand state.
#[derive(Debug, Clone, Default)]
pub struct PostList {
    posts: Vec<Post>,
    /// Post id -> expanded. Absent means collapsed.
    expanded: HashMap<String, bool>,
}

impl PostList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection with a fresh server listing.
    ///
    /// Expand state survives only for ids still present.
    pub fn replace_all(&mut self, posts: Vec<Post>) {
        self.expanded
            .retain(|id, _| posts.iter().any(|post| post.id == *id));
        self.posts = posts;
    }

    /// Replaces the post with the same id. Returns false if none matched.
    pub fn replace(&mut self, updated: Post) -> bool {
        match self.posts.iter_mut().find(|post| post.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn remove(&mut self, id: &str) -> Option<Post> {
        let index = self.posts.iter().position(|post| post.id == id)?;
        self.expanded.remove(id);
        Some(self.posts.remove(index))
    }

    pub fn clear(&mut self) {
        self.posts.clear();
        self.expanded.clear();
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Posts in insertion (server) order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Posts in display order: most likes first, ties in insertion order.
    pub fn sorted(&self) -> Vec<&Post> {
        let mut sorted: Vec<&Post> = self.posts.iter().collect();
        // sort_by_key is stable
        sorted.sort_by_key(|post| Reverse(post.likes()));
        sorted
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Flips one post's expand state. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let entry = self.expanded.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }
}

/// Returns true if `user` created `post`.
///
/// Both ids must be present; they are compared as strings.
pub fn is_owner(post: &Post, user: Option<&Session>) -> bool {
    let Some(owner_id) = post.owner_id() else {
        return false;
    };
    user.and_then(Session::user_id)
        .is_some_and(|user_id| user_id == owner_id)
}

/// Which mutating controls a post shows to the current viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostControls {
    pub like: bool,
    pub remove: bool,
}

impl PostControls {
    /// Anonymous viewers get no controls; the remove control additionally
    /// requires ownership.
    pub fn for_viewer(post: &Post, user: Option<&Session>) -> Self {
        let logged_in = user.is_some_and(Session::has_token);
        Self {
            like: logged_in,
            remove: logged_in && is_owner(post, user),
        }
    }
}
