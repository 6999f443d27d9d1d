//! Graph domain model
//!
//! Posts are assembled by the caller and published to anything that
//! implements `Feed`. Profiles, pages and groups come back from directory
//! lookups already wired to the session that produced them; they are plain
//! values, created fresh on every lookup.

use async_trait::async_trait;

use crate::error::Result;
use crate::graph::GraphObject;
use crate::session::SessionHandle;

/// A link attachment for a post.
///
/// All fields are optional; absent ones are omitted from the publish
/// request.
#[derive(Debug, Clone, Default)]
pub struct Link {
    pub url: Option<String>,
    pub picture: Option<String>,
    pub name: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A feed post.
///
/// Assembled by the caller, finalized by a successful publish, which
/// assigns the server id. A tagged post must also carry a place, checked
/// when the publish request is composed.
#[derive(Debug, Clone)]
pub struct Post {
    message: String,
    link: Option<Link>,
    tags: Vec<String>,
    place: Option<String>,
    id: Option<String>,
}

impl Post {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            link: None,
            tags: Vec::new(),
            place: None,
            id: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_link(&mut self, link: Link) {
        self.link = Some(link);
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    /// Tag an entity. Tagging the same identity twice is a no-op; insertion
    /// order is preserved.
    pub fn add_tag(&mut self, entity: &dyn Feed) {
        self.add_tag_id(entity.id());
    }

    /// Tag by raw identifier.
    pub fn add_tag_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.tags.contains(&id) {
            self.tags.push(id);
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn set_place(&mut self, place: impl Into<String>) {
        self.place = Some(place.into());
    }

    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    /// Server-assigned identifier; absent until published.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Anything with a stable Graph identifier that accepts published posts.
///
/// `Profile`, `Page` and `Group` all qualify.
#[async_trait]
pub trait Feed: Send + Sync {
    /// Stable Graph identifier.
    fn id(&self) -> &str;

    /// Handle to the session that produced this entity.
    fn session(&self) -> &SessionHandle;

    /// Publish `post` to this feed through the owning session.
    async fn publish(&self, post: Post) -> Result<Post> {
        let session = self.session().upgrade()?;
        session.publish(self, post, None).await
    }
}

/// A user profile.
#[derive(Debug, Clone)]
pub struct Profile {
    id: String,
    name: Option<String>,
    link: Option<String>,
    locale: Option<String>,
    session: SessionHandle,
}

impl Profile {
    /// Reference an existing profile by id, e.g. a friend to tag.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            link: None,
            locale: None,
            session: SessionHandle::detached(),
        }
    }

    pub(crate) fn from_graph(graph: &GraphObject, session: SessionHandle) -> Result<Self> {
        Ok(Self {
            id: graph.require_str("id")?,
            name: graph.get_str("name").map(str::to_string),
            link: graph.get_str("link").map(str::to_string),
            locale: graph.get_str("locale").map(str::to_string),
            session,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl Feed for Profile {
    fn id(&self) -> &str {
        &self.id
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

/// A group the user belongs to.
#[derive(Debug, Clone)]
pub struct Group {
    id: String,
    name: Option<String>,
    admin: bool,
    session: SessionHandle,
}

impl Group {
    pub(crate) fn from_graph(graph: &GraphObject, session: SessionHandle) -> Result<Self> {
        Ok(Self {
            id: graph.require_str("id")?,
            name: graph.get_str("name").map(str::to_string),
            admin: graph.get_bool("administrator").unwrap_or(false),
            session,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the session's user administers this group.
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

impl Feed for Group {
    fn id(&self) -> &str {
        &self.id
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

/// A page the user manages.
#[derive(Debug, Clone)]
pub struct Page {
    id: String,
    name: Option<String>,
    category: Option<String>,
    access_token: Option<String>,
    session: SessionHandle,
}

impl Page {
    pub(crate) fn from_graph(graph: &GraphObject, session: SessionHandle) -> Result<Self> {
        Ok(Self {
            id: graph.require_str("id")?,
            name: graph.get_str("name").map(str::to_string),
            category: graph.get_str("category").map(str::to_string),
            access_token: graph.get_str("access_token").map(str::to_string),
            session,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Page-scoped access token, distinct from the user session token.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl Feed for Page {
    fn id(&self) -> &str {
        &self.id
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}
