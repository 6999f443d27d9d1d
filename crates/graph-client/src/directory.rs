//! Directory lookups
//!
//! Single-page list retrievals that hydrate domain objects and wire each
//! one back to the owning session. Duplicate business keys in a response
//! are kept as-is; nothing here deduplicates or caches.

use reqwest::Method;
use tracing::debug;

use crate::error::Result;
use crate::models::{Group, Page, Profile};
use crate::session::GraphSession;
use crate::transport::Params;

impl GraphSession {
    /// Fetch the authenticated user's profile.
    pub async fn get_profile(&self) -> Result<Profile> {
        let graph = self.send(Method::GET, "/me", None).await?;
        Profile::from_graph(&graph, self.handle())
    }

    /// Fetch the groups `profile` belongs to.
    pub async fn get_groups(&self, profile: &Profile) -> Result<Vec<Group>> {
        let graph = self
            .send(Method::GET, &format!("/{}/groups", profile.id()), None)
            .await?;

        let list = graph.get_list("data")?;
        debug!("hydrating {} groups", list.len());

        list.iter()
            .map(|data| Group::from_graph(data, self.handle()))
            .collect()
    }

    /// Fetch the pages `profile` manages, including their page tokens.
    pub async fn get_pages(&self, profile: &Profile) -> Result<Vec<Page>> {
        let mut params = Params::new();
        params.insert(
            "fields".to_string(),
            "id,name,category,access_token".to_string(),
        );

        let graph = self
            .send(
                Method::GET,
                &format!("/{}/accounts", profile.id()),
                Some(params),
            )
            .await?;

        let list = graph.get_list("data")?;
        debug!("hydrating {} pages", list.len());

        list.iter()
            .map(|data| Page::from_graph(data, self.handle()))
            .collect()
    }
}
