//! graph-client: social graph API client facade
//!
//! Authenticates a user session with an OAuth-style access token, assembles
//! posts, links and tags into Graph API requests, and hydrates typed domain
//! objects back out of the generic JSON responses.
//!
//! ```no_run
//! use graph_client::{GraphConfig, GraphSession, Link, Post, Profile};
//!
//! # async fn demo() -> graph_client::Result<()> {
//! let config = GraphConfig::load()?;
//! let session = GraphSession::new(config)?;
//!
//! if !session.validate("user-access-token").await {
//!     println!("log in at {}", session.login_url()?);
//!     return Ok(());
//! }
//!
//! let mut post = Post::new("Testing the app");
//! post.set_link(Link::new("http://example.com").name("Example"));
//! post.add_tag(&Profile::new("friend-id"));
//! post.set_place("place-id");
//!
//! let profile = session.get_profile().await?;
//! let post = session.publish(&profile, post, None).await?;
//! println!("published {}", post.id().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod session;
pub mod transport;

mod directory;
mod publish;

#[cfg(test)]
pub(crate) mod testing;

pub use config::GraphConfig;
pub use error::{GraphError, Result};
pub use graph::GraphObject;
pub use models::{Feed, Group, Link, Page, Post, Profile};
pub use session::{AccessToken, GraphSession, SessionHandle};
pub use transport::{GRAPH_API_URL, HttpTransport, Params, Transport};
