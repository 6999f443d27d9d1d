//! Feed publish workflow
//!
//! Request parameters are assembled in independent steps — message, link
//! attachment, tags/place — so each business rule stands on its own. The
//! tagged-post rule is enforced here, before any request goes out.

use reqwest::Method;
use tracing::info;

use crate::error::{GraphError, Result};
use crate::models::{Feed, Link, Post};
use crate::session::GraphSession;
use crate::transport::Params;

/// Link attachment parameters. Absent fields are omitted.
pub(crate) fn link_params(link: &Link, params: &mut Params) {
    let fields = [
        ("link", &link.url),
        ("picture", &link.picture),
        ("name", &link.name),
        ("caption", &link.caption),
        ("description", &link.description),
    ];

    for (key, value) in fields {
        if let Some(value) = value {
            params.insert(key.to_string(), value.clone());
        }
    }
}

/// Tag and place parameters. A tagged post must carry a location.
pub(crate) fn tag_params(post: &Post, params: &mut Params) -> Result<()> {
    if post.tags().is_empty() {
        return Ok(());
    }

    let Some(place) = post.place() else {
        return Err(GraphError::Validation(
            "a location must be set for a tagged post".to_string(),
        ));
    };

    params.insert("place".to_string(), place.to_string());
    params.insert("tags".to_string(), post.tags().join(","));
    Ok(())
}

/// Assemble the full `/feed` parameter set for `post`.
pub(crate) fn feed_params(post: &Post, extra: Option<Params>) -> Result<Params> {
    let mut params = extra.unwrap_or_default();
    params.insert("message".to_string(), post.message().to_string());

    if let Some(link) = post.link() {
        link_params(link, &mut params);
    }
    tag_params(post, &mut params)?;

    Ok(params)
}

impl GraphSession {
    /// Publish `post` to `target`'s feed.
    ///
    /// The returned post carries the server-assigned id; it is set only
    /// after a successful response, so a failed dispatch propagates with no
    /// partial mutation. Extra parameters are merged under the post's own.
    pub async fn publish<F>(&self, target: &F, mut post: Post, extra: Option<Params>) -> Result<Post>
    where
        F: Feed + ?Sized,
    {
        let params = feed_params(&post, extra)?;

        let graph = self
            .send(Method::POST, &format!("/{}/feed", target.id()), Some(params))
            .await?;

        let id = graph.require_str("id")?;
        info!("published post {} to feed {}", id, target.id());

        post.set_id(id);
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::models::Profile;
    use crate::testing::MockTransport;
    use serde_json::json;

    fn validated_session() -> (GraphSession, MockTransport) {
        let mock = MockTransport::new();
        let config = GraphConfig::new("433974716778616", "s3cr3t", "http://localhost/callback");
        let session = GraphSession::with_transport(config, Box::new(mock.clone())).unwrap();
        (session, mock)
    }

    async fn bind_token(session: &GraphSession, mock: &MockTransport) {
        mock.push_ok(json!({"id": "1000"}));
        assert!(session.validate("valid-token").await);
        mock.clear_requests();
    }

    #[test]
    fn test_link_params_omit_absent_fields() {
        let link = Link::new("http://example.com").caption("Cap");
        let mut params = Params::new();
        link_params(&link, &mut params);

        assert_eq!(params["link"], "http://example.com");
        assert_eq!(params["caption"], "Cap");
        assert!(!params.contains_key("picture"));
        assert!(!params.contains_key("name"));
        assert!(!params.contains_key("description"));
    }

    #[test]
    fn test_tag_params_require_place() {
        let mut post = Post::new("hello");
        post.add_tag_id("friend-1");

        let mut params = Params::new();
        let err = tag_params(&post, &mut params).unwrap_err();
        assert!(matches!(err, GraphError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "a location must be set for a tagged post"
        );

        post.set_place("place-1");
        tag_params(&post, &mut params).unwrap();
        assert_eq!(params["place"], "place-1");
        assert_eq!(params["tags"], "friend-1");
    }

    #[test]
    fn test_tag_params_join_in_insertion_order() {
        let mut post = Post::new("hello");
        post.add_tag_id("b");
        post.add_tag_id("a");
        post.add_tag_id("b");
        post.set_place("place-1");

        let mut params = Params::new();
        tag_params(&post, &mut params).unwrap();
        assert_eq!(params["tags"], "b,a");
    }

    #[test]
    fn test_untagged_post_gets_no_tag_or_place_params() {
        let mut post = Post::new("hello");
        post.set_link(Link::new("http://example.com"));
        post.set_place("place-1");

        let params = feed_params(&post, None).unwrap();
        assert_eq!(params["message"], "hello");
        assert_eq!(params["link"], "http://example.com");
        assert!(!params.contains_key("tags"));
        assert!(!params.contains_key("place"));
    }

    #[test]
    fn test_feed_params_merge_extras_under_post_fields() {
        let post = Post::new("hello");

        let mut extra = Params::new();
        extra.insert("privacy".to_string(), "EVERYONE".to_string());
        extra.insert("message".to_string(), "overridden".to_string());

        let params = feed_params(&post, Some(extra)).unwrap();
        assert_eq!(params["privacy"], "EVERYONE");
        assert_eq!(params["message"], "hello");
    }

    #[tokio::test]
    async fn test_tagged_post_without_place_issues_no_request() {
        let (session, mock) = validated_session();
        bind_token(&session, &mock).await;

        let mut post = Post::new("hello");
        post.add_tag_id("friend-1");

        let err = session
            .publish(&Profile::new("1000"), post, None)
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::Validation(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_publish_assigns_server_id() {
        let (session, mock) = validated_session();
        bind_token(&session, &mock).await;
        mock.push_ok(json!({"id": "1000_2000"}));

        let post = session
            .publish(&Profile::new("1000"), Post::new("Testing the app"), None)
            .await
            .unwrap();

        assert_eq!(post.id(), Some("1000_2000"));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/1000/feed");
        assert_eq!(requests[0].params["message"], "Testing the app");
    }

    #[tokio::test]
    async fn test_publish_sends_tags_and_place() {
        let (session, mock) = validated_session();
        bind_token(&session, &mock).await;
        mock.push_ok(json!({"id": "1000_2000"}));

        let mut post = Post::new("Testing the app");
        post.add_tag(&Profile::new("friend-1"));
        post.add_tag(&Profile::new("friend-2"));
        post.set_place("place-1");

        session
            .publish(&Profile::new("1000"), post, None)
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].params["tags"], "friend-1,friend-2");
        assert_eq!(requests[0].params["place"], "place-1");
    }

    #[tokio::test]
    async fn test_publish_propagates_api_failure_unchanged() {
        let (session, mock) = validated_session();
        bind_token(&session, &mock).await;
        mock.push_err(GraphError::Api {
            status: 403,
            message: "(#200) Permissions error".to_string(),
        });

        let err = session
            .publish(&Profile::new("1000"), Post::new("hello"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_publish_through_feed_trait() {
        let (session, mock) = validated_session();
        bind_token(&session, &mock).await;
        mock.push_ok(json!({"id": "me"}));

        let profile = session.get_profile().await.unwrap();
        mock.clear_requests();
        mock.push_ok(json!({"id": "me_42"}));

        let post = profile.publish(Post::new("via the trait")).await.unwrap();
        assert_eq!(post.id(), Some("me_42"));
        assert_eq!(mock.requests()[0].path, "/me/feed");
    }
}
