use std::time::Duration;

use futures::Stream;

use crate::api::{ApiClientImpl, UserIndexApi};
use crate::client::{Client, HttpClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::feed::{self, RetryPolicy};
use crate::hotwords::{self, HotWord};
use crate::models::{ContainerSet, Post, User};
use crate::resolver;

/// Which side of the follow graph to walk. The two sides are addressed by
/// different derived container tokens and never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDirection {
    Following,
    Followers,
}

/// Entry point tying resolution and the page streams together. All state
/// is per-call; concurrent use is fine as long as the transport is.
#[derive(Debug, Clone)]
pub struct Scraper<C: HttpClient> {
    api: ApiClientImpl<C>,
    retry: RetryPolicy,
}

impl Scraper<Client> {
    pub fn new() -> Result<Self> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        let client = Client::with_config(config)?;
        Ok(Self {
            api: ApiClientImpl::with_host(client, &config.mobile_api_host)?,
            retry: RetryPolicy {
                attempts: config.transport_retries,
                pause: Duration::from_secs(config.retry_pause_secs),
            },
        })
    }
}

impl<C: HttpClient> Scraper<C> {
    /// Build on a caller-supplied transport (proxied, instrumented, or a
    /// test double).
    pub fn from_client(client: C) -> Self {
        Self {
            api: ApiClientImpl::new(client),
            retry: RetryPolicy::default(),
        }
    }

    /// Screen name → account id. Exact matches only; `None` when the name
    /// does not resolve unambiguously.
    pub async fn resolve_uid(&self, name: &str) -> Result<Option<i64>> {
        resolver::resolve_uid(&self.api, name).await
    }

    /// Account id → container tokens. Unresolvable fields come back as
    /// `None`; the set is never cached.
    pub async fn resolve_containers(&self, uid: i64) -> Result<ContainerSet> {
        resolver::resolve_containers(&self.api, uid).await
    }

    /// Lazy stream over a posts container. `None` pages means run to the
    /// end of the feed.
    pub fn posts(
        &self,
        containerid: &str,
        max_pages: Option<u32>,
    ) -> impl Stream<Item = Result<Post>> + use<C> {
        feed::posts(
            self.api.clone(),
            containerid.to_string(),
            max_pages,
            self.retry,
        )
    }

    /// Same stream with each post's comment thread attached. Comment
    /// failures degrade to a missing thread, never to a dropped post.
    pub fn posts_with_comments(
        &self,
        containerid: &str,
        max_pages: Option<u32>,
    ) -> impl Stream<Item = Result<Post>> + use<C> {
        feed::posts_with_comments(
            self.api.clone(),
            containerid.to_string(),
            max_pages,
            self.retry,
        )
    }

    pub async fn posts_by_name(
        &self,
        name: &str,
        max_pages: Option<u32>,
    ) -> Result<impl Stream<Item = Result<Post>>> {
        let containerid = self.posts_container_for(name).await?;
        Ok(self.posts(&containerid, max_pages))
    }

    pub async fn posts_by_name_with_comments(
        &self,
        name: &str,
        max_pages: Option<u32>,
    ) -> Result<impl Stream<Item = Result<Post>>> {
        let containerid = self.posts_container_for(name).await?;
        Ok(self.posts_with_comments(&containerid, max_pages))
    }

    async fn posts_container_for(&self, name: &str) -> Result<String> {
        let uid = self.require_uid(name).await?;
        let containers = self.resolve_containers(uid).await?;
        containers
            .posts
            .ok_or_else(|| Error::UnresolvableContainer(format!("no posts container for `{name}`")))
    }

    async fn require_uid(&self, name: &str) -> Result<i64> {
        if name.is_empty() {
            return Err(Error::UserNotFound(name.to_string()));
        }
        self.resolve_uid(name)
            .await?
            .ok_or_else(|| Error::UserNotFound(name.to_string()))
    }

    /// Walk a follow/follower roster by its container token.
    pub fn follow_graph(
        &self,
        containerid: &str,
        max_pages: Option<u32>,
    ) -> impl Stream<Item = Result<User>> + use<C> {
        feed::follow_members(
            self.api.clone(),
            containerid.to_string(),
            max_pages,
            self.retry,
        )
    }

    pub async fn follow_graph_by_uid(
        &self,
        uid: i64,
        direction: FollowDirection,
        max_pages: Option<u32>,
    ) -> Result<impl Stream<Item = Result<User>>> {
        let containers = self.resolve_containers(uid).await?;
        let containerid = match direction {
            FollowDirection::Following => containers.following,
            FollowDirection::Followers => containers.followers,
        }
        .ok_or_else(|| {
            Error::UnresolvableContainer(format!("no {direction:?} container for uid {uid}"))
        })?;
        Ok(self.follow_graph(&containerid, max_pages))
    }

    pub async fn profile(&self, uid: i64) -> Result<Option<User>> {
        match self.api.user_index(uid).await {
            Ok(index) => Ok(index.user_info.map(User::new)),
            Err(Error::Api(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn profile_by_name(&self, name: &str) -> Result<Option<User>> {
        match self.resolve_uid(name).await? {
            Some(uid) => self.profile(uid).await,
            None => Ok(None),
        }
    }

    pub async fn hot_words(&self) -> Result<Vec<HotWord>> {
        hotwords::hot_words(&self.api).await
    }
}
