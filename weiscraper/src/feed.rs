use std::future::Future;
use std::time::Duration;

use futures::stream::{self, Stream, TryStreamExt};
use log::{debug, error, warn};
use serde_json::Value;
use tokio::time::sleep;

use crate::api::{ApiClientImpl, CommentsApi, SecondApi, StatusesApi};
use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::models::{Post, User};

/// Card name the posts feed answers with instead of content when it has
/// nothing further.
const NO_POSTS_SENTINEL: &str = "暂无微博";

#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    /// Same-page retries after a transport gap before the stream gives up.
    pub attempts: u32,
    pub pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            pause: Duration::from_secs(1),
        }
    }
}

/// A transport gap is retried in place, without advancing the page
/// counter; anything else is final.
async fn with_page_retry<T, F, Fut>(retry: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transport_gap() => {
                attempts += 1;
                if attempts > retry.attempts {
                    return Err(Error::Transport(format!(
                        "gave up after {attempts} attempts: {e}"
                    )));
                }
                warn!("no usable response, retrying the same page: {e}");
                sleep(retry.pause).await;
            }
            Err(e) => return Err(e),
        }
    }
}

struct PageCursor<C: HttpClient> {
    api: ApiClientImpl<C>,
    containerid: String,
    page: u32,
    max_pages: Option<u32>,
    retry: RetryPolicy,
    done: bool,
}

impl<C: HttpClient> PageCursor<C> {
    fn new(
        api: ApiClientImpl<C>,
        containerid: String,
        max_pages: Option<u32>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            api,
            containerid,
            page: 1,
            max_pages,
            retry,
            done: false,
        }
    }

    fn past_limit(&self) -> bool {
        self.max_pages.is_some_and(|limit| self.page > limit)
    }
}

fn is_recommendation(card: &Value) -> bool {
    card.get("card_group").is_some_and(|group| !group.is_null())
}

fn is_end_of_feed(cards: &[Value]) -> bool {
    match cards.first() {
        None => true,
        Some(first) => first.get("name").and_then(Value::as_str) == Some(NO_POSTS_SENTINEL),
    }
}

/// Page-by-page driver of a posts container. Lazy: one fetch per pulled
/// page, nothing buffered past the current page.
fn post_pages<C: HttpClient>(
    api: ApiClientImpl<C>,
    containerid: String,
    max_pages: Option<u32>,
    retry: RetryPolicy,
) -> impl Stream<Item = Result<Vec<Post>>> {
    stream::unfold(
        PageCursor::new(api, containerid, max_pages, retry),
        |mut cursor| async move {
            if cursor.done || cursor.past_limit() {
                return None;
            }
            let fetched = with_page_retry(cursor.retry, || {
                cursor.api.statuses(&cursor.containerid, cursor.page)
            })
            .await;
            let data = match fetched {
                Ok(data) => data,
                Err(e) => {
                    cursor.done = true;
                    if let Error::Api(ref err) = e {
                        error!(
                            "page {} of {} answered with failure: {err:?}",
                            cursor.page, cursor.containerid
                        );
                    }
                    return Some((Err(e), cursor));
                }
            };
            if is_end_of_feed(&data.cards) {
                debug!(
                    "feed {} exhausted at page {}",
                    cursor.containerid, cursor.page
                );
                return None;
            }
            let posts = data
                .cards
                .into_iter()
                .filter(|card| !is_recommendation(card))
                .map(Post::new)
                .collect::<Vec<_>>();
            debug!(
                "page {} of {}: {} posts",
                cursor.page,
                cursor.containerid,
                posts.len()
            );
            cursor.page += 1;
            Some((Ok(posts), cursor))
        },
    )
}

pub(crate) fn posts<C: HttpClient>(
    api: ApiClientImpl<C>,
    containerid: String,
    max_pages: Option<u32>,
    retry: RetryPolicy,
) -> impl Stream<Item = Result<Post>> {
    post_pages(api, containerid, max_pages, retry)
        .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
        .try_flatten()
}

/// Same stream, with each post's comment thread fetched on the side. A
/// comment failure downgrades to "no thread" and never touches the page
/// loop or drops the post.
pub(crate) fn posts_with_comments<C: HttpClient>(
    api: ApiClientImpl<C>,
    containerid: String,
    max_pages: Option<u32>,
    retry: RetryPolicy,
) -> impl Stream<Item = Result<Post>> {
    let comments_api = api.clone();
    post_pages(api, containerid, max_pages, retry)
        .and_then(move |page| {
            let api = comments_api.clone();
            async move { Ok(attach_comment_threads(&api, page).await) }
        })
        .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
        .try_flatten()
}

async fn attach_comment_threads<C: HttpClient>(
    api: &ApiClientImpl<C>,
    mut page: Vec<Post>,
) -> Vec<Post> {
    for post in &mut page {
        let keys = post
            .body()
            .and_then(|body| Some((body.id()?.to_owned(), body.mid()?.to_owned())));
        let Some((id, mid)) = keys else {
            debug!("post without id/mid, skipping comment fetch");
            continue;
        };
        match api.comments(&id, &mid).await {
            Ok(thread) => post.set_comment_thread(Some(thread)),
            Err(e) => {
                error!("comment fetch for post {id} failed, keeping post without thread: {e}");
                post.set_comment_thread(None);
            }
        }
    }
    page
}

/// Follow/follower roster walker. Rosters live on the secondary endpoint,
/// carry no recommendation entries, and signal exhaustion purely through
/// the envelope's status flag.
pub(crate) fn follow_members<C: HttpClient>(
    api: ApiClientImpl<C>,
    containerid: String,
    max_pages: Option<u32>,
    retry: RetryPolicy,
) -> impl Stream<Item = Result<User>> {
    second_pages(api, containerid, max_pages, retry)
        .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
        .try_flatten()
}

fn second_pages<C: HttpClient>(
    api: ApiClientImpl<C>,
    containerid: String,
    max_pages: Option<u32>,
    retry: RetryPolicy,
) -> impl Stream<Item = Result<Vec<User>>> {
    stream::unfold(
        PageCursor::new(api, containerid, max_pages, retry),
        |mut cursor| async move {
            if cursor.done || cursor.past_limit() {
                return None;
            }
            let fetched = with_page_retry(cursor.retry, || {
                cursor.api.second(&cursor.containerid, cursor.page)
            })
            .await;
            let data = match fetched {
                Ok(data) => data,
                Err(Error::Api(err)) => {
                    debug!(
                        "follow list {} exhausted at page {}: {err:?}",
                        cursor.containerid, cursor.page
                    );
                    return None;
                }
                Err(e) => {
                    cursor.done = true;
                    return Some((Err(e), cursor));
                }
            };
            if data.cards.is_empty() {
                return None;
            }
            let members = data
                .cards
                .into_iter()
                .filter_map(|mut card| {
                    let user = card.get_mut("user").map(Value::take)?;
                    (!user.is_null()).then(|| User::new(user))
                })
                .collect::<Vec<_>>();
            debug!(
                "page {} of {}: {} members",
                cursor.page,
                cursor.containerid,
                members.len()
            );
            cursor.page += 1;
            Some((Ok(members), cursor))
        },
    )
}
