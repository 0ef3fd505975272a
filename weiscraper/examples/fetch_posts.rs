//! Fetch the latest posts of an account by screen name and print them.
//!
//! ```sh
//! cargo run --example fetch_posts -- 嘻红豆 --pages 2 --with-comments
//! ```

use anyhow::Result;
use clap::Parser;
use futures::{Stream, StreamExt, pin_mut};

use weiscraper::models::Post;
use weiscraper::scraper::Scraper;

#[derive(Parser)]
struct Args {
    /// Screen name to fetch, matched exactly.
    name: String,
    /// Page limit; omit to walk the whole feed.
    #[arg(short, long)]
    pages: Option<u32>,
    /// Also fetch each post's comment thread.
    #[arg(long)]
    with_comments: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let scraper = Scraper::new()?;

    if args.with_comments {
        let stream = scraper
            .posts_by_name_with_comments(&args.name, args.pages)
            .await?;
        print_posts(stream).await
    } else {
        let stream = scraper.posts_by_name(&args.name, args.pages).await?;
        print_posts(stream).await
    }
}

async fn print_posts(stream: impl Stream<Item = weiscraper::error::Result<Post>>) -> Result<()> {
    pin_mut!(stream);
    let mut count = 0usize;
    while let Some(post) = stream.next().await {
        let post = post?;
        let Some(body) = post.body() else {
            continue;
        };
        count += 1;
        println!(
            "{}  {}",
            body.created_at().unwrap_or_default(),
            body.text().unwrap_or_default()
        );
        if let Some(thread) = post.comment_thread() {
            for comment in thread.comments() {
                println!("    ↳ {}", comment.text().unwrap_or_default());
            }
        }
    }
    println!("{count} posts");
    Ok(())
}
