use crate::classify::Classifier;
use crate::crawler::{harvest_same_host_links, BatchScheduler, FetchOptions, Fetcher};
use crate::record::PageKind;
use crate::CensusError;
use std::collections::HashSet;
use url::Url;

/// Fetches each page and returns the same-host links classified as `wanted`
///
/// Pages that fail to load are skipped. The result keeps first-seen order
/// and holds no duplicates.
pub async fn harvest_kind(
    fetcher: &Fetcher,
    scheduler: &BatchScheduler,
    classifier: &Classifier,
    pages: Vec<String>,
    wanted: PageKind,
) -> Vec<String> {
    let outcomes = scheduler
        .run(pages, |page| async move {
            let base = Url::parse(&page)?;
            let html = fetcher.get(&page, FetchOptions::default()).await?;
            let links: Vec<String> = harvest_same_host_links(&html, &base)
                .into_iter()
                .map(|link| link.to_string())
                .filter(|link| classifier.classify(link) == wanted)
                .collect();
            Ok::<_, CensusError>(links)
        })
        .await;

    let mut seen = HashSet::new();
    let mut harvested = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(links) => {
                for link in links {
                    if seen.insert(link.clone()) {
                        harvested.push(link);
                    }
                }
            }
            Err(failure) => tracing::debug!("Supplementary fetch failed: {}", failure.message),
        }
    }
    harvested
}

/// Category URLs whose listings link to blog posts
pub fn blog_category_pages(category_urls: &[String]) -> Vec<String> {
    category_urls
        .iter()
        .filter(|url| {
            Url::parse(url)
                .map(|u| u.path().to_lowercase().contains("/blog/"))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}
