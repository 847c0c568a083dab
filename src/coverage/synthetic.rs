use crate::coverage::locale::{LocalePack, SyntheticPage, SyntheticPost};
use crate::output::PipelineObserver;
use crate::record::{
    BlogDetails, CategoryDetails, PageKind, PagePayload, PageRecord, PlainDetails,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use url::Url;

fn synthetic_record(
    url: String,
    title: &str,
    description: &str,
    payload: PagePayload,
    now: DateTime<Utc>,
) -> PageRecord {
    PageRecord {
        url,
        title: title.to_string(),
        description: description.to_string(),
        timestamp: now,
        structured_data: None,
        breadcrumb: Vec::new(),
        error: None,
        synthetic: true,
        payload,
    }
}

fn page_record(
    origin: &Url,
    page: &SyntheticPage,
    kind: PageKind,
    image: &str,
    now: DateTime<Utc>,
) -> Option<PageRecord> {
    let url = origin.join(&page.path).ok()?.to_string();
    let images = vec![image.to_string()];
    let payload = match kind {
        PageKind::Category => PagePayload::Category(CategoryDetails {
            category: page.title.clone(),
            images,
        }),
        _ => PagePayload::Static(PlainDetails { images }),
    };
    Some(synthetic_record(url, &page.title, &page.description, payload, now))
}

fn post_record(
    origin: &Url,
    post: &SyntheticPost,
    image: &str,
    now: DateTime<Utc>,
) -> Option<PageRecord> {
    let url = origin.join(&post.path).ok()?.to_string();
    let payload = PagePayload::Blog(BlogDetails {
        date: post.date.clone(),
        blog_categories: post.categories.clone(),
        blog_content: Some(post.content.clone()),
        images: vec![image.to_string()],
    });
    Some(synthetic_record(url, &post.title, &post.description, payload, now))
}

/// Inserts a record unless its URL already has one; returns true if inserted
fn insert_new(
    records: &mut BTreeMap<String, PageRecord>,
    record: PageRecord,
    observer: &dyn PipelineObserver,
) -> bool {
    if records.contains_key(&record.url) {
        return false;
    }
    observer.synthetic_injected(&record.url, record.kind());
    records.insert(record.url.clone(), record);
    true
}

/// Adds the pack's synthetic pages to `records`
///
/// Static pages and blog posts are always offered; categories only when
/// fewer than `min_category_records` real category records exist. An
/// existing record for the same URL is never replaced. Returns the number
/// of records inserted.
pub fn inject_synthetic(
    records: &mut BTreeMap<String, PageRecord>,
    pack: &LocalePack,
    origin: &Url,
    min_category_records: usize,
    observer: &dyn PipelineObserver,
    now: DateTime<Utc>,
) -> usize {
    let real_categories = records
        .values()
        .filter(|r| r.kind() == PageKind::Category && !r.synthetic)
        .count();

    let mut candidates: Vec<PageRecord> = Vec::new();
    candidates.extend(
        pack.static_pages
            .iter()
            .filter_map(|p| page_record(origin, p, PageKind::Static, &pack.image, now)),
    );
    candidates.extend(
        pack.blog_posts
            .iter()
            .filter_map(|p| post_record(origin, p, &pack.image, now)),
    );
    if real_categories < min_category_records {
        candidates.extend(
            pack.categories
                .iter()
                .filter_map(|p| page_record(origin, p, PageKind::Category, &pack.image, now)),
        );
    }

    let mut inserted = 0;
    for record in candidates {
        if insert_new(records, record, observer) {
            inserted += 1;
        }
    }

    let has_blog = records.values().any(|r| r.kind() == PageKind::Blog);
    if !has_blog {
        if let Some(sample) = post_record(origin, &pack.sample_blog, &pack.image, now) {
            if insert_new(records, sample, observer) {
                inserted += 1;
            }
        }
    }

    tracing::debug!(
        "Injected {} synthetic records using locale '{}'",
        inserted,
        pack.code
    );
    inserted
}
