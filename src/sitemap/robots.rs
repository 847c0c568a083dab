//! `Sitemap:` directives from robots.txt
//!
//! Uses the robotstxt crate's parser so that line handling (comments, case,
//! BOMs, odd separators) matches what the robots matcher accepts.

use robotstxt::{parse_robotstxt, RobotsParseHandler};

#[derive(Default)]
struct SitemapCollector {
    sitemaps: Vec<String>,
}

impl RobotsParseHandler for SitemapCollector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, _user_agent: &str) {}

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_disallow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_sitemap(&mut self, _line_num: u32, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !self.sitemaps.iter().any(|s| s == value) {
            self.sitemaps.push(value.to_string());
        }
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}

/// Returns the sitemap locations declared in robots.txt, in file order
pub fn declared_sitemaps(robots_txt: &str) -> Vec<String> {
    let mut collector = SitemapCollector::default();
    parse_robotstxt(robots_txt, &mut collector);
    collector.sitemaps
}
