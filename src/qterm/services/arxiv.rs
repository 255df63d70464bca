//! # Paper search
//!
//! Queries the arXiv Atom API and formats the entries as renderer-ready
//! text. Failures never escape: they come back as an `arXiv Error:` block.

use super::http::{HttpClient, HttpRequest};
use crate::error::{QtermError, Result};
use chrono::{DateTime, Utc};
use reqwest::Url;
use std::num::IntErrorKind;
use std::rc::Rc;

/// Upper bound on results per query, whatever the caller asks for.
pub const MAX_RESULTS_CEILING: usize = 50;
pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const TITLE_BUDGET: usize = 300;
pub const ABSTRACT_BUDGET: usize = 5000;
pub const NO_RESULTS: &str = "No papers found.";

const AUTHOR_SEPARATOR: &str = ", ";
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    /// The entry's `<id>`, an abs-page URL
    pub id: String,
    pub doi: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl PaperRecord {
    /// Text for the link line: the DOI when present, otherwise an explicit
    /// link to the abs page labelled with its last path segment.
    pub fn link_line(&self) -> String {
        match &self.doi {
            Some(doi) => format!("DOI: {}", doi),
            None => format!("Link: [{}]({})", last_segment(&self.id), self.id),
        }
    }
}

fn last_segment(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
}

/// What a query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperQuery<'a> {
    Text(&'a str),
    Category { tag: &'a str, label: &'a str },
}

impl PaperQuery<'_> {
    fn search_query(&self) -> String {
        match self {
            PaperQuery::Text(q) => format!("all:{}", q),
            PaperQuery::Category { tag, .. } => format!("cat:{}", tag),
        }
    }

    fn header(&self, found: usize, requested: usize) -> String {
        match self {
            PaperQuery::Text(q) => {
                format!("Found {} of {} requested papers for \"{}\":", found, requested, q)
            }
            PaperQuery::Category { label, .. } => {
                format!("Latest {} papers ({} of {} requested):", label, found, requested)
            }
        }
    }
}

pub fn clamp_max_results(requested: usize) -> usize {
    requested.clamp(1, MAX_RESULTS_CEILING)
}

/// Removes the rightmost positive integer from `args` and returns it,
/// clamped to the ceiling. Leaves `args` alone and returns the default
/// when there is none.
pub fn extract_number_param(args: &mut Vec<String>) -> usize {
    let found = args
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, tok)| parse_count(tok).map(|n| (i, n)));

    match found {
        Some((index, n)) => {
            args.remove(index);
            n.min(MAX_RESULTS_CEILING)
        }
        None => DEFAULT_MAX_RESULTS,
    }
}

/// A positive all-digit token. Values too large for `usize` saturate.
fn parse_count(tok: &str) -> Option<usize> {
    if tok.is_empty() || !tok.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match tok.parse::<usize>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
        Err(_) => None,
    }
}

pub fn build_query_url(endpoint: &str, query: &PaperQuery<'_>, max_results: usize) -> Result<Url> {
    let max = clamp_max_results(max_results).to_string();
    Url::parse_with_params(
        endpoint,
        &[
            ("search_query", query.search_query().as_str()),
            ("start", "0"),
            ("max_results", max.as_str()),
            ("sortBy", "submittedDate"),
            ("sortOrder", "descending"),
        ],
    )
    .map_err(|e| QtermError::Config(format!("invalid arxiv_endpoint: {}", e)))
}

/// Parses an Atom feed into records, in feed order.
pub fn parse_feed(xml: &str) -> Result<Vec<PaperRecord>> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| QtermError::MalformedResponse(format!("invalid feed: {}", e)))?;

    let feed = doc.root_element();
    if feed.tag_name().name() != "feed" {
        return Err(QtermError::MalformedResponse(format!(
            "expected <feed>, found <{}>",
            feed.tag_name().name()
        )));
    }

    Ok(feed
        .children()
        .filter(|n| n.tag_name().name() == "entry")
        .map(parse_entry)
        .collect())
}

fn parse_entry(entry: roxmltree::Node<'_, '_>) -> PaperRecord {
    let child_text = |name: &str| {
        entry
            .children()
            .find(|n| n.tag_name().name() == name)
            .and_then(|n| n.text())
            .map(collapse_whitespace)
            .filter(|s| !s.is_empty())
    };

    let authors = entry
        .children()
        .filter(|n| n.tag_name().name() == "author")
        .filter_map(|author| {
            author
                .children()
                .find(|n| n.tag_name().name() == "name")
                .and_then(|n| n.text())
                .map(collapse_whitespace)
        })
        .collect();

    let published = child_text("published")
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|d| d.with_timezone(&Utc));

    PaperRecord {
        title: child_text("title").unwrap_or_else(|| "No title".to_string()),
        authors,
        abstract_text: child_text("summary").unwrap_or_default(),
        id: child_text("id").unwrap_or_default(),
        doi: child_text("doi"),
        published,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(s: &str, budget: usize) -> &str {
    match s.char_indices().nth(budget) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Formats a batch: header, then one block per record (or the no-results line).
pub fn format_papers(query: &PaperQuery<'_>, requested: usize, papers: &[PaperRecord]) -> String {
    let mut out = query.header(papers.len(), requested);
    out.push('\n');

    if papers.is_empty() {
        out.push_str(NO_RESULTS);
        return out;
    }

    for (i, paper) in papers.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!(
            "[{}] {}\n",
            i + 1,
            truncate_chars(&paper.title, TITLE_BUDGET)
        ));
        if !paper.authors.is_empty() {
            out.push_str(&format!(
                "    Authors: {}\n",
                paper.authors.join(AUTHOR_SEPARATOR)
            ));
        }
        if let Some(date) = paper.published {
            out.push_str(&format!("    Published: {}\n", date.format("%Y-%m-%d")));
        }
        out.push_str(&format!(
            "    Abstract: {}{}\n",
            truncate_chars(&paper.abstract_text, ABSTRACT_BUDGET),
            ELLIPSIS
        ));
        out.push_str(&format!("    {}\n", paper.link_line()));
    }

    out.truncate(out.trim_end().len());
    out
}

pub struct ArxivClient {
    http: Rc<dyn HttpClient>,
    endpoint: String,
}

impl ArxivClient {
    pub fn new(http: Rc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub async fn search(&self, query: &str, max_results: usize) -> String {
        self.run(PaperQuery::Text(query), max_results).await
    }

    pub async fn search_by_category(&self, tag: &str, label: &str, max_results: usize) -> String {
        self.run(PaperQuery::Category { tag, label }, max_results).await
    }

    async fn run(&self, query: PaperQuery<'_>, max_results: usize) -> String {
        let requested = clamp_max_results(max_results);
        match self.fetch(&query, requested).await {
            Ok(papers) => format_papers(&query, requested, &papers),
            Err(err) => {
                tracing::warn!(error = %err, ?query, "paper search failed");
                format!("arXiv Error: {}", err)
            }
        }
    }

    async fn fetch(&self, query: &PaperQuery<'_>, max_results: usize) -> Result<Vec<PaperRecord>> {
        let url = build_query_url(&self.endpoint, query, max_results)?;
        tracing::info!(%url, "querying arXiv");

        let response = self.http.send(HttpRequest::Get { url }).await?;
        if !response.is_success() {
            return Err(QtermError::Upstream {
                status: response.status,
                message: format!("{} {}", response.status, response.status_text),
            });
        }
        parse_feed(&response.body)
    }
}
