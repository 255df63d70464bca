use super::{CommandContext, CommandHandler};
use crate::error::Result;
use crate::services::arxiv::extract_number_param;
use async_trait::async_trait;

/// A `latest_*` command bound to one arXiv category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestFeed {
    pub command: &'static str,
    pub tag: &'static str,
    pub label: &'static str,
}

pub const LATEST_FEEDS: [LatestFeed; 3] = [
    LatestFeed {
        command: "latest_quant",
        tag: "quant-ph",
        label: "Quantum Physics",
    },
    LatestFeed {
        command: "latest_optics",
        tag: "physics.optics",
        label: "Optics",
    },
    LatestFeed {
        command: "latest_atom",
        tag: "physics.atom-ph",
        label: "Atomic Physics",
    },
];

pub struct ArxivSearch;

#[async_trait(?Send)]
impl CommandHandler for ArxivSearch {
    async fn execute(&self, ctx: &mut CommandContext<'_>, mut args: Vec<String>) -> Result<String> {
        let max_results = extract_number_param(&mut args);
        if args.is_empty() {
            return Ok("Please specify a search query (e.g., 'arxiv quantum optics 10')".to_string());
        }
        let query = args.join(" ");
        Ok(ctx.services.arxiv.search(&query, max_results).await)
    }
}

pub struct LatestPapers(pub LatestFeed);

#[async_trait(?Send)]
impl CommandHandler for LatestPapers {
    async fn execute(&self, ctx: &mut CommandContext<'_>, mut args: Vec<String>) -> Result<String> {
        let max_results = extract_number_param(&mut args);
        let feed = self.0;
        Ok(ctx
            .services
            .arxiv
            .search_by_category(feed.tag, feed.label, max_results)
            .await)
    }
}
