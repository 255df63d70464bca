//! Clients for the two external services.
//!
//! Both take an `Rc<dyn HttpClient>` so a whole [`Services`] bundle can be
//! built over a stub transport in tests.

pub mod ai;
pub mod arxiv;
pub mod http;

use crate::config::QtermConfig;
use crate::error::Result;
use ai::AiClient;
use arxiv::ArxivClient;
use http::{HttpClient, ReqwestClient};
use std::rc::Rc;

pub struct Services {
    pub ai: AiClient,
    pub arxiv: ArxivClient,
}

impl Services {
    pub fn new(http: Rc<dyn HttpClient>, config: &QtermConfig) -> Self {
        Self {
            ai: AiClient::new(http.clone(), config),
            arxiv: ArxivClient::new(http, config.arxiv_endpoint.clone()),
        }
    }

    /// Services over the real network.
    pub fn connect(config: &QtermConfig) -> Result<Self> {
        let http: Rc<dyn HttpClient> = Rc::new(ReqwestClient::new()?);
        Ok(Self::new(http, config))
    }
}
