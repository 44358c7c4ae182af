//! One end-to-end job: news → topic → draft → post.

use std::sync::Arc;

use tracing::{info, warn};

use crate::ai::provider::ProviderChain;
use crate::config::Config;
use crate::news::{NewsCollector, NewsStore, RssCollector};
use crate::pipeline::{AssemblyDecision, GenerationReport, PostAssembler, SectionPipeline};
use crate::publish::{BloggerPublisher, DryRunPublisher, PublishReceipt, Publisher};
use crate::types::{NewsItem, NewsSnapshot, Result, TopicSelector, log_filter_warn};

/// Switches the CLI can flip on top of the loaded config
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Log the post instead of publishing it
    pub dry_run: bool,
    /// Skip news collection for this run
    pub no_news: bool,
}

/// Result of one job
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Published {
        title: String,
        words: usize,
        /// `None` when the publisher skipped (dry run, missing credentials)
        receipt: Option<PublishReceipt>,
        report: GenerationReport,
    },
    Skipped {
        word_count: usize,
        min_words: usize,
        report: GenerationReport,
    },
}

impl JobOutcome {
    pub fn report(&self) -> &GenerationReport {
        match self {
            Self::Published { report, .. } | Self::Skipped { report, .. } => report,
        }
    }
}

pub struct Runner {
    selector: TopicSelector,
    configured_topic: Option<String>,
    pipeline: SectionPipeline,
    assembler: PostAssembler,
    collector: Option<Arc<dyn NewsCollector>>,
    store: NewsStore,
    publisher: Arc<dyn Publisher>,
}

impl Runner {
    /// Wire every collaborator from configuration
    pub fn from_config(config: &Config, options: RunOptions) -> Result<Self> {
        let chain = ProviderChain::from_config(&config.llm)?;
        if chain.is_empty() {
            warn!("No LLM provider has an API key; every generation will fall back to the placeholder post");
        } else {
            info!(providers = %chain.provider_names().join(" → "), "Provider chain ready");
        }

        let pipeline = SectionPipeline::new(chain, config.post.clone(), &config.log)?;

        let collector: Option<Arc<dyn NewsCollector>> = if config.news.enabled && !options.no_news {
            Some(Arc::new(RssCollector::new(&config.news)?))
        } else {
            None
        };

        let publisher: Arc<dyn Publisher> = if options.dry_run {
            Arc::new(DryRunPublisher)
        } else {
            Arc::new(BloggerPublisher::new(&config.publish)?)
        };

        Self::new(config, pipeline, collector, publisher)
    }

    pub fn new(
        config: &Config,
        pipeline: SectionPipeline,
        collector: Option<Arc<dyn NewsCollector>>,
        publisher: Arc<dyn Publisher>,
    ) -> Result<Self> {
        Ok(Self {
            selector: TopicSelector::new(config.topics.allowed.clone())?,
            configured_topic: config.topics.topic.clone(),
            pipeline,
            assembler: PostAssembler::new(&config.post),
            collector,
            store: NewsStore::new(&config.news.output_path),
            publisher,
        })
    }

    pub fn selector(&self) -> &TopicSelector {
        &self.selector
    }

    /// Collect news and persist the snapshot.
    ///
    /// A failed collection falls back to the last saved snapshot.
    pub async fn refresh_news(&self) -> Vec<NewsItem> {
        let Some(collector) = &self.collector else {
            return Vec::new();
        };

        match collector.collect().await {
            Ok(items) => {
                if let Err(e) = self.store.save(&NewsSnapshot::new(items.clone())) {
                    warn!(path = %self.store.path().display(), error = %e, "Failed to save news snapshot");
                }
                items
            }
            Err(e) => {
                warn!(error = %e, "News collection failed, using last snapshot");
                log_filter_warn(self.store.load(), "Failed to read news snapshot")
                    .map(|snapshot| snapshot.items)
                    .unwrap_or_default()
            }
        }
    }

    /// Run one job; `topic` overrides the configured topic
    pub async fn run_job(&self, topic: Option<&str>) -> Result<JobOutcome> {
        let news = self.refresh_news().await;

        let requested = topic.or(self.configured_topic.as_deref());
        let topic = self.selector.resolve(requested, &mut rand::rng());
        info!(topic = %topic, news = news.len(), "Generating blog post");

        let generation = self.pipeline.generate(&topic, &news).await;
        let report = generation.report;

        match self.assembler.assemble(generation.draft) {
            AssemblyDecision::Skip {
                word_count,
                min_words,
            } => Ok(JobOutcome::Skipped {
                word_count,
                min_words,
                report,
            }),
            AssemblyDecision::Publish(post) => {
                info!(
                    labels = post.labels.len(),
                    publisher = self.publisher.name(),
                    "Generated {} labels: {}",
                    post.labels.len(),
                    post.labels.join(", ")
                );
                let receipt = self.publisher.publish(&post).await?;
                Ok(JobOutcome::Published {
                    words: crate::pipeline::word_count(&post.content),
                    title: post.title,
                    receipt,
                    report,
                })
            }
        }
    }
}
