use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use seonoc_common::throttle::Throttle;
use seonoc_common::Config;
use seonoc_ledger::ChangePipeline;
use seonoc_linker::ConflictLinker;
use seonoc_notify::{EmailClient, NotificationRouter, TelegramClient};
use seonoc_store::StoreClient;
use seonoc_templates::TemplateStore;

/// Explicit dependency-injection root: every handler takes what it needs
/// from here, nothing reaches for globals.
pub struct NocCore {
    pub config: Config,
    pub store: StoreClient,
    pub templates: Arc<TemplateStore>,
    pub router: Arc<NotificationRouter>,
    pub pipeline: ChangePipeline,
    pub linker: ConflictLinker,
    pub throttle: Arc<Throttle>,
    /// Shared shutdown flag read by every worker loop.
    pub running: Arc<AtomicBool>,
}

impl NocCore {
    pub fn new(config: Config, store: StoreClient) -> Self {
        let templates = Arc::new(TemplateStore::new(store.templates()));
        let router = Arc::new(NotificationRouter::new(
            store.clone(),
            templates.clone(),
            Arc::new(TelegramClient::new()),
            Arc::new(EmailClient::new()),
        ));
        let throttle = Arc::new(Throttle::new());
        let pipeline = ChangePipeline::new(store.clone(), router.clone(), throttle.clone());
        let linker = ConflictLinker::new(store.clone(), router.clone());
        Self {
            config,
            store,
            templates,
            router,
            pipeline,
            linker,
            throttle,
            running: Arc::new(AtomicBool::new(true)),
        }
    }
}
