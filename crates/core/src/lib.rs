pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod providers;
pub mod retry;
pub mod services;
pub mod sources;
pub mod storage;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{error, info, warn};
use uuid::Uuid;

use config::AppConfig;
use errors::CoreError;
use gateway::client::BackendGateway;
use gateway::connector::{BackendConnector, HttpConnector};
use models::{
    asset::{Asset, NewAsset, TrackedAsset},
    chart::RenderedView,
    snapshot::PortfolioSnapshot,
};
use notify::{LogNotifier, Notice, Notifier};
use providers::{
    registry::QuoteProviderRegistry, traits::QuoteProvider, yahoo_finance::YahooFinanceProvider,
};
use retry::{with_retry, AttemptInfo, CancellationFlag, Sleeper, TokioSleeper};
use services::{
    aggregation_service::AggregationService, chart_service::ChartService,
    quote_service::QuoteService, resolver_service::AssetResolver,
};
use sources::{
    backend::{BackendHandle, BackendSource},
    local_store::LocalStoreSource,
    market_api::MarketApiSource,
    registry::AssetSourceRegistry,
};
use storage::store::FileStore;

pub const INIT_FAILED_MESSAGE: &str = "Failed to initialize the application. Please try again later.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch assets. Please try again later.";
pub const ADD_FAILED_MESSAGE: &str = "Failed to add asset. Please try again.";
pub const ADD_SUCCESS_MESSAGE: &str = "Asset added successfully!";

/// Lifecycle of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppPhase {
    /// `initialize()` has not run yet.
    Uninitialized,
    /// Backend connection attempts are in progress.
    Initializing,
    /// Backend connected.
    Ready,
    /// Backend initialization exhausted its retries. Non-backend sources
    /// remain usable.
    Failed(String),
}

impl AppPhase {
    /// Whether `initialize()` has completed, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, AppPhase::Ready | AppPhase::Failed(_))
    }
}

/// Mutable application state, owned by the controller.
#[derive(Debug)]
struct AppState {
    phase: AppPhase,
    assets: Vec<TrackedAsset>,
    /// Name of the source that produced the current list
    source: Option<String>,
}

/// Marks an action as running; released on drop.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, action: &str) -> Result<Self, CoreError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| CoreError::Busy(action.to_string()))?;
        Ok(Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Main entry point for the Portfolio Tracker core library.
///
/// Owns the application state and every service the fetch-and-render
/// pipeline needs: initialize → load assets → snapshot → render.
/// All methods take `&self`; a second concurrent call of the same action
/// fails with [`CoreError::Busy`] instead of racing the first.
#[must_use]
pub struct PortfolioTracker {
    config: AppConfig,
    connector: Arc<dyn BackendConnector>,
    backend: BackendHandle,
    resolver: AssetResolver,
    quote_service: QuoteService,
    aggregation_service: AggregationService,
    chart_service: ChartService,
    notifier: Arc<dyn Notifier>,
    sleeper: Arc<dyn Sleeper>,
    cancel: CancellationFlag,
    state: Mutex<AppState>,
    init_in_flight: AtomicBool,
    load_in_flight: AtomicBool,
    add_in_flight: AtomicBool,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("PortfolioTracker")
            .field("phase", &state.phase)
            .field("assets", &state.assets.len())
            .field("source", &state.source)
            .field("sources", &self.resolver.registry().names())
            .field("quote_providers", &self.quote_service.provider_names())
            .finish()
    }
}

impl PortfolioTracker {
    /// Tracker with the production stack: HTTP backend, Yahoo-backed market
    /// API source, file-backed local store, default quote providers.
    pub fn from_config(config: AppConfig) -> Self {
        PortfolioTrackerBuilder::new(config).build()
    }

    /// Builder for injecting custom collaborators.
    pub fn builder(config: AppConfig) -> PortfolioTrackerBuilder {
        PortfolioTrackerBuilder::new(config)
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Connect the backend under the initialization retry policy.
    ///
    /// On exhaustion the phase becomes [`AppPhase::Failed`], a blocking error
    /// is shown, and the error is returned. Sources that do not need the
    /// backend keep working afterwards.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        let _guard = InFlight::acquire(&self.init_in_flight, "initialize")?;
        self.cancel.reset();
        self.set_phase(AppPhase::Initializing);

        let notifier = Arc::clone(&self.notifier);
        let mut progress = move |info: AttemptInfo| {
            notifier.notify(Notice::Progress {
                operation: "initialize".into(),
                attempt: info.attempt,
                max_attempts: info.max_attempts,
            })
        };

        let result = with_retry(
            &self.config.init_retry,
            self.sleeper.as_ref(),
            &self.cancel,
            &mut progress,
            |_| self.connector.connect(&self.config),
        )
        .await;

        match result {
            Ok(transport) => {
                self.backend.attach(BackendGateway::new(transport));
                self.set_phase(AppPhase::Ready);
                info!("Backend initialized successfully");
                Ok(())
            }
            Err(e) => {
                self.backend.detach();
                self.set_phase(AppPhase::Failed(e.to_string()));
                error!("Failed to initialize backend: {e}");
                self.notifier.notify(Notice::Error(INIT_FAILED_MESSAGE.into()));
                Err(e)
            }
        }
    }

    /// Resolve the holding list and replace the in-memory list with it.
    ///
    /// On failure the previous list is kept and the user is notified.
    /// Returns the number of loaded assets.
    pub async fn load_assets(&self) -> Result<usize, CoreError> {
        self.ensure_settled()?;
        let _guard = InFlight::acquire(&self.load_in_flight, "load assets")?;
        self.cancel.reset();

        let notifier = Arc::clone(&self.notifier);
        let mut progress = move |info: AttemptInfo| {
            notifier.notify(Notice::Progress {
                operation: "load assets".into(),
                attempt: info.attempt,
                max_attempts: info.max_attempts,
            })
        };

        match self.resolver.resolve_assets(&self.cancel, &mut progress).await {
            Ok(resolved) => {
                let count = resolved.assets.len();
                let mut state = self.lock_state();
                state.assets = resolved.assets.into_iter().map(TrackedAsset::new).collect();
                state.source = Some(resolved.source);
                Ok(count)
            }
            Err(e) => {
                error!("Error fetching assets: {e}");
                self.notifier.notify(Notice::Error(FETCH_FAILED_MESSAGE.into()));
                Err(e)
            }
        }
    }

    /// Validate a submission, write it through the writable source, and
    /// append the created asset to the list.
    ///
    /// On any failure the list is left unmodified and the user is notified.
    pub async fn add_asset(&self, new_asset: NewAsset) -> Result<TrackedAsset, CoreError> {
        self.ensure_settled()?;
        let _guard = InFlight::acquire(&self.add_in_flight, "add asset")?;
        self.cancel.reset();

        let asset = match new_asset.into_asset() {
            Ok(asset) => asset,
            Err(e) => {
                warn!("Rejected asset submission: {e}");
                self.notifier.notify(Notice::Error(e.to_string()));
                return Err(e);
            }
        };

        match self.resolver.add_asset(&asset).await {
            Ok(created) => {
                let tracked = TrackedAsset::new(created);
                self.lock_state().assets.push(tracked.clone());
                info!("Added {} ({})", tracked.asset.symbol, tracked.id);
                self.notifier.notify(Notice::Success(ADD_SUCCESS_MESSAGE.into()));
                Ok(tracked)
            }
            Err(e) => {
                error!("Error adding asset {}: {e}", asset.symbol);
                self.notifier.notify(Notice::Error(ADD_FAILED_MESSAGE.into()));
                Err(e)
            }
        }
    }

    /// Drop one entry from the in-memory list. Not propagated to any source.
    pub fn remove_asset(&self, id: Uuid) -> Result<Asset, CoreError> {
        let mut state = self.lock_state();
        let idx = state
            .assets
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::AssetNotFound(id.to_string()))?;
        Ok(state.assets.remove(idx).asset)
    }

    /// Stop retries of whatever operation is running.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether a cancellation is pending for the running operation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // ── Render pipeline ─────────────────────────────────────────────

    /// Enrich the current list with market quotes and aggregate it.
    pub async fn snapshot(&self) -> PortfolioSnapshot {
        let assets: Vec<Asset> = self.assets().into_iter().map(|t| t.asset).collect();
        let symbols: Vec<&str> = assets.iter().map(|a| a.symbol.as_str()).collect();
        let quotes = self
            .quote_service
            .quotes_for(&symbols, self.config.quote_concurrency)
            .await;
        self.aggregation_service
            .aggregate(&assets, &quotes, self.config.reference_basis)
    }

    /// Table rows and chart datasets for a snapshot.
    #[must_use]
    pub fn render(&self, snapshot: &PortfolioSnapshot) -> RenderedView {
        self.chart_service.render(snapshot)
    }

    /// Look up a display name for a symbol (e.g., to prefill the add form).
    pub async fn company_name(&self, symbol: &str) -> Result<String, CoreError> {
        self.quote_service
            .get_company_name(&symbol.trim().to_uppercase())
            .await
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn phase(&self) -> AppPhase {
        self.lock_state().phase.clone()
    }

    #[must_use]
    pub fn assets(&self) -> Vec<TrackedAsset> {
        self.lock_state().assets.clone()
    }

    /// Name of the source the current list came from, if any load succeeded.
    #[must_use]
    pub fn active_source(&self) -> Option<String> {
        self.lock_state().source.clone()
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn is_backend_connected(&self) -> bool {
        self.backend.is_attached()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        // State is only ever replaced wholesale, so a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: AppPhase) {
        self.lock_state().phase = phase;
    }

    fn ensure_settled(&self) -> Result<(), CoreError> {
        if self.lock_state().phase.is_settled() {
            Ok(())
        } else {
            Err(CoreError::NotReady)
        }
    }
}

/// Assembles a [`PortfolioTracker`], defaulting every collaborator that is
/// not explicitly provided.
pub struct PortfolioTrackerBuilder {
    config: AppConfig,
    backend: BackendHandle,
    connector: Option<Arc<dyn BackendConnector>>,
    sources: Option<AssetSourceRegistry>,
    quote_providers: Option<QuoteProviderRegistry>,
    notifier: Option<Arc<dyn Notifier>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl PortfolioTrackerBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            backend: BackendHandle::new(),
            connector: None,
            sources: None,
            quote_providers: None,
            notifier: None,
            sleeper: None,
        }
    }

    /// The slot the tracker attaches the backend gateway to after
    /// initialization. Custom sources that depend on the backend share it.
    pub fn backend_handle(&self) -> BackendHandle {
        self.backend.clone()
    }

    pub fn connector(mut self, connector: Arc<dyn BackendConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn sources(mut self, sources: AssetSourceRegistry) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn quote_providers(mut self, providers: QuoteProviderRegistry) -> Self {
        self.quote_providers = Some(providers);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn build(self) -> PortfolioTracker {
        let sleeper = self
            .sleeper
            .unwrap_or_else(|| Arc::new(TokioSleeper) as Arc<dyn Sleeper>);
        let sources = self
            .sources
            .unwrap_or_else(|| default_sources(&self.config, &self.backend));
        let quote_providers = self.quote_providers.unwrap_or_else(|| {
            QuoteProviderRegistry::new_with_defaults(self.config.alphavantage_api_key.as_deref())
        });
        let resolver = AssetResolver::new(sources, self.config.fetch_retry, Arc::clone(&sleeper));

        PortfolioTracker {
            connector: self
                .connector
                .unwrap_or_else(|| Arc::new(HttpConnector) as Arc<dyn BackendConnector>),
            backend: self.backend,
            resolver,
            quote_service: QuoteService::new(quote_providers),
            aggregation_service: AggregationService::new(),
            chart_service: ChartService::new(),
            notifier: self
                .notifier
                .unwrap_or_else(|| Arc::new(LogNotifier) as Arc<dyn Notifier>),
            sleeper,
            cancel: CancellationFlag::new(),
            state: Mutex::new(AppState {
                phase: AppPhase::Uninitialized,
                assets: Vec::new(),
                source: None,
            }),
            init_in_flight: AtomicBool::new(false),
            load_in_flight: AtomicBool::new(false),
            add_in_flight: AtomicBool::new(false),
            config: self.config,
        }
    }
}

/// Backend while one is attached, otherwise the local store. The market API
/// seeds the local store the first time it is read empty, so assets added
/// offline land in the same list the next load reads back.
fn default_sources(config: &AppConfig, backend: &BackendHandle) -> AssetSourceRegistry {
    let mut registry = AssetSourceRegistry::new();
    registry.register(Arc::new(BackendSource::new(backend.clone())));

    let store = Arc::new(FileStore::new(config.data_dir.clone()));
    let mut local = LocalStoreSource::new(store).unless_backend(backend.clone());
    match YahooFinanceProvider::new() {
        Ok(yahoo) => {
            let provider: Arc<dyn QuoteProvider> = Arc::new(yahoo);
            local = local.seeded_from(Arc::new(MarketApiSource::new(provider)));
        }
        Err(e) => warn!("Market API seeding disabled: {e}"),
    }
    registry.register(Arc::new(local));
    registry
}
