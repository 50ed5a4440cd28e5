//! Application facade: wires settings, storage, session and summaries.

use std::sync::Arc;

use gofinances_config::Config;
use gofinances_core::{
    validation::build_record, Clock, CoreError, DashboardSummary, IdentityProvider, KeyValueStore,
    LedgerRepository, LocaleFormatter, ResumeSummary, Session, StorageKey, SummaryService,
    SystemClock, TransactionDraft,
};
use gofinances_domain::{AggregationWindow, CategoryCatalog, TransactionRecord, User};
use gofinances_storage_json::JsonFileStore;

use crate::errors::Result;

/// Entry point used by the presentation layer.
///
/// Ledger operations act on the signed-in user's key and fail with
/// [`CoreError::NotSignedIn`] otherwise.
pub struct FinanceApp {
    store: Arc<dyn KeyValueStore>,
    config: Config,
    catalog: CategoryCatalog,
    formatter: LocaleFormatter,
    clock: Arc<dyn Clock>,
    session: Session,
}

impl FinanceApp {
    pub fn new(store: Arc<dyn KeyValueStore>, config: Config) -> Result<Self> {
        let formatter = LocaleFormatter::from_settings(
            &config.locale,
            &config.currency,
            config.utc_offset_minutes,
        )
        .map_err(CoreError::from)?;
        let session = Session::new(&config.storage_namespace);
        Ok(Self {
            store,
            config,
            catalog: CategoryCatalog::default(),
            formatter,
            clock: Arc::new(SystemClock),
            session,
        })
    }

    /// Opens the filesystem store under the configured data directory and
    /// restores any cached session.
    pub async fn open(config: Config) -> Result<Self> {
        let store = JsonFileStore::open(config.store_dir()).await?;
        tracing::info!(root = %store.root().display(), "opening gofinances store");
        let mut app = Self::new(Arc::new(store), config)?;
        app.restore_session().await?;
        Ok(app)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_catalog(mut self, catalog: CategoryCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn formatter(&self) -> &LocaleFormatter {
        &self.formatter
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn restore_session(&mut self) -> Result<Option<&User>> {
        self.session.load(self.store.as_ref()).await?;
        self.adopt_legacy_ledger().await?;
        Ok(self.session.user())
    }

    /// Runs the sign-in flow. A ledger left under the pre-account global key
    /// moves to the signed-in user when that user has none yet.
    pub async fn sign_in(&mut self, provider: &dyn IdentityProvider) -> Result<Option<&User>> {
        self.session.sign_in(self.store.as_ref(), provider).await?;
        self.adopt_legacy_ledger().await?;
        Ok(self.session.user())
    }

    /// Ends the session. The ledger stays stored; see [`FinanceApp::clear_ledger`].
    pub async fn sign_out(&mut self) -> Result<()> {
        Ok(self.session.sign_out(self.store.as_ref()).await?)
    }

    /// Validates `draft`, then appends it to the signed-in user's ledger.
    pub async fn register(&self, draft: &TransactionDraft) -> Result<TransactionRecord> {
        let ledger = self.ledger()?;
        let record = build_record(draft, &self.catalog, self.clock.as_ref()).map_err(CoreError::from)?;
        ledger.append(record.clone()).await?;
        Ok(record)
    }

    pub async fn transactions(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.ledger()?.records().await?)
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        let records = self.transactions().await?;
        Ok(SummaryService::dashboard(&records, &self.catalog, &self.formatter))
    }

    pub async fn resume(&self, window: &AggregationWindow) -> Result<ResumeSummary> {
        let records = self.transactions().await?;
        Ok(SummaryService::resume(&records, window, &self.catalog, &self.formatter))
    }

    /// Month containing the current instant, in the configured offset.
    pub fn current_window(&self) -> AggregationWindow {
        AggregationWindow::containing(self.clock.now(), self.formatter.locale.utc_offset)
    }

    /// Window for an explicit month, evaluated in the configured offset.
    pub fn window(&self, year: i32, month: u32) -> Result<AggregationWindow> {
        let window = AggregationWindow::new(year, month).map_err(CoreError::from)?;
        Ok(window.with_offset(self.formatter.locale.utc_offset))
    }

    /// Removes every record of the signed-in user's ledger.
    pub async fn clear_ledger(&self) -> Result<()> {
        Ok(self.ledger()?.clear().await?)
    }

    async fn adopt_legacy_ledger(&self) -> Result<()> {
        if !self.session.is_signed_in() {
            return Ok(());
        }
        let legacy_key = StorageKey::transactions(&self.config.storage_namespace, None);
        self.ledger()?.adopt(&legacy_key).await?;
        Ok(())
    }

    fn ledger(&self) -> Result<LedgerRepository<'_>> {
        let user_id = self.session.user_id().ok_or(CoreError::NotSignedIn)?;
        let key = StorageKey::transactions(&self.config.storage_namespace, Some(user_id));
        Ok(LedgerRepository::new(self.store.as_ref(), key))
    }
}
