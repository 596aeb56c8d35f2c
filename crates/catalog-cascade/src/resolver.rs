//! Cascade resolver.
//!
//! Keeps the four catalog collections consistent with the selected parents:
//!
//! 1. Every reload goes through the TTL cache; only a miss reaches the gateway.
//! 2. Selecting a grade level unselects subject and class, then reloads both
//!    scoped to the new grade level.
//! 3. Responses are applied only if they belong to the newest reload of their
//!    type, so an older, slower response never overwrites a newer one.
//!
//! State and cache live behind one lock that is never held across an await
//! point. Reloads of different types run concurrently.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, TtlCache};
use crate::config::ResolverConfig;
use crate::gateway::{fetch_catalog, EntityGateway};
use crate::ids::EntityId;
use crate::options::{self, OptionItem, OptionList, ParentFilters};
use crate::params::FetchParams;
use crate::state::CascadeState;
use crate::types::{Class, EntityKind, GradeLevel, LearningUnit, Subject};
use crate::validate::{self, Consistency};

/// Result of one reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReloadOutcome {
    /// Served from the cache; no gateway call.
    Cached { count: usize },

    /// Fetched from the gateway and applied.
    Fetched { count: usize },

    /// A newer reload of the same type was issued meanwhile; this response
    /// was not applied.
    Superseded,

    /// The gateway failed. Recorded as resolver error; collection untouched.
    Failed { message: String },
}

impl ReloadOutcome {
    /// Whether the collection now holds this reload's result.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Cached { .. } | Self::Fetched { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcomes of a multi-type reload, per entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub outcomes: BTreeMap<EntityKind, ReloadOutcome>,
}

impl LoadReport {
    pub fn get(&self, kind: EntityKind) -> Option<&ReloadOutcome> {
        self.outcomes.get(&kind)
    }

    /// True when no reload in the report failed.
    pub fn is_ok(&self) -> bool {
        !self.outcomes.values().any(ReloadOutcome::is_failed)
    }

    fn record(&mut self, kind: EntityKind, outcome: ReloadOutcome) {
        self.outcomes.insert(kind, outcome);
    }
}

struct Inner {
    state: CascadeState,
    cache: TtlCache,
    /// Bumped by `reset`; responses from an older epoch are not cached.
    epoch: u64,
}

/// Lowers the loading flag of a reload whose future was dropped before the
/// gateway answered, unless a newer reload of the same type has taken over.
struct PendingReload<'a> {
    inner: &'a Mutex<Inner>,
    kind: EntityKind,
    seq: u64,
    armed: bool,
}

impl PendingReload<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingReload<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.state.is_latest(self.kind, self.seq) {
            debug!(entity = %self.kind, seq = self.seq, "catalog reload cancelled");
            inner.state.finish_reload(self.kind);
        }
    }
}

/// Resolver for the grade level → subject/class → learning unit cascade.
pub struct CascadeResolver<G: ?Sized> {
    config: ResolverConfig,
    inner: Mutex<Inner>,
    gateway: Arc<G>,
}

impl<G: EntityGateway> CascadeResolver<G> {
    pub fn new(gateway: G, config: ResolverConfig) -> Self {
        Self::with_shared_gateway(Arc::new(gateway), config)
    }
}

impl<G: EntityGateway + ?Sized> CascadeResolver<G> {
    /// Create a resolver over a gateway shared with other owners.
    pub fn with_shared_gateway(gateway: Arc<G>, config: ResolverConfig) -> Self {
        let cache = TtlCache::new(config.cache_ttl());
        Self {
            config,
            inner: Mutex::new(Inner {
                state: CascadeState::new(),
                cache,
                epoch: 0,
            }),
            gateway,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> CascadeState {
        self.lock().state.clone()
    }

    /// Reload one collection.
    ///
    /// A fresh cache entry for `(kind, params)` is applied directly. Otherwise
    /// the gateway is called; its answer is cached and, if this is still the
    /// newest reload of `kind`, applied. Failures leave the collection alone
    /// and set the resolver error. Nothing is retried.
    ///
    /// Dropping the returned future before it completes lowers the loading
    /// flag again, unless a newer reload of `kind` is in flight.
    pub async fn reload(&self, kind: EntityKind, params: &FetchParams) -> ReloadOutcome {
        let key = cache_key(kind, params);

        let (seq, epoch) = {
            let mut inner = self.lock();
            if let Some(entry) = inner.cache.get_entry(&key).cloned() {
                let count = entry.catalog.len();
                debug!(entity = %kind, count, "catalog cache hit");
                inner.state.begin_reload(kind);
                inner.state.apply_fetched_at(entry.catalog, entry.fetched_at);
                inner.state.finish_reload(kind);
                return ReloadOutcome::Cached { count };
            }
            debug!(entity = %kind, scope = ?params.scope, "catalog cache miss");
            (inner.state.begin_reload(kind), inner.epoch)
        };

        let mut pending = PendingReload {
            inner: &self.inner,
            kind,
            seq,
            armed: true,
        };
        let result = fetch_catalog(self.gateway.as_ref(), kind, params).await;
        pending.disarm();

        let mut inner = self.lock();
        let latest = inner.state.is_latest(kind, seq);

        match result {
            Ok(catalog) => {
                let count = catalog.len();
                if inner.epoch == epoch {
                    inner.cache.put(key, catalog.clone());
                }
                if !latest {
                    warn!(entity = %kind, seq, "discarding superseded catalog response");
                    return ReloadOutcome::Superseded;
                }
                inner.state.apply(catalog);
                inner.state.finish_reload(kind);
                info!(entity = %kind, count, "catalog reloaded");
                ReloadOutcome::Fetched { count }
            }
            Err(e) => {
                if !latest {
                    warn!(entity = %kind, seq, error = %e, "discarding superseded catalog failure");
                    return ReloadOutcome::Superseded;
                }
                let message = e.user_message();
                warn!(entity = %kind, error = %e, "catalog reload failed");
                inner.state.record_failure(kind, message.clone());
                inner.state.finish_reload(kind);
                ReloadOutcome::Failed { message }
            }
        }
    }

    /// Drop the cache entry for `(kind, params)` and reload.
    pub async fn refresh(&self, kind: EntityKind, params: &FetchParams) -> ReloadOutcome {
        {
            let mut inner = self.lock();
            inner.cache.invalidate(&cache_key(kind, params));
        }
        self.reload(kind, params).await
    }

    /// Load everything: grade levels first, then subjects and classes
    /// concurrently, then learning units if enabled.
    ///
    /// A failed grade-level load does not stop the dependent loads; each
    /// failure is reported in the returned [`LoadReport`].
    pub async fn load_all(&self, params: &FetchParams) -> LoadReport {
        let mut report = LoadReport::default();

        report.record(
            EntityKind::GradeLevel,
            self.reload(EntityKind::GradeLevel, params).await,
        );

        let (subjects, classes) = tokio::join!(
            self.reload(EntityKind::Subject, params),
            self.reload(EntityKind::Class, params),
        );
        report.record(EntityKind::Subject, subjects);
        report.record(EntityKind::Class, classes);

        if self.config.load_learning_units {
            report.record(
                EntityKind::LearningUnit,
                self.reload(EntityKind::LearningUnit, params).await,
            );
        }

        report
    }

    /// Select (or clear) the grade level.
    ///
    /// Subject and class are unselected unconditionally, then both are
    /// reloaded scoped to the new grade level (unscoped for `None`).
    pub async fn select_grade_level(&self, id: Option<EntityId>) -> LoadReport {
        {
            let mut inner = self.lock();
            inner.state.select_grade_level(id.clone());
        }
        info!(grade_level = ?id.as_ref().map(EntityId::as_str), "grade level selected");

        let params = FetchParams::new().with_scope(id);
        let (subjects, classes) = tokio::join!(
            self.reload(EntityKind::Subject, &params),
            self.reload(EntityKind::Class, &params),
        );

        let mut report = LoadReport::default();
        report.record(EntityKind::Subject, subjects);
        report.record(EntityKind::Class, classes);
        report
    }

    /// Select (or clear) the subject. Returns the consistency of the new
    /// subject/class pair.
    pub async fn select_subject(&self, id: Option<EntityId>) -> Consistency {
        let mut inner = self.lock();
        inner.state.select_subject(id);
        Self::checked_selection(&inner.state)
    }

    /// Select (or clear) the class. Returns the consistency of the new
    /// subject/class pair.
    pub async fn select_class(&self, id: Option<EntityId>) -> Consistency {
        let mut inner = self.lock();
        inner.state.select_class(id);
        Self::checked_selection(&inner.state)
    }

    fn checked_selection(state: &CascadeState) -> Consistency {
        let result = validate::validate_selection(state);
        if let Consistency::Invalid { message, .. } = &result {
            debug!(%message, "selected subject and class are inconsistent");
        }
        result
    }

    /// Clear every collection, selection and the cache.
    pub async fn reset(&self) {
        let mut inner = self.lock();
        inner.state.clear();
        inner.cache.clear();
        inner.epoch += 1;
        info!("catalog cascade reset");
    }

    /// Forget the last fetch error.
    pub async fn clear_error(&self) {
        self.lock().state.clear_error();
    }

    pub async fn grade_level_options(&self) -> Vec<OptionItem<GradeLevel>> {
        options::grade_level_options(&self.lock().state)
    }

    pub async fn subject_options(
        &self,
        grade_level_id: Option<&EntityId>,
    ) -> Vec<OptionItem<Subject>> {
        options::subject_options(&self.lock().state, grade_level_id)
    }

    pub async fn class_options(&self, grade_level_id: Option<&EntityId>) -> Vec<OptionItem<Class>> {
        options::class_options(&self.lock().state, grade_level_id)
    }

    pub async fn learning_unit_options(
        &self,
        filters: &ParentFilters,
    ) -> Vec<OptionItem<LearningUnit>> {
        options::learning_unit_options(&self.lock().state, filters)
    }

    /// Options for `kind` under explicit parent filters.
    pub async fn get_options(&self, kind: EntityKind, filters: &ParentFilters) -> OptionList {
        options::get_options(&self.lock().state, kind, filters)
    }

    /// Options for `kind` under the current selections.
    pub async fn selected_options(&self, kind: EntityKind) -> OptionList {
        let inner = self.lock();
        let filters = ParentFilters::from_selection(&inner.state);
        options::get_options(&inner.state, kind, &filters)
    }

    /// Check a subject/class pair by id against the loaded collections.
    pub async fn validate_consistency(
        &self,
        subject_id: Option<&EntityId>,
        class_id: Option<&EntityId>,
    ) -> Consistency {
        validate::validate_ids(&self.lock().state, subject_id, class_id)
    }

    /// Check the selected subject/class pair.
    pub async fn validate_selection(&self) -> Consistency {
        validate::validate_selection(&self.lock().state)
    }

    /// Final check of a learning unit before it is submitted.
    pub async fn validate_learning_unit(&self, unit: &LearningUnit) -> Consistency {
        validate::validate_learning_unit(&self.lock().state, unit)
    }
}
