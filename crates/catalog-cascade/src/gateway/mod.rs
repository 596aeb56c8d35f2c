//! Entity gateway: the remote source of catalog lists.
//!
//! The resolver only knows the [`EntityGateway`] trait. [`HttpGateway`] is the
//! REST implementation; tests plug in their own.

use async_trait::async_trait;

use crate::error::CascadeResult;
use crate::params::FetchParams;
use crate::types::{Catalog, Class, EntityKind, GradeLevel, LearningUnit, Subject};

mod helpers;
mod http;

pub use http::HttpGateway;

/// Remote accessor for the four catalog entity types.
///
/// An `Err` is the gateway's "ok: false" answer. The resolver records it and
/// never retries on its own.
#[async_trait]
pub trait EntityGateway: Send + Sync {
    async fn fetch_grade_levels(&self, params: &FetchParams) -> CascadeResult<Vec<GradeLevel>>;

    async fn fetch_subjects(&self, params: &FetchParams) -> CascadeResult<Vec<Subject>>;

    async fn fetch_classes(&self, params: &FetchParams) -> CascadeResult<Vec<Class>>;

    async fn fetch_learning_units(&self, params: &FetchParams)
        -> CascadeResult<Vec<LearningUnit>>;
}

/// Fetch one entity type and wrap it as a [`Catalog`].
pub(crate) async fn fetch_catalog<G>(
    gateway: &G,
    kind: EntityKind,
    params: &FetchParams,
) -> CascadeResult<Catalog>
where
    G: EntityGateway + ?Sized,
{
    Ok(match kind {
        EntityKind::GradeLevel => Catalog::GradeLevels(gateway.fetch_grade_levels(params).await?),
        EntityKind::Subject => Catalog::Subjects(gateway.fetch_subjects(params).await?),
        EntityKind::Class => Catalog::Classes(gateway.fetch_classes(params).await?),
        EntityKind::LearningUnit => {
            Catalog::LearningUnits(gateway.fetch_learning_units(params).await?)
        }
    })
}
