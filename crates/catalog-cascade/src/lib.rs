//! Reference-data cascade for school catalogs.
//!
//! Fetches and composes four related catalogs:
//!
//! - grade levels (Jenjang), the root
//! - subjects (Mata Pelajaran), scoped to one grade level or global
//! - classes (Kelas), always scoped to one grade level
//! - learning units (Materi), tied to one subject and one class
//!
//! The [`CascadeResolver`] keeps the collections consistent with the selected
//! parents, serves repeated fetches from a TTL cache, and checks that a
//! subject/class pair agrees on its grade level.
//!
//! # Quick Start
//!
//! ```no_run
//! use catalog_cascade::{
//!     CascadeResolver, EntityId, FetchParams, GatewayConfig, HttpGateway, ResolverConfig,
//! };
//!
//! # async fn example() -> Result<(), catalog_cascade::CascadeError> {
//! let gateway = HttpGateway::new(GatewayConfig::from_env())?;
//! let resolver = CascadeResolver::new(gateway, ResolverConfig::from_env());
//!
//! let report = resolver.load_all(&FetchParams::new()).await;
//! if !report.is_ok() {
//!     eprintln!("{:?}", resolver.state().await.error);
//! }
//!
//! resolver.select_grade_level(Some(EntityId::from(1))).await;
//! let subjects = resolver.subject_options(Some(&EntityId::from(1))).await;
//! println!("{} subjects", subjects.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CATALOG_API_URL` | Catalog API base URL (default: `http://localhost:3000/api`) |
//! | `CATALOG_API_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `CATALOG_CACHE_TTL` | Cache TTL in seconds (default: 300) |
//! | `CATALOG_LOAD_LEARNING_UNITS` | Load learning units in `load_all` |

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ids;
pub mod options;
pub mod params;
pub mod resolver;
pub mod state;
pub mod types;
pub mod validate;

// Re-export main types
pub use cache::{cache_key, TtlCache, DEFAULT_TTL_SECS};
pub use config::{EndpointPaths, GatewayConfig, ResolverConfig};
pub use error::{CascadeError, CascadeResult};
pub use gateway::{EntityGateway, HttpGateway};
pub use ids::EntityId;
pub use options::{get_options, OptionItem, OptionList, ParentFilters};
pub use params::FetchParams;
pub use resolver::{CascadeResolver, LoadReport, ReloadOutcome};
pub use state::{CascadeState, LoadingFlags, ResolverError, Selection};
pub use types::{Catalog, Class, ClassKind, EntityKind, GradeLevel, LearningUnit, Subject};
pub use validate::{validate_consistency, Consistency};
