use catalog_cascade::{EntityId, EntityKind, GatewayConfig, ResolverConfig};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "catalog-cascade",
    version,
    about = "Load grade levels, subjects, classes and learning units and inspect the cascade"
)]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load every catalog and print a summary
    Load(LoadArgs),
    /// Print the options a picker would show
    Options(OptionsArgs),
    /// Check that a subject and a class agree on grade level
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// Catalog API base URL
    #[arg(long, env = "CATALOG_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CATALOG_API_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Cache TTL in seconds
    #[arg(long, env = "CATALOG_CACHE_TTL", global = true)]
    pub cache_ttl: Option<u64>,
}

impl ApiArgs {
    pub fn gateway_config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        if let Some(url) = &self.api_url {
            config = config.with_url(url.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout_secs(secs);
        }
        config
    }

    pub fn resolver_config(&self, learning_units: bool) -> ResolverConfig {
        let mut config = ResolverConfig::from_env();
        config.load_learning_units |= learning_units;
        if let Some(ttl) = self.cache_ttl {
            config.cache_ttl_secs = ttl;
        }
        config
    }
}

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Also load learning units
    #[arg(long)]
    pub learning_units: bool,

    /// Extra filter passed to every fetch (key=value, repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityArg {
    GradeLevel,
    Subject,
    Class,
    LearningUnit,
}

impl From<EntityArg> for EntityKind {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::GradeLevel => EntityKind::GradeLevel,
            EntityArg::Subject => EntityKind::Subject,
            EntityArg::Class => EntityKind::Class,
            EntityArg::LearningUnit => EntityKind::LearningUnit,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct OptionsArgs {
    /// Entity type to list
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Select this grade level first (reloads subjects and classes scoped to it)
    #[arg(long, value_parser = parse_id)]
    pub grade_level: Option<EntityId>,

    /// Only learning units of this subject
    #[arg(long, value_parser = parse_id)]
    pub subject: Option<EntityId>,

    /// Only learning units of this class
    #[arg(long, value_parser = parse_id)]
    pub class: Option<EntityId>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long, value_parser = parse_id)]
    pub subject: EntityId,

    #[arg(long, value_parser = parse_id)]
    pub class: EntityId,
}

fn parse_id(raw: &str) -> Result<EntityId, String> {
    EntityId::parse(raw).map_err(|e| e.to_string())
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got {:?}", raw)),
    }
}
