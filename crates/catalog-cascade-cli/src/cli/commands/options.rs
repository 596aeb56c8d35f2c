use catalog_cascade::{EntityKind, FetchParams, ParentFilters};
use tracing::warn;

use super::{build_resolver, print_json};
use crate::cli::args::{ApiArgs, OptionsArgs};
use crate::exit_codes;

pub async fn run(api: &ApiArgs, args: OptionsArgs) -> anyhow::Result<i32> {
    let kind = EntityKind::from(args.entity);
    let resolver = build_resolver(api, kind == EntityKind::LearningUnit)?;

    let mut ok = resolver.load_all(&FetchParams::new()).await.is_ok();
    if let Some(grade_level) = &args.grade_level {
        ok &= resolver
            .select_grade_level(Some(grade_level.clone()))
            .await
            .is_ok();
    }

    let filters = ParentFilters {
        grade_level_id: args.grade_level,
        subject_id: args.subject,
        class_id: args.class,
    };
    let options = resolver.get_options(kind, &filters).await;
    print_json(&options)?;

    if ok {
        Ok(exit_codes::SUCCESS)
    } else {
        warn!(entity = %kind, "options are based on an incomplete load");
        Ok(exit_codes::FETCH_FAILED)
    }
}
