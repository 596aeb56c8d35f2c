use crate::params::FetchParams;
use crate::types::EntityKind;

/// Cache key for one (entity type, parameters) pair.
///
/// Filters live in a sorted map, so two parameter sets with the same content
/// always produce the same key regardless of insertion order.
pub fn cache_key(kind: EntityKind, params: &FetchParams) -> String {
    let scope = params.scope.as_ref().map(|s| s.as_str()).unwrap_or("");
    let filters = serde_json::to_string(&params.filters).unwrap_or_default();
    format!("{}\n{}\n{}", kind.as_str(), scope, filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityId;

    #[test]
    fn test_key_ignores_filter_order() {
        let a = FetchParams::new()
            .with_filter("category", "IPA")
            .with_filter("q", "fis");
        let b = FetchParams::new()
            .with_filter("q", "fis")
            .with_filter("category", "IPA");
        assert_eq!(
            cache_key(EntityKind::Subject, &a),
            cache_key(EntityKind::Subject, &b)
        );
    }

    #[test]
    fn test_key_distinguishes_kind_and_scope() {
        let params = FetchParams::scoped(EntityId::from(1));
        assert_ne!(
            cache_key(EntityKind::Subject, &params),
            cache_key(EntityKind::Class, &params)
        );
        assert_ne!(
            cache_key(EntityKind::Class, &params),
            cache_key(EntityKind::Class, &FetchParams::scoped(EntityId::from(2)))
        );
        assert_ne!(
            cache_key(EntityKind::Class, &params),
            cache_key(EntityKind::Class, &FetchParams::new())
        );
    }
}
