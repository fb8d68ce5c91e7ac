use super::hit::Hit;

/// Drop linkers and intervals covering less than `min_coverage` of their profile.
///
/// Order is preserved. Survivors that end up adjacent are not merged.
pub fn filter_domains(hits: Vec<Hit>, min_coverage: f64) -> Vec<Hit> {
    hits.into_iter()
        .filter(|hit| !hit.is_linker() && hit.coverage.is_some_and(|c| c >= min_coverage))
        .collect()
}
