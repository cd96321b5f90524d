use crate::entity::{EntityRecord, FilterJoin, FilterSpec};

fn matches(spec: &FilterSpec, record: &EntityRecord, needle: &str) -> bool {
    match spec.join {
        FilterJoin::Concat => {
            let hay = spec
                .fields
                .iter()
                .map(|f| record.text(f))
                .collect::<Vec<_>>()
                .join(" ");
            hay.to_lowercase().contains(needle)
        }
        FilterJoin::AnyOf => spec
            .fields
            .iter()
            .any(|f| record.text(f).to_lowercase().contains(needle)),
    }
}

/// Records passing every active filter, in their original order. Empty terms
/// match everything.
pub fn apply<'a>(
    records: &'a [EntityRecord],
    active: &[(&FilterSpec, &str)],
) -> Vec<&'a EntityRecord> {
    let needles: Vec<(&FilterSpec, String)> = active
        .iter()
        .filter(|(_, term)| !term.is_empty())
        .map(|(spec, term)| (*spec, term.to_lowercase()))
        .collect();
    records
        .iter()
        .filter(|r| needles.iter().all(|(spec, n)| matches(spec, r, n)))
        .collect()
}
