use crate::reading::Reading;

/// Distinct contributor names, newest first, at most `limit` of them.
///
/// Anonymous and blank names are skipped. A name that submitted several times
/// is placed by its most recent reading.
pub fn recent_contributors(readings: &[Reading], limit: usize) -> Vec<String> {
    let mut ordered: Vec<&Reading> = readings.iter().collect();
    ordered.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let mut names: Vec<String> = Vec::with_capacity(limit.min(ordered.len()));

    for reading in ordered {
        if names.len() >= limit {
            break;
        }

        let Some(name) = reading.submitted_by.as_deref().map(str::trim) else {
            continue;
        };
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }

        names.push(name.to_string());
    }

    names
}
