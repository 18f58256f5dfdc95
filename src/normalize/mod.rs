pub mod location;
pub mod places;
pub mod salary;

use tracing::debug;

use crate::ingest::RawPosting;
use location::LocationMatch;
use salary::SalaryRange;

/// A raw posting with parsed salary and location. Recomputed every run,
/// never persisted on its own.
#[derive(Debug, Clone)]
pub struct NormalizedPosting {
    pub raw: RawPosting,
    pub salary: Option<SalaryRange>,
    pub location: LocationMatch,
    /// Salary midpoint normalized to the baseline locality.
    pub salary_adjusted: Option<f64>,
}

/// Non-fatal parse failures accumulated across a batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParseWarnings {
    pub salary: usize,
    pub location: usize,
}

/// Normalization never fails: unparsable fields become None/unmatched and
/// bump a warning counter.
pub fn normalize(raw: RawPosting, warnings: &mut ParseWarnings) -> NormalizedPosting {
    let salary = salary::parse_salary(&raw.salary_text);
    if salary.is_none() && !raw.salary_text.is_empty() {
        warnings.salary += 1;
        debug!(title = %raw.title, salary = %raw.salary_text, "salary text not parsable");
    }

    let location = location::parse_location(&raw.location_text);
    if location.confidence == 0.0 && !raw.location_text.is_empty() {
        warnings.location += 1;
        debug!(title = %raw.title, location = %raw.location_text, "location text not matched");
    }

    let salary_adjusted = match (&salary, location.cost_index) {
        (Some(range), Some(idx)) => Some(location::adjust_to_baseline(range.midpoint(), idx)),
        _ => None,
    };

    NormalizedPosting { raw, salary, location, salary_adjusted }
}
