use super::super::domain::SeverityVerdict;
use super::SeverityScore;

/// Map a weighted score onto a verdict band.
///
/// Bands are upper-inclusive, so half-point scores land in the next band up and the
/// mapping stays monotonic.
pub(crate) fn verdict_for_score(score: SeverityScore) -> SeverityVerdict {
    match score.half_points() {
        0..=2 => SeverityVerdict::Mild,
        3..=4 => SeverityVerdict::Moderate,
        5..=6 => SeverityVerdict::Severe,
        _ => SeverityVerdict::VerySevere,
    }
}
