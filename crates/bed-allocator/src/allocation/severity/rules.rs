use super::super::domain::{PatientAssessment, SeverityVerdict};
use super::{ScoreComponent, SeverityFactor, SeverityScore};

const PEDIATRIC_AGE_LIMIT: u32 = 15;
const PLATELETS_CRITICAL: u32 = 50_000;
const PLATELETS_LOW: u32 = 100_000;
const PLATELETS_BORDERLINE: u32 = 150_000;

/// Weighted rubric: NS1 and IgM count one point each, IgG half a point, a pediatric
/// patient one point, and thrombocytopenia up to three points.
pub(crate) fn score_assessment(
    assessment: &PatientAssessment,
) -> (Vec<ScoreComponent>, SeverityScore) {
    let mut components = Vec::new();
    let mut half_points: u16 = 0;

    let mut award = |factor: SeverityFactor, points: u16, notes: String| {
        half_points += points;
        components.push(ScoreComponent {
            factor,
            points: Some(f32::from(points) / 2.0),
            notes,
        });
    };

    if assessment.ns1_positive {
        award(SeverityFactor::Ns1, 2, "NS1 antigen positive".to_string());
    }
    if assessment.igm_positive {
        award(SeverityFactor::IgM, 2, "IgM antibody positive".to_string());
    }
    if assessment.igg_positive {
        award(
            SeverityFactor::IgG,
            1,
            "IgG antibody positive (secondary exposure)".to_string(),
        );
    }
    if assessment.age < PEDIATRIC_AGE_LIMIT {
        award(
            SeverityFactor::PediatricAge,
            2,
            format!("age {} below {PEDIATRIC_AGE_LIMIT}", assessment.age),
        );
    }

    let platelets = assessment.platelet_count;
    if platelets < PLATELETS_CRITICAL {
        award(
            SeverityFactor::PlateletCount,
            6,
            format!("platelets {platelets} below {PLATELETS_CRITICAL}"),
        );
    } else if platelets < PLATELETS_LOW {
        award(
            SeverityFactor::PlateletCount,
            4,
            format!("platelets {platelets} below {PLATELETS_LOW}"),
        );
    } else if platelets < PLATELETS_BORDERLINE {
        award(
            SeverityFactor::PlateletCount,
            2,
            format!("platelets {platelets} below {PLATELETS_BORDERLINE}"),
        );
    }

    (components, SeverityScore::from_half_points(half_points))
}

/// Threshold rubric: critical platelets or triple-positive serology escalate straight to
/// the top band, low platelets to severe, everything else is mild.
pub(crate) fn threshold_assessment(
    assessment: &PatientAssessment,
) -> (Vec<ScoreComponent>, SeverityVerdict) {
    let platelets = assessment.platelet_count;
    let triple_positive =
        assessment.igg_positive && assessment.igm_positive && assessment.ns1_positive;

    let mut components = Vec::new();
    if platelets < PLATELETS_CRITICAL {
        components.push(ScoreComponent {
            factor: SeverityFactor::PlateletCount,
            points: None,
            notes: format!("platelets {platelets} below {PLATELETS_CRITICAL}"),
        });
    } else if platelets < PLATELETS_LOW {
        components.push(ScoreComponent {
            factor: SeverityFactor::PlateletCount,
            points: None,
            notes: format!("platelets {platelets} below {PLATELETS_LOW}"),
        });
    }
    if triple_positive {
        components.push(ScoreComponent {
            factor: SeverityFactor::Serology,
            points: None,
            notes: "IgG, IgM and NS1 all positive".to_string(),
        });
    }

    let verdict = if platelets < PLATELETS_CRITICAL || triple_positive {
        SeverityVerdict::VerySevere
    } else if platelets < PLATELETS_LOW {
        SeverityVerdict::Severe
    } else {
        SeverityVerdict::Mild
    };

    (components, verdict)
}
