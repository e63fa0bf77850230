//! Revision instructions built from an assessment.

use fidelity_core::models::QualityAssessment;

/// Instruction asking the oracle to revise a draft, naming up to
/// `max_dimensions` of its lowest-scoring dimensions that are below
/// `target`, weakest first, with the oracle's own rationale.
pub fn revision_instruction(
    assessment: &QualityAssessment,
    target: f64,
    max_dimensions: usize,
) -> String {
    let weakest: Vec<_> = assessment
        .lowest(max_dimensions)
        .into_iter()
        .filter(|d| d.score() < target)
        .collect();

    let mut out = String::from(
        "Revise the document. Keep every statement supported by the source and do not add new claims.",
    );
    if weakest.is_empty() {
        out.push_str(&format!(
            "\nRaise the overall quality to at least {target:.2} (currently {:.2}).",
            assessment.aggregate()
        ));
        return out;
    }
    out.push_str("\nImprove these dimensions first:");
    for dim in weakest {
        out.push_str(&format!("\n- {} (scored {:.1}, target {target:.1})", dim.name(), dim.score()));
        let rationale = dim.rationale().trim();
        if !rationale.is_empty() {
            out.push_str(": ");
            out.push_str(rationale);
        }
    }
    out
}
