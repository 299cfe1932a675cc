//! Pure copy-on-write updates over a [`CountrySubmission`]. The UI keeps the
//! whole submission in one signal and replaces it wholesale on every edit, so
//! change detection works by plain structural comparison.

use crate::backend::policy::{CountrySubmission, FileMetadata, MAX_SCORE, POLICY_SLOTS};

/// One top-level field of a policy record, carrying its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyField {
    Name(String),
    Id(String),
    Area(String),
    Description(String),
    Link(String),
    File(Option<FileMetadata>),
}

/// One field inside a nested section of a policy record.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionField {
    Implementation(ImplementationField),
    Evaluation(EvaluationField),
    Participation(ParticipationField),
    Alignment(AlignmentField),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImplementationField {
    YearlyBudget(String),
    BudgetCurrency(String),
    PrivateSecFunding(bool),
    DeploymentYear(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationField {
    IsEvaluated(bool),
    EvaluationType(String),
    RiskAssessment(bool),
    TransparencyScore(u8),
    ExplainabilityScore(u8),
    AccountabilityScore(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParticipationField {
    HasConsultation(bool),
    ConsultationStartDate(String),
    ConsultationEndDate(String),
    CommentsPublic(bool),
    StakeholderScore(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentField {
    HumanRightsAlignment(bool),
    EnvironmentalConsiderations(bool),
    InternationalCooperation(bool),
}

/// Which set-valued field a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    /// Top-level `targetGroups`.
    TargetGroups,
    /// Nested `alignment.aiPrinciples`.
    AiPrinciples,
}

/// Replace one top-level field of the record at `index`. The input is left
/// untouched; every other slot in the result compares equal to the input.
/// An out-of-range index is a programmer error and asserts.
pub fn update_field(
    submission: &CountrySubmission,
    index: usize,
    field: PolicyField,
) -> CountrySubmission {
    with_record(submission, index, |record| match field {
        PolicyField::Name(v) => record.policy_name = v,
        PolicyField::Id(v) => record.policy_id = v,
        PolicyField::Area(v) => record.policy_area = v,
        PolicyField::Description(v) => record.policy_description = v,
        PolicyField::Link(v) => record.policy_link = v,
        PolicyField::File(v) => record.policy_file = v,
    })
}

/// Same as [`update_field`], one level deeper. Score values clamp to 0..=10.
pub fn update_section_field(
    submission: &CountrySubmission,
    index: usize,
    field: SectionField,
) -> CountrySubmission {
    with_record(submission, index, |record| match field {
        SectionField::Implementation(f) => {
            let s = &mut record.implementation;
            match f {
                ImplementationField::YearlyBudget(v) => s.yearly_budget = v,
                ImplementationField::BudgetCurrency(v) => s.budget_currency = v,
                ImplementationField::PrivateSecFunding(v) => s.private_sec_funding = v,
                ImplementationField::DeploymentYear(v) => s.deployment_year = v,
            }
        }
        SectionField::Evaluation(f) => {
            let s = &mut record.evaluation;
            match f {
                EvaluationField::IsEvaluated(v) => s.is_evaluated = v,
                EvaluationField::EvaluationType(v) => s.evaluation_type = v,
                EvaluationField::RiskAssessment(v) => s.risk_assessment = v,
                EvaluationField::TransparencyScore(v) => s.transparency_score = v.min(MAX_SCORE),
                EvaluationField::ExplainabilityScore(v) => {
                    s.explainability_score = v.min(MAX_SCORE)
                }
                EvaluationField::AccountabilityScore(v) => {
                    s.accountability_score = v.min(MAX_SCORE)
                }
            }
        }
        SectionField::Participation(f) => {
            let s = &mut record.participation;
            match f {
                ParticipationField::HasConsultation(v) => s.has_consultation = v,
                ParticipationField::ConsultationStartDate(v) => s.consultation_start_date = v,
                ParticipationField::ConsultationEndDate(v) => s.consultation_end_date = v,
                ParticipationField::CommentsPublic(v) => s.comments_public = v,
                ParticipationField::StakeholderScore(v) => s.stakeholder_score = v.min(MAX_SCORE),
            }
        }
        SectionField::Alignment(f) => {
            let s = &mut record.alignment;
            match f {
                AlignmentField::HumanRightsAlignment(v) => s.human_rights_alignment = v,
                AlignmentField::EnvironmentalConsiderations(v) => {
                    s.environmental_considerations = v
                }
                AlignmentField::InternationalCooperation(v) => s.international_cooperation = v,
            }
        }
    })
}

/// Toggle membership of `item` in the targeted set: remove it if present,
/// append it otherwise. Never introduces duplicates; toggling twice is a
/// round trip back to the original set.
pub fn toggle_set_membership(
    submission: &CountrySubmission,
    index: usize,
    set: SetField,
    item: &str,
) -> CountrySubmission {
    with_record(submission, index, |record| {
        let members = match set {
            SetField::TargetGroups => &mut record.target_groups,
            SetField::AiPrinciples => &mut record.alignment.ai_principles,
        };
        if let Some(pos) = members.iter().position(|m| m == item) {
            members.remove(pos);
        } else {
            members.push(item.to_string());
        }
    })
}

fn with_record(
    submission: &CountrySubmission,
    index: usize,
    mutate: impl FnOnce(&mut crate::backend::policy::PolicyRecord),
) -> CountrySubmission {
    assert!(
        index < POLICY_SLOTS,
        "policy index {} out of range (0..{})",
        index,
        POLICY_SLOTS
    );
    let mut next = submission.clone();
    mutate(&mut next.policy_initiatives[index]);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::policy::PolicyRecord;

    fn named(submission: &CountrySubmission, index: usize, name: &str) -> CountrySubmission {
        update_field(submission, index, PolicyField::Name(name.to_string()))
    }

    #[test]
    fn test_update_field_touches_only_target_slot() {
        let original = CountrySubmission::empty();
        let updated = named(&original, 3, "AI Act");

        assert_eq!(updated.policy_initiatives[3].policy_name, "AI Act");
        for i in 0..POLICY_SLOTS {
            if i != 3 {
                assert_eq!(updated.policy_initiatives[i], original.policy_initiatives[i]);
            }
        }
        // the input is untouched
        assert_eq!(original.policy_initiatives[3], PolicyRecord::empty());
    }

    #[test]
    fn test_update_section_field_nested() {
        let original = CountrySubmission::empty();
        let updated = update_section_field(
            &original,
            0,
            SectionField::Implementation(ImplementationField::DeploymentYear(2019)),
        );
        assert_eq!(updated.policy_initiatives[0].implementation.deployment_year, 2019);
        assert_eq!(
            updated.policy_initiatives[0].policy_name,
            original.policy_initiatives[0].policy_name
        );
    }

    #[test]
    fn test_scores_clamp_to_scale() {
        let original = CountrySubmission::empty();
        let updated = update_section_field(
            &original,
            0,
            SectionField::Evaluation(EvaluationField::TransparencyScore(42)),
        );
        assert_eq!(updated.policy_initiatives[0].evaluation.transparency_score, 10);
    }

    #[test]
    fn test_toggle_is_own_inverse() {
        let original = CountrySubmission::empty();
        let once = toggle_set_membership(&original, 2, SetField::TargetGroups, "Academia");
        assert_eq!(once.policy_initiatives[2].target_groups, vec!["Academia"]);

        let twice = toggle_set_membership(&once, 2, SetField::TargetGroups, "Academia");
        assert_eq!(twice, original);
    }

    #[test]
    fn test_toggle_never_duplicates() {
        let mut submission = CountrySubmission::empty();
        for _ in 0..5 {
            submission =
                toggle_set_membership(&submission, 0, SetField::AiPrinciples, "Transparency");
        }
        let principles = &submission.policy_initiatives[0].alignment.ai_principles;
        assert_eq!(principles.iter().filter(|p| *p == "Transparency").count(), 1);
    }

    #[test]
    fn test_toggle_nested_principles() {
        let original = CountrySubmission::empty();
        let updated =
            toggle_set_membership(&original, 1, SetField::AiPrinciples, "Human oversight");
        assert_eq!(
            updated.policy_initiatives[1].alignment.ai_principles,
            vec!["Human oversight"]
        );
        assert!(updated.policy_initiatives[1].target_groups.is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let submission = CountrySubmission::empty();
        let _ = named(&submission, POLICY_SLOTS, "oops");
    }
}
