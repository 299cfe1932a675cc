//! Gates a [`CountrySubmission`] and shapes it into the network payload.
//! Validation short-circuits on the first failure, in a fixed order, so the
//! form can point at the offending control.

use serde::Serialize;
use thiserror::Error;

use crate::backend::policy::{CountrySubmission, PolicyRecord, COUNTRIES, POLICY_SLOTS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a country before submitting")]
    CountryMissing,
    #[error("\"{0}\" is not a recognized country")]
    CountryUnknown(String),
    #[error("At least one policy initiative needs a name")]
    NoPolicies,
}

/// Ordered checks: country present, country in the canonical list
/// (case-sensitive exact match), at least one named slot.
pub fn validate(submission: &CountrySubmission) -> Result<(), ValidationError> {
    let country = submission.country.trim();
    if country.is_empty() {
        return Err(ValidationError::CountryMissing);
    }
    if !COUNTRIES.contains(&country) {
        return Err(ValidationError::CountryUnknown(country.to_string()));
    }
    if submission.present_count() == 0 {
        return Err(ValidationError::NoPolicies);
    }
    Ok(())
}

/// Wire shape of `POST /submit-policy`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub country: String,
    pub policy_initiatives: Vec<PolicyRecord>,
}

/// Drop unused slots and stamp each surviving record's file metadata with
/// the server path its upload produced (`None` when the upload was skipped
/// or degraded to local-only). `file_paths` is indexed by slot.
pub fn build_payload(
    submission: &CountrySubmission,
    file_paths: &[Option<String>],
) -> SubmissionPayload {
    assert!(file_paths.len() == POLICY_SLOTS, "one upload result per slot");

    let policy_initiatives = submission
        .policy_initiatives
        .iter()
        .enumerate()
        .filter(|(_, record)| record.is_present())
        .map(|(slot, record)| {
            let mut record = record.clone();
            if let Some(meta) = record.policy_file.as_mut() {
                meta.path = file_paths[slot].clone();
            }
            record
        })
        .collect();

    SubmissionPayload {
        country: submission.country.trim().to_string(),
        policy_initiatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::policy::FileMetadata;

    fn submission_with(country: &str, named_slots: &[(usize, &str)]) -> CountrySubmission {
        let mut submission = CountrySubmission::empty();
        submission.country = country.to_string();
        for (slot, name) in named_slots {
            submission.policy_initiatives[*slot].policy_name = name.to_string();
        }
        submission
    }

    #[test]
    fn test_blank_country_rejected_first() {
        let submission = submission_with("", &[(0, "AI Act")]);
        assert_eq!(validate(&submission), Err(ValidationError::CountryMissing));
    }

    #[test]
    fn test_unknown_country_rejected() {
        let submission = submission_with("Narnia", &[(0, "AI Act")]);
        assert_eq!(
            validate(&submission),
            Err(ValidationError::CountryUnknown("Narnia".to_string()))
        );
    }

    #[test]
    fn test_country_match_is_case_sensitive() {
        let submission = submission_with("france", &[(0, "AI Act")]);
        assert!(matches!(
            validate(&submission),
            Err(ValidationError::CountryUnknown(_))
        ));
    }

    #[test]
    fn test_all_slots_blank_rejected() {
        let submission = submission_with("France", &[]);
        assert_eq!(validate(&submission), Err(ValidationError::NoPolicies));
    }

    #[test]
    fn test_any_named_slot_accepted() {
        // slot 3, not slot 0 — any of the ten counts
        let submission = submission_with("France", &[(3, "AI Act")]);
        assert_eq!(validate(&submission), Ok(()));
    }

    #[test]
    fn test_payload_drops_blank_slots() {
        let submission = submission_with("France", &[(3, "AI Act")]);
        let payload = build_payload(&submission, &vec![None; POLICY_SLOTS]);
        assert_eq!(payload.policy_initiatives.len(), 1);
        assert_eq!(payload.policy_initiatives[0].policy_name, "AI Act");
    }

    #[test]
    fn test_payload_stamps_uploaded_path() {
        let mut submission = submission_with("France", &[(0, "AI Act"), (4, "Compute Fund")]);
        submission.policy_initiatives[4].policy_file = Some(FileMetadata {
            name: "fund.pdf".to_string(),
            size: 123,
            mime: "application/pdf".to_string(),
            path: None,
        });

        let mut paths = vec![None; POLICY_SLOTS];
        paths[4] = Some("uploads/France/4/fund.pdf".to_string());
        let payload = build_payload(&submission, &paths);

        let meta = payload.policy_initiatives[1]
            .policy_file
            .as_ref()
            .expect("metadata kept");
        assert_eq!(meta.path.as_deref(), Some("uploads/France/4/fund.pdf"));
        assert!(payload.policy_initiatives[0].policy_file.is_none());
    }

    #[test]
    fn test_payload_file_shape_on_wire() {
        let mut submission = submission_with("France", &[(0, "AI Act")]);
        submission.policy_initiatives[0].policy_file = Some(FileMetadata {
            name: "act.pdf".to_string(),
            size: 9,
            mime: "application/pdf".to_string(),
            path: None,
        });
        let payload = build_payload(&submission, &vec![None; POLICY_SLOTS]);
        let json = serde_json::to_value(&payload).expect("serialize payload");

        let file = &json["policyInitiatives"][0]["policyFile"];
        let obj = file.as_object().expect("object");
        assert_eq!(obj.len(), 4);
        for key in ["name", "size", "type", "path"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert!(obj["path"].is_null());
    }
}
