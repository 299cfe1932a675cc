use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Fixed number of policy slots per country submission. Slots with a blank
/// name are treated as unused and dropped before submission.
pub const POLICY_SLOTS: usize = 10;

/// Scores (transparency, explainability, accountability, stakeholder) run 0..=10.
pub const MAX_SCORE: u8 = 10;

/// Countries the submission form accepts. Free text that does not match one
/// of these entries exactly is rejected.
pub const COUNTRIES: &[&str] = &[
    "Argentina", "Australia", "Austria", "Belgium", "Brazil", "Bulgaria",
    "Canada", "Chile", "China", "Colombia", "Croatia", "Czech Republic",
    "Denmark", "Egypt", "Estonia", "Finland", "France", "Germany", "Greece",
    "Hungary", "Iceland", "India", "Indonesia", "Ireland", "Israel", "Italy",
    "Japan", "Kenya", "Latvia", "Lithuania", "Luxembourg", "Malaysia",
    "Malta", "Mexico", "Netherlands", "New Zealand", "Nigeria", "Norway",
    "Poland", "Portugal", "Romania", "Saudi Arabia", "Singapore", "Slovakia",
    "Slovenia", "South Africa", "South Korea", "Spain", "Sweden",
    "Switzerland", "Thailand", "Turkey", "Ukraine", "United Arab Emirates",
    "United Kingdom", "United States", "Uruguay", "Vietnam",
];

pub const POLICY_AREAS: &[&str] = &[
    "National AI Strategy",
    "Research & Innovation",
    "Education & Skills",
    "Public Sector Adoption",
    "Data Governance",
    "Ethics & Safety",
    "Infrastructure & Compute",
    "Labour & Economy",
    "Healthcare",
    "Defence & Security",
    "Regulation & Standards",
];

pub const TARGET_GROUPS: &[&str] = &[
    "General public",
    "Private sector",
    "Academia",
    "Public administration",
    "SMEs & startups",
    "Students",
    "Researchers",
    "Civil society",
    "Vulnerable groups",
];

pub const AI_PRINCIPLES: &[&str] = &[
    "Transparency",
    "Accountability",
    "Fairness & non-discrimination",
    "Privacy & data protection",
    "Safety & robustness",
    "Human oversight",
    "Sustainability",
    "Inclusiveness",
];

pub const CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "CNY", "CHF", "SEK", "NOK", "DKK", "CAD",
    "AUD", "INR", "BRL", "KRW", "SGD",
];

pub const EVALUATION_TYPES: &[&str] = &["internal", "external", "mixed"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountrySubmission {
    pub country: String,
    pub policy_initiatives: Vec<PolicyRecord>,
}

impl CountrySubmission {
    /// Fresh submission: blank country, ten empty slots.
    pub fn empty() -> Self {
        Self {
            country: String::new(),
            policy_initiatives: (0..POLICY_SLOTS).map(|_| PolicyRecord::empty()).collect(),
        }
    }

    /// Number of slots that count as filled in (non-blank trimmed name).
    pub fn present_count(&self) -> usize {
        self.policy_initiatives.iter().filter(|p| p.is_present()).count()
    }
}

impl Default for CountrySubmission {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyRecord {
    pub policy_name: String,
    pub policy_id: String,
    pub policy_area: String,
    pub target_groups: Vec<String>,
    pub policy_description: String,
    pub policy_link: String,
    pub policy_file: Option<FileMetadata>,
    pub implementation: Implementation,
    pub evaluation: Evaluation,
    pub participation: Participation,
    pub alignment: Alignment,

    // Moderation-side fields, filled in by the backend once a submission
    // enters review. Never sent by the form.
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<PolicyStatus>,
    #[serde(rename = "admin_notes", skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(rename = "original_submission_id", skip_serializing_if = "Option::is_none")]
    pub original_submission_id: Option<String>,
    #[serde(rename = "moved_to_master_at", skip_serializing_if = "Option::is_none")]
    pub moved_to_master_at: Option<String>,
}

impl PolicyRecord {
    /// Canonical empty record: scalars at zero value, sets empty, currency
    /// defaulted to USD, deployment year defaulted to the current year.
    pub fn empty() -> Self {
        Self {
            policy_name: String::new(),
            policy_id: String::new(),
            policy_area: String::new(),
            target_groups: Vec::new(),
            policy_description: String::new(),
            policy_link: String::new(),
            policy_file: None,
            implementation: Implementation::empty(),
            evaluation: Evaluation::empty(),
            participation: Participation::empty(),
            alignment: Alignment::empty(),
            status: None,
            admin_notes: None,
            original_submission_id: None,
            moved_to_master_at: None,
        }
    }

    /// A slot counts as present iff its trimmed name is non-blank.
    pub fn is_present(&self) -> bool {
        !self.policy_name.trim().is_empty()
    }
}

impl Default for PolicyRecord {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Implementation {
    pub yearly_budget: String,
    pub budget_currency: String,
    pub private_sec_funding: bool,
    pub deployment_year: i32,
}

impl Implementation {
    pub fn empty() -> Self {
        Self {
            yearly_budget: String::new(),
            budget_currency: "USD".to_string(),
            private_sec_funding: false,
            deployment_year: Utc::now().year(),
        }
    }
}

impl Default for Implementation {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Evaluation {
    pub is_evaluated: bool,
    pub evaluation_type: String,
    pub risk_assessment: bool,
    pub transparency_score: u8,
    pub explainability_score: u8,
    pub accountability_score: u8,
}

impl Evaluation {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Participation {
    pub has_consultation: bool,
    pub consultation_start_date: String,
    pub consultation_end_date: String,
    pub comments_public: bool,
    pub stakeholder_score: u8,
}

impl Participation {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Alignment {
    pub ai_principles: Vec<String>,
    pub human_rights_alignment: bool,
    pub environmental_considerations: bool,
    pub international_cooperation: bool,
}

impl Alignment {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Metadata stub that stands in for an attached document on the wire. The
/// raw file bytes travel separately over the multipart upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileMetadata {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime: String,
    pub path: Option<String>,
}

/// A file picked in the browser, held in form state until submit. Never
/// serialized; `metadata()` is what goes into the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttachment {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn metadata(&self) -> FileMetadata {
        FileMetadata {
            name: self.name.clone(),
            size: self.size,
            mime: self.mime.clone(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Pending,
    Approved,
    Rejected,
    NeedsRevision,
    Active,
}

impl PolicyStatus {
    /// Terminal from the moderator's perspective: nothing left to decide.
    pub fn is_terminal(self) -> bool {
        matches!(self, PolicyStatus::Approved | PolicyStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyStatus::Pending => "pending",
            PolicyStatus::Approved => "approved",
            PolicyStatus::Rejected => "rejected",
            PolicyStatus::NeedsRevision => "needs_revision",
            PolicyStatus::Active => "active",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_defaults() {
        let record = PolicyRecord::empty();
        assert!(record.target_groups.is_empty());
        assert!(record.alignment.ai_principles.is_empty());
        assert_eq!(record.implementation.budget_currency, "USD");
        assert_eq!(record.implementation.deployment_year, Utc::now().year());
        assert_eq!(record.evaluation.transparency_score, 0);
        assert!(!record.is_present());
        assert!(record.status.is_none());
    }

    #[test]
    fn test_empty_submission_has_ten_slots() {
        let submission = CountrySubmission::empty();
        assert_eq!(submission.policy_initiatives.len(), POLICY_SLOTS);
        assert_eq!(submission.present_count(), 0);
    }

    #[test]
    fn test_presence_ignores_whitespace() {
        let mut record = PolicyRecord::empty();
        record.policy_name = "   ".to_string();
        assert!(!record.is_present());
        record.policy_name = " AI Act ".to_string();
        assert!(record.is_present());
    }

    #[test]
    fn test_record_wire_names() {
        let mut record = PolicyRecord::empty();
        record.policy_name = "AI Act".to_string();
        record.status = Some(PolicyStatus::NeedsRevision);

        let json = serde_json::to_value(&record).expect("serialize record");
        assert!(json.get("policyName").is_some());
        assert!(json.get("targetGroups").is_some());
        assert_eq!(json["status"], "needs_revision");
        // absent moderation fields are omitted entirely
        assert!(json.get("admin_notes").is_none());
    }

    #[test]
    fn test_record_deserializes_with_missing_fields() {
        let record: PolicyRecord =
            serde_json::from_str(r#"{"policyName":"AI Act"}"#).expect("deserialize");
        assert_eq!(record.policy_name, "AI Act");
        assert_eq!(record.implementation.budget_currency, "USD");
    }

    #[test]
    fn test_file_metadata_shape() {
        let attachment = FileAttachment {
            name: "strategy.pdf".to_string(),
            size: 2048,
            mime: "application/pdf".to_string(),
            bytes: vec![0u8; 2048],
        };
        let json = serde_json::to_value(attachment.metadata()).expect("serialize metadata");
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 4);
        assert_eq!(obj["name"], "strategy.pdf");
        assert_eq!(obj["size"], 2048);
        assert_eq!(obj["type"], "application/pdf");
        assert!(obj["path"].is_null());
    }
}
