use chrono::{Datelike, Utc};
use dioxus::prelude::*;

use crate::backend::form::{
    self, AlignmentField, EvaluationField, ImplementationField, ParticipationField, PolicyField,
    SectionField, SetField,
};
use crate::backend::policy::{
    FileAttachment, AI_PRINCIPLES, COUNTRIES, CURRENCIES, EVALUATION_TYPES, POLICY_AREAS,
    POLICY_SLOTS, TARGET_GROUPS,
};
use crate::backend::submit::{validate, ValidationError};
use crate::backend::AppCmd;
use crate::components::common::{NoticeBanner, ScoreSelect};
use crate::components::AppState;

const TABS: &[&str] = &[
    "Basics",
    "Implementation",
    "Evaluation",
    "Participation",
    "Alignment",
];

#[component]
pub fn SubmissionComponent() -> Element {
    let app_state = use_context::<AppState>();
    let cmd_tx = use_context::<tokio::sync::mpsc::UnboundedSender<AppCmd>>();

    let mut submission = app_state.submission;
    let mut attachments = app_state.attachments;
    let mut submitting = app_state.submitting;

    let slot = use_signal(|| 0usize);
    let mut active_tab = use_signal(|| "Basics".to_string());
    let mut validation = use_signal(|| None::<ValidationError>);

    // every edit funnels through the pure update helpers; the whole
    // submission is replaced so slot rendering stays in sync
    let mut apply = move |field: PolicyField| {
        let next = form::update_field(&submission.read(), slot(), field);
        submission.set(next);
    };
    let mut apply_section = move |field: SectionField| {
        let next = form::update_section_field(&submission.read(), slot(), field);
        submission.set(next);
    };
    let mut toggle = move |set: SetField, item: &str| {
        let next = form::toggle_set_membership(&submission.read(), slot(), set, item);
        submission.set(next);
    };

    let on_file_picked = move |evt: Event<FormData>| {
        let files: Vec<_> = evt.files().into_iter().collect();
        spawn(async move {
            for file_data in files {
                let name = file_data.name();
                let mime = file_data
                    .content_type()
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                if let Ok(raw) = file_data.read_bytes().await {
                    let bytes: Vec<u8> = raw.to_vec();
                    let attachment = FileAttachment {
                        name: name.clone(),
                        size: bytes.len() as u64,
                        mime,
                        bytes,
                    };
                    let meta = attachment.metadata();
                    attachments.write()[slot()] = Some(attachment);
                    let next = form::update_field(
                        &submission.read(),
                        slot(),
                        PolicyField::File(Some(meta)),
                    );
                    submission.set(next);
                }
            }
        });
    };

    let clear_file = move |_| {
        attachments.write()[slot()] = None;
        let next = form::update_field(&submission.read(), slot(), PolicyField::File(None));
        submission.set(next);
    };

    let cmd_tx_submit = cmd_tx.clone();
    let on_submit = move |_| {
        let current = submission.read().clone();
        match validate(&current) {
            Err(e) => validation.set(Some(e)),
            Ok(()) => {
                validation.set(None);
                submitting.set(true);
                let _ = cmd_tx_submit.send(AppCmd::SubmitPolicies {
                    submission: current,
                    attachments: attachments.read().clone(),
                });
            }
        }
    };

    let current = submission.read().clone();
    let record = current.policy_initiatives[slot()].clone();
    let attachment_name = attachments.read()[slot()].as_ref().map(|a| a.name.clone());
    let error = validation.read().clone();
    let country_error = matches!(
        error,
        Some(ValidationError::CountryMissing) | Some(ValidationError::CountryUnknown(_))
    );
    let policy_error = matches!(error, Some(ValidationError::NoPolicies));
    let year_now = Utc::now().year();

    rsx! {
        div { class: "page-container py-8 animate-fade-in",
            div { class: "page-header",
                h1 { class: "page-title", "Submit AI Policies" }
                p { class: "text-[var(--text-secondary)]",
                    "Document up to {POLICY_SLOTS} national AI policy initiatives for one country."
                }
            }

            NoticeBanner { notice: app_state.form_notice }

            // Country
            div { class: "panel mb-6",
                div { class: "form-group",
                    label { class: "form-label", "Country" }
                    select {
                        class: "input",
                        value: "{current.country}",
                        onchange: move |e| {
                            validation.set(None);
                            let mut next = submission.read().clone();
                            next.country = e.value();
                            submission.set(next);
                        },
                        option { value: "", "Select a country..." }
                        for country in COUNTRIES.iter() {
                            option { value: "{country}", "{country}" }
                        }
                    }
                    if country_error {
                        if let Some(e) = &error {
                            p { class: "form-error", "{e}" }
                        }
                    }
                }
            }

            // Slot picker
            div { class: "mb-6",
                div { class: "flex gap-2 flex-wrap",
                    for i in 0..POLICY_SLOTS {
                        {
                            let filled = current.policy_initiatives[i].is_present();
                            let mut slot = slot.clone();
                            let class = if slot() == i {
                                "btn btn-primary btn-sm"
                            } else if filled {
                                "btn btn-secondary btn-sm slot-filled"
                            } else {
                                "btn btn-secondary btn-sm"
                            };
                            rsx! {
                                button {
                                    key: "{i}",
                                    class: "{class}",
                                    onclick: move |_| slot.set(i),
                                    if filled { "● {i + 1}" } else { "{i + 1}" }
                                }
                            }
                        }
                    }
                }
                if policy_error {
                    if let Some(e) = &error {
                        p { class: "form-error", "{e}" }
                    }
                }
            }

            // Section tabs for the active slot
            div { class: "flex gap-4 mb-6",
                for tab in TABS.iter() {
                    button {
                        key: "{tab}",
                        class: if active_tab() == *tab { "btn btn-primary" } else { "btn btn-secondary" },
                        onclick: move |_| active_tab.set(tab.to_string()),
                        "{tab}"
                    }
                }
            }

            div { class: "panel",
                if active_tab() == "Basics" {
                    div { class: "grid gap-4",
                        div { class: "form-group",
                            label { class: "form-label", "Policy name" }
                            input {
                                class: "input",
                                value: "{record.policy_name}",
                                oninput: move |e| {
                                    validation.set(None);
                                    apply(PolicyField::Name(e.value()));
                                },
                                placeholder: "e.g., National AI Strategy 2030"
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", "Policy ID" }
                            input {
                                class: "input",
                                value: "{record.policy_id}",
                                oninput: move |e| apply(PolicyField::Id(e.value())),
                                placeholder: "Official reference, if any"
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", "Policy area" }
                            select {
                                class: "input",
                                value: "{record.policy_area}",
                                onchange: move |e| apply(PolicyField::Area(e.value())),
                                option { value: "", "Select an area..." }
                                for area in POLICY_AREAS.iter() {
                                    option { value: "{area}", "{area}" }
                                }
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", "Target groups" }
                            div { class: "flex gap-2 flex-wrap",
                                for group in TARGET_GROUPS.iter() {
                                    {
                                        let selected = record.target_groups.iter().any(|g| g == *group);
                                        rsx! {
                                            button {
                                                key: "{group}",
                                                class: if selected { "chip chip-active" } else { "chip" },
                                                onclick: move |_| toggle(SetField::TargetGroups, group),
                                                "{group}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", "Description" }
                            textarea {
                                class: "input min-h-[120px]",
                                value: "{record.policy_description}",
                                oninput: move |e| apply(PolicyField::Description(e.value())),
                                placeholder: "Goals, scope, instruments..."
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", "Link" }
                            input {
                                class: "input",
                                value: "{record.policy_link}",
                                oninput: move |e| apply(PolicyField::Link(e.value())),
                                placeholder: "https://..."
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", "Policy document" }
                            if let Some(name) = attachment_name {
                                div { class: "flex items-center gap-2",
                                    span { class: "text-sm", "📎 {name}" }
                                    button {
                                        class: "btn btn-secondary btn-sm",
                                        onclick: clear_file,
                                        "Remove"
                                    }
                                }
                            } else {
                                input {
                                    r#type: "file",
                                    accept: ".pdf,.doc,.docx,.txt",
                                    onchange: on_file_picked,
                                }
                            }
                        }
                    }
                } else if active_tab() == "Implementation" {
                    div { class: "grid gap-4",
                        div { class: "form-group",
                            label { class: "form-label", "Yearly budget" }
                            input {
                                class: "input",
                                value: "{record.implementation.yearly_budget}",
                                oninput: move |e| apply_section(SectionField::Implementation(ImplementationField::YearlyBudget(e.value()))),
                                placeholder: "e.g., 50000000"
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", "Currency" }
                            select {
                                class: "input",
                                value: "{record.implementation.budget_currency}",
                                onchange: move |e| apply_section(SectionField::Implementation(ImplementationField::BudgetCurrency(e.value()))),
                                for currency in CURRENCIES.iter() {
                                    option { value: "{currency}", "{currency}" }
                                }
                            }
                        }
                        label { class: "form-check",
                            input {
                                r#type: "checkbox",
                                checked: record.implementation.private_sec_funding,
                                onchange: move |e| apply_section(SectionField::Implementation(ImplementationField::PrivateSecFunding(e.checked()))),
                            }
                            "Co-funded by the private sector"
                        }
                        div { class: "form-group",
                            label { class: "form-label", "Deployment year" }
                            select {
                                class: "input",
                                value: "{record.implementation.deployment_year}",
                                onchange: move |e| apply_section(SectionField::Implementation(ImplementationField::DeploymentYear(e.value().parse().unwrap_or(year_now)))),
                                for year in (1990..=year_now + 5).rev() {
                                    option { value: "{year}", "{year}" }
                                }
                            }
                        }
                    }
                } else if active_tab() == "Evaluation" {
                    div { class: "grid gap-4",
                        label { class: "form-check",
                            input {
                                r#type: "checkbox",
                                checked: record.evaluation.is_evaluated,
                                onchange: move |e| apply_section(SectionField::Evaluation(EvaluationField::IsEvaluated(e.checked()))),
                            }
                            "This policy has been evaluated"
                        }
                        if record.evaluation.is_evaluated {
                            div { class: "form-group",
                                label { class: "form-label", "Evaluation type" }
                                select {
                                    class: "input",
                                    value: "{record.evaluation.evaluation_type}",
                                    onchange: move |e| apply_section(SectionField::Evaluation(EvaluationField::EvaluationType(e.value()))),
                                    option { value: "", "Select..." }
                                    for kind in EVALUATION_TYPES.iter() {
                                        option { value: "{kind}", "{kind}" }
                                    }
                                }
                            }
                            label { class: "form-check",
                                input {
                                    r#type: "checkbox",
                                    checked: record.evaluation.risk_assessment,
                                    onchange: move |e| apply_section(SectionField::Evaluation(EvaluationField::RiskAssessment(e.checked()))),
                                }
                                "A risk assessment was carried out"
                            }
                            ScoreSelect {
                                label: "Transparency score (0-10)",
                                value: record.evaluation.transparency_score,
                                onchange: move |v| apply_section(SectionField::Evaluation(EvaluationField::TransparencyScore(v))),
                            }
                            ScoreSelect {
                                label: "Explainability score (0-10)",
                                value: record.evaluation.explainability_score,
                                onchange: move |v| apply_section(SectionField::Evaluation(EvaluationField::ExplainabilityScore(v))),
                            }
                            ScoreSelect {
                                label: "Accountability score (0-10)",
                                value: record.evaluation.accountability_score,
                                onchange: move |v| apply_section(SectionField::Evaluation(EvaluationField::AccountabilityScore(v))),
                            }
                        }
                    }
                } else if active_tab() == "Participation" {
                    div { class: "grid gap-4",
                        label { class: "form-check",
                            input {
                                r#type: "checkbox",
                                checked: record.participation.has_consultation,
                                onchange: move |e| apply_section(SectionField::Participation(ParticipationField::HasConsultation(e.checked()))),
                            }
                            "A public consultation was held"
                        }
                        if record.participation.has_consultation {
                            div { class: "form-group",
                                label { class: "form-label", "Consultation start" }
                                input {
                                    class: "input",
                                    r#type: "date",
                                    value: "{record.participation.consultation_start_date}",
                                    oninput: move |e| apply_section(SectionField::Participation(ParticipationField::ConsultationStartDate(e.value()))),
                                }
                            }
                            div { class: "form-group",
                                label { class: "form-label", "Consultation end" }
                                input {
                                    class: "input",
                                    r#type: "date",
                                    value: "{record.participation.consultation_end_date}",
                                    oninput: move |e| apply_section(SectionField::Participation(ParticipationField::ConsultationEndDate(e.value()))),
                                }
                            }
                            label { class: "form-check",
                                input {
                                    r#type: "checkbox",
                                    checked: record.participation.comments_public,
                                    onchange: move |e| apply_section(SectionField::Participation(ParticipationField::CommentsPublic(e.checked()))),
                                }
                                "Consultation comments are public"
                            }
                            ScoreSelect {
                                label: "Stakeholder involvement score (0-10)",
                                value: record.participation.stakeholder_score,
                                onchange: move |v| apply_section(SectionField::Participation(ParticipationField::StakeholderScore(v))),
                            }
                        }
                    }
                } else {
                    div { class: "grid gap-4",
                        div { class: "form-group",
                            label { class: "form-label", "AI principles addressed" }
                            div { class: "flex gap-2 flex-wrap",
                                for principle in AI_PRINCIPLES.iter() {
                                    {
                                        let selected = record.alignment.ai_principles.iter().any(|p| p == *principle);
                                        rsx! {
                                            button {
                                                key: "{principle}",
                                                class: if selected { "chip chip-active" } else { "chip" },
                                                onclick: move |_| toggle(SetField::AiPrinciples, principle),
                                                "{principle}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        label { class: "form-check",
                            input {
                                r#type: "checkbox",
                                checked: record.alignment.human_rights_alignment,
                                onchange: move |e| apply_section(SectionField::Alignment(AlignmentField::HumanRightsAlignment(e.checked()))),
                            }
                            "Aligned with human-rights frameworks"
                        }
                        label { class: "form-check",
                            input {
                                r#type: "checkbox",
                                checked: record.alignment.environmental_considerations,
                                onchange: move |e| apply_section(SectionField::Alignment(AlignmentField::EnvironmentalConsiderations(e.checked()))),
                            }
                            "Addresses environmental considerations"
                        }
                        label { class: "form-check",
                            input {
                                r#type: "checkbox",
                                checked: record.alignment.international_cooperation,
                                onchange: move |e| apply_section(SectionField::Alignment(AlignmentField::InternationalCooperation(e.checked()))),
                            }
                            "Part of international cooperation"
                        }
                    }
                }
            }

            div { class: "flex justify-end gap-3 mt-6",
                span { class: "text-sm text-[var(--text-muted)] self-center",
                    "{current.present_count()} of {POLICY_SLOTS} slots filled"
                }
                button {
                    class: "btn btn-primary",
                    disabled: submitting(),
                    onclick: on_submit,
                    if submitting() { "Submitting..." } else { "Submit policies" }
                }
            }
        }
    }
}
