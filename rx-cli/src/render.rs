//! Plain text rendering of prescriptions
use crate::translations::{Language, Translations};
use chrono::{DateTime, NaiveDate};
use rx_core::prescription::{Label, Prescription};

const RULE: &str = "----------------------------------------";
const RIGHT_TO_LEFT_MARK: char = '\u{200f}';

/// Labels before this position go into the header, the rest into the footer
const FOOTER_LABEL_START: i32 = 5;

/// Render a prescription in the language it asks for
pub fn render_prescription(prescription: &Prescription) -> String {
    let language = Language::from_code(&prescription.language);
    let t = language.strings();
    let mut lines = Vec::new();

    lines.extend(app_banner(t));
    lines.push(String::new());

    lines.push(t.medical_prescription.to_string());
    lines.push(format!(
        "{} {}",
        t.issued_on,
        format_date(&prescription.created_at)
    ));
    lines.push(RULE.to_string());

    let header = header_labels(&prescription.labels);
    if !header.is_empty() {
        lines.extend(header);
        lines.push(RULE.to_string());
    }

    lines.push(t.facility_info.to_string());
    let facility = &prescription.facility;
    lines.push(format!("  {}", facility.name));
    if !facility.address.is_empty() {
        lines.push(format!("  {} {}", t.address, facility.address));
    }
    for phone in &facility.phone_numbers {
        lines.push(format!("  {} {}", t.phone, phone.phone_number));
    }
    let physician = &prescription.physician;
    lines.push(format!(
        "  {} {} {} ({})",
        t.physician,
        physician.user.first_name,
        physician.user.last_name,
        physician.specialty.name
    ));
    lines.push(String::new());

    lines.push(t.patient_info.to_string());
    let patient = &prescription.patient;
    lines.push(format!("  {} {}", t.name, patient.full_name()));
    if let Some(age) = patient.age.filter(|age| *age > 0) {
        let unit = patient
            .age_unit
            .as_ref()
            .map_or("", |unit| unit.display.as_str());
        lines.push(format!("  {} {age} {unit}", t.age).trim_end().to_string());
    }
    lines.push(RULE.to_string());

    lines.push(t.diagnosis.to_string());
    lines.push(format!("  {}", prescription.diagnosis.name));
    lines.push(RULE.to_string());

    lines.push(t.prescribed_meds.to_string());
    for (index, medication) in prescription.medications.iter().enumerate() {
        lines.push(format!(
            "  #{} {}",
            index + 1,
            medication.brand_dosage_display
        ));
        if !medication.medication_dosing.is_empty() {
            lines.push(format!("     {}", medication.medication_dosing));
        }
        if !medication.notes.is_empty() {
            lines.push(format!("     {} {}", t.note, medication.notes));
        }
    }

    if !prescription.lab_tests.is_empty() {
        lines.push(RULE.to_string());
        lines.push(t.lab_tests.to_string());
        for test in &prescription.lab_tests {
            lines.push(format!("  {}", test.name));
            lines.push(format!("    ({}) - {}", test.abbreviation, test.category));
        }
    }

    if !prescription.notes.trim().is_empty() {
        lines.push(RULE.to_string());
        lines.push(t.additional_notes.to_string());
        lines.push(format!("  {}", prescription.notes));
    }

    if let Some(next_visit) = prescription
        .next_visit
        .as_deref()
        .filter(|visit| !visit.is_empty())
    {
        lines.push(RULE.to_string());
        lines.push(format!("{}: {}", t.next_appointment, format_date(next_visit)));
    }

    let footer = footer_labels(&prescription.labels);
    if !footer.is_empty() {
        lines.push(RULE.to_string());
        lines.extend(footer);
    }

    lines.push(RULE.to_string());
    lines.push(t.get_mobile_app.to_string());
    lines.push(t.get_mobile_app_desc.to_string());
    lines.push(format!("  [{}]  [{}]", t.app_store, t.google_play));

    finish(lines, language)
}

/// Header lines for the labels a physician configured.
///
/// Labels are shown by position: 1 is a badge, 2 the title, 3 the specialty
/// line and 4 the signature. Positions from 5 on belong to [`footer_labels`].
pub fn header_labels(labels: &[Label]) -> Vec<String> {
    sorted_labels(labels, |order| order < FOOTER_LABEL_START)
        .into_iter()
        .flat_map(|label| match label.order {
            1 => vec![format!("[{}]", label.label)],
            2 => vec![
                label.label.clone(),
                "=".repeat(label.label.chars().count()),
            ],
            3 => vec![format!("⚕ {}", label.label)],
            4 => vec![format!("✍ {}", label.label)],
            _ => vec![format!("| {} |", label.label)],
        })
        .collect()
}

/// Footer lines: position 5 is the facility address, everything after a phone line
pub fn footer_labels(labels: &[Label]) -> Vec<String> {
    sorted_labels(labels, |order| order >= FOOTER_LABEL_START)
        .into_iter()
        .map(|label| match label.order {
            FOOTER_LABEL_START => format!("📍 {}", label.label),
            _ => format!("☎ {}", label.label),
        })
        .collect()
}

fn sorted_labels(labels: &[Label], keep: impl Fn(i32) -> bool) -> Vec<&Label> {
    let mut shown: Vec<&Label> = labels.iter().filter(|label| keep(label.order)).collect();
    shown.sort_by_key(|label| label.order);
    shown
}

fn app_banner(t: &Translations) -> Vec<String> {
    vec![
        format!("📱 {}", t.download_app),
        format!("   {}", t.download_app_desc),
    ]
}

/// Dates come as RFC 3339 timestamps or plain dates. Anything else is shown as is.
fn format_date(raw: &str) -> String {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn finish(lines: Vec<String>, language: Language) -> String {
    let mut out = String::new();
    for line in lines {
        if language.is_rtl() && !line.is_empty() {
            out.push(RIGHT_TO_LEFT_MARK);
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Heading, input label and help text asking for the phone number before a
/// prescription is loaded
pub fn phone_prompt(language: Language) -> (&'static str, String, &'static str) {
    let t = language.strings();
    (t.enter_phone, format!("{}:", t.phone_number), t.enter_phone_desc)
}
