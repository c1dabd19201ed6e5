//! The prescription document as served to patients

use serde::{Deserialize, Serialize};

/// A `{value, display}` pair the backend uses for enumerations
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Choice {
    /// Machine readable value
    pub value: String,
    /// Localized display text
    pub display: String,
}

/// The patient a prescription was written for
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    /// Patient id
    pub patient: u64,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Patient phone number, as stored by the backend
    pub phone_number: String,
    /// Age, absent for some legacy records
    #[serde(default)]
    pub age: Option<u32>,
    /// Unit of `age` (years, months, ...)
    #[serde(default)]
    pub age_unit: Option<Choice>,
}

impl Patient {
    /// First and last name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Medical specialty
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Specialty {
    /// Specialty id
    pub id: u64,
    /// Name
    pub name: String,
    /// Icon reference
    #[serde(default)]
    pub icon: String,
}

/// A user name
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
}

/// The prescribing physician
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Physician {
    /// Physician id
    pub id: u64,
    /// Specialty
    pub specialty: Specialty,
    /// Name of the physician
    pub user: User,
}

/// A phone number of a facility
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FacilityPhoneNumber {
    /// The number
    pub phone_number: String,
}

/// Clinic or hospital the prescription was issued at
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Facility {
    /// Facility id
    pub id: u64,
    /// Name
    pub name: String,
    /// Kind of facility
    #[serde(rename = "type", default)]
    pub facility_type: String,
    /// Street address
    #[serde(default)]
    pub address: String,
    /// Contact numbers
    #[serde(default)]
    pub phone_numbers: Vec<FacilityPhoneNumber>,
}

/// Diagnosis
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Diagnosis {
    /// Diagnosis id
    pub id: u64,
    /// Name
    pub name: String,
}

/// A requested lab test
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LabTest {
    /// Lab test id
    pub id: u64,
    /// Name
    pub name: String,
    /// Short name, e.g. `CBC`
    #[serde(default)]
    pub abbreviation: String,
    /// Category
    #[serde(default)]
    pub category: String,
}

/// A header line the physician configured for their prescriptions.
///
/// How it's displayed depends on its `order`, see the renderer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Label {
    /// Text
    pub label: String,
    /// Kind of label
    #[serde(rename = "type", default)]
    pub label_type: String,
    /// Position in the header
    pub order: i32,
}

/// Brand and dosage of a prescribed drug
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BrandDosage {
    /// Brand dosage id
    pub id: u64,
    /// Brand name
    pub name: String,
    /// Availability on the market
    #[serde(default)]
    pub availability: Option<Choice>,
    /// Whether this needs a special prescription
    #[serde(default)]
    pub special: bool,
    /// Tablets, syrup, ...
    #[serde(default)]
    pub dosage_form: Option<Choice>,
    /// Default administration times
    #[serde(default)]
    pub administration_times: Vec<String>,
    /// Active ingredient
    #[serde(default)]
    pub active_constituent: String,
    /// Default frequency
    #[serde(default)]
    pub frequency: Option<u32>,
    /// Unit of the default frequency
    #[serde(default)]
    pub frequency_unit: Option<String>,
}

/// A prescribed medication
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Medication {
    /// Medication id
    pub id: u64,
    /// Drug
    pub brand_dosage: BrandDosage,
    /// How often
    #[serde(default)]
    pub frequency: Option<u32>,
    /// Unit of `frequency`
    #[serde(default)]
    pub frequency_unit: Option<String>,
    /// For how long
    #[serde(default)]
    pub duration: Option<u32>,
    /// Unit of `duration`
    #[serde(default)]
    pub duration_unit: Option<String>,
    /// Physician notes
    #[serde(default)]
    pub notes: String,
    /// When to take it
    #[serde(default)]
    pub administration_times: Vec<String>,
    /// Pre-rendered drug name and dosage
    pub brand_dosage_display: String,
    /// Pre-rendered dosing instructions
    #[serde(default)]
    pub medication_dosing: String,
}

/// Prescription document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Prescription {
    /// Prescription id
    pub id: u64,
    /// Issue timestamp (RFC 3339)
    pub created_at: String,
    /// Patient
    pub patient: Patient,
    /// Whether the prescription is still active
    #[serde(default)]
    pub active: bool,
    /// Prescribing physician
    pub physician: Physician,
    /// Status string
    #[serde(default)]
    pub status: String,
    /// Facility
    pub facility: Facility,
    /// Date of the next visit, if one was scheduled
    #[serde(default)]
    pub next_visit: Option<String>,
    /// Diagnosis
    pub diagnosis: Diagnosis,
    /// Requested lab tests
    #[serde(default)]
    pub lab_tests: Vec<LabTest>,
    /// Additional notes
    #[serde(default)]
    pub notes: String,
    /// Header labels
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Prescribed medications
    #[serde(default)]
    pub medications: Vec<Medication>,
    /// Language code the prescription should be displayed in
    #[serde(default)]
    pub language: String,
}
