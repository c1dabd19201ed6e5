/// Languages the portal is translated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Arabic, the default before a prescription told us otherwise
    #[default]
    Arabic,
    English,
}

impl Language {
    /// Look up a backend language code. Anything unknown is shown in English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ar" => Self::Arabic,
            _ => Self::English,
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Arabic)
    }

    pub fn strings(self) -> &'static Translations {
        match self {
            Self::Arabic => &ARABIC,
            Self::English => &ENGLISH,
        }
    }
}

#[derive(Debug)]
pub struct Translations {
    pub enter_phone: &'static str,
    pub enter_phone_desc: &'static str,
    pub phone_number: &'static str,
    pub loading: &'static str,
    pub download_app: &'static str,
    pub download_app_desc: &'static str,
    pub medical_prescription: &'static str,
    pub issued_on: &'static str,
    pub facility_info: &'static str,
    pub physician: &'static str,
    pub patient_info: &'static str,
    pub diagnosis: &'static str,
    pub prescribed_meds: &'static str,
    pub lab_tests: &'static str,
    pub additional_notes: &'static str,
    pub next_appointment: &'static str,
    pub name: &'static str,
    pub age: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub note: &'static str,
    pub get_mobile_app: &'static str,
    pub get_mobile_app_desc: &'static str,
    pub app_store: &'static str,
    pub google_play: &'static str,
}

static ARABIC: Translations = Translations {
    enter_phone: "أدخل رقم المحمول",
    enter_phone_desc: "أدخل رقم هاتفك لعرض الروشتة",
    phone_number: "رقم المحمول",
    loading: "جاري التحميل...",
    download_app: "تحميل التطبيق",
    download_app_desc: "احصل على وصول فوري لروشتاتك في أي وقت ومكان",
    medical_prescription: "الروشتة الطبية",
    issued_on: "صدرت في",
    facility_info: "معلومات المنشأة",
    physician: "الطبيب",
    patient_info: "معلومات المريض",
    diagnosis: "التشخيص",
    prescribed_meds: "الأدوية الموصوفة",
    lab_tests: "التحاليل المطلوبة",
    additional_notes: "ملاحظات إضافية",
    next_appointment: "الزيارة القادمة",
    name: "الاسم:",
    age: "العمر:",
    address: "العنوان:",
    phone: "الهاتف:",
    note: "ملاحظة:",
    get_mobile_app: "احصل على التطبيق",
    get_mobile_app_desc:
        "احصل على روشتاتك، واضبط تذكيرات الأدوية، وتواصل مع فريق الرعاية الصحية أثناء التنقل.",
    app_store: "متجر التطبيقات",
    google_play: "متجر جوجل",
};

static ENGLISH: Translations = Translations {
    enter_phone: "Enter Mobile Number",
    enter_phone_desc: "Enter your phone number to view prescription",
    phone_number: "Mobile Number",
    loading: "Loading...",
    download_app: "Download Our Mobile App",
    download_app_desc: "Get instant access to your prescriptions anytime, anywhere",
    medical_prescription: "Medical Prescription",
    issued_on: "Issued on",
    facility_info: "Facility Information",
    physician: "Physician",
    patient_info: "Patient Information",
    diagnosis: "Diagnosis",
    prescribed_meds: "Prescribed Medications",
    lab_tests: "Requested Lab Tests",
    additional_notes: "Additional Notes",
    next_appointment: "Next Appointment",
    name: "Name:",
    age: "Age:",
    address: "Address:",
    phone: "Phone:",
    note: "Note:",
    get_mobile_app: "Get the Mobile App",
    get_mobile_app_desc: "Access your prescriptions, set medication reminders, and connect with your healthcare team on the go.",
    app_store: "App Store",
    google_play: "Google Play",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("ar"), Language::Arabic);
        assert_eq!(Language::from_code("AR "), Language::Arabic);
        assert_eq!(Language::from_code("en"), Language::English);
        assert_eq!(Language::from_code("fr"), Language::English);
        assert_eq!(Language::from_code(""), Language::English);
        assert_eq!(Language::default(), Language::Arabic);
    }

    #[test]
    fn test_only_arabic_is_rtl() {
        assert!(Language::Arabic.is_rtl());
        assert!(!Language::English.is_rtl());
    }
}
