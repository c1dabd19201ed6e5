use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const GENERATE_OTP: &str = "/api/v1/users/generate-otp/";
pub const DELETE_ACCOUNT: &str = "/api/v1/users/delete-account/";
pub const PATIENT_PRESCRIPTION: &str = "/api/v1/prescriptions/patient-prescription/";

/// A stand-in for the portal backend
pub struct Backend {
    pub server: MockServer,
}

impl Backend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        tracing::info!(uri = %server.uri(), "Mock backend listening");
        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub async fn answer(&self, verb: &str, route: &str, response: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Like [`Backend::answer`], but only for requests carrying exactly `body`
    pub async fn expect(&self, verb: &str, route: &str, body: Value, response: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path(route))
            .and(body_json(body))
            .respond_with(response)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Paths of all requests received so far, in order
    pub async fn requests(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| format!("{} {}", request.method, request.url.path()))
            .collect()
    }
}

pub fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn status(code: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(body)
}

pub fn prescription(language: &str) -> Value {
    json!({
        "id": 31,
        "created_at": "2025-05-10T09:00:00Z",
        "patient": {
            "patient": 1,
            "first_name": "Mona",
            "last_name": "Adel",
            "phone_number": "01012345678",
            "age": 34,
            "age_unit": { "value": "years", "display": "years" }
        },
        "active": true,
        "physician": {
            "id": 2,
            "specialty": { "id": 3, "name": "Cardiology" },
            "user": { "first_name": "Omar", "last_name": "Nabil" }
        },
        "status": "issued",
        "facility": { "id": 4, "name": "Nile Clinic", "type": "clinic" },
        "next_visit": null,
        "diagnosis": { "id": 5, "name": "Hypertension" },
        "medications": [{
            "id": 9,
            "brand_dosage": { "id": 10, "name": "Concor" },
            "brand_dosage_display": "Concor 5mg tablets",
            "medication_dosing": "1 tablet daily"
        }],
        "language": language
    })
}
