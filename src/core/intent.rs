const TEST_DRIVE_KEYWORDS: &[&str] = &[
    "test drive",
    "test-drive",
    "come see",
    "visit us",
    "schedule a visit",
    "book an appointment",
    "come by",
    "check it out",
    "see it in person",
];

const POSITIVE_RESPONSES: &[&str] = &[
    "yes",
    "sure",
    "okay",
    "ok",
    "definitely",
    "absolutely",
    "would love to",
    "let's do it",
    "sounds good",
    "great",
    "perfect",
];

/// True when the salesperson's previous reply invited a visit or test drive
/// and the customer answered positively. Plain substring matching, so "ok"
/// also fires inside words such as "book".
pub fn detect_test_drive_intent(salesman_response: &str, user_response: &str) -> bool {
    let salesman = salesman_response.to_lowercase();
    let user = user_response.to_lowercase();

    let has_test_drive = TEST_DRIVE_KEYWORDS.iter().any(|k| salesman.contains(k));
    let is_positive = POSITIVE_RESPONSES.iter().any(|r| user.contains(r));

    has_test_drive && is_positive
}
