/// Phrases that flag a message for crisis follow-up.
const RISK_KEYWORDS: &[&str] = &[
    "suicidio",
    "suicídio",
    "matar-me",
    "auto-mutilação",
    "tirar a vida",
    "quero morrer",
    "não aguento",
];

/// Case-insensitive crisis keyword check.
pub fn check_risk(text: &str) -> bool {
    let lower = text.to_lowercase();
    super::contains_any(&lower, RISK_KEYWORDS)
}
