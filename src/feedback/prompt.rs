use crate::affect::AffectScore;
use crate::config::FeedbackConfig;
use crate::net::{ChatMessage, ChatRequest};

pub const SYSTEM_PROMPT: &str = r#"És um assistente de bem-estar para estudantes. Gera 3 recomendações em formato JSON.

RESPONDE APENAS COM JSON, sem texto extra. Formato:
{
  "recommendations": [
    {"type": "immediate", "text": "texto", "why": "razão"},
    {"type": "short_term", "text": "texto", "why": "razão"},
    {"type": "professional", "text": "texto", "why": "razão"}
  ],
  "follow_up_prompt": "pergunta empática"
}

Usa português de Portugal."#;

pub fn user_message(affect: &AffectScore, suggestions: &[String]) -> String {
    let dominant = if affect.dominant.trim().is_empty() {
        "Não identificada"
    } else {
        affect.dominant.as_str()
    };
    let suggestions = if suggestions.is_empty() {
        "nenhuma".to_string()
    } else {
        suggestions.join("; ")
    };

    format!(
        "Estado emocional: Stress {:.2}/1.0, Valência {:.2}/1.0, Emoção: {dominant}. \
         Sugestões do calendário: {suggestions}. Gera recomendações personalizadas.",
        affect.stress_score, affect.valence
    )
}

pub fn build_request(
    config: &FeedbackConfig,
    affect: &AffectScore,
    suggestions: &[String],
) -> ChatRequest {
    ChatRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_message(affect, suggestions)),
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}
