use std::fmt::Write as _;

use crate::config::Config;
use crate::orchestrator::ResponseEnvelope;
use crate::storage::InteractionRecord;

const RISK_NOTICE: &str = "Se estás em risco, contacta já o SNS 24 (808 24 24 24) ou o 112.";

pub fn render_status(config: &Config) -> Vec<String> {
    vec![
        format!("breathu       {}", env!("CARGO_PKG_VERSION")),
        format!("config        {}", config.config_path.display()),
        format!("data          {}", config.data_dir.display()),
        String::new(),
        format!(
            "remote        {}",
            if config.feedback.has_api_key() {
                "enabled"
            } else {
                "disabled (heuristic only)"
            }
        ),
        format!("model         {}", config.feedback.model),
        format!(
            "scorer        {}",
            if config.affect.use_external {
                "external + heuristic"
            } else {
                "heuristic"
            }
        ),
        format!("observability {}", config.observability.backend),
        format!(
            "history       {}",
            if config.storage.enabled {
                config.interactions_db_path().display().to_string()
            } else {
                "disabled".to_string()
            }
        ),
    ]
}

/// Human-readable response.
pub fn render_envelope(env: &ResponseEnvelope) -> String {
    let mut out = String::new();

    if !env.success {
        for rec in &env.message.recommendations {
            let _ = writeln!(out, "{}", rec.text);
        }
        let _ = writeln!(out, "{}", env.message.follow_up_prompt);
        return out;
    }

    if env.risk_detected {
        let _ = writeln!(out, "!! {RISK_NOTICE}\n");
    }

    let _ = writeln!(
        out,
        "Estado: {} (stress {:.2}, valência {:.2})",
        env.emotion.dominant, env.emotion.stress_score, env.emotion.valence
    );

    let _ = writeln!(
        out,
        "\nPlano ({} de {} slots):",
        env.schedule.slots.len(),
        env.schedule.available_slots
    );
    for line in env.schedule.lines() {
        let _ = writeln!(out, "  {line}");
    }

    if !env.events.is_empty() {
        let _ = writeln!(out, "\nPróximos eventos:");
        for event in &env.events {
            match event.start {
                Some(start) => {
                    let _ = writeln!(out, "  {} {}", start.format("%d/%m %H:%M"), event.subject);
                }
                None => {
                    let _ = writeln!(out, "  {}", event.subject);
                }
            }
        }
    }

    if !env.calendar_suggestions.is_empty() {
        let _ = writeln!(out, "\nSugestões:");
        for suggestion in &env.calendar_suggestions {
            let _ = writeln!(out, "  - {suggestion}");
        }
    }

    let _ = writeln!(out, "\nRecomendações ({}):", env.message.source);
    for rec in &env.message.recommendations {
        let _ = writeln!(out, "  [{}] {}", rec.kind, rec.text);
        let _ = writeln!(out, "      {}", rec.why);
    }
    let _ = writeln!(out, "\n{}", env.message.follow_up_prompt);
    out
}

pub fn render_history(records: &[InteractionRecord]) -> String {
    if records.is_empty() {
        return "No saved interactions.\n".to_string();
    }

    let mut out = String::new();
    for rec in records {
        let rating = rec
            .rating
            .map_or_else(|| "-".to_string(), |r| format!("{r}/5"));
        let _ = writeln!(
            out,
            "{}  {:<12} stress {:.2}  rating {}  {}",
            rec.timestamp.format("%Y-%m-%d %H:%M"),
            rec.emotion.dominant,
            rec.emotion.stress_score,
            rating,
            rec.text
        );
    }
    out
}
