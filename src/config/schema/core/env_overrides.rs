use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY")
            && !key.trim().is_empty()
        {
            self.feedback.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("OPENROUTER_MODEL")
            && !model.is_empty()
        {
            self.feedback.model = model;
        }

        if let Ok(url) = std::env::var("OPENROUTER_URL")
            && !url.is_empty()
        {
            self.feedback.base_url = url;
        }

        if let Ok(raw) = std::env::var("OPENROUTER_TIMEOUT")
            && let Ok(secs) = raw.parse::<f64>()
            && secs.is_finite()
            && secs > 0.0
        {
            self.feedback.request_timeout_secs = secs;
        }

        if let Ok(raw) = std::env::var("OPENROUTER_RETRIES")
            && let Ok(retries) = raw.parse::<u32>()
            && retries >= 1
        {
            self.feedback.max_retries = retries;
        }

        if let Ok(raw) = std::env::var("OPENROUTER_BACKOFF")
            && let Ok(secs) = raw.parse::<f64>()
            && secs.is_finite()
            && secs >= 0.0
        {
            self.feedback.backoff_base_secs = secs;
        }

        if let Ok(raw) = std::env::var("BREATHU_USE_EXTERNAL_SCORER") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.affect.use_external = true,
                "0" | "false" | "no" | "off" => self.affect.use_external = false,
                _ => {}
            }
        }

        if let Ok(level) = std::env::var("BREATHU_LOG_LEVEL")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }
    }
}
