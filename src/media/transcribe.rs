/// Speech-to-text collaborator.
pub trait Transcriber: Send + Sync {
    fn name(&self) -> &str;

    /// Transcript of `audio`; empty when nothing could be recognised.
    fn transcribe(&self, audio: &[u8]) -> String;
}

/// Used when no speech-to-text backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranscriber;

impl Transcriber for NoTranscriber {
    fn name(&self) -> &str {
        "none"
    }

    fn transcribe(&self, audio: &[u8]) -> String {
        tracing::debug!(bytes = audio.len(), "media: no transcriber configured");
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_transcriber_is_always_empty() {
        let t = NoTranscriber;
        assert_eq!(t.name(), "none");
        assert!(t.transcribe(b"RIFF....WAVE").is_empty());
        assert!(t.transcribe(&[]).is_empty());
    }
}
