#[must_use]
pub fn detect_mime(data: &[u8]) -> Option<String> {
    infer::get(data).map(|info| info.mime_type().to_string())
}

#[must_use]
pub fn detect_mime_from_extension(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_lowercase().as_str() {
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" | "oga" => Some("audio/ogg"),
        "opus" => Some("audio/opus"),
        "flac" => Some("audio/flac"),
        "m4a" => Some("audio/m4a"),
        "webm" => Some("audio/webm"),
        _ => None,
    }
}

/// Browser voice notes are commonly sniffed as `video/webm`.
fn is_audio_mime(mime: &str) -> bool {
    mime.starts_with("audio/") || mime == "video/webm"
}

/// Mime type of `data` when it looks like recorded audio.
///
/// Magic bytes win; the filename extension is only consulted when the bytes
/// are not recognised at all.
#[must_use]
pub fn audio_mime(data: &[u8], filename: Option<&str>) -> Option<String> {
    match detect_mime(data) {
        Some(mime) => is_audio_mime(&mime).then_some(mime),
        None => filename
            .and_then(detect_mime_from_extension)
            .map(str::to_string),
    }
}
