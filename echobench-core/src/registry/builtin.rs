//! Built-in templates shipped with the engine. These are immutable: registry
//! mutations targeting them fail with `NotEditable`, and imports colliding
//! with them are skipped.

use std::collections::BTreeMap;

use crate::types::{
    AudioEncoding, AuthScheme, BodyFormat, ModelInfo, ServiceKind, Template, TemplateProvenance,
    VoiceInfo,
};

pub(crate) fn builtin_templates() -> Vec<Template> {
    vec![openai(), minimax(), elevenlabs(), deepgram()]
}

fn base(id: &str, name: &str, url: &str, auth_scheme: AuthScheme) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        method: "POST".to_string(),
        auth_scheme,
        body_templates: BTreeMap::new(),
        body_formats: BTreeMap::new(),
        path_suffixes: BTreeMap::new(),
        api_key_headers: Vec::new(),
        custom_auth_template: None,
        audio_field: "file".to_string(),
        response_text_path: None,
        response_audio_path: None,
        response_audio_encoding: AudioEncoding::Base64,
        response_audio_url_path: None,
        error_message_path: None,
        models: BTreeMap::new(),
        default_models: BTreeMap::new(),
        voices: Vec::new(),
        allow_custom_model: false,
        provenance: TemplateProvenance::BuiltIn,
    }
}

fn model(id: &str, name: &str) -> ModelInfo {
    ModelInfo {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn voice(id: &str, name: &str) -> VoiceInfo {
    VoiceInfo {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn openai() -> Template {
    let mut t = base(
        "openai",
        "OpenAI",
        "https://api.openai.com/v1",
        AuthScheme::Bearer,
    );
    t.path_suffixes
        .insert(ServiceKind::Recognition, "/audio/transcriptions".to_string());
    t.path_suffixes
        .insert(ServiceKind::Synthesis, "/audio/speech".to_string());
    t.body_formats
        .insert(ServiceKind::Recognition, BodyFormat::Multipart);
    t.body_templates.insert(
        ServiceKind::Recognition,
        r#"{"model":"{{model}}","language":"{{language}}"}"#.to_string(),
    );
    t.body_templates.insert(
        ServiceKind::Synthesis,
        r#"{"model":"{{model}}","input":"{{input}}","voice":"{{voice}}","speed":{{speed}}}"#
            .to_string(),
    );
    t.response_text_path = Some("text".to_string());
    // The speech endpoint streams the audio back as the response body.
    t.response_audio_encoding = AudioEncoding::RawBinary;
    t.error_message_path = Some("error.message".to_string());
    t.models.insert(
        ServiceKind::Recognition,
        vec![
            model("whisper-1", "Whisper v2"),
            model("gpt-4o-transcribe", "GPT-4o Transcribe"),
        ],
    );
    t.models.insert(
        ServiceKind::Synthesis,
        vec![
            model("tts-1", "TTS-1"),
            model("gpt-4o-mini-tts", "GPT-4o mini TTS"),
        ],
    );
    t.default_models
        .insert(ServiceKind::Recognition, "whisper-1".to_string());
    t.default_models
        .insert(ServiceKind::Synthesis, "tts-1".to_string());
    t.voices = vec![voice("alloy", "Alloy"), voice("nova", "Nova")];
    t.allow_custom_model = true;
    t
}

fn minimax() -> Template {
    let mut t = base(
        "minimax",
        "MiniMax",
        "https://api.minimax.io/v1/t2a_v2",
        AuthScheme::Bearer,
    );
    t.body_templates.insert(
        ServiceKind::Synthesis,
        concat!(
            r#"{"model":"{{model}}","text":"{{input}}","#,
            r#""voice_setting":{"voice_id":"{{voice}}","speed":{{speed}},"vol":{{volume}}}}"#
        )
        .to_string(),
    );
    // Inline hex audio for short clips; larger clips come back as a URL.
    t.response_audio_path = Some("data.audio".to_string());
    t.response_audio_encoding = AudioEncoding::Hex;
    t.response_audio_url_path = Some("data.audio_url".to_string());
    t.error_message_path = Some("base_resp.status_msg".to_string());
    t.models.insert(
        ServiceKind::Synthesis,
        vec![model("speech-01-turbo", "Speech-01 Turbo")],
    );
    t.default_models
        .insert(ServiceKind::Synthesis, "speech-01-turbo".to_string());
    t.voices = vec![voice("male-qn-qingse", "Qingse")];
    t
}

fn elevenlabs() -> Template {
    let mut t = base(
        "elevenlabs",
        "ElevenLabs",
        "https://api.elevenlabs.io/v1/text-to-speech",
        AuthScheme::ApiKey,
    );
    t.api_key_headers = vec!["xi-api-key".to_string()];
    t.body_templates.insert(
        ServiceKind::Synthesis,
        r#"{"text":"{{input}}","model_id":"{{model}}"}"#.to_string(),
    );
    t.response_audio_encoding = AudioEncoding::RawBinary;
    t.error_message_path = Some("detail.message".to_string());
    t.models.insert(
        ServiceKind::Synthesis,
        vec![
            model("eleven_multilingual_v2", "Multilingual v2"),
            model("eleven_turbo_v2_5", "Turbo v2.5"),
        ],
    );
    t.default_models
        .insert(ServiceKind::Synthesis, "eleven_multilingual_v2".to_string());
    t.voices = vec![voice("21m00Tcm4TlvDq8ikWAM", "Rachel")];
    t
}

fn deepgram() -> Template {
    let mut t = base(
        "deepgram",
        "Deepgram",
        "https://api.deepgram.com",
        AuthScheme::Custom,
    );
    t.custom_auth_template = Some("Authorization: Token {{api_key}}".to_string());
    t.path_suffixes
        .insert(ServiceKind::Recognition, "/v1/listen".to_string());
    t.body_formats
        .insert(ServiceKind::Recognition, BodyFormat::Multipart);
    t.body_templates.insert(
        ServiceKind::Recognition,
        r#"{"model":"{{model}}","language":"{{language}}"}"#.to_string(),
    );
    t.audio_field = "audio".to_string();
    t.response_text_path =
        Some("results.channels[0].alternatives[0].transcript".to_string());
    t.error_message_path = Some("err_msg".to_string());
    t.models.insert(
        ServiceKind::Recognition,
        vec![model("nova-2", "Nova 2"), model("nova-3", "Nova 3")],
    );
    t.default_models
        .insert(ServiceKind::Recognition, "nova-2".to_string());
    t
}
