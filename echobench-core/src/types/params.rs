use super::common::ServiceKind;

/// The test input for one call: text for synthesis, audio bytes for
/// recognition.
#[derive(Debug, Clone, PartialEq)]
pub enum CallInput {
    Text(String),
    Audio(Vec<u8>),
}

impl CallInput {
    /// The service kind this input naturally targets.
    pub fn kind(&self) -> ServiceKind {
        match self {
            CallInput::Text(_) => ServiceKind::Synthesis,
            CallInput::Audio(_) => ServiceKind::Recognition,
        }
    }

    /// Usage amount fed to the cost model: characters for text, bytes for
    /// audio.
    pub fn usage_amount(&self) -> f64 {
        match self {
            CallInput::Text(s) => s.chars().count() as f64,
            CallInput::Audio(b) => b.len() as f64,
        }
    }
}

/// Optional tuning hints shared by every unit of a job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallHints {
    pub language: Option<String>,
    pub format: Option<String>,
    pub speed: Option<f64>,
    pub pitch: Option<f64>,
    pub volume: Option<f64>,
}

/// Everything the request builder needs for one call beyond the template and
/// vendor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CallParams {
    pub input: CallInput,
    pub kind: ServiceKind,
    pub hints: CallHints,
}

impl CallParams {
    pub fn new(input: CallInput, hints: CallHints) -> Self {
        let kind = input.kind();
        Self { input, kind, hints }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(CallInput::Text(text.into()), CallHints::default())
    }

    pub fn audio(bytes: Vec<u8>) -> Self {
        Self::new(CallInput::Audio(bytes), CallHints::default())
    }
}
