use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub groq: GroqConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqConfig {
    /// Base URL of the OpenAI-compatible Groq API
    pub api_base: String,
    pub transcription_model: String,
    pub chat_model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded audio files are written to.
    /// Files are kept after transcription; same-named uploads overwrite.
    pub uploads_dir: String,
}

impl Config {
    /// Load configuration from an optional file, falling back to defaults.
    /// The Groq API key is not configured here; the client reads GROQ_API_KEY
    /// from the environment.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "voxquery")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 9900)?
            .set_default("groq.api_base", "https://api.groq.com/openai/v1")?
            .set_default("groq.transcription_model", "whisper-large-v3")?
            .set_default("groq.chat_model", "llama3-70b-8192")?
            .set_default("groq.temperature", 1.0)?
            .set_default("groq.top_p", 1.0)?
            .set_default("groq.max_tokens", 1024)?
            .set_default("storage.uploads_dir", ".")?
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
