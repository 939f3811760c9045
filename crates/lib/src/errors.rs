use thiserror::Error;

/// Errors raised while talking to a text-generation provider.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider not configured")]
    NotConfigured,
}

/// Errors raised by the Supabase REST and storage gateway.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to Supabase: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize Supabase response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Failed to decode Supabase response: {0}")]
    JsonDecode(#[from] serde_json::Error),
    /// A non-success response, carried verbatim so it can be passed through.
    #[error("{body}")]
    Api { status: u16, body: String },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Supabase returned no rows for insert into '{0}'")]
    EmptyRepresentation(String),
    #[error("{0}")]
    Invalid(String),
}

/// Errors raised while resolving addresses or routes.
#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Could not locate: {0}")]
    CouldNotLocate(String),
    #[error("Missing '{0}' coordinates")]
    MissingCoordinates(&'static str),
}
