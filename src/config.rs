/// Runtime settings for one studio session.
///
/// Held in memory for the lifetime of the process. Nothing here is read
/// from disk or the environment, and nothing is written back: the API key
/// and every toggle are entered interactively per session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gate for the image studio, checked before any image request goes out.
    pub image_generation: bool,
    pub chat_model: String,
    pub image_model: String,
    pub image_size: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            image_generation: false,
            chat_model: "gpt-4o-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
            image_size: "1024x1024".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
