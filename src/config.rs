use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recipe corpus snapshot: a JSON file path or an http(s) URL
    #[serde(default = "default_recipes_source")]
    pub recipes_source: String,

    /// Optional JSON file overriding tokenizer separators and stopwords
    #[serde(default)]
    pub tokenizer_config: Option<String>,

    /// Whether `POST /corpus/reload` may swap in a fresh corpus
    #[serde(default = "default_allow_corpus_reload")]
    pub allow_corpus_reload: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_recipes_source() -> String {
    "recipes.json".to_string()
}

fn default_allow_corpus_reload() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipes_source: default_recipes_source(),
            tokenizer_config: None,
            allow_corpus_reload: default_allow_corpus_reload(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
