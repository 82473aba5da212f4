use std::collections::BTreeMap;

use crate::model::Config;
use rolecraft_utils::types::ConfigSource;

fn source_label(source: Option<&ConfigSource>) -> String {
    source.unwrap_or(&ConfigSource::Default).as_str().to_string()
}

impl Config {
    /// Effective configuration as `key -> (value, source)`, sorted by key.
    ///
    /// Keys without a value and without a default are omitted. The API key
    /// itself is never included, only the name of the variable that holds it.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, value: Option<String>| {
            if let Some(val) = value {
                let source = source_label(self.source_attribution.get(key));
                config.insert(key.to_string(), (val, source));
            }
        };

        add("bind", Some(self.bind().to_string()));
        add("fixtures_dir", Some(self.fixtures_dir().display().to_string()));
        add("llm_provider", Some(self.llm_provider().to_string()));
        add("model", Some(self.model().to_string()));
        add("temperature", Some(self.temperature().to_string()));
        add("max_tokens", self.llm.max_tokens.map(|v| v.to_string()));
        add("api_key_env", self.llm.api_key_env.clone());
        add("base_url", self.llm.base_url.clone());
        add("llm_timeout_secs", Some(self.llm_timeout().as_secs().to_string()));
        add(
            "fetch_timeout_secs",
            self.workflow.fetch_timeout_secs.map(|v| v.to_string()),
        );
        add(
            "generation_timeout_secs",
            self.workflow.generation_timeout_secs.map(|v| v.to_string()),
        );
        add("log_level", self.logging.level.clone());
        add("log_json", Some(self.log_json().to_string()));

        config
    }
}
