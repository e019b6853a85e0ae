#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self { api_url }
    }
}
