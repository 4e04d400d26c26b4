use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    /// Truthy ("1") to restrict to featured destinations.
    #[serde(default)]
    pub featured: Option<String>,
    pub search: Option<String>,
}

impl CityQuery {
    pub fn featured_only(&self) -> bool {
        matches!(self.featured.as_deref(), Some("1") | Some("true"))
    }
}
