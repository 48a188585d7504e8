//! Translation from validated tool arguments to upstream requests.

use crate::args::ToolArgs;

/// One upstream GET: a path below the API root plus query parameters.
///
/// The credential and output format are not part of this; the client adds them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl UpstreamRequest {
    fn new(path: &'static str) -> Self {
        Self {
            path,
            query: Vec::new(),
        }
    }

    fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    fn optional_param(self, name: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.param(name, v),
            None => self,
        }
    }

    /// Query parameter names, in order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&'static str> {
        self.query.iter().map(|(k, _)| *k).collect()
    }
}

impl From<&ToolArgs> for UpstreamRequest {
    fn from(args: &ToolArgs) -> Self {
        match args {
            ToolArgs::Search { q } => Self::new("search").param("q", q),
            ToolArgs::SearchRefnr { q } => Self::new("search/refnr").param("q", q),
            ToolArgs::ListBrands => Self::new("brands"),
            ToolArgs::ListFamilies { brand_id } => Self::new("families").param("brand-id", brand_id),
            ToolArgs::ListWatches {
                brand_id,
                family_id,
                updated_since,
            } => Self::new("watches")
                .param("brand-id", brand_id)
                .optional_param("family-id", family_id.as_ref())
                .optional_param(
                    "updated-since",
                    updated_since.as_ref().map(|d| d.as_str()),
                ),
            ToolArgs::GetWatchDetails { id } => Self::new("watch").param("id", id),
        }
    }
}
