use super::Principal;

/// Per-request view handed explicitly to gates and page handlers.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub principal: Principal,
    pub request_id: Option<String>,
    pub path: Option<String>,
}

impl RequestContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal, request_id: None, path: None }
    }

    pub fn anonymous() -> Self { Self::default() }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}
