use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body of the root endpoint.
#[derive(Serialize, Debug)]
pub struct Greeting {
    pub message: &'static str,
}

impl Default for Greeting {
    fn default() -> Self {
        Self { message: "Hello from the storefront API!" }
    }
}
