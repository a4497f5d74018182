pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn greeting_serializes_message() {
        let g = types::Greeting::default();
        let v = serde_json::to_value(&g).unwrap();
        assert_eq!(v["message"], "Hello from the storefront API!");
    }
}
