use async_trait::async_trait;

/// Checks a plaintext password against a stored hash. The hashing scheme is the
/// implementation's business.
#[async_trait]
pub trait PasswordComparator: Send + Sync {
    async fn compare(&self, hash: &str, plaintext: &str) -> bool;
}
