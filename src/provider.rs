use futures::Stream;
use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::models::gemini::GeminiRequest;
use crate::streaming::ResponseFragment;

/// Fragments of one model answer, in arrival order
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<ResponseFragment>> + Send>>;

/// Type alias for the future returned by generate_content
pub type FragmentFuture = Pin<Box<dyn Future<Output = Result<FragmentStream>> + Send>>;

/// Trait for model providers that can answer a GenerateContent request
pub trait Provider: Send + Sync {
    /// Send one request to the provider
    ///
    /// # Arguments
    /// * `model` - The model name to use
    /// * `request` - The request body
    /// * `stream` - Use the streaming method; a unary answer arrives as a single fragment
    ///
    /// # Returns
    /// The fragments of the answer. The outer error covers failures before the first
    /// byte (auth, quota, network); errors inside the stream are mid-answer failures.
    fn generate_content(&self, model: &str, request: &GeminiRequest, stream: bool)
    -> FragmentFuture;

    /// Get the provider name for logging
    fn name(&self) -> &str;
}
