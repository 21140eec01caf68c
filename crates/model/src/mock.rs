//! Scripted model client for tests and offline runs.

use async_trait::async_trait;
use gigmate_core::error::ModelError;
use gigmate_core::model::ModelClient;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A model client that replays a scripted queue of responses.
///
/// When the queue runs dry it keeps returning the last script entry, so a
/// single-entry script behaves like a fixed-response model. An empty script
/// fails every call, which exercises the model-unavailable paths.
pub struct MockModelClient {
    script: Mutex<VecDeque<Result<String, ModelError>>>,
    last: Mutex<Option<Result<String, ModelError>>>,
    call_count: Mutex<usize>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            call_count: Mutex::new(0),
        }
    }

    /// Script a successful response.
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Script a failed call.
    pub fn fail(self, error: ModelError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// How many times `invoke` has been called.
    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, ModelError> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *self.last.lock().unwrap() = Some(next.clone());
            return next;
        }

        match self.last.lock().unwrap().clone() {
            Some(last) => last,
            None => Err(ModelError::Invocation("mock script is empty".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order() {
        let model = MockModelClient::new().respond("first").respond("second");
        assert_eq!(model.invoke("x").await.unwrap(), "first");
        assert_eq!(model.invoke("x").await.unwrap(), "second");
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn repeats_last_entry_when_exhausted() {
        let model = MockModelClient::new().respond("only");
        assert_eq!(model.invoke("x").await.unwrap(), "only");
        assert_eq!(model.invoke("y").await.unwrap(), "only");
    }

    #[tokio::test]
    async fn empty_script_fails() {
        let model = MockModelClient::new();
        assert!(model.invoke("x").await.is_err());
    }

    #[tokio::test]
    async fn scripted_failure_surfaces() {
        let model = MockModelClient::new().fail(ModelError::Timeout("slow".into()));
        assert!(matches!(
            model.invoke("x").await,
            Err(ModelError::Timeout(_))
        ));
    }
}
