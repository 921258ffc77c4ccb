// Model Router - primary/fallback model selection per task
use crate::error::GenerationError;
use std::future::Future;
use tracing::warn;

/// Which failures of the primary model send the call to the fallback model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTrigger {
    /// Any error from the primary, including auth and not-found
    AnyFailure,
    /// Only permission-denied errors; everything else propagates
    PermissionDenied,
}

impl FallbackTrigger {
    pub fn matches(&self, err: &GenerationError) -> bool {
        match self {
            FallbackTrigger::AnyFailure => true,
            FallbackTrigger::PermissionDenied => err.is_permission_denied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    Fallback,
}

/// The model a single routed call should target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub tier: Tier,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct ModelRouter {
    task: &'static str,
    primary: String,
    fallback: String,
    trigger: FallbackTrigger,
}

impl ModelRouter {
    pub fn new(
        task: &'static str,
        primary: impl Into<String>,
        fallback: impl Into<String>,
        trigger: FallbackTrigger,
    ) -> Self {
        Self {
            task,
            primary: primary.into(),
            fallback: fallback.into(),
            trigger,
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn trigger(&self) -> FallbackTrigger {
        self.trigger
    }

    /// Run `call` against the primary model, then once against the fallback
    /// if the primary's error matches the trigger.
    ///
    /// `call` should contain the whole retried request so that each model
    /// gets its own retry budget.
    pub async fn run<T, F, Fut>(&self, mut call: F) -> Result<T, GenerationError>
    where
        F: FnMut(Route) -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let primary = Route { tier: Tier::Primary, model: self.primary.clone() };

        match call(primary).await {
            Ok(value) => Ok(value),
            Err(e) if self.trigger.matches(&e) => {
                warn!(
                    task = self.task,
                    primary = %self.primary,
                    fallback = %self.fallback,
                    "Primary model failed, falling back: {}",
                    e
                );
                call(Route { tier: Tier::Fallback, model: self.fallback.clone() }).await
            }
            Err(e) => Err(e),
        }
    }
}
