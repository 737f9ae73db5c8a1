//! Parameters steps pass when asking for a prompt

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::host::PickEntry;

/// Something that can be shown as a row of a choice list
pub trait PickItem: Clone + Send + Sync {
    fn label(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    fn detail(&self) -> Option<&str> {
        None
    }

    fn to_entry(&self) -> PickEntry {
        PickEntry {
            label: self.label().to_string(),
            description: self.description().map(str::to_string),
            detail: self.detail().map(str::to_string),
        }
    }
}

impl PickItem for String {
    fn label(&self) -> &str {
        self
    }
}

impl PickItem for &'static str {
    fn label(&self) -> &str {
        self
    }
}

/// Decides whether a dismissed prompt should come back instead of cancelling
#[async_trait]
pub trait ShouldResume: Send + Sync {
    async fn should_resume(&self) -> bool;
}

#[async_trait]
impl<F, Fut> ShouldResume for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send,
{
    async fn should_resume(&self) -> bool {
        (self)().await
    }
}

/// Live observer of a text entry. Runs once per edit and may return a
/// validation message to show under the prompt (`None` clears it).
#[async_trait]
pub trait ValueObserver: Send + Sync {
    async fn on_change(&self, value: String) -> Option<String>;
}

#[async_trait]
impl<F, Fut> ValueObserver for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send,
{
    async fn on_change(&self, value: String) -> Option<String> {
        (self)(value).await
    }
}

pub struct QuickPickParams<T> {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub items: Vec<T>,
    /// Items to highlight initially, matched against `items` by label
    pub active_items: Vec<T>,
    pub placeholder: Option<String>,
    /// Selecting an item does not leave this step in the history
    pub unsave: bool,
    pub should_resume: Option<Arc<dyn ShouldResume>>,
}

impl<T: PickItem> QuickPickParams<T> {
    pub fn new(title: impl Into<String>, step: usize, total_steps: usize, items: Vec<T>) -> Self {
        Self {
            title: title.into(),
            step,
            total_steps,
            items,
            active_items: Vec::new(),
            placeholder: None,
            unsave: false,
            should_resume: None,
        }
    }

    pub fn active(mut self, items: Vec<T>) -> Self {
        self.active_items = items;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn unsave(mut self) -> Self {
        self.unsave = true;
        self
    }

    pub fn should_resume(mut self, policy: impl ShouldResume + 'static) -> Self {
        self.should_resume = Some(Arc::new(policy));
        self
    }

    /// Indices of `active_items` within `items`
    pub(crate) fn active_indices(&self) -> Vec<usize> {
        self.active_items
            .iter()
            .filter_map(|active| {
                self.items
                    .iter()
                    .position(|item| item.label() == active.label())
            })
            .collect()
    }
}

pub struct InputBoxParams {
    pub title: Option<String>,
    pub step: usize,
    pub total_steps: usize,
    pub value: String,
    pub prompt: Option<String>,
    pub password: bool,
    pub unsave: bool,
    pub should_resume: Option<Arc<dyn ShouldResume>>,
    pub on_change: Option<Arc<dyn ValueObserver>>,
}

impl InputBoxParams {
    pub fn new(step: usize, total_steps: usize) -> Self {
        Self {
            title: None,
            step,
            total_steps,
            value: String::new(),
            prompt: None,
            password: false,
            unsave: false,
            should_resume: None,
            on_change: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn password(mut self) -> Self {
        self.password = true;
        self
    }

    pub fn unsave(mut self) -> Self {
        self.unsave = true;
        self
    }

    pub fn should_resume(mut self, policy: impl ShouldResume + 'static) -> Self {
        self.should_resume = Some(Arc::new(policy));
        self
    }

    pub fn on_change(mut self, observer: impl ValueObserver + 'static) -> Self {
        self.on_change = Some(Arc::new(observer));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Station {
        name: &'static str,
        host: &'static str,
    }

    impl PickItem for Station {
        fn label(&self) -> &str {
            self.name
        }

        fn description(&self) -> Option<&str> {
            Some(self.host)
        }
    }

    #[test]
    fn test_to_entry_copies_label_and_description() {
        let entry = Station {
            name: "Night Shift",
            host: "Lin",
        }
        .to_entry();
        assert_eq!(entry.label, "Night Shift");
        assert_eq!(entry.description.as_deref(), Some("Lin"));
        assert_eq!(entry.detail, None);
    }

    #[test]
    fn test_active_indices_match_by_label() {
        let params = QuickPickParams::new(
            "Pick",
            1,
            2,
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
        .active(vec!["c".to_string(), "missing".to_string()]);
        assert_eq!(params.active_indices(), vec![2]);
    }

    #[test]
    fn test_input_box_builder() {
        let params = InputBoxParams::new(2, 3)
            .title("Search")
            .value("jazz")
            .prompt("Keyword")
            .password()
            .unsave();
        assert_eq!(params.title.as_deref(), Some("Search"));
        assert_eq!(params.value, "jazz");
        assert!(params.password);
        assert!(params.unsave);
        assert!(params.on_change.is_none());
    }

    #[tokio::test]
    async fn test_closures_implement_callback_traits() {
        let resume = || async { true };
        assert!(resume.should_resume().await);

        let observer = |value: String| async move {
            if value.is_empty() {
                Some("required".to_string())
            } else {
                None
            }
        };
        assert_eq!(
            observer.on_change(String::new()).await.as_deref(),
            Some("required")
        );
        assert_eq!(observer.on_change("x".to_string()).await, None);
    }
}
