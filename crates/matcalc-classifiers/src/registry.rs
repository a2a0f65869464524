//! Named collection of trained models.
//!
//! The registry is an ordinary value: create one when the application starts
//! and hand it to the components that need it. Entries are kept sorted by
//! name. Observers are called synchronously, in subscription order, before a
//! mutating call returns. They only see the event, never the registry, so
//! they cannot mutate it from inside a notification. Callers that share a
//! registry across threads must wrap it in a single `Mutex`.
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ClassifierError, Result};
use crate::models::TrainedModel;
use crate::xml::{ToXml, XmlElement};

/// Root element of an exported registry.
pub const REGISTRY_ELEMENT: &str = "classifiers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Added { name: String, replaced: bool },
    Cleared { removed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&RegistryEvent) + Send>;

#[derive(Default)]
pub struct ClassifierRegistry {
    entries: BTreeMap<String, Box<dyn TrainedModel>>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl ClassifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the model stored under `model.name()`.
    /// Returns `true` when an existing entry was replaced.
    pub fn add(&mut self, model: Box<dyn TrainedModel>) -> bool {
        let name = model.name().to_string();
        let replaced = self.entries.insert(name.clone(), model).is_some();
        if replaced {
            log::info!("Replaced model '{}' in registry", name);
        } else {
            log::info!("Added model '{}' to registry", name);
        }
        self.notify(&RegistryEvent::Added { name, replaced });
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&dyn TrainedModel> {
        self.entries.get(name).map(|m| m.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        log::info!("Cleared {} models from registry", removed);
        self.notify(&RegistryEvent::Cleared { removed });
        removed
    }

    /// Model names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &(dyn TrainedModel + 'static))> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&RegistryEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: &RegistryEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    /// Add every child of a `<classifiers>` element, decoded by `loader`.
    /// All children are decoded before any is added, so a child that fails
    /// to load leaves the registry untouched. Returns the number added.
    pub fn load_xml<F>(&mut self, root: &XmlElement, loader: F) -> Result<usize>
    where
        F: Fn(&XmlElement) -> Result<Box<dyn TrainedModel>>,
    {
        if root.name != REGISTRY_ELEMENT {
            return Err(ClassifierError::InvalidXml(format!(
                "expected <{}>, found <{}>",
                REGISTRY_ELEMENT, root.name
            )));
        }
        let models = root
            .children
            .iter()
            .map(&loader)
            .collect::<Result<Vec<_>>>()?;
        let added = models.len();
        for model in models {
            self.add(model);
        }
        Ok(added)
    }
}

impl ToXml for ClassifierRegistry {
    /// One child per model in name order; each child is the model's own element.
    fn to_xml(&self) -> Result<XmlElement> {
        let mut root = XmlElement::new(REGISTRY_ELEMENT);
        for model in self.entries.values() {
            root.push_child(model.to_xml()?);
        }
        Ok(root)
    }
}

impl fmt::Debug for ClassifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierRegistry")
            .field("models", &self.entries.keys().collect::<Vec<_>>())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Fixed {
        name: String,
        label: String,
    }

    impl TrainedModel for Fixed {
        fn name(&self) -> &str {
            &self.name
        }

        fn classify(&self, _features: &[f64]) -> String {
            self.label.clone()
        }

        fn to_xml(&self) -> Result<XmlElement> {
            Ok(XmlElement::new("model")
                .with_attribute("name", &self.name)
                .with_attribute("label", &self.label))
        }
    }

    fn fixed(name: &str, label: &str) -> Box<dyn TrainedModel> {
        Box::new(Fixed {
            name: name.to_string(),
            label: label.to_string(),
        })
    }

    #[test]
    fn add_is_an_upsert() {
        let mut registry = ClassifierRegistry::new();
        assert!(!registry.add(fixed("x", "first")));
        assert!(registry.add(fixed("x", "second")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").unwrap().classify(&[]), "second");
    }

    #[test]
    fn missing_name_is_none() {
        let registry = ClassifierRegistry::new();
        assert!(registry.get("absent").is_none());
        assert!(!registry.contains("absent"));
    }

    #[test]
    fn observers_run_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ClassifierRegistry::new();

        let first = Arc::clone(&log);
        registry.subscribe(move |e| first.lock().unwrap().push(format!("1:{:?}", e)));
        let second = Arc::clone(&log);
        let id = registry.subscribe(move |_| second.lock().unwrap().push("2".to_string()));

        registry.add(fixed("a", "l"));
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.clear();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert!(log[0].starts_with("1:Added"));
        assert_eq!(log[1], "2");
        assert_eq!(log[2], "1:Cleared { removed: 1 }");
    }

    #[test]
    fn export_is_sorted_by_name() {
        let mut registry = ClassifierRegistry::new();
        for name in ["b", "a", "c"] {
            registry.add(fixed(name, "l"));
        }
        let xml = registry.to_xml().unwrap();
        assert_eq!(xml.name, "classifiers");
        let names: Vec<&str> = xml
            .children
            .iter()
            .map(|c| c.attribute("name").unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn load_rejects_wrong_root() {
        let mut registry = ClassifierRegistry::new();
        let result = registry.load_xml(&XmlElement::new("models"), |_| Ok(fixed("a", "l")));
        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn failed_load_leaves_registry_untouched() {
        let events = Arc::new(Mutex::new(0));
        let mut registry = ClassifierRegistry::new();
        let seen = Arc::clone(&events);
        registry.subscribe(move |_| *seen.lock().unwrap() += 1);

        let mut root = XmlElement::new(REGISTRY_ELEMENT);
        root.push_child(XmlElement::new("model").with_attribute("name", "good"));
        root.push_child(XmlElement::new("model").with_attribute("name", "bad"));
        let result = registry.load_xml(&root, |child| match child.attribute("name") {
            Some("good") => Ok(fixed("good", "l")),
            _ => Err(ClassifierError::InvalidXml("unsupported".to_string())),
        });

        assert!(result.is_err());
        assert!(registry.is_empty());
        assert_eq!(*events.lock().unwrap(), 0);
    }

    #[test]
    fn registry_can_move_between_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<ClassifierRegistry>();

        let mut registry = ClassifierRegistry::new();
        registry.add(fixed("a", "l"));
        let shared = Arc::new(Mutex::new(registry));
        let worker = Arc::clone(&shared);
        std::thread::spawn(move || {
            worker.lock().unwrap().add(fixed("b", "l"));
        })
        .join()
        .unwrap();
        assert_eq!(shared.lock().unwrap().len(), 2);
    }
}
