//! Renderable components and their companion statics.
//!
//! A component is a render function plus a keyed map of statics: data or
//! hooks that the framework or the application reads off the component
//! itself (`getProps`, `shouldGetProps`, route metadata and so on).
//! Wrapping a component hides the inner statics unless they are hoisted,
//! see [`crate::hoc`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Props passed to [`Component::render`].
pub type Props = Value;

type RenderFn = Arc<dyn Fn(&Props) -> String + Send + Sync>;
type HookFn = Arc<dyn Fn(&Props) -> Value + Send + Sync>;

/// A value attached to a component.
#[derive(Clone)]
pub enum StaticValue {
    Data(Value),
    Hook(HookFn),
}

impl StaticValue {
    pub fn hook(f: impl Fn(&Props) -> Value + Send + Sync + 'static) -> Self {
        Self::Hook(Arc::new(f))
    }

    /// Data is returned as-is; hooks are called with `props`.
    pub fn evaluate(&self, props: &Props) -> Value {
        match self {
            Self::Data(value) => value.clone(),
            Self::Hook(hook) => hook(props),
        }
    }
}

impl fmt::Debug for StaticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Self::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

impl From<Value> for StaticValue {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

/// Statics keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Statics(BTreeMap<String, StaticValue>);

impl Statics {
    pub fn get(&self, key: &str) -> Option<&StaticValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: StaticValue) -> Option<StaticValue> {
        self.0.insert(key.into(), value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StaticValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named render function with statics.
#[derive(Clone)]
pub struct Component {
    display_name: String,
    render: RenderFn,
    statics: Statics,
}

impl Component {
    pub fn new(
        display_name: impl Into<String>,
        render: impl Fn(&Props) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            render: Arc::new(render),
            statics: Statics::default(),
        }
    }

    /// Builder form of [`Statics::insert`].
    pub fn with_static(mut self, key: impl Into<String>, value: impl Into<StaticValue>) -> Self {
        self.statics.insert(key, value.into());
        self
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn statics(&self) -> &Statics {
        &self.statics
    }

    pub fn statics_mut(&mut self) -> &mut Statics {
        &mut self.statics
    }

    pub fn render(&self, props: &Props) -> String {
        (self.render)(props)
    }

    /// Evaluate the static `key`, if present.
    pub fn call_static(&self, key: &str, props: &Props) -> Option<Value> {
        self.statics.get(key).map(|value| value.evaluate(props))
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("display_name", &self.display_name)
            .field("statics", &self.statics.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
