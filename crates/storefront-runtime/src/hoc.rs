//! Higher-order component chaining.
//!
//! [`apply_hocs`] wraps a component with each HOC in turn, so the first HOC
//! is innermost and the last is outermost. After every step the inner
//! layer's statics are hoisted onto the wrapper, skipping the ones the
//! framework manages itself.

use crate::component::Component;
use crate::error::{Error, Result};

/// Statics owned by the framework. These are never copied across layers.
pub const FRAMEWORK_STATICS: &[&str] = &[
    "childContextTypes",
    "contextType",
    "contextTypes",
    "defaultProps",
    "displayName",
    "getDefaultProps",
    "getDerivedStateFromError",
    "getDerivedStateFromProps",
    "mixins",
    "propTypes",
    "type",
    "name",
    "length",
    "prototype",
    "caller",
    "callee",
    "arguments",
    "arity",
];

type WrapFn = std::sync::Arc<dyn Fn(Component) -> Option<Component> + Send + Sync>;

/// A named component wrapper.
#[derive(Clone)]
pub struct Hoc {
    name: String,
    wrap: WrapFn,
}

impl Hoc {
    /// A wrapper that may decline to produce a component.
    pub fn new(
        name: impl Into<String>,
        wrap: impl Fn(Component) -> Option<Component> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            wrap: std::sync::Arc::new(wrap),
        }
    }

    /// A wrapper that always produces a component.
    pub fn infallible(
        name: impl Into<String>,
        wrap: impl Fn(Component) -> Component + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, move |component| Some(wrap(component)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, component: Component) -> Option<Component> {
        (self.wrap)(component)
    }
}

impl std::fmt::Debug for Hoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hoc").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Copy non-framework statics from `inner` onto `outer`. Inner values
/// overwrite values the wrapper already carries.
pub fn hoist_statics(outer: &mut Component, inner: &Component) {
    for (key, value) in inner.statics().iter() {
        if FRAMEWORK_STATICS.contains(&key) {
            continue;
        }
        outer.statics_mut().insert(key, value.clone());
    }
}

/// Wrap `component` with `hocs`, first to last.
///
/// An empty list returns the component unchanged. A HOC that produces no
/// component fails the whole chain.
pub fn apply_hocs(component: Component, hocs: &[Hoc]) -> Result<Component> {
    hocs.iter()
        .enumerate()
        .try_fold(component, |inner, (index, hoc)| {
            let mut outer = hoc
                .apply(inner.clone())
                .ok_or_else(|| Error::HocReturnedNothing {
                    index,
                    hoc: hoc.name.clone(),
                })?;
            hoist_statics(&mut outer, &inner);
            tracing::trace!(hoc = %hoc.name, component = outer.display_name(), "Applied HOC");
            Ok(outer)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Props, StaticValue};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn tag(name: &'static str) -> Hoc {
        Hoc::infallible(name, move |inner: Component| {
            Component::new(format!("{name}({})", inner.display_name()), move |props: &Props| {
                format!("<{name}>{}</{name}>", inner.render(props))
            })
        })
    }

    fn app() -> Component {
        Component::new("App", |_: &Props| "app".to_string())
            .with_static("getProps", StaticValue::hook(|_: &Props| json!({ "ok": true })))
            .with_static("propTypes", json!("inner"))
    }

    #[test]
    fn test_first_hoc_is_innermost() {
        let wrapped = apply_hocs(app(), &[tag("a"), tag("b")]).unwrap();
        assert_eq!(wrapped.display_name(), "b(a(App))");
        assert_eq!(wrapped.render(&Value::Null), "<b><a>app</a></b>");
    }

    #[test]
    fn test_empty_chain_returns_component() {
        let wrapped = apply_hocs(app(), &[]).unwrap();
        assert_eq!(wrapped.display_name(), "App");
        assert_eq!(wrapped.render(&Value::Null), "app");
    }

    #[test]
    fn test_statics_are_hoisted_except_framework_ones() {
        let wrapped = apply_hocs(app(), &[tag("a"), tag("b")]).unwrap();
        assert_eq!(
            wrapped.call_static("getProps", &Value::Null),
            Some(json!({ "ok": true }))
        );
        assert!(!wrapped.statics().contains("propTypes"));
    }

    #[test]
    fn test_inner_static_overwrites_wrapper_static() {
        let shadow = Hoc::infallible("shadow", |inner: Component| {
            Component::new("Shadow", move |props: &Props| inner.render(props))
                .with_static("getProps", json!("wrapper"))
        });
        let wrapped = apply_hocs(app(), &[shadow]).unwrap();
        assert_eq!(
            wrapped.call_static("getProps", &Value::Null),
            Some(json!({ "ok": true }))
        );
    }

    #[test]
    fn test_hoc_returning_nothing_fails() {
        let broken = Hoc::new("broken", |_| None);
        let err = apply_hocs(app(), &[tag("a"), broken]).unwrap_err();
        assert!(matches!(
            err,
            Error::HocReturnedNothing { index: 1, ref hoc } if hoc == "broken"
        ));
    }
}
