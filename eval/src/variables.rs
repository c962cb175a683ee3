//! `Variables` trait and implementations.

use hashbrown::HashMap;

use core::{fmt, hash::BuildHasher, iter::FromIterator, ops::Index};

use crate::alloc::{BTreeMap, Box, String};

/// Encapsulates read access to named variables visible to an expression.
///
/// The trait is object-safe; evaluators receive variables as `&dyn Variables<V>`.
pub trait Variables<V> {
    /// Returns value of the named variable, or `None` if it is not defined.
    fn resolve(&self, name: &str) -> Option<V>;
}

/// Empty set of variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVariables;

impl<V> Variables<V> for NoVariables {
    fn resolve(&self, _name: &str) -> Option<V> {
        None
    }
}

impl<V: Clone, S: BuildHasher> Variables<V> for HashMap<String, V, S> {
    fn resolve(&self, name: &str) -> Option<V> {
        self.get(name).cloned()
    }
}

#[cfg(feature = "std")]
impl<V: Clone, S: BuildHasher> Variables<V> for std::collections::HashMap<String, V, S> {
    fn resolve(&self, name: &str) -> Option<V> {
        self.get(name).cloned()
    }
}

impl<V: Clone> Variables<V> for BTreeMap<String, V> {
    fn resolve(&self, name: &str) -> Option<V> {
        self.get(name).cloned()
    }
}

impl<V, T: Variables<V> + ?Sized> Variables<V> for &T {
    fn resolve(&self, name: &str) -> Option<V> {
        (**self).resolve(name)
    }
}

impl<V, T: Variables<V> + ?Sized> Variables<V> for Box<T> {
    fn resolve(&self, name: &str) -> Option<V> {
        (**self).resolve(name)
    }
}

/// Named variables stored in a hash map.
///
/// # Examples
///
/// ```
/// use shunt_eval::{VariableMap, Variables};
///
/// let mut vars = VariableMap::new();
/// vars.insert("x", 1.0).insert("y", 2.5);
/// assert_eq!(vars.resolve("y"), Some(2.5));
/// assert_eq!(vars.resolve("z"), None);
///
/// let vars: VariableMap<f64> = [("a", 10.0), ("b", 15.0)].into_iter().collect();
/// assert_eq!(vars["a"], 10.0);
/// ```
#[derive(Clone)]
pub struct VariableMap<V> {
    inner: HashMap<String, V>,
}

impl<V> Default for VariableMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for VariableMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.inner.iter()).finish()
    }
}

impl<V> VariableMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Sets the value of a variable, overwriting the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> &mut Self {
        self.inner.insert(name.into(), value);
        self
    }

    /// Returns a reference to the value of a variable.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.inner.get(name)
    }

    /// Removes a variable, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.inner.remove(name)
    }

    /// Checks whether a variable is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Iterates over variables in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.inner.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether this map is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<V: Clone> Variables<V> for VariableMap<V> {
    fn resolve(&self, name: &str) -> Option<V> {
        self.inner.get(name).cloned()
    }
}

impl<V> Index<&str> for VariableMap<V> {
    type Output = V;

    fn index(&self, name: &str) -> &Self::Output {
        self.inner
            .get(name)
            .unwrap_or_else(|| panic!("Variable `{}` is not defined", name))
    }
}

impl<V, S: Into<String>> FromIterator<(S, V)> for VariableMap<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V, S: Into<String>> Extend<(S, V)> for VariableMap<V> {
    fn extend<I: IntoIterator<Item = (S, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter().map(|(name, value)| (name.into(), value));
        self.inner.extend(iter);
    }
}
