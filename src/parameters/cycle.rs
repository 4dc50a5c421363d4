//! Recursion detection for function definitions
//!
//! Walks the dependency graph from a candidate function through every
//! function-valued parameter it reads, carrying the names on the current path.
//! Reaching a name already on the path means the definition would recurse.

use super::function::ParamFunction;
use super::parameter::{Parameter, ParameterError};
use std::collections::BTreeMap;

pub(crate) struct CycleGuard<'a> {
    definitions: &'a BTreeMap<String, Parameter>,
}

impl<'a> CycleGuard<'a> {
    pub fn new(definitions: &'a BTreeMap<String, Parameter>) -> Self {
        Self { definitions }
    }

    /// Check that installing `function` under `name` keeps the graph acyclic
    pub fn check(&self, name: &str, function: &ParamFunction) -> Result<(), ParameterError> {
        let mut path = Vec::new();
        self.visit(name, name, function, &mut path)
    }

    fn visit(
        &self,
        root: &str,
        name: &str,
        function: &ParamFunction,
        path: &mut Vec<String>,
    ) -> Result<(), ParameterError> {
        let dependencies = function.dependencies(name);
        if dependencies.iter().any(|dependency| path.contains(dependency)) {
            return Err(ParameterError::RecursiveDefinition {
                name: root.to_string(),
                through: name.to_string(),
            });
        }

        path.push(name.to_string());
        for dependency in &dependencies {
            if let Some(Parameter::Function(next)) = self.definitions.get(dependency) {
                self.visit(root, dependency, next, path)?;
            }
        }
        path.pop();
        Ok(())
    }
}
