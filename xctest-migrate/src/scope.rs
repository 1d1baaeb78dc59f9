//! Per-declaration analysis that runs before any member is rewritten.

use swift_cst_core::ast::{AstNode, FuncDecl, MemberBlock, VariableDecl};
use swift_cst_core::SyntaxKind::*;

use crate::config::MigrationConfig;

/// Output shape of a migrated suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// `struct`: no inheritance, no `deinit`.
    Value,
    /// `class`: keeps identity so teardown can run in `deinit`.
    Reference,
}

/// Facts about one suite's direct members. Built once, then read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeAnalysis {
    pub test_method_count: usize,
    pub has_setup: bool,
    pub has_teardown: bool,
    pub has_initializer: bool,
    pub has_deinitializer: bool,
    pub has_stored_properties: bool,
    pub has_accessor_members: bool,
    pub has_helper_functions: bool,
}

impl ScopeAnalysis {
    /// Inspect the direct members of `block`. Nested function bodies are
    /// not visited.
    pub fn analyze(block: MemberBlock<'_>, config: &MigrationConfig) -> Self {
        let mut analysis = Self::default();
        for member in block.members().filter_map(|member| member.as_node()) {
            match member.kind() {
                FUNC_DECL => {
                    if let Some(func) = FuncDecl::cast(member) {
                        analysis.record_function(func, config);
                    }
                }
                INIT_DECL => analysis.has_initializer = true,
                DEINIT_DECL => analysis.has_deinitializer = true,
                VARIABLE_DECL => {
                    if let Some(variable) = VariableDecl::cast(member) {
                        analysis.record_variable(variable);
                    }
                }
                _ => {}
            }
        }
        analysis
    }

    fn record_function(&mut self, func: FuncDecl<'_>, config: &MigrationConfig) {
        let name = func.name_text();
        if config.test_methods.is_test(name) {
            self.test_method_count += 1;
        } else if is_instance_method(func) && config.lifecycle.is_setup(name) {
            self.has_setup = true;
        } else if is_instance_method(func) && config.lifecycle.is_teardown(name) {
            self.has_teardown = true;
        } else {
            self.has_helper_functions = true;
        }
    }

    fn record_variable(&mut self, variable: VariableDecl<'_>) {
        for binding in variable.bindings() {
            if binding.accessor_block().is_some() {
                self.has_accessor_members = true;
            }
            if binding.is_initialized_storage() {
                self.has_stored_properties = true;
            }
        }
    }

    /// Teardown needs `deinit`, and stored state needs a stable identity.
    pub fn representation(&self) -> Representation {
        if self.has_teardown || self.has_deinitializer || self.has_stored_properties {
            Representation::Reference
        } else {
            Representation::Value
        }
    }

    /// Lifecycle methods, accessor bodies, and helpers all count as special.
    pub fn has_special_members(&self) -> bool {
        self.has_setup
            || self.has_teardown
            || self.has_initializer
            || self.has_deinitializer
            || self.has_accessor_members
            || self.has_helper_functions
    }

    /// Whether the `ordinal`-th test method (1-based, declaration order) is
    /// preceded by an empty line.
    pub fn needs_blank_line_before(&self, ordinal: usize) -> bool {
        self.has_special_members() || (self.test_method_count > 1 && ordinal > 1)
    }
}

/// `class func setUp()` is the suite-wide hook, not per-test setup.
pub(crate) fn is_instance_method(func: FuncDecl<'_>) -> bool {
    !func
        .modifiers()
        .iter()
        .any(|modifier| modifier == "class" || modifier == "static")
}
