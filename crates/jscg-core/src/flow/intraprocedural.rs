//! Intraprocedural flow graph construction
//!
//! Walks every parsed module once. Functions and call sites are registered
//! in the [`Program`] as they are discovered, bindings are resolved through
//! one program-wide scope tree, and every directly observable value flow
//! becomes an edge. Property access is field-based: `o.p` is `Prop(p)` for
//! every object `o`, and unresolved globals are properties too.

use std::path::Path;

use swc_common::Span;
use swc_ecma_ast::{
    ArrowExpr, AssignExpr, AssignOp, AssignTarget, AssignTargetPat, BinaryOp, BlockStmt,
    BlockStmtOrExpr, CallExpr, Callee, CatchClause, Class, ClassMember, Decl, DefaultDecl,
    ExportSpecifier, Expr, ExprOrSpread, ForHead, Ident, ImportSpecifier, JSXAttrOrSpread,
    JSXAttrValue, JSXElement, JSXElementChild, JSXExpr, Lit, MemberExpr, MemberProp, Module,
    ModuleDecl, ModuleExportName, ModuleItem, NewExpr, ObjectLit, ObjectPatProp, OptChainBase,
    ParamOrTsParamProp, Pat, Prop, PropName, PropOrSpread, SimpleAssignTarget, Stmt, SuperProp,
    TaggedTpl, TsModuleRef, TsParamPropParam, VarDecl, VarDeclKind, VarDeclOrExpr,
};

use super::graph::{FlowGraph, VertexId};
use super::modules::{ExportBinding, ImportBinding, ImportedName, ModuleRecord, RequireCall};
use super::vertex::{ExprKey, Vertex};
use crate::parser::ParsedFile;
use crate::program::{CallKind, FileId, FunctionId, Location, Program};
use crate::semantic::{ScopeId, ScopeKind, ScopeTree, SymbolKind, SymbolTable};

/// Everything the builder accumulates across files.
pub struct FlowContext {
    pub program: Program,
    pub graph: FlowGraph,
    pub scopes: ScopeTree,
    pub symbols: SymbolTable,
}

impl Default for FlowContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowContext {
    pub fn new() -> Self {
        Self {
            program: Program::new(),
            graph: FlowGraph::new(),
            scopes: ScopeTree::new(),
            symbols: SymbolTable::new(),
        }
    }
}

/// Adds the flow of one file to `ctx`. Returns `None` when the file did not
/// produce a module.
pub fn build_file(ctx: &mut FlowContext, path: &Path, parsed: &ParsedFile) -> Option<ModuleRecord> {
    let module = parsed.module()?;
    let file = ctx.program.add_file(path);
    let global = ctx.scopes.global();
    let module_scope = ctx
        .scopes
        .create_scope(ScopeKind::Module, global, module.span);

    let mut builder = FlowBuilder {
        ctx,
        parsed,
        file,
        record: ModuleRecord::new(file, path),
        current_scope: module_scope,
        current_function: None,
        this_function: None,
    };
    builder.visit_module(module);
    Some(builder.record)
}

enum FnParam<'b> {
    Pat(&'b Pat),
    /// TypeScript parameter property: also stored on `this`.
    Property(&'b Ident, Option<&'b Expr>),
}

enum FnBody<'b> {
    Block(Option<&'b BlockStmt>),
    Expr(&'b Expr),
}

struct FunctionParts<'b> {
    name: Option<String>,
    own_name: Option<&'b Ident>,
    params: Vec<FnParam<'b>>,
    body: FnBody<'b>,
    span: Span,
    is_arrow: bool,
}

struct FlowBuilder<'a> {
    ctx: &'a mut FlowContext,
    parsed: &'a ParsedFile,
    file: FileId,
    record: ModuleRecord,
    current_scope: ScopeId,
    current_function: Option<FunctionId>,
    /// Function whose receiver `this` denotes; arrows inherit it.
    this_function: Option<FunctionId>,
}

impl<'a> FlowBuilder<'a> {
    // ---- graph helpers ----

    fn vertex(&mut self, vertex: Vertex) -> VertexId {
        self.ctx.graph.intern(vertex)
    }

    fn edge(&mut self, from: VertexId, to: VertexId) {
        self.ctx.graph.add_edge(from, to);
    }

    fn flow(&mut self, from: Option<VertexId>, to: VertexId) {
        if let Some(from) = from {
            self.ctx.graph.add_edge(from, to);
        }
    }

    fn unknown(&mut self) -> VertexId {
        self.ctx.graph.unknown()
    }

    fn prop(&mut self, name: &str) -> VertexId {
        self.vertex(Vertex::prop(name))
    }

    fn expr_vertex(&mut self, span: Span) -> VertexId {
        let key = ExprKey {
            file: self.file,
            start: self.parsed.offset(span.lo),
            end: self.parsed.offset(span.hi),
        };
        self.vertex(Vertex::Expr(key))
    }

    fn location(&self, span: Span) -> Location {
        let start = self.parsed.offset(span.lo);
        let end = self.parsed.offset(span.hi);
        Location {
            start: self.parsed.position(start),
            end: self.parsed.position(end),
            range: start..end,
        }
    }

    // ---- bindings ----

    fn declare(&mut self, ident: &Ident, kind: SymbolKind, scope: ScopeId) {
        self.ctx
            .symbols
            .declare(&ident.sym, kind, scope, ident.span);
    }

    fn declare_pattern(&mut self, pat: &Pat, kind: SymbolKind, scope: ScopeId) {
        match pat {
            Pat::Ident(binding) => self.declare(&binding.id, kind, scope),
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.declare_pattern(elem, kind, scope);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => self.declare_pattern(&kv.value, kind, scope),
                        ObjectPatProp::Assign(assign) => self.declare(&assign.key.id, kind, scope),
                        ObjectPatProp::Rest(rest) => self.declare_pattern(&rest.arg, kind, scope),
                    }
                }
            }
            Pat::Rest(rest) => self.declare_pattern(&rest.arg, kind, scope),
            Pat::Assign(assign) => self.declare_pattern(&assign.left, kind, scope),
            _ => {}
        }
    }

    /// `Var` of the visible binding for `name`, or `Prop(name)` for globals.
    fn resolve(&mut self, name: &str) -> VertexId {
        match self
            .ctx
            .symbols
            .lookup(name, self.current_scope, &self.ctx.scopes)
        {
            Some(symbol) => self.vertex(Vertex::Var(symbol)),
            None => self.prop(name),
        }
    }

    fn is_global(&self, name: &str) -> bool {
        self.ctx
            .symbols
            .lookup(name, self.current_scope, &self.ctx.scopes)
            .is_none()
    }

    /// Binds a declaration or parameter pattern, flowing `source` into plain
    /// identifiers. Object destructuring reads the field-based property.
    fn bind_pattern(&mut self, pat: &Pat, source: Option<VertexId>) {
        match pat {
            Pat::Ident(binding) => {
                let target = self.resolve(&binding.id.sym);
                self.flow(source, target);
            }
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.bind_pattern(elem, None);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            let field = self.prop_name_vertex(&kv.key);
                            self.bind_pattern(&kv.value, Some(field));
                        }
                        ObjectPatProp::Assign(assign) => {
                            let field = self.prop(&assign.key.sym);
                            let target = self.resolve(&assign.key.sym);
                            self.edge(field, target);
                            if let Some(value) = &assign.value {
                                let default = self.visit_expr(value);
                                self.flow(default, target);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.bind_pattern(&rest.arg, None),
                    }
                }
            }
            Pat::Rest(rest) => self.bind_pattern(&rest.arg, None),
            Pat::Assign(assign) => {
                let default = self.visit_expr(&assign.right);
                self.bind_pattern(&assign.left, source);
                if default.is_some() {
                    self.bind_pattern(&assign.left, default);
                }
            }
            Pat::Expr(expr) => {
                if let Some(target) = self.assignment_target_expr(expr) {
                    self.flow(source, target);
                }
            }
            _ => {}
        }
    }

    // ---- hoisting ----

    fn hoist_decl(&mut self, decl: &Decl, scope: ScopeId) {
        match decl {
            Decl::Fn(fn_decl) => self.declare(&fn_decl.ident, SymbolKind::Function, scope),
            Decl::Class(class_decl) => self.declare(&class_decl.ident, SymbolKind::Class, scope),
            Decl::Var(var_decl) => self.declare_var(var_decl, scope),
            Decl::Using(using) => {
                for declarator in &using.decls {
                    self.declare_pattern(&declarator.name, SymbolKind::Constant, scope);
                }
            }
            _ => {}
        }
    }

    fn declare_var(&mut self, var_decl: &VarDecl, scope: ScopeId) {
        let (kind, target) = match var_decl.kind {
            VarDeclKind::Var => (SymbolKind::Variable, self.ctx.scopes.var_scope(scope)),
            VarDeclKind::Let => (SymbolKind::Variable, scope),
            VarDeclKind::Const => (SymbolKind::Constant, scope),
        };
        for declarator in &var_decl.decls {
            self.declare_pattern(&declarator.name, kind, target);
        }
    }

    /// Declares lexical and function declarations at block entry.
    fn hoist_block(&mut self, stmts: &[Stmt], scope: ScopeId) {
        for stmt in stmts {
            if let Stmt::Decl(decl) = stmt {
                self.hoist_decl(decl, scope);
            }
        }
    }

    fn hoist_var_decl(&mut self, var_decl: &VarDecl, var_scope: ScopeId) {
        if var_decl.kind == VarDeclKind::Var {
            for declarator in &var_decl.decls {
                self.declare_pattern(&declarator.name, SymbolKind::Variable, var_scope);
            }
        }
    }

    /// Declares nested `var`s in the enclosing function or module scope.
    fn hoist_vars(&mut self, stmt: &Stmt, var_scope: ScopeId) {
        match stmt {
            Stmt::Decl(Decl::Var(var_decl)) => self.hoist_var_decl(var_decl, var_scope),
            Stmt::Block(block) => {
                for stmt in &block.stmts {
                    self.hoist_vars(stmt, var_scope);
                }
            }
            Stmt::If(if_stmt) => {
                self.hoist_vars(&if_stmt.cons, var_scope);
                if let Some(alt) = &if_stmt.alt {
                    self.hoist_vars(alt, var_scope);
                }
            }
            Stmt::For(for_stmt) => {
                if let Some(VarDeclOrExpr::VarDecl(var_decl)) = &for_stmt.init {
                    self.hoist_var_decl(var_decl, var_scope);
                }
                self.hoist_vars(&for_stmt.body, var_scope);
            }
            Stmt::ForIn(for_in) => {
                if let ForHead::VarDecl(var_decl) = &for_in.left {
                    self.hoist_var_decl(var_decl, var_scope);
                }
                self.hoist_vars(&for_in.body, var_scope);
            }
            Stmt::ForOf(for_of) => {
                if let ForHead::VarDecl(var_decl) = &for_of.left {
                    self.hoist_var_decl(var_decl, var_scope);
                }
                self.hoist_vars(&for_of.body, var_scope);
            }
            Stmt::While(while_stmt) => self.hoist_vars(&while_stmt.body, var_scope),
            Stmt::DoWhile(do_while) => self.hoist_vars(&do_while.body, var_scope),
            Stmt::Labeled(labeled) => self.hoist_vars(&labeled.body, var_scope),
            Stmt::With(with) => self.hoist_vars(&with.body, var_scope),
            Stmt::Try(try_stmt) => {
                for stmt in &try_stmt.block.stmts {
                    self.hoist_vars(stmt, var_scope);
                }
                if let Some(handler) = &try_stmt.handler {
                    for stmt in &handler.body.stmts {
                        self.hoist_vars(stmt, var_scope);
                    }
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    for stmt in &finalizer.stmts {
                        self.hoist_vars(stmt, var_scope);
                    }
                }
            }
            Stmt::Switch(switch) => {
                for case in &switch.cases {
                    for stmt in &case.cons {
                        self.hoist_vars(stmt, var_scope);
                    }
                }
            }
            _ => {}
        }
    }

    fn hoist_module(&mut self, module: &Module) {
        let scope = self.current_scope;
        for item in &module.body {
            match item {
                ModuleItem::Stmt(stmt) => {
                    if let Stmt::Decl(decl) = stmt {
                        self.hoist_decl(decl, scope);
                    }
                    self.hoist_vars(stmt, scope);
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    self.hoist_decl(&export.decl, scope);
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl
                {
                    DefaultDecl::Fn(fn_expr) => {
                        if let Some(ident) = &fn_expr.ident {
                            self.declare(ident, SymbolKind::Function, scope);
                        }
                    }
                    DefaultDecl::Class(class_expr) => {
                        if let Some(ident) = &class_expr.ident {
                            self.declare(ident, SymbolKind::Class, scope);
                        }
                    }
                    _ => {}
                },
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    for specifier in &import.specifiers {
                        let local = match specifier {
                            ImportSpecifier::Named(named) => &named.local,
                            ImportSpecifier::Default(default) => &default.local,
                            ImportSpecifier::Namespace(namespace) => &namespace.local,
                        };
                        self.declare(local, SymbolKind::Import, scope);
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(import)) => {
                    self.declare(&import.id, SymbolKind::Import, scope);
                }
                _ => {}
            }
        }
    }

    // ---- modules ----

    fn visit_module(&mut self, module: &Module) {
        self.hoist_module(module);
        for item in &module.body {
            match item {
                ModuleItem::Stmt(stmt) => self.visit_stmt(stmt),
                ModuleItem::ModuleDecl(decl) => self.visit_module_decl(decl),
            }
        }
    }

    fn export(&mut self, name: impl Into<String>, value: VertexId) {
        self.record.exports.push(ExportBinding {
            name: name.into(),
            value,
        });
    }

    fn import(&mut self, specifier: &str, imported: ImportedName, local: VertexId) {
        self.record.imports.push(ImportBinding {
            specifier: specifier.to_string(),
            imported,
            local,
        });
    }

    fn visit_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                let specifier = import.src.value.to_string();
                for spec in &import.specifiers {
                    match spec {
                        ImportSpecifier::Named(named) => {
                            let imported = match &named.imported {
                                Some(name) => export_name(name),
                                None => named.local.sym.to_string(),
                            };
                            let local = self.resolve(&named.local.sym);
                            let imported = if imported == "default" {
                                ImportedName::Default
                            } else {
                                ImportedName::Named(imported)
                            };
                            self.import(&specifier, imported, local);
                        }
                        ImportSpecifier::Default(default) => {
                            let local = self.resolve(&default.local.sym);
                            self.import(&specifier, ImportedName::Default, local);
                        }
                        ImportSpecifier::Namespace(namespace) => {
                            let local = self.resolve(&namespace.local.sym);
                            self.import(&specifier, ImportedName::Namespace, local);
                        }
                    }
                }
            }
            ModuleDecl::ExportDecl(export) => {
                self.visit_decl(&export.decl);
                self.export_decl(&export.decl);
            }
            ModuleDecl::ExportNamed(named) => match &named.src {
                None => {
                    for spec in &named.specifiers {
                        if let ExportSpecifier::Named(spec) = spec {
                            let orig = export_name(&spec.orig);
                            let exported = spec.exported.as_ref().map(export_name);
                            let value = self.resolve(&orig);
                            self.export(exported.unwrap_or(orig), value);
                        }
                    }
                }
                Some(src) => {
                    let specifier = src.value.to_string();
                    for spec in &named.specifiers {
                        if let ExportSpecifier::Named(spec) = spec {
                            let orig = export_name(&spec.orig);
                            let exported = spec.exported.as_ref().map(export_name);
                            let relay = self.expr_vertex(spec.span);
                            let imported = if orig == "default" {
                                ImportedName::Default
                            } else {
                                ImportedName::Named(orig.clone())
                            };
                            self.import(&specifier, imported, relay);
                            self.export(exported.unwrap_or(orig), relay);
                        }
                    }
                }
            },
            ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                DefaultDecl::Fn(fn_expr) => {
                    let name = fn_expr.ident.as_ref().map(|i| i.sym.to_string());
                    let func = self.visit_function(FunctionParts {
                        name,
                        own_name: None,
                        params: fn_expr.function.params.iter().map(|p| FnParam::Pat(&p.pat)).collect(),
                        body: FnBody::Block(fn_expr.function.body.as_ref()),
                        span: fn_expr.function.span,
                        is_arrow: false,
                    });
                    let value = self.vertex(Vertex::Func(func));
                    if let Some(ident) = &fn_expr.ident {
                        let binding = self.resolve(&ident.sym);
                        self.edge(value, binding);
                    }
                    self.export("default", value);
                }
                DefaultDecl::Class(class_expr) => {
                    let name = class_expr.ident.as_ref().map(|i| i.sym.to_string());
                    if let Some(ctor) = self.visit_class(name, None, &class_expr.class) {
                        if let Some(ident) = &class_expr.ident {
                            let binding = self.resolve(&ident.sym);
                            self.edge(ctor, binding);
                        }
                        self.export("default", ctor);
                    }
                }
                _ => {}
            },
            ModuleDecl::ExportDefaultExpr(export) => {
                if let Some(value) = self.visit_named_expr(&export.expr, "default") {
                    self.export("default", value);
                }
            }
            ModuleDecl::TsExportAssignment(export) => {
                if let Some(value) = self.visit_expr(&export.expr) {
                    self.export("default", value);
                }
            }
            ModuleDecl::TsImportEquals(import) => {
                if let TsModuleRef::TsExternalModuleRef(external) = &import.module_ref {
                    let specifier = external.expr.value.to_string();
                    let local = self.resolve(&import.id.sym);
                    self.import(&specifier, ImportedName::Default, local);
                }
            }
            _ => {}
        }
    }

    fn export_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Fn(fn_decl) => {
                let value = self.resolve(&fn_decl.ident.sym);
                self.export(fn_decl.ident.sym.to_string(), value);
            }
            Decl::Class(class_decl) => {
                let value = self.resolve(&class_decl.ident.sym);
                self.export(class_decl.ident.sym.to_string(), value);
            }
            Decl::Var(var_decl) => {
                let mut names = Vec::new();
                for declarator in &var_decl.decls {
                    collect_binding_names(&declarator.name, &mut names);
                }
                for name in names {
                    let value = self.resolve(&name);
                    self.export(name, value);
                }
            }
            _ => {}
        }
    }

    // ---- statements ----

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.visit_decl(decl),
            Stmt::Expr(expr_stmt) => {
                self.visit_expr(&expr_stmt.expr);
            }
            Stmt::Block(block) => self.visit_block_stmt(block),
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    let value = self.visit_expr(arg);
                    if let Some(func) = self.current_function {
                        let ret = self.vertex(Vertex::Ret(func));
                        self.flow(value, ret);
                    }
                }
            }
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.test);
                self.visit_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt);
                }
            }
            Stmt::For(for_stmt) => {
                let saved = self.enter_scope(ScopeKind::For, for_stmt.span);
                match &for_stmt.init {
                    Some(VarDeclOrExpr::VarDecl(var_decl)) => {
                        self.declare_var(var_decl, self.current_scope);
                        self.visit_var_decl(var_decl);
                    }
                    Some(VarDeclOrExpr::Expr(expr)) => {
                        self.visit_expr(expr);
                    }
                    None => {}
                }
                if let Some(test) = &for_stmt.test {
                    self.visit_expr(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.visit_expr(update);
                }
                self.visit_stmt(&for_stmt.body);
                self.current_scope = saved;
            }
            Stmt::ForIn(for_in) => {
                self.visit_for_head(&for_in.left, &for_in.right, &for_in.body, for_in.span)
            }
            Stmt::ForOf(for_of) => {
                self.visit_for_head(&for_of.left, &for_of.right, &for_of.body, for_of.span)
            }
            Stmt::While(while_stmt) => {
                self.visit_expr(&while_stmt.test);
                self.visit_stmt(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.visit_stmt(&do_while.body);
                self.visit_expr(&do_while.test);
            }
            Stmt::Labeled(labeled) => self.visit_stmt(&labeled.body),
            Stmt::Switch(switch) => {
                self.visit_expr(&switch.discriminant);
                let saved = self.enter_scope(ScopeKind::Block, switch.span);
                for case in &switch.cases {
                    self.hoist_block(&case.cons, self.current_scope);
                }
                for case in &switch.cases {
                    if let Some(test) = &case.test {
                        self.visit_expr(test);
                    }
                    for stmt in &case.cons {
                        self.visit_stmt(stmt);
                    }
                }
                self.current_scope = saved;
            }
            Stmt::Throw(throw) => {
                self.visit_expr(&throw.arg);
            }
            Stmt::Try(try_stmt) => {
                self.visit_block_stmt(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    self.visit_catch_clause(handler);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_block_stmt(finalizer);
                }
            }
            Stmt::With(with) => {
                // the body's bindings are dynamic; only its calls are recorded
                self.visit_expr(&with.obj);
                self.visit_stmt(&with.body);
            }
            _ => {}
        }
    }

    fn enter_scope(&mut self, kind: ScopeKind, span: Span) -> ScopeId {
        let saved = self.current_scope;
        self.current_scope = self.ctx.scopes.create_scope(kind, saved, span);
        saved
    }

    fn visit_block_stmt(&mut self, block: &BlockStmt) {
        let saved = self.enter_scope(ScopeKind::Block, block.span);
        self.hoist_block(&block.stmts, self.current_scope);
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }
        self.current_scope = saved;
    }

    fn visit_catch_clause(&mut self, handler: &CatchClause) {
        let saved = self.enter_scope(ScopeKind::Catch, handler.span);
        if let Some(param) = &handler.param {
            self.declare_pattern(param, SymbolKind::Variable, self.current_scope);
            let unknown = self.unknown();
            self.bind_pattern(param, Some(unknown));
        }
        self.visit_block_stmt(&handler.body);
        self.current_scope = saved;
    }

    fn visit_for_head(&mut self, left: &ForHead, right: &Expr, body: &Stmt, span: Span) {
        let saved = self.enter_scope(ScopeKind::For, span);
        self.visit_expr(right);
        match left {
            ForHead::VarDecl(var_decl) => {
                let kind = if var_decl.kind == VarDeclKind::Const {
                    SymbolKind::Constant
                } else {
                    SymbolKind::Variable
                };
                let scope = if var_decl.kind == VarDeclKind::Var {
                    self.ctx.scopes.var_scope(self.current_scope)
                } else {
                    self.current_scope
                };
                for declarator in &var_decl.decls {
                    self.declare_pattern(&declarator.name, kind, scope);
                    self.bind_pattern(&declarator.name, None);
                }
            }
            ForHead::Pat(pat) => self.bind_pattern(pat, None),
            _ => {}
        }
        self.visit_stmt(body);
        self.current_scope = saved;
    }

    fn visit_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Fn(fn_decl) => {
                let func = self.visit_function(FunctionParts {
                    name: Some(fn_decl.ident.sym.to_string()),
                    own_name: None,
                    params: fn_decl.function.params.iter().map(|p| FnParam::Pat(&p.pat)).collect(),
                    body: FnBody::Block(fn_decl.function.body.as_ref()),
                    span: fn_decl.function.span,
                    is_arrow: false,
                });
                let value = self.vertex(Vertex::Func(func));
                let binding = self.resolve(&fn_decl.ident.sym);
                self.edge(value, binding);
            }
            Decl::Class(class_decl) => {
                let name = class_decl.ident.sym.to_string();
                if let Some(ctor) = self.visit_class(Some(name), None, &class_decl.class) {
                    let binding = self.resolve(&class_decl.ident.sym);
                    self.edge(ctor, binding);
                }
            }
            Decl::Var(var_decl) => self.visit_var_decl(var_decl),
            Decl::Using(using) => {
                for declarator in &using.decls {
                    let value = match &declarator.init {
                        Some(init) => self.visit_expr(init),
                        None => None,
                    };
                    self.bind_pattern(&declarator.name, value);
                }
            }
            _ => {}
        }
    }

    fn visit_var_decl(&mut self, var_decl: &VarDecl) {
        for declarator in &var_decl.decls {
            let value = match (&declarator.init, &declarator.name) {
                (Some(init), Pat::Ident(binding)) => self.visit_named_expr(init, &binding.id.sym),
                (Some(init), _) => self.visit_expr(init),
                (None, _) => None,
            };
            self.bind_pattern(&declarator.name, value);
        }
    }

    // ---- functions and classes ----

    fn visit_function(&mut self, parts: FunctionParts<'_>) -> FunctionId {
        let location = self.location(parts.span);
        let func = self.ctx.program.add_function(
            parts.name,
            parts.params.len(),
            self.file,
            location,
            self.current_function,
            parts.is_arrow,
        );
        let value = self.vertex(Vertex::Func(func));

        let kind = if parts.is_arrow {
            ScopeKind::ArrowFunction
        } else {
            ScopeKind::Function
        };
        let saved_scope = self.enter_scope(kind, parts.span);
        let saved_function = self.current_function.replace(func);
        let saved_this = self.this_function;
        if !parts.is_arrow {
            self.this_function = Some(func);
        }
        let scope = self.current_scope;

        if let Some(own) = parts.own_name {
            self.declare(own, SymbolKind::Function, scope);
            let binding = self.resolve(&own.sym);
            self.edge(value, binding);
        }

        for param in &parts.params {
            match param {
                FnParam::Pat(pat) => self.declare_pattern(pat, SymbolKind::Parameter, scope),
                FnParam::Property(ident, _) => self.declare(ident, SymbolKind::Parameter, scope),
            }
        }

        match &parts.body {
            FnBody::Block(Some(body)) => {
                self.hoist_block(&body.stmts, scope);
                for stmt in &body.stmts {
                    self.hoist_vars(stmt, scope);
                }
            }
            FnBody::Block(None) | FnBody::Expr(_) => {}
        }

        for (index, param) in parts.params.iter().enumerate() {
            let slot = self.vertex(Vertex::Param(func, index + 1));
            match param {
                FnParam::Pat(Pat::Rest(rest)) => self.bind_pattern(&rest.arg, None),
                FnParam::Pat(pat) => self.bind_pattern(pat, Some(slot)),
                FnParam::Property(ident, default) => {
                    let binding = self.resolve(&ident.sym);
                    self.edge(slot, binding);
                    let field = self.prop(&ident.sym);
                    self.edge(slot, field);
                    if let Some(default) = default {
                        let value = self.visit_expr(default);
                        self.flow(value, binding);
                    }
                }
            }
        }

        match parts.body {
            FnBody::Block(Some(body)) => {
                for stmt in &body.stmts {
                    self.visit_stmt(stmt);
                }
            }
            FnBody::Block(None) => {}
            FnBody::Expr(expr) => {
                let result = self.visit_expr(expr);
                let ret = self.vertex(Vertex::Ret(func));
                self.flow(result, ret);
            }
        }

        self.this_function = saved_this;
        self.current_function = saved_function;
        self.current_scope = saved_scope;
        func
    }

    fn visit_arrow(&mut self, arrow: &ArrowExpr, name: Option<String>) -> VertexId {
        let body = match arrow.body.as_ref() {
            BlockStmtOrExpr::BlockStmt(block) => FnBody::Block(Some(block)),
            BlockStmtOrExpr::Expr(expr) => FnBody::Expr(expr),
        };
        let func = self.visit_function(FunctionParts {
            name,
            own_name: None,
            params: arrow.params.iter().map(FnParam::Pat).collect(),
            body,
            span: arrow.span,
            is_arrow: true,
        });
        self.vertex(Vertex::Func(func))
    }

    /// Visits a class body. Returns the constructor's `Func` vertex, if the
    /// class declares one.
    fn visit_class(
        &mut self,
        name: Option<String>,
        own_name: Option<&Ident>,
        class: &Class,
    ) -> Option<VertexId> {
        for decorator in &class.decorators {
            self.visit_expr(&decorator.expr);
        }
        if let Some(super_class) = &class.super_class {
            self.visit_expr(super_class);
        }

        let saved = self.enter_scope(ScopeKind::Class, class.span);
        if let Some(own) = own_name {
            self.declare(own, SymbolKind::Class, self.current_scope);
        }

        let mut ctor = None;
        for member in &class.body {
            match member {
                ClassMember::Constructor(constructor) => {
                    let params = constructor
                        .params
                        .iter()
                        .filter_map(|param| match param {
                            ParamOrTsParamProp::Param(p) => Some(FnParam::Pat(&p.pat)),
                            ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                                TsParamPropParam::Ident(binding) => {
                                    Some(FnParam::Property(&binding.id, None))
                                }
                                TsParamPropParam::Assign(assign) => match assign.left.as_ref() {
                                    Pat::Ident(binding) => {
                                        Some(FnParam::Property(&binding.id, Some(&*assign.right)))
                                    }
                                    _ => None,
                                },
                            },
                        })
                        .collect();
                    let func = self.visit_function(FunctionParts {
                        name: name.clone(),
                        own_name: None,
                        params,
                        body: FnBody::Block(constructor.body.as_ref()),
                        span: constructor.span,
                        is_arrow: false,
                    });
                    ctor = Some(self.vertex(Vertex::Func(func)));
                }
                ClassMember::Method(method) => {
                    for decorator in &method.function.decorators {
                        self.visit_expr(&decorator.expr);
                    }
                    let key = prop_name(&method.key);
                    let target = self.prop_name_vertex(&method.key);
                    let func = self.visit_function(FunctionParts {
                        name: key,
                        own_name: None,
                        params: method.function.params.iter().map(|p| FnParam::Pat(&p.pat)).collect(),
                        body: FnBody::Block(method.function.body.as_ref()),
                        span: method.function.span,
                        is_arrow: false,
                    });
                    let value = self.vertex(Vertex::Func(func));
                    self.edge(value, target);
                }
                ClassMember::PrivateMethod(method) => {
                    let key = format!("#{}", method.key.name);
                    let target = self.prop(&key);
                    let func = self.visit_function(FunctionParts {
                        name: Some(key),
                        own_name: None,
                        params: method.function.params.iter().map(|p| FnParam::Pat(&p.pat)).collect(),
                        body: FnBody::Block(method.function.body.as_ref()),
                        span: method.function.span,
                        is_arrow: false,
                    });
                    let value = self.vertex(Vertex::Func(func));
                    self.edge(value, target);
                }
                ClassMember::ClassProp(prop) => {
                    let target = self.prop_name_vertex(&prop.key);
                    if let Some(value) = &prop.value {
                        let value = match prop_name(&prop.key) {
                            Some(key) => self.visit_named_expr(value, &key),
                            None => self.visit_expr(value),
                        };
                        self.flow(value, target);
                    }
                }
                ClassMember::PrivateProp(prop) => {
                    let key = format!("#{}", prop.key.name);
                    let target = self.prop(&key);
                    if let Some(value) = &prop.value {
                        let value = self.visit_named_expr(value, &key);
                        self.flow(value, target);
                    }
                }
                ClassMember::StaticBlock(block) => self.visit_block_stmt(&block.body),
                _ => {}
            }
        }

        if let (Some(own), Some(ctor)) = (own_name, ctor) {
            let binding = self.resolve(&own.sym);
            self.edge(ctor, binding);
        }

        self.current_scope = saved;
        ctor
    }

    // ---- expressions ----

    /// Visits an initialiser, naming anonymous functions and classes after
    /// the binding or property they are assigned to.
    fn visit_named_expr(&mut self, expr: &Expr, name: &str) -> Option<VertexId> {
        match expr {
            Expr::Fn(fn_expr) if fn_expr.ident.is_none() => {
                let func = self.visit_function(FunctionParts {
                    name: Some(name.to_string()),
                    own_name: None,
                    params: fn_expr.function.params.iter().map(|p| FnParam::Pat(&p.pat)).collect(),
                    body: FnBody::Block(fn_expr.function.body.as_ref()),
                    span: fn_expr.function.span,
                    is_arrow: false,
                });
                Some(self.vertex(Vertex::Func(func)))
            }
            Expr::Arrow(arrow) => Some(self.visit_arrow(arrow, Some(name.to_string()))),
            Expr::Class(class_expr) if class_expr.ident.is_none() => {
                self.visit_class(Some(name.to_string()), None, &class_expr.class)
            }
            Expr::Paren(paren) => self.visit_named_expr(&paren.expr, name),
            _ => self.visit_expr(expr),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) -> Option<VertexId> {
        match expr {
            Expr::Ident(ident) => Some(self.resolve(&ident.sym)),
            Expr::This(_) => {
                let func = self.this_function?;
                Some(self.vertex(Vertex::Param(func, 0)))
            }
            Expr::Lit(_) => None,
            Expr::Fn(fn_expr) => {
                let func = self.visit_function(FunctionParts {
                    name: fn_expr.ident.as_ref().map(|i| i.sym.to_string()),
                    own_name: fn_expr.ident.as_ref(),
                    params: fn_expr.function.params.iter().map(|p| FnParam::Pat(&p.pat)).collect(),
                    body: FnBody::Block(fn_expr.function.body.as_ref()),
                    span: fn_expr.function.span,
                    is_arrow: false,
                });
                Some(self.vertex(Vertex::Func(func)))
            }
            Expr::Arrow(arrow) => Some(self.visit_arrow(arrow, None)),
            Expr::Class(class_expr) => {
                let name = class_expr.ident.as_ref().map(|i| i.sym.to_string());
                self.visit_class(name, class_expr.ident.as_ref(), &class_expr.class)
            }
            Expr::Call(call) => self.visit_call_expr(call),
            Expr::New(new) => self.visit_new_expr(new),
            Expr::TaggedTpl(tagged) => self.visit_tagged_tpl(tagged),
            Expr::OptChain(opt_chain) => match opt_chain.base.as_ref() {
                OptChainBase::Member(member) => Some(self.visit_member_expr(member)),
                OptChainBase::Call(call) => {
                    Some(self.visit_call(CallKind::Call, &call.callee, &call.args, call.span))
                }
            },
            Expr::Member(member) => Some(self.visit_member_expr(member)),
            Expr::SuperProp(super_prop) => Some(match &super_prop.prop {
                SuperProp::Ident(ident) => self.prop(&ident.sym),
                SuperProp::Computed(computed) => self.computed_vertex(&computed.expr),
            }),
            Expr::Assign(assign) => self.visit_assign_expr(assign),
            Expr::Bin(bin) => match bin.op {
                BinaryOp::LogicalOr | BinaryOp::LogicalAnd | BinaryOp::NullishCoalescing => {
                    let left = self.visit_expr(&bin.left);
                    let right = self.visit_expr(&bin.right);
                    let joined = self.expr_vertex(bin.span);
                    self.flow(left, joined);
                    self.flow(right, joined);
                    Some(joined)
                }
                _ => {
                    self.visit_expr(&bin.left);
                    self.visit_expr(&bin.right);
                    None
                }
            },
            Expr::Cond(cond) => {
                self.visit_expr(&cond.test);
                let cons = self.visit_expr(&cond.cons);
                let alt = self.visit_expr(&cond.alt);
                let joined = self.expr_vertex(cond.span);
                self.flow(cons, joined);
                self.flow(alt, joined);
                Some(joined)
            }
            Expr::Seq(seq) => {
                let mut last = None;
                for expr in &seq.exprs {
                    last = self.visit_expr(expr);
                }
                last
            }
            Expr::Paren(paren) => self.visit_expr(&paren.expr),
            Expr::Await(await_expr) => self.visit_expr(&await_expr.arg),
            Expr::TsAs(ts) => self.visit_expr(&ts.expr),
            Expr::TsNonNull(ts) => self.visit_expr(&ts.expr),
            Expr::TsTypeAssertion(ts) => self.visit_expr(&ts.expr),
            Expr::TsConstAssertion(ts) => self.visit_expr(&ts.expr),
            Expr::TsSatisfies(ts) => self.visit_expr(&ts.expr),
            Expr::TsInstantiation(ts) => self.visit_expr(&ts.expr),
            Expr::Unary(unary) => {
                self.visit_expr(&unary.arg);
                None
            }
            Expr::Update(update) => {
                self.visit_expr(&update.arg);
                None
            }
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.visit_expr(arg);
                }
                None
            }
            Expr::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.visit_expr(&elem.expr);
                }
                None
            }
            Expr::Object(object) => {
                self.visit_object_lit(object);
                None
            }
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.visit_expr(expr);
                }
                None
            }
            Expr::JSXElement(element) => {
                self.visit_jsx_element(element);
                None
            }
            Expr::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_child(child);
                }
                None
            }
            _ => None,
        }
    }

    fn visit_object_lit(&mut self, object: &ObjectLit) {
        for prop in &object.props {
            match prop {
                PropOrSpread::Spread(spread) => {
                    self.visit_expr(&spread.expr);
                }
                PropOrSpread::Prop(prop) => match prop.as_ref() {
                    Prop::KeyValue(kv) => {
                        let target = self.prop_name_vertex(&kv.key);
                        let value = match prop_name(&kv.key) {
                            Some(key) => self.visit_named_expr(&kv.value, &key),
                            None => self.visit_expr(&kv.value),
                        };
                        self.flow(value, target);
                    }
                    Prop::Shorthand(ident) => {
                        let value = self.resolve(&ident.sym);
                        let target = self.prop(&ident.sym);
                        self.edge(value, target);
                    }
                    Prop::Method(method) => {
                        let target = self.prop_name_vertex(&method.key);
                        let func = self.visit_function(FunctionParts {
                            name: prop_name(&method.key),
                            own_name: None,
                            params: method.function.params.iter().map(|p| FnParam::Pat(&p.pat)).collect(),
                            body: FnBody::Block(method.function.body.as_ref()),
                            span: method.function.span,
                            is_arrow: false,
                        });
                        let value = self.vertex(Vertex::Func(func));
                        self.edge(value, target);
                    }
                    Prop::Getter(getter) => {
                        let target = self.prop_name_vertex(&getter.key);
                        let func = self.visit_function(FunctionParts {
                            name: prop_name(&getter.key),
                            own_name: None,
                            params: Vec::new(),
                            body: FnBody::Block(getter.body.as_ref()),
                            span: getter.span,
                            is_arrow: false,
                        });
                        let value = self.vertex(Vertex::Func(func));
                        self.edge(value, target);
                    }
                    Prop::Setter(setter) => {
                        let target = self.prop_name_vertex(&setter.key);
                        let func = self.visit_function(FunctionParts {
                            name: prop_name(&setter.key),
                            own_name: None,
                            params: vec![FnParam::Pat(&*setter.param)],
                            body: FnBody::Block(setter.body.as_ref()),
                            span: setter.span,
                            is_arrow: false,
                        });
                        let value = self.vertex(Vertex::Func(func));
                        self.edge(value, target);
                    }
                    Prop::Assign(assign) => {
                        self.visit_expr(&assign.value);
                    }
                },
            }
        }
    }

    fn prop_name_vertex(&mut self, key: &PropName) -> VertexId {
        if let PropName::Computed(computed) = key {
            return self.computed_vertex(&computed.expr);
        }
        match prop_name(key) {
            Some(name) => self.prop(&name),
            None => self.unknown(),
        }
    }

    /// `o[e]`: a string literal key is an ordinary property, anything else
    /// is untracked.
    fn computed_vertex(&mut self, expr: &Expr) -> VertexId {
        match expr {
            Expr::Lit(Lit::Str(s)) => self.prop(&s.value.to_string()),
            _ => {
                self.visit_expr(expr);
                self.unknown()
            }
        }
    }

    fn member_vertex(&mut self, prop: &MemberProp) -> VertexId {
        match prop {
            MemberProp::Ident(ident) => self.prop(&ident.sym),
            MemberProp::PrivateName(private) => self.prop(&format!("#{}", private.name)),
            MemberProp::Computed(computed) => self.computed_vertex(&computed.expr),
        }
    }

    fn visit_member_expr(&mut self, member: &MemberExpr) -> VertexId {
        self.visit_expr(&member.obj);
        self.member_vertex(&member.prop)
    }

    /// Vertex written by an assignment to `expr`, if it is a valid target.
    fn assignment_target_expr(&mut self, expr: &Expr) -> Option<VertexId> {
        match expr {
            Expr::Ident(ident) => Some(self.resolve(&ident.sym)),
            Expr::Member(member) => Some(self.visit_member_expr(member)),
            Expr::Paren(paren) => self.assignment_target_expr(&paren.expr),
            _ => {
                self.visit_expr(expr);
                None
            }
        }
    }

    fn visit_assign_expr(&mut self, assign: &AssignExpr) -> Option<VertexId> {
        let flows = matches!(
            assign.op,
            AssignOp::Assign | AssignOp::AndAssign | AssignOp::OrAssign | AssignOp::NullishAssign
        );

        let target_name = match &assign.left {
            AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => Some(binding.id.sym.to_string()),
            AssignTarget::Simple(SimpleAssignTarget::Member(member)) => match &member.prop {
                MemberProp::Ident(ident) => Some(ident.sym.to_string()),
                _ => None,
            },
            _ => None,
        };
        let value = match &target_name {
            Some(name) => self.visit_named_expr(&assign.right, name),
            None => self.visit_expr(&assign.right),
        };
        let value = if flows { value } else { None };

        match &assign.left {
            AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => {
                let target = self.resolve(&binding.id.sym);
                self.flow(value, target);
            }
            AssignTarget::Simple(SimpleAssignTarget::Member(member)) => {
                if self.is_module_exports(member) {
                    if let Some(value) = value {
                        self.export("default", value);
                    }
                }
                let target = self.visit_member_expr(member);
                self.flow(value, target);
            }
            AssignTarget::Simple(SimpleAssignTarget::SuperProp(super_prop)) => {
                let target = match &super_prop.prop {
                    SuperProp::Ident(ident) => self.prop(&ident.sym),
                    SuperProp::Computed(computed) => self.computed_vertex(&computed.expr),
                };
                self.flow(value, target);
            }
            AssignTarget::Simple(SimpleAssignTarget::Paren(paren)) => {
                if let Some(target) = self.assignment_target_expr(&paren.expr) {
                    self.flow(value, target);
                }
            }
            AssignTarget::Simple(_) => {}
            AssignTarget::Pat(AssignTargetPat::Object(object)) => {
                self.bind_pattern(&Pat::Object(object.clone()), value);
            }
            AssignTarget::Pat(AssignTargetPat::Array(array)) => {
                self.bind_pattern(&Pat::Array(array.clone()), value);
            }
            AssignTarget::Pat(_) => {}
        }

        value
    }

    /// `module.exports` with `module` not bound locally.
    fn is_module_exports(&self, member: &MemberExpr) -> bool {
        let Expr::Ident(object) = member.obj.as_ref() else {
            return false;
        };
        let MemberProp::Ident(prop) = &member.prop else {
            return false;
        };
        &*object.sym == "module" && &*prop.sym == "exports" && self.is_global("module")
    }

    fn visit_call_expr(&mut self, call: &CallExpr) -> Option<VertexId> {
        match &call.callee {
            Callee::Expr(callee) => {
                let result = self.visit_call(CallKind::Call, callee, &call.args, call.span);
                self.record_require(callee, &call.args, result);
                Some(result)
            }
            Callee::Super(_) => {
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
                None
            }
            Callee::Import(_) => {
                // dynamic import() is not modelled
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
                None
            }
        }
    }

    fn record_require(&mut self, callee: &Expr, args: &[ExprOrSpread], result: VertexId) {
        let Expr::Ident(ident) = callee else {
            return;
        };
        if &*ident.sym != "require" || !self.is_global("require") || args.len() != 1 {
            return;
        }
        let Expr::Lit(Lit::Str(specifier)) = args[0].expr.as_ref() else {
            return;
        };
        if let Vertex::Res(call) = self.ctx.graph.vertex(result) {
            let call = *call;
            self.record.requires.push(RequireCall {
                specifier: specifier.value.to_string(),
                call,
            });
        }
    }

    fn visit_new_expr(&mut self, new: &NewExpr) -> Option<VertexId> {
        let args: &[ExprOrSpread] = new.args.as_deref().unwrap_or(&[]);
        Some(self.visit_call(CallKind::New, &new.callee, args, new.span))
    }

    fn visit_tagged_tpl(&mut self, tagged: &TaggedTpl) -> Option<VertexId> {
        let location = self.location(tagged.span);
        let call = self.ctx.program.add_call(
            CallKind::Call,
            tagged.tpl.exprs.len() + 1,
            self.current_function,
            self.file,
            location,
        );
        let callee_slot = self.vertex(Vertex::Callee(call));
        let (receiver, callee) = self.visit_callee(&tagged.tag);
        self.flow(callee, callee_slot);
        if let Some(receiver) = receiver {
            let slot = self.vertex(Vertex::Arg(call, 0));
            self.edge(receiver, slot);
        }
        // slot 1 is the strings array
        for (index, expr) in tagged.tpl.exprs.iter().enumerate() {
            let value = self.visit_expr(expr);
            let slot = self.vertex(Vertex::Arg(call, index + 2));
            self.flow(value, slot);
        }
        Some(self.vertex(Vertex::Res(call)))
    }

    /// Registers a call site and wires callee, receiver and arguments.
    /// Returns the call's `Res` vertex.
    fn visit_call(
        &mut self,
        kind: CallKind,
        callee: &Expr,
        args: &[ExprOrSpread],
        span: Span,
    ) -> VertexId {
        let location = self.location(span);
        let call = self.ctx.program.add_call(
            kind,
            args.len(),
            self.current_function,
            self.file,
            location,
        );
        let callee_slot = self.vertex(Vertex::Callee(call));

        let (receiver, callee_value) = self.visit_callee(callee);
        self.flow(callee_value, callee_slot);
        if kind == CallKind::Call {
            if let Some(receiver) = receiver {
                let slot = self.vertex(Vertex::Arg(call, 0));
                self.edge(receiver, slot);
            }
        }

        for (index, arg) in args.iter().enumerate() {
            let value = self.visit_expr(&arg.expr);
            let slot = self.vertex(Vertex::Arg(call, index + 1));
            self.flow(value, slot);
        }

        self.vertex(Vertex::Res(call))
    }

    /// Returns `(receiver, callee)` for a callee expression. Method calls
    /// pass their object as the receiver.
    fn visit_callee(&mut self, callee: &Expr) -> (Option<VertexId>, Option<VertexId>) {
        match callee {
            Expr::Member(member) => {
                let receiver = self.visit_expr(&member.obj);
                let method = self.member_vertex(&member.prop);
                (receiver, Some(method))
            }
            Expr::SuperProp(super_prop) => {
                let receiver = match self.this_function {
                    Some(func) => Some(self.vertex(Vertex::Param(func, 0))),
                    None => None,
                };
                let method = match &super_prop.prop {
                    SuperProp::Ident(ident) => self.prop(&ident.sym),
                    SuperProp::Computed(computed) => self.computed_vertex(&computed.expr),
                };
                (receiver, Some(method))
            }
            Expr::OptChain(opt_chain) => match opt_chain.base.as_ref() {
                OptChainBase::Member(member) => {
                    let receiver = self.visit_expr(&member.obj);
                    let method = self.member_vertex(&member.prop);
                    (receiver, Some(method))
                }
                OptChainBase::Call(_) => (None, self.visit_expr(callee)),
            },
            Expr::Paren(paren) => (None, self.visit_expr(&paren.expr)),
            _ => (None, self.visit_expr(callee)),
        }
    }

    fn visit_jsx_element(&mut self, element: &JSXElement) {
        for attr in &element.opening.attrs {
            match attr {
                JSXAttrOrSpread::JSXAttr(attr) => match &attr.value {
                    Some(JSXAttrValue::JSXExprContainer(container)) => {
                        if let JSXExpr::Expr(expr) = &container.expr {
                            self.visit_expr(expr);
                        }
                    }
                    Some(JSXAttrValue::JSXElement(element)) => self.visit_jsx_element(element),
                    _ => {}
                },
                JSXAttrOrSpread::SpreadElement(spread) => {
                    self.visit_expr(&spread.expr);
                }
            }
        }
        for child in &element.children {
            self.visit_jsx_child(child);
        }
    }

    fn visit_jsx_child(&mut self, child: &JSXElementChild) {
        match child {
            JSXElementChild::JSXExprContainer(container) => {
                if let JSXExpr::Expr(expr) = &container.expr {
                    self.visit_expr(expr);
                }
            }
            JSXElementChild::JSXSpreadChild(spread) => {
                self.visit_expr(&spread.expr);
            }
            JSXElementChild::JSXElement(element) => self.visit_jsx_element(element),
            JSXElementChild::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_child(child);
                }
            }
            JSXElementChild::JSXText(_) => {}
        }
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        PropName::Computed(computed) => match computed.expr.as_ref() {
            Expr::Lit(Lit::Str(s)) => Some(s.value.to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string(),
    }
}

fn collect_binding_names(pat: &Pat, names: &mut Vec<String>) {
    match pat {
        Pat::Ident(binding) => names.push(binding.id.sym.to_string()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_binding_names(elem, names);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_binding_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => names.push(assign.key.sym.to_string()),
                    ObjectPatProp::Rest(rest) => collect_binding_names(&rest.arg, names),
                }
            }
        }
        Pat::Rest(rest) => collect_binding_names(&rest.arg, names),
        Pat::Assign(assign) => collect_binding_names(&assign.left, names),
        _ => {}
    }
}
