//! Rust source frontend built on `syn`
//!
//! Parses one source file, collects every attributed item (including items
//! of inline `mod` blocks) and answers [`DeclarationInspector`] queries about
//! them. Attribute paths are resolved through the enclosing module's `use`
//! declarations; the module path itself comes from the file's position under
//! the source root.

use quote::ToTokens;
use std::collections::BTreeMap;
use std::path::{Component, Path};
use std::rc::Rc;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Expr, Item, Lit, Meta, Token, UseTree};
use ttlgen_core::{Diagnostic, DiagnosticCode, Location, Outcome, QualifiedName, ScannedBinding};

use crate::cancel::Cancellation;
use crate::inspector::{AnnotationArgument, DeclarationInspector};
use crate::scanner::BindingScanner;

/// Kind of an attributed item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Struct,
    Enum,
    Union,
    Function,
    Const,
    Static,
    TypeAlias,
    Trait,
    Module,
    Impl,
}

impl ItemKind {
    pub fn is_type(self) -> bool {
        matches!(self, Self::Struct | Self::Enum | Self::Union)
    }
}

/// `use` declarations of one module
#[derive(Debug, Default)]
struct ImportScope {
    /// Local name -> full path
    names: BTreeMap<String, Vec<String>>,

    /// Prefixes of `use prefix::*;`
    globs: Vec<Vec<String>>,
}

impl ImportScope {
    fn from_items(items: &[Item]) -> Self {
        let mut scope = Self::default();
        for item in items {
            if let Item::Use(item_use) = item {
                scope.add_tree(&mut Vec::new(), &item_use.tree);
            }
        }
        scope
    }

    fn add_tree(&mut self, prefix: &mut Vec<String>, tree: &UseTree) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.unraw().to_string());
                self.add_tree(prefix, &path.tree);
                prefix.pop();
            }
            UseTree::Name(name) => {
                let ident = name.ident.unraw().to_string();
                if ident == "self" {
                    if let Some(last) = prefix.last() {
                        self.names.insert(last.clone(), prefix.clone());
                    }
                } else {
                    let mut full = prefix.clone();
                    full.push(ident.clone());
                    self.names.insert(ident, full);
                }
            }
            UseTree::Rename(rename) => {
                let alias = rename.rename.unraw().to_string();
                if alias == "_" {
                    return;
                }
                let ident = rename.ident.unraw().to_string();
                let mut full = prefix.clone();
                if ident != "self" {
                    full.push(ident);
                }
                self.names.insert(alias, full);
            }
            UseTree::Glob(_) => self.globs.push(prefix.clone()),
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.add_tree(prefix, tree);
                }
            }
        }
    }

    /// Expand the first segment through the imports
    ///
    /// A single unresolved segment is attributed to the glob import when
    /// there is exactly one; with several globs it stays as written.
    fn resolve(&self, segments: &[String]) -> Vec<String> {
        let Some((first, rest)) = segments.split_first() else {
            return Vec::new();
        };

        if let Some(target) = self.names.get(first) {
            target.iter().chain(rest).cloned().collect()
        } else if rest.is_empty() && self.globs.len() == 1 {
            self.globs[0].iter().chain(Some(first)).cloned().collect()
        } else {
            segments.to_vec()
        }
    }
}

/// An attributed item of a parsed source file
pub struct SourceDeclaration {
    ident: Option<String>,
    kind: ItemKind,
    module: Option<Rc<[String]>>,
    attributes: Vec<syn::Attribute>,
    scope: Rc<ImportScope>,
    line: usize,
    column: usize,
}

impl SourceDeclaration {
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }
}

/// A parsed source file; inspects its own declarations
pub struct ParsedSource {
    file: String,
    declarations: Vec<SourceDeclaration>,
}

impl ParsedSource {
    /// Parse `text`, the contents of `path`
    ///
    /// `source_root` is the directory holding the crate root; declarations of
    /// files outside it have no resolvable module path.
    pub fn parse(path: &Path, text: &str, source_root: &Path) -> Outcome<Self> {
        let file = path.display().to_string();

        let syntax = match syn::parse_file(text) {
            Ok(syntax) => syntax,
            Err(e) => {
                let start = e.span().start();
                return Diagnostic::new(DiagnosticCode::SourceParseError, [file.clone(), e.to_string()])
                    .with_location(Location::with_position(file, start.line, start.column + 1))
                    .into();
            }
        };

        let module: Option<Rc<[String]>> = module_path(path, source_root).map(Rc::from);
        let mut declarations = Vec::new();
        collect_items(&syntax.items, module, &mut declarations);

        Outcome::ok(Self { file, declarations })
    }

    pub fn declarations(&self) -> &[SourceDeclaration] {
        &self.declarations
    }

    pub fn file(&self) -> &str {
        &self.file
    }
}

impl DeclarationInspector for ParsedSource {
    type Declaration = SourceDeclaration;

    fn annotation_names(&self, declaration: &SourceDeclaration) -> Vec<String> {
        declaration
            .attributes
            .iter()
            .map(|attr| {
                let segments: Vec<String> = attr
                    .path()
                    .segments
                    .iter()
                    .map(|segment| segment.ident.unraw().to_string())
                    .collect();
                declaration.scope.resolve(&segments).join("::")
            })
            .collect()
    }

    fn annotation_arguments(&self, declaration: &SourceDeclaration, index: usize) -> Vec<AnnotationArgument> {
        let Some(attr) = declaration.attributes.get(index) else {
            return Vec::new();
        };

        match &attr.meta {
            Meta::Path(_) => Vec::new(),
            Meta::NameValue(name_value) => vec![classify(&name_value.value)],
            Meta::List(list) => match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
                Ok(arguments) => arguments.iter().map(classify).collect(),
                Err(_) => vec![AnnotationArgument::Expression(list.tokens.to_string())],
            },
        }
    }

    fn resolve_qualified_name(&self, declaration: &SourceDeclaration) -> Option<QualifiedName> {
        let module = declaration.module.as_ref()?;
        let ident = declaration.ident.as_ref()?;

        let namespace = std::iter::once("crate")
            .chain(module.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("::");

        Some(QualifiedName::new(namespace, ident.clone()))
    }

    fn written_name(&self, declaration: &SourceDeclaration) -> Option<String> {
        declaration.ident.clone()
    }

    fn is_type_declaration(&self, declaration: &SourceDeclaration) -> bool {
        declaration.kind.is_type()
    }

    fn location(&self, declaration: &SourceDeclaration) -> Option<Location> {
        Some(Location::with_position(self.file.clone(), declaration.line, declaration.column))
    }
}

/// Parse one source file and scan every attributed item in it
///
/// A file that fails to parse yields a single failed outcome. Cancellation
/// abandons the whole file.
pub fn scan_source<C>(
    scanner: &BindingScanner,
    path: &Path,
    text: &str,
    source_root: &Path,
    cancellation: &C,
) -> Result<Vec<Outcome<ScannedBinding>>, C::Interrupt>
where
    C: Cancellation + ?Sized,
{
    let parsed = match ParsedSource::parse(path, text, source_root) {
        Outcome::Ok(parsed) => parsed,
        Outcome::Err(diagnostics) => return Ok(vec![Outcome::Err(diagnostics)]),
    };

    let mut outcomes = Vec::new();
    for declaration in parsed.declarations() {
        if let Some(outcome) = scanner.scan(&parsed, declaration, cancellation)? {
            outcomes.push(outcome);
        }
    }

    tracing::trace!(file = parsed.file(), bindings = outcomes.len(), "scanned source file");
    Ok(outcomes)
}

/// Module path of `path` relative to `source_root`, without the leading `crate`
///
/// `lib.rs` and `main.rs` at the root are the crate root, `a/mod.rs` is
/// module `a`, `a/b.rs` is `a::b`.
fn module_path(path: &Path, source_root: &Path) -> Option<Vec<String>> {
    let relative = path.strip_prefix(source_root).ok()?;

    let mut segments = Vec::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_str()?.to_string()),
                _ => return None,
            }
        }
    }

    let stem = relative.file_stem()?.to_str()?;
    match stem {
        "lib" | "main" if segments.is_empty() => {}
        "mod" => {}
        other => segments.push(other.to_string()),
    }

    if segments.iter().all(|segment| syn::parse_str::<syn::Ident>(segment).is_ok()) {
        Some(segments)
    } else {
        None
    }
}

fn collect_items(items: &[Item], module: Option<Rc<[String]>>, out: &mut Vec<SourceDeclaration>) {
    let scope = Rc::new(ImportScope::from_items(items));

    for item in items {
        let (ident, kind, attrs) = match item {
            Item::Struct(i) => (Some(&i.ident), ItemKind::Struct, &i.attrs),
            Item::Enum(i) => (Some(&i.ident), ItemKind::Enum, &i.attrs),
            Item::Union(i) => (Some(&i.ident), ItemKind::Union, &i.attrs),
            Item::Fn(i) => (Some(&i.sig.ident), ItemKind::Function, &i.attrs),
            Item::Const(i) => (Some(&i.ident), ItemKind::Const, &i.attrs),
            Item::Static(i) => (Some(&i.ident), ItemKind::Static, &i.attrs),
            Item::Type(i) => (Some(&i.ident), ItemKind::TypeAlias, &i.attrs),
            Item::Trait(i) => (Some(&i.ident), ItemKind::Trait, &i.attrs),
            Item::Mod(i) => (Some(&i.ident), ItemKind::Module, &i.attrs),
            Item::Impl(i) => (None, ItemKind::Impl, &i.attrs),
            _ => continue,
        };

        if !attrs.is_empty() {
            let start = match ident {
                Some(ident) => ident.span().start(),
                None => item.span().start(),
            };

            out.push(SourceDeclaration {
                ident: match (ident, item) {
                    (Some(ident), _) => Some(ident.to_string()),
                    (None, Item::Impl(imp)) => Some(imp.self_ty.to_token_stream().to_string()),
                    (None, _) => None,
                },
                kind,
                module: module.clone(),
                attributes: attrs.clone(),
                scope: Rc::clone(&scope),
                line: start.line,
                column: start.column + 1,
            });
        }

        if let Item::Mod(inner) = item {
            if let Some((_, content)) = &inner.content {
                let child = module.as_ref().map(|parent| {
                    parent
                        .iter()
                        .cloned()
                        .chain(Some(inner.ident.to_string()))
                        .collect::<Rc<[String]>>()
                });
                collect_items(content, child, out);
            }
        }
    }
}

fn classify(expr: &Expr) -> AnnotationArgument {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => AnnotationArgument::Literal(s.value()),
            Lit::Int(i) => AnnotationArgument::Literal(i.base10_digits().to_string()),
            Lit::Float(f) => AnnotationArgument::Literal(f.base10_digits().to_string()),
            Lit::Bool(b) => AnnotationArgument::Literal(b.value.to_string()),
            Lit::Char(c) => AnnotationArgument::Literal(c.value().to_string()),
            other => AnnotationArgument::Expression(other.to_token_stream().to_string()),
        },
        other => AnnotationArgument::Expression(other.to_token_stream().to_string()),
    }
}
