//! Source-to-source rewriting of wildcard imports.
//!
//! Bundlers may walk a module more than once in a single compilation (on
//! enter and on exit, or after another plugin touches it). A rewritten
//! import site is marked on its [`ImportNode`], so later visits of the same
//! tree leave it alone while a fresh parse of the file starts unmarked. The
//! [`CompilationContext`] only counts rewrites: create it when the
//! compilation starts and call [`CompilationContext::finish`] when it ends.
//!
//! [`ImportNode`]: crate::ast::ImportNode

use std::collections::BTreeMap;

use storefront_fs::{FileProbe, NormalizedPath};

use crate::ast::{ModuleAst, Syntax};
use crate::error::Result;
use crate::request::ImportRequest;
use crate::resolver::OverrideResolver;

/// Per-compilation state for [`ImportTransform`].
#[derive(Debug, Default)]
pub struct CompilationContext {
    rewrites: BTreeMap<NormalizedPath, usize>,
}

impl CompilationContext {
    /// Start a new compilation.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, file: &NormalizedPath, count: usize) {
        if count > 0 {
            *self.rewrites.entry(file.clone()).or_default() += count;
        }
    }

    /// Import sites rewritten in `file` so far.
    pub fn rewritten_in(&self, file: &NormalizedPath) -> usize {
        self.rewrites.get(file).copied().unwrap_or(0)
    }

    /// Number of import sites rewritten so far.
    pub fn rewritten(&self) -> usize {
        self.rewrites.values().sum()
    }

    /// End the compilation, returning how many import sites were rewritten.
    pub fn finish(&mut self) -> usize {
        let count = self.rewritten();
        tracing::debug!(rewritten = count, files = self.rewrites.len(), "Compilation finished");
        self.rewrites.clear();
        count
    }
}

/// Rewrites wildcard specifiers to the absolute paths they resolve to.
pub struct ImportTransform<'r, P> {
    resolver: &'r OverrideResolver<P>,
}

impl<'r, P: FileProbe> ImportTransform<'r, P> {
    pub fn new(resolver: &'r OverrideResolver<P>) -> Self {
        Self { resolver }
    }

    /// Visit every import site of `ast`, rewriting wildcard imports.
    ///
    /// Returns the number of sites rewritten by this visit. Sites already
    /// marked resolved are skipped, so repeated visits of one tree are
    /// no-ops. The first unresolvable import aborts the visit with its
    /// error.
    pub fn visit(
        &self,
        ctx: &mut CompilationContext,
        file: &NormalizedPath,
        ast: &mut ModuleAst,
    ) -> Result<usize> {
        if ast.has_errors() {
            tracing::warn!(file = %file, "Module has syntax errors, rewriting the imports that parsed");
        }

        let mut rewritten = 0;
        for node in ast.imports_mut() {
            if node.is_resolved() {
                continue;
            }
            let request = ImportRequest::new(node.specifier(), file.clone());
            if let Some(resolved) = self.resolver.resolve(&request)? {
                tracing::debug!(
                    file = %file,
                    from = %node.specifier(),
                    to = %resolved,
                    "Rewrote wildcard import"
                );
                node.set_specifier(resolved.as_str());
                node.mark_resolved();
                rewritten += 1;
            }
        }
        ctx.record(file, rewritten);
        Ok(rewritten)
    }

    /// Parse, rewrite and print one module. The grammar follows the file
    /// extension.
    pub fn rewrite_source(
        &self,
        ctx: &mut CompilationContext,
        file: &NormalizedPath,
        source: &str,
    ) -> Result<String> {
        let mut ast = ModuleAst::parse(source, Syntax::for_path(file))?;
        self.visit(ctx, file, &mut ast)?;
        Ok(ast.print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::resolver::ResolverOptions;
    use pretty_assertions::assert_eq;
    use storefront_extensions::ExtensionRegistry;
    use storefront_fs::MemoryFileProbe;

    fn resolver() -> OverrideResolver<MemoryFileProbe> {
        OverrideResolver::with_probe(
            ExtensionRegistry::from_names(["extension-a"]),
            ResolverOptions::new(NormalizedPath::new("/p")),
            [
                "/p/node_modules/extension-a/app/header.jsx",
                "/p/app/footer.jsx",
            ]
            .into_iter()
            .collect(),
        )
    }

    fn parse(source: &str) -> ModuleAst {
        ModuleAst::parse(source, Syntax::JavaScript).unwrap()
    }

    #[test]
    fn test_second_visit_is_noop() {
        let resolver = resolver();
        let transform = ImportTransform::new(&resolver);
        let file = NormalizedPath::new("/p/app/main.jsx");
        let mut ctx = CompilationContext::new();
        let mut ast = parse("import Header from '*/app/header'\n");

        assert_eq!(transform.visit(&mut ctx, &file, &mut ast).unwrap(), 1);
        let first = ast.print();
        assert_eq!(transform.visit(&mut ctx, &file, &mut ast).unwrap(), 0);
        assert_eq!(ast.print(), first);
        assert_eq!(
            first,
            "import Header from '/p/node_modules/extension-a/app/header.jsx'\n"
        );
        assert!(ast.imports().all(|node| node.is_resolved()));
    }

    #[test]
    fn test_same_file_reparsed_in_one_compilation() {
        let resolver = resolver();
        let transform = ImportTransform::new(&resolver);
        let file = NormalizedPath::new("/p/app/main.jsx");
        let mut ctx = CompilationContext::new();

        let first = transform
            .rewrite_source(&mut ctx, &file, "import H from '*/app/header'")
            .unwrap();
        let second = transform
            .rewrite_source(&mut ctx, &file, "import F from '*/app/footer'")
            .unwrap();

        assert_eq!(first, "import H from '/p/node_modules/extension-a/app/header.jsx'");
        assert_eq!(second, "import F from '/p/app/footer.jsx'");
        assert_eq!(ctx.rewritten_in(&file), 2);
    }

    #[test]
    fn test_reparsed_file_still_fails_on_missing_import() {
        let resolver = resolver();
        let transform = ImportTransform::new(&resolver);
        let file = NormalizedPath::new("/p/app/main.jsx");
        let mut ctx = CompilationContext::new();

        transform
            .rewrite_source(&mut ctx, &file, "import H from '*/app/header'")
            .unwrap();
        let err = transform
            .rewrite_source(&mut ctx, &file, "import M from '*/app/missing'")
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedImport { .. }));
    }

    #[test]
    fn test_commented_wildcard_is_left_alone() {
        let resolver = resolver();
        let transform = ImportTransform::new(&resolver);
        let file = NormalizedPath::new("/p/app/main.jsx");
        let mut ctx = CompilationContext::new();

        let output = transform
            .rewrite_source(
                &mut ctx,
                &file,
                "import H from '*/app/header'\n// import Old from '*/app/removed'\n",
            )
            .unwrap();
        assert_eq!(
            output,
            "import H from '/p/node_modules/extension-a/app/header.jsx'\n// import Old from '*/app/removed'\n"
        );
        assert_eq!(ctx.finish(), 1);
    }

    #[test]
    fn test_finish_resets_counts() {
        let resolver = resolver();
        let transform = ImportTransform::new(&resolver);
        let file = NormalizedPath::new("/p/app/main.jsx");
        let mut ctx = CompilationContext::new();
        let mut ast = parse("import Header from '*/app/header'\n");

        transform.visit(&mut ctx, &file, &mut ast).unwrap();
        assert_eq!(ctx.rewritten_in(&file), 1);
        assert_eq!(ctx.finish(), 1);
        assert_eq!(ctx.rewritten_in(&file), 0);
        assert_eq!(ctx.rewritten(), 0);
    }
}
