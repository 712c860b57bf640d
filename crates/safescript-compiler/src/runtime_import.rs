//! Runtime import injection.
//!
//! Rewritten code calls `SafeScript.<op>(...)`, so every transformed file
//! must load the runtime first. The import form follows the file's own
//! module style.

use serde::{Deserialize, Serialize};

use safescript_types::ast::*;
use safescript_types::Span;

/// Runtime package loaded by ES modules.
pub const ES_RUNTIME_MODULE: &str = "@redradist/module-runtime-safescript";
/// Runtime package loaded by CommonJS modules.
pub const COMMONJS_RUNTIME_MODULE: &str = "@redradist/commonjs-runtime-safescript";
/// Binding the CommonJS `require` of the runtime is assigned to.
pub const COMMONJS_RUNTIME_BINDING: &str = "module_runtime_safescript";

/// Module system of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    #[default]
    Es,
    CommonJs,
}

impl ModuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Es => "es",
            ModuleKind::CommonJs => "commonjs",
        }
    }
}

/// The module style the program itself uses: its first `import` declaration
/// or its first `const x = require(...)`, whichever comes first.
pub fn detect_module_kind(program: &Program) -> Option<ModuleKind> {
    program.body.iter().find_map(|stmt| match &stmt.kind {
        StmtKind::Import(_) => Some(ModuleKind::Es),
        StmtKind::Var(decl) if decl.kind == VarKind::Const && required_module(decl).is_some() => {
            Some(ModuleKind::CommonJs)
        }
        _ => None,
    })
}

/// `true` if the program already loads the runtime in either style.
pub fn has_runtime_import(program: &Program) -> bool {
    program.body.iter().any(|stmt| match &stmt.kind {
        StmtKind::Import(import) => import.source.value == ES_RUNTIME_MODULE,
        StmtKind::Var(decl) => required_module(decl) == Some(COMMONJS_RUNTIME_MODULE),
        _ => false,
    })
}

/// Prepend the runtime import for `kind` unless the program already has one.
/// Returns whether the program changed.
pub fn inject_runtime_import(program: &mut Program, kind: ModuleKind) -> bool {
    if has_runtime_import(program) {
        return false;
    }
    program.body.insert(0, runtime_import(kind));
    true
}

/// The import statement for `kind`.
pub fn runtime_import(kind: ModuleKind) -> Stmt {
    let stmt = match kind {
        ModuleKind::Es => StmtKind::Import(ImportDecl::side_effect(StrLit::synthetic(
            ES_RUNTIME_MODULE,
        ))),
        ModuleKind::CommonJs => {
            let require = Expr::synthetic(ExprKind::Call {
                callee: Box::new(Expr::synthetic(ExprKind::Identifier("require".into()))),
                args: vec![Expr::synthetic(ExprKind::String(StrLit::synthetic(
                    COMMONJS_RUNTIME_MODULE,
                )))],
            });
            StmtKind::Var(VarDecl {
                kind: VarKind::Const,
                declarators: vec![VarDeclarator {
                    id: NodeId::SYNTHETIC,
                    name: Ident::synthetic(COMMONJS_RUNTIME_BINDING),
                    type_ann: None,
                    init: Some(require),
                    span: Span::DUMMY,
                }],
                span: Span::DUMMY,
            })
        }
    };
    Stmt::new(stmt, Span::DUMMY)
}

/// Module named by `require("...")` in the first declarator's initializer.
fn required_module(decl: &VarDecl) -> Option<&str> {
    let init = decl.declarators.first()?.init.as_ref()?;
    let ExprKind::Call { callee, args } = &init.kind else {
        return None;
    };
    if !matches!(&callee.kind, ExprKind::Identifier(name) if name == "require") {
        return None;
    }
    match args.as_slice() {
        [Expr {
            kind: ExprKind::String(lit),
            ..
        }] => Some(lit.value.as_str()),
        _ => None,
    }
}
