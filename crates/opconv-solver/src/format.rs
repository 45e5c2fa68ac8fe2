//! Human-readable type rendering for traces and diagnostics.

use crate::SolverContext;
use crate::types::{TypeData, TypeId};
use opconv_common::limits::MAX_UNIFICATION_DEPTH;

pub struct TypeFormatter<'a> {
    ctx: SolverContext<'a>,
}

impl<'a> TypeFormatter<'a> {
    pub const fn new(ctx: SolverContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty, 0);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId, depth: u32) {
        if depth >= MAX_UNIFICATION_DEPTH {
            out.push_str("...");
            return;
        }
        match self.ctx.db.lookup(ty) {
            None => out.push_str("<unknown>"),
            Some(TypeData::Intrinsic(kind)) => out.push_str(kind.name()),
            Some(TypeData::Nullable(inner)) => {
                self.write_type(out, inner, depth + 1);
                out.push('?');
            }
            Some(TypeData::TypeParameter(param)) => match self.ctx.defs.type_param(param) {
                Some(info) => out.push_str(&self.ctx.db.resolve_atom(info.name)),
                None => out.push_str("<param>"),
            },
            Some(TypeData::Application(app)) => {
                match self.ctx.defs.class_name(app.class) {
                    Some(name) => out.push_str(&self.ctx.db.resolve_atom(name)),
                    None => out.push_str("<class>"),
                }
                if !app.args.is_empty() {
                    out.push('<');
                    for (index, &arg) in app.args.iter().enumerate() {
                        if index > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(out, arg, depth + 1);
                    }
                    out.push('>');
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
