//! Emission order for the declarations of one ABI.
//!
//! A depth-first walk over the structs in ABI order emits every dependency
//! (the base struct, then each struct or variant a field refers to) before
//! the struct itself. Nodes are marked in progress while their dependencies
//! are walked so a cycle is reported instead of recursing forever.

use std::collections::HashMap;

use abigen_runtime::AbiDocument;
use abigen_runtime::abi::StructDef;
use abigen_runtime::abi::TypeDef;
use abigen_runtime::abi::VariantDef;

use crate::error::GenerateError;
use crate::error::Result;
use crate::resolve::TypeResolver;

/// One ABI declaration, borrowed from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration<'a> {
	Struct(&'a StructDef),
	Variant(&'a VariantDef),
	Alias(&'a TypeDef),
}

impl Declaration<'_> {
	pub fn abi_name(&self) -> &str {
		match self {
			Self::Struct(def) => &def.name,
			Self::Variant(def) => &def.name,
			Self::Alias(def) => &def.new_type_name,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
	InProgress,
	Done,
}

struct Walker<'a, 'r> {
	resolver: &'r TypeResolver<'a>,
	structs: HashMap<&'a str, &'a StructDef>,
	variants: HashMap<&'a str, &'a VariantDef>,
	marks: HashMap<String, Mark>,
	path: Vec<String>,
	out: Vec<Declaration<'a>>,
}

/// Order every struct, variant and alias of `abi` so each declaration comes
/// after everything it depends on.
///
/// Structs are walked in ABI order; variants no struct reaches follow in ABI
/// order, then aliases in ABI order. The result only depends on the input, so
/// repeated runs agree.
pub fn order<'a>(abi: &'a AbiDocument, resolver: &TypeResolver<'a>) -> Result<Vec<Declaration<'a>>> {
	let mut walker = Walker {
		resolver,
		structs: abi.structs.iter().map(|s| (s.name.as_str(), s)).collect(),
		variants: abi.variants.iter().map(|v| (v.name.as_str(), v)).collect(),
		marks: HashMap::new(),
		path: Vec::new(),
		out: Vec::with_capacity(abi.structs.len() + abi.variants.len() + abi.types.len()),
	};

	for def in &abi.structs {
		walker.visit(&def.name)?;
	}

	for def in &abi.variants {
		walker.visit(&def.name)?;
	}

	walker.out.extend(abi.types.iter().map(Declaration::Alias));

	tracing::debug!(declarations = walker.out.len(), "ordered declarations");
	Ok(walker.out)
}

impl<'a> Walker<'a, '_> {
	fn visit(&mut self, name: &str) -> Result<()> {
		match self.marks.get(name) {
			Some(Mark::Done) => return Ok(()),
			Some(Mark::InProgress) => {
				let start = self.path.iter().position(|seen| seen == name).unwrap_or_default();
				let mut path = self.path[start..].to_vec();
				path.push(name.to_string());
				return Err(GenerateError::CyclicDependency { path });
			}
			None => {}
		}

		let declaration = if let Some(def) = self.structs.get(name).copied() {
			Declaration::Struct(def)
		} else if let Some(def) = self.variants.get(name).copied() {
			Declaration::Variant(def)
		} else {
			return Ok(());
		};

		self.marks.insert(name.to_string(), Mark::InProgress);
		self.path.push(name.to_string());

		for dependency in self.dependencies(declaration)? {
			self.visit(&dependency)?;
		}

		self.path.pop();
		self.marks.insert(name.to_string(), Mark::Done);
		self.out.push(declaration);
		Ok(())
	}

	fn dependencies(&self, declaration: Declaration<'a>) -> Result<Vec<String>> {
		let mut dependencies = Vec::new();

		match declaration {
			Declaration::Struct(def) => {
				if !def.base.is_empty() {
					if !self.structs.contains_key(def.base.as_str()) {
						return Err(GenerateError::UnknownType {
							type_name: def.base.clone(),
							context: format!("base of struct `{}`", def.name),
						});
					}
					dependencies.push(def.base.clone());
				}

				for field in &def.fields {
					let context = format!("field `{}` of struct `{}`", field.name, def.name);
					let resolved = self.resolver.resolve_str(&field.type_name, &context)?;
					if let Some(referent) = resolved.referent() {
						dependencies.push(referent.to_string());
					}
				}
			}
			Declaration::Variant(def) => {
				for alternative in self.resolver.resolve_variant(&def.name)? {
					if let Some(referent) = alternative.referent() {
						dependencies.push(referent.to_string());
					}
				}
			}
			Declaration::Alias(_) => {}
		}

		Ok(dependencies)
	}
}
