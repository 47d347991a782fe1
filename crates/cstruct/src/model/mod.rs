//! Model compiler.
//!
//! Turns relaxed model text (or a structural `serde_json::Value`) plus an
//! optional named-types table into the canonical model: plain JSON where
//! every type position holds a builtin tag, an object or an array.

mod ast;
mod lexer;
mod parser;
mod resolve;

use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::error::{CStructError, Result};
use ast::Expr;
use resolve::TypeTable;

/// Model or types input, as text or as an already structured JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    Text(String),
    Json(Json),
}

impl ModelSource {
    fn parse(&self) -> Result<Expr> {
        match self {
            ModelSource::Text(text) => parser::parse(text),
            ModelSource::Json(value) => parser::parse(&serde_json::to_string(value)?),
        }
    }
}

impl From<&str> for ModelSource {
    fn from(text: &str) -> Self {
        ModelSource::Text(text.to_string())
    }
}

impl From<String> for ModelSource {
    fn from(text: String) -> Self {
        ModelSource::Text(text)
    }
}

impl From<&String> for ModelSource {
    fn from(text: &String) -> Self {
        ModelSource::Text(text.clone())
    }
}

impl From<Json> for ModelSource {
    fn from(value: Json) -> Self {
        ModelSource::Json(value)
    }
}

impl From<&Json> for ModelSource {
    fn from(value: &Json) -> Self {
        ModelSource::Json(value.clone())
    }
}

/// A named-types table plus the model compilation pipeline.
///
/// ```
/// use cstruct::model::Compiler;
///
/// let compiler = Compiler::with_types("{LCD: {line: u8, text: s4}}").unwrap();
/// let model = compiler.compile("{print: [2/LCD]}").unwrap();
/// assert_eq!(
///     model.to_string(),
///     r#"{"print":[{"line":"u8","text":"s4"},{"line":"u8","text":"s4"}]}"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    types: TypeTable,
    types_json: Option<Map<String, Json>>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a types table. Its root must be an object mapping names
    /// to models.
    pub fn with_types(types: impl Into<ModelSource>) -> Result<Self> {
        let mut compiler = Self::new();
        let members = match types.into().parse()? {
            Expr::Object(members) => members,
            _ => return Err(CStructError::grammar("types table must be an object", 0)),
        };
        let json = compiler.types_json.get_or_insert_with(Map::new);
        for member in members {
            json.insert(member.key.clone(), member.value.to_json());
            compiler.types.insert(member.key, member.value);
        }
        Ok(compiler)
    }

    /// Adds or replaces one named type.
    pub fn define(&mut self, name: &str, model: impl Into<ModelSource>) -> Result<()> {
        let expr = model.into().parse()?;
        self.types_json
            .get_or_insert_with(Map::new)
            .insert(name.to_string(), expr.to_json());
        self.types.insert(name.to_string(), expr);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Canonical text of the types table as given, without substitution.
    /// `None` when no types were supplied.
    pub fn types_json(&self) -> Option<String> {
        self.types_json
            .as_ref()
            .map(|map| Json::Object(map.clone()).to_string())
    }

    /// Compiles `model` into its canonical JSON value.
    pub fn compile(&self, model: impl Into<ModelSource>) -> Result<Json> {
        self.compile_with_text(model).map(|(_, value)| value)
    }

    pub(crate) fn compile_with_text(&self, model: impl Into<ModelSource>) -> Result<(String, Json)> {
        let expr = model.into().parse()?;
        let value = resolve::resolve(&expr, &self.types)?;
        let text = value.to_string();
        debug!(
            canonical_len = text.len(),
            types = self.types.len(),
            "compiled model"
        );
        Ok((text, value))
    }
}

/// Compiles a model into its canonical text.
///
/// ```
/// let text = cstruct::compile("{u8 a,b; name: string[4]}", None).unwrap();
/// assert_eq!(text, r#"{"a":"u8","b":"u8","name":"s4"}"#);
/// ```
pub fn compile(model: impl Into<ModelSource>, types: Option<ModelSource>) -> Result<String> {
    compiler_for(types)?
        .compile_with_text(model)
        .map(|(text, _)| text)
}

/// Compiles a model into its canonical JSON value.
pub fn compile_value(model: impl Into<ModelSource>, types: Option<ModelSource>) -> Result<Json> {
    compiler_for(types)?.compile(model)
}

fn compiler_for(types: Option<ModelSource>) -> Result<Compiler> {
    match types {
        Some(types) => Compiler::with_types(types),
        None => Ok(Compiler::new()),
    }
}
