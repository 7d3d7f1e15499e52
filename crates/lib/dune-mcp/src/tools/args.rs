use std::borrow::Cow;
use std::marker::PhantomData;

use dune_core::query::JsonObject;
use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

/// Raw tool arguments whose advertised schema is taken from `S`.
///
/// rmcp deserializes tool arguments before the handler runs, so a typed
/// parameter struct would reject bad input with serde's message. Keeping the
/// object raw lets the query validators report the failure instead.
#[derive(Debug, Deserialize)]
#[serde(transparent, bound = "")]
pub struct ToolArgs<S> {
    object: JsonObject,
    #[serde(skip)]
    _schema: PhantomData<fn() -> S>,
}

impl<S> ToolArgs<S> {
    #[cfg(test)]
    pub const fn new(object: JsonObject) -> Self {
        Self {
            object,
            _schema: PhantomData,
        }
    }

    pub const fn object(&self) -> &JsonObject {
        &self.object
    }
}

impl<S: JsonSchema> JsonSchema for ToolArgs<S> {
    fn schema_name() -> Cow<'static, str> {
        S::schema_name()
    }

    fn schema_id() -> Cow<'static, str> {
        S::schema_id()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        S::json_schema(generator)
    }
}
