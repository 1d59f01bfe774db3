use crate::types::JsValue;

/// Completion Record (spec §6.2.4): the result of every evaluable
/// operation. Abrupt completions must be propagated unchanged by the
/// caller; there is no separate host exception channel for language
/// errors.
#[derive(Debug, Clone)]
#[must_use]
pub enum Completion {
    Normal(JsValue),
    Throw(JsValue),
    Return(JsValue),
    Break(Option<String>),
    Continue(Option<String>),
}

/// Lightweight completion for operations whose normal result is a plain
/// Rust value (HasBinding-style queries, DeleteBinding). `Err` carries
/// the thrown value, exactly like `Completion::Throw`.
pub type JsResult<T> = Result<T, JsValue>;

impl Completion {
    pub fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal(_))
    }

    /// Payload of the value-carrying variants.
    pub fn value(&self) -> Option<&JsValue> {
        match self {
            Completion::Normal(v) | Completion::Throw(v) | Completion::Return(v) => Some(v),
            Completion::Break(_) | Completion::Continue(_) => None,
        }
    }

    /// Unwraps a normal completion once abruptness has been ruled out.
    /// Calling this on an abrupt completion is an evaluator bug.
    pub fn normal_value(self) -> JsValue {
        match self {
            Completion::Normal(v) => v,
            other => panic!("expected normal completion, got {other:?}"),
        }
    }

    /// Converts to the lightweight channel, preserving thrown values.
    /// Return/Break/Continue never reach call sites that use this.
    pub fn into_result(self) -> JsResult<JsValue> {
        match self {
            Completion::Normal(v) => Ok(v),
            Completion::Throw(v) => Err(v),
            other => panic!("unexpected control-flow completion {other:?}"),
        }
    }
}

impl From<JsResult<JsValue>> for Completion {
    fn from(res: JsResult<JsValue>) -> Self {
        match res {
            Ok(v) => Completion::Normal(v),
            Err(v) => Completion::Throw(v),
        }
    }
}
