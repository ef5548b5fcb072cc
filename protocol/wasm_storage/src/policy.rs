use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::WasmType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionClass {
    DataRequest,
    Overlay,
}

impl SubmissionClass {
    pub fn duplicate_message(&self) -> &'static str {
        match self {
            SubmissionClass::DataRequest => "data Request Wasm with given hash already exists",
            SubmissionClass::Overlay => "overlay Wasm with given hash already exists",
        }
    }
}

impl fmt::Display for SubmissionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionClass::DataRequest => f.write_str("data-request"),
            SubmissionClass::Overlay => f.write_str("overlay"),
        }
    }
}

/// Pre-hash checks a submission passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authorize,
    CheckType,
    Decompress,
    CheckSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRule {
    Any,
    OneOf(Vec<WasmType>),
}

impl TypeRule {
    pub fn allows(&self, wasm_type: WasmType) -> bool {
        match self {
            TypeRule::Any => true,
            TypeRule::OneOf(allowed) => allowed.contains(&wasm_type),
        }
    }
}

/// Describes how one submission entry point is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPolicy {
    pub class: SubmissionClass,
    pub types: TypeRule,
    pub type_error: &'static str,
    pub requires_authority: bool,
}

impl ClassPolicy {
    pub fn data_request() -> Self {
        Self {
            class: SubmissionClass::DataRequest,
            types: TypeRule::OneOf(vec![WasmType::DataRequestExecutor]),
            type_error: "Data Request Wasm type must be data-request-executor",
            requires_authority: false,
        }
    }

    pub fn overlay() -> Self {
        Self {
            class: SubmissionClass::Overlay,
            types: TypeRule::OneOf(vec![WasmType::DataRequestExecutor, WasmType::Relayer]),
            type_error: "Overlay Wasm type must be data-request-executor or relayer",
            requires_authority: true,
        }
    }

    pub fn for_class(class: SubmissionClass) -> Self {
        match class {
            SubmissionClass::DataRequest => Self::data_request(),
            SubmissionClass::Overlay => Self::overlay(),
        }
    }

    pub fn without_type_check(mut self) -> Self {
        self.types = TypeRule::Any;
        self
    }

    pub fn with_authority(mut self, required: bool) -> Self {
        self.requires_authority = required;
        self
    }

    /// Gated classes reject on the cheap checks before touching the payload;
    /// open classes validate the payload first.
    pub fn stages(&self) -> Vec<Stage> {
        if self.requires_authority {
            vec![
                Stage::Authorize,
                Stage::CheckType,
                Stage::Decompress,
                Stage::CheckSize,
            ]
        } else {
            vec![Stage::Decompress, Stage::CheckSize, Stage::CheckType]
        }
    }
}
