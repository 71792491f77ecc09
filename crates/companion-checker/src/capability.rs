//! Capability kinds exercised by reference sites.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Set of primitive capabilities.
    ///
    /// A property access that both reads and writes carries `READ | WRITE`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CapabilityMask: u8 {
        const INVOKE = 1 << 0;
        const REFERENCE = 1 << 1;
        const CONSTRUCT = 1 << 2;
        const READ = 1 << 3;
        const WRITE = 1 << 4;
    }
}

/// How a property reference uses the property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyAccessMode {
    Get,
    Set,
    GetAndSet,
}

/// What a reference site does with its target member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// A call: `obj.Run()`.
    Invoke,
    /// A method group or delegate reference: `Action a = obj.Run;`.
    Reference,
    /// An object construction: `new Widget()`.
    Construct,
    Get,
    Set,
    GetAndSet,
}

impl Capability {
    #[must_use]
    pub const fn mask(self) -> CapabilityMask {
        match self {
            Self::Invoke => CapabilityMask::INVOKE,
            Self::Reference => CapabilityMask::REFERENCE,
            Self::Construct => CapabilityMask::CONSTRUCT,
            Self::Get => CapabilityMask::READ,
            Self::Set => CapabilityMask::WRITE,
            Self::GetAndSet => CapabilityMask::READ.union(CapabilityMask::WRITE),
        }
    }
}

impl From<PropertyAccessMode> for Capability {
    fn from(mode: PropertyAccessMode) -> Self {
        match mode {
            PropertyAccessMode::Get => Self::Get,
            PropertyAccessMode::Set => Self::Set,
            PropertyAccessMode::GetAndSet => Self::GetAndSet,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invoke => "invoke",
            Self::Reference => "reference",
            Self::Construct => "construct",
            Self::Get => "get",
            Self::Set => "set",
            Self::GetAndSet => "get+set",
        };
        f.write_str(name)
    }
}

/// Syntactic/operation kind of a reference site, as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Invocation,
    MethodReference,
    ObjectCreation,
    PropertyReference,
}
