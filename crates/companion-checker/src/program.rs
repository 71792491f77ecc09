//! In-memory program snapshot.
//!
//! A `Program` is the serialized form of what a host compiler knows after
//! binding: type and member declarations with their companion metadata, plus
//! the compilation units whose reference sites are to be checked. It
//! implements [`SemanticModel`] with qualified names rendered once up front.

use crate::model::{
    MemberDecl, MemberId, MemberKind, SemanticModel, TypeDecl, TypeId, render_qualified_name,
};
use crate::reference::CompilationUnit;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// =============================================================================
// ProgramError
// =============================================================================

/// Structural inconsistency in a program snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramError {
    /// A member names a declaring type that does not exist.
    UnknownDeclaringType { member: MemberId, declaring_type: TypeId },
    /// A nested type names a containing type that does not exist.
    UnknownContainingType { ty: TypeId, containing_type: TypeId },
    /// Following `containing_type` links from this type returns to it.
    ContainmentCycle { ty: TypeId },
    /// Getter/setter companions only exist on properties.
    AccessorCompanionsOnNonProperty { member: MemberId, kind: MemberKind },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDeclaringType {
                member,
                declaring_type,
            } => write!(
                f,
                "member {} is declared in unknown type {}",
                member.0, declaring_type.0
            ),
            Self::UnknownContainingType {
                ty,
                containing_type,
            } => write!(
                f,
                "type {} is nested in unknown type {}",
                ty.0, containing_type.0
            ),
            Self::ContainmentCycle { ty } => {
                write!(f, "type {} is (transitively) nested in itself", ty.0)
            }
            Self::AccessorCompanionsOnNonProperty { member, kind } => write!(
                f,
                "member {} is a {:?} but carries getter/setter companions",
                member.0, kind
            ),
        }
    }
}

impl std::error::Error for ProgramError {}

// =============================================================================
// Program
// =============================================================================

/// Serialized layout of a program snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramData {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
    #[serde(default)]
    pub units: Vec<CompilationUnit>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ProgramData", into = "ProgramData")]
pub struct Program {
    types: Vec<TypeDecl>,
    members: Vec<MemberDecl>,
    units: Vec<CompilationUnit>,
    qualified_names: Vec<String>,
    types_by_name: FxHashMap<String, TypeId>,
}

impl Program {
    /// Validate `data` and render every qualified name.
    pub fn from_data(data: ProgramData) -> Result<Self, ProgramError> {
        let ProgramData {
            types,
            members,
            units,
        } = data;

        for (index, decl) in types.iter().enumerate() {
            let ty = TypeId(index as u32);
            let mut current = decl.containing_type;
            let mut steps = 0usize;
            while let Some(parent) = current {
                let Some(parent_decl) = types.get(parent.index()) else {
                    return Err(ProgramError::UnknownContainingType {
                        ty,
                        containing_type: parent,
                    });
                };
                steps += 1;
                if parent == ty || steps > types.len() {
                    return Err(ProgramError::ContainmentCycle { ty });
                }
                current = parent_decl.containing_type;
            }
        }

        for (index, decl) in members.iter().enumerate() {
            let member = MemberId(index as u32);
            if types.get(decl.declaring_type.index()).is_none() {
                return Err(ProgramError::UnknownDeclaringType {
                    member,
                    declaring_type: decl.declaring_type,
                });
            }
            if decl.kind != MemberKind::Property && decl.has_accessor_companions() {
                return Err(ProgramError::AccessorCompanionsOnNonProperty {
                    member,
                    kind: decl.kind,
                });
            }
        }

        let mut program = Self {
            types,
            members,
            units,
            qualified_names: Vec::new(),
            types_by_name: FxHashMap::default(),
        };
        let qualified_names: Vec<String> = (0..program.types.len())
            .map(|index| render_qualified_name(&program, TypeId(index as u32)).unwrap_or_default())
            .collect();
        for (index, name) in qualified_names.iter().enumerate() {
            program
                .types_by_name
                .entry(name.clone())
                .or_insert(TypeId(index as u32));
        }
        program.qualified_names = qualified_names;
        Ok(program)
    }

    /// Parse and validate a JSON snapshot. Validation failures surface as
    /// `serde_json` custom errors carrying the `ProgramError` message.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn units(&self) -> &[CompilationUnit] {
        &self.units
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDecl)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(index, decl)| (TypeId(index as u32), decl))
    }

    pub fn members(&self) -> impl Iterator<Item = (MemberId, &MemberDecl)> + '_ {
        self.members
            .iter()
            .enumerate()
            .map(|(index, decl)| (MemberId(index as u32), decl))
    }

    /// Number of reference sites across all units.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.units.iter().map(|unit| unit.references.len()).sum()
    }
}

impl SemanticModel for Program {
    fn type_decl(&self, id: TypeId) -> Option<&TypeDecl> {
        if id.is_none() {
            return None;
        }
        self.types.get(id.index())
    }

    fn member_decl(&self, id: MemberId) -> Option<&MemberDecl> {
        if id.is_none() {
            return None;
        }
        self.members.get(id.index())
    }

    fn type_count(&self) -> usize {
        self.types.len()
    }

    fn member_count(&self) -> usize {
        self.members.len()
    }

    fn qualified_name(&self, id: TypeId) -> Option<Cow<'_, str>> {
        if id.is_none() {
            return None;
        }
        match self.qualified_names.get(id.index()) {
            Some(name) => Some(Cow::Borrowed(name.as_str())),
            // Only reachable while `from_data` is still rendering names.
            None => render_qualified_name(self, id).map(Cow::Owned),
        }
    }

    fn find_type_by_qualified_name(&self, name: &str) -> Option<TypeId> {
        self.types_by_name.get(name).copied()
    }
}

impl TryFrom<ProgramData> for Program {
    type Error = ProgramError;

    fn try_from(data: ProgramData) -> Result<Self, Self::Error> {
        Self::from_data(data)
    }
}

impl From<Program> for ProgramData {
    fn from(program: Program) -> Self {
        Self {
            types: program.types,
            members: program.members,
            units: program.units,
        }
    }
}

// =============================================================================
// ProgramBuilder
// =============================================================================

/// Incremental construction of a [`Program`], handing out ids as it goes.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    data: ProgramData,
}

impl ProgramBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, decl: TypeDecl) -> TypeId {
        let id = TypeId(self.data.types.len() as u32);
        self.data.types.push(decl);
        id
    }

    pub fn add_member(&mut self, decl: MemberDecl) -> MemberId {
        let id = MemberId(self.data.members.len() as u32);
        self.data.members.push(decl);
        id
    }

    pub fn add_unit(&mut self, unit: CompilationUnit) {
        self.data.units.push(unit);
    }

    /// Mutable access to an already added type, e.g. to attach companions
    /// that refer to types added later.
    pub fn type_mut(&mut self, id: TypeId) -> Option<&mut TypeDecl> {
        self.data.types.get_mut(id.index())
    }

    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut MemberDecl> {
        self.data.members.get_mut(id.index())
    }

    pub fn build(self) -> Result<Program, ProgramError> {
        Program::from_data(self.data)
    }
}
