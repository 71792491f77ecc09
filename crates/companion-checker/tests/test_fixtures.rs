//! Shared builders for checker tests.
//!
//! `Fixture` assembles a one-file program: declare types and members, then
//! add reference sites with the helpers that shape the surrounding syntax
//! (`obj.M()`, `obj.P = v`, `obj.P++`, ...). Every site gets a distinct span
//! so diagnostics can be matched back to the site that produced them.

use crate::annotation::{AnnotationList, CompanionAnnotation};
use crate::capability::ReferenceKind;
use crate::model::{MemberDecl, MemberId, MemberKind, TypeDecl, TypeId};
use crate::program::{Program, ProgramBuilder};
use crate::reference::{CompilationUnit, ReferenceSite};
use crate::syntax::{ArgumentPassing, CompoundOperator, NodeIndex, UnaryOperator};
use companion_common::Span;

pub(crate) const FILE: &str = "test.cs";

pub(crate) fn by_type(id: TypeId) -> CompanionAnnotation {
    CompanionAnnotation::Type(id)
}

pub(crate) fn by_name(name: &str) -> CompanionAnnotation {
    CompanionAnnotation::named(name)
}

pub(crate) struct Fixture {
    builder: ProgramBuilder,
    unit: CompilationUnit,
    next_offset: u32,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            builder: ProgramBuilder::new(),
            unit: CompilationUnit::new(FILE),
            next_offset: 0,
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Top-level class in namespace `App`.
    pub(crate) fn class(&mut self, name: &str) -> TypeId {
        self.class_in(Some("App"), name)
    }

    pub(crate) fn class_in(&mut self, namespace: Option<&str>, name: &str) -> TypeId {
        let mut decl = TypeDecl::new(name);
        decl.namespace = namespace.map(str::to_string);
        self.builder.add_type(decl)
    }

    pub(crate) fn nested(&mut self, container: TypeId, name: &str) -> TypeId {
        let mut decl = TypeDecl::new(name);
        decl.containing_type = Some(container);
        self.builder.add_type(decl)
    }

    /// Attach type-level companions.
    pub(crate) fn restrict_type(&mut self, ty: TypeId, companions: Vec<CompanionAnnotation>) {
        if let Some(decl) = self.builder.type_mut(ty) {
            decl.companions = AnnotationList::new(companions);
        }
    }

    pub(crate) fn method(
        &mut self,
        ty: TypeId,
        name: &str,
        companions: Vec<CompanionAnnotation>,
    ) -> MemberId {
        let mut decl = MemberDecl::new(name, MemberKind::Method, ty);
        decl.companions = AnnotationList::new(companions);
        self.builder.add_member(decl)
    }

    pub(crate) fn constructor(&mut self, ty: TypeId, companions: Vec<CompanionAnnotation>) -> MemberId {
        let mut decl = MemberDecl::new(".ctor", MemberKind::Constructor, ty);
        decl.companions = AnnotationList::new(companions);
        self.builder.add_member(decl)
    }

    pub(crate) fn property(
        &mut self,
        ty: TypeId,
        name: &str,
        general: Vec<CompanionAnnotation>,
        getter: Vec<CompanionAnnotation>,
        setter: Vec<CompanionAnnotation>,
    ) -> MemberId {
        let mut decl = MemberDecl::new(name, MemberKind::Property, ty);
        decl.companions = AnnotationList::new(general);
        decl.getter_companions = AnnotationList::new(getter);
        decl.setter_companions = AnnotationList::new(setter);
        self.builder.add_member(decl)
    }

    // =========================================================================
    // Reference sites
    // =========================================================================

    fn record(
        &mut self,
        node: NodeIndex,
        member: MemberId,
        kind: ReferenceKind,
        from: Option<TypeId>,
    ) -> Span {
        let location = Span::new(self.next_offset, 3);
        self.next_offset += 10;
        self.unit.references.push(ReferenceSite {
            node,
            member,
            kind,
            enclosing_type: from,
            location,
        });
        location
    }

    /// `obj.Name`, returning (name node, access node).
    fn access(&mut self, member_name: &str) -> (NodeIndex, NodeIndex) {
        let arena = &mut self.unit.nodes;
        let receiver = arena.name("obj");
        let name = arena.name(member_name);
        let access = arena.member_access(receiver, name);
        (name, access)
    }

    /// `obj.M()`
    pub(crate) fn call(&mut self, member: MemberId, from: Option<TypeId>) -> Span {
        let (_, access) = self.access("M");
        let call = self.unit.nodes.invocation(access, Vec::new());
        self.unit.nodes.other(vec![call]);
        self.record(call, member, ReferenceKind::Invocation, from)
    }

    /// `Action a = obj.M;`
    pub(crate) fn method_reference(&mut self, member: MemberId, from: Option<TypeId>) -> Span {
        let (name, access) = self.access("M");
        self.unit.nodes.other(vec![access]);
        self.record(name, member, ReferenceKind::MethodReference, from)
    }

    /// `new T()`
    pub(crate) fn construct(&mut self, member: MemberId, from: Option<TypeId>) -> Span {
        let type_name = self.unit.nodes.name("T");
        let creation = self.unit.nodes.object_creation(type_name, Vec::new());
        self.unit.nodes.other(vec![creation]);
        self.record(creation, member, ReferenceKind::ObjectCreation, from)
    }

    /// `var x = obj.P;`
    pub(crate) fn read(&mut self, member: MemberId, from: Option<TypeId>) -> Span {
        let (name, access) = self.access("P");
        self.unit.nodes.other(vec![access]);
        self.record(name, member, ReferenceKind::PropertyReference, from)
    }

    /// `obj.P = 1;`
    pub(crate) fn write(&mut self, member: MemberId, from: Option<TypeId>) -> Span {
        let (name, access) = self.access("P");
        let value = self.unit.nodes.other(Vec::new());
        self.unit.nodes.assignment(access, value);
        self.record(name, member, ReferenceKind::PropertyReference, from)
    }

    /// `obj.P++;`
    pub(crate) fn increment(&mut self, member: MemberId, from: Option<TypeId>) -> Span {
        let (name, access) = self.access("P");
        self.unit.nodes.unary(UnaryOperator::PostIncrement, access);
        self.record(name, member, ReferenceKind::PropertyReference, from)
    }

    /// `obj.P += 1;`
    pub(crate) fn compound(&mut self, member: MemberId, from: Option<TypeId>) -> Span {
        let (name, access) = self.access("P");
        let value = self.unit.nodes.other(Vec::new());
        self.unit
            .nodes
            .compound_assignment(CompoundOperator::Add, access, value);
        self.record(name, member, ReferenceKind::PropertyReference, from)
    }

    /// `Update(ref obj.P);`
    pub(crate) fn pass_by_ref(&mut self, member: MemberId, from: Option<TypeId>) -> Span {
        let (name, access) = self.access("P");
        let argument = self.unit.nodes.argument(ArgumentPassing::Ref, access);
        let callee = self.unit.nodes.name("Update");
        self.unit.nodes.invocation(callee, vec![argument]);
        self.record(name, member, ReferenceKind::PropertyReference, from)
    }

    pub(crate) fn build(mut self) -> Program {
        self.builder.add_unit(self.unit);
        self.builder.build().expect("fixture program is well formed")
    }
}
