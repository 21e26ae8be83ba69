//! One processor per grammar unit, and the registry that maps a
//! [`SectionType`] to it.

pub mod action;
pub mod asset;
pub mod attributes;
pub mod blueprint;
pub mod data_structures;
pub mod headers;
pub mod mson;
pub mod parameters;
pub mod payload;
pub mod resource;
pub mod resource_group;

use crate::ast::mson::TypeSectionClass;
use crate::ast::{AssetRole, PayloadKind};

use super::classify::SectionType;
use super::context::ParseContext;
use super::processor::EntityProcessor;

pub use action::ActionProcessor;
pub use asset::AssetProcessor;
pub use attributes::AttributesProcessor;
pub use blueprint::BlueprintProcessor;
pub use data_structures::{DataStructureGroupProcessor, NamedTypeProcessor};
pub use headers::HeadersProcessor;
pub use mson::{
    MemberGroupProcessor, MemberProcessor, MixinProcessor, OneOfProcessor, TypeSectionProcessor,
};
pub use parameters::{ParameterProcessor, ParametersProcessor, ValuesProcessor};
pub use payload::PayloadProcessor;
pub use resource::ResourceProcessor;
pub use resource_group::ResourceGroupProcessor;

/// A fresh processor for `section`, or `None` for `Undefined`.
pub fn processor_for(
    section: SectionType,
    ctx: &ParseContext<'_>,
) -> Option<Box<dyn EntityProcessor>> {
    let processor: Box<dyn EntityProcessor> = match section {
        SectionType::Undefined => return None,
        SectionType::Blueprint => Box::new(BlueprintProcessor::default()),
        SectionType::ResourceGroup => Box::new(ResourceGroupProcessor::default()),
        SectionType::Resource => Box::new(ResourceProcessor::default()),
        SectionType::Action => Box::new(ActionProcessor::default()),
        SectionType::DataStructureGroup => Box::new(DataStructureGroupProcessor::default()),
        SectionType::NamedType => Box::new(NamedTypeProcessor::default()),
        SectionType::Request => Box::new(PayloadProcessor::new(PayloadKind::Request)),
        SectionType::Response => Box::new(PayloadProcessor::new(PayloadKind::Response)),
        SectionType::Model => Box::new(PayloadProcessor::new(PayloadKind::Model)),
        SectionType::Body => Box::new(AssetProcessor::new(AssetRole::BodyExample)),
        SectionType::Schema => Box::new(AssetProcessor::new(AssetRole::BodySchema)),
        SectionType::Headers => Box::new(HeadersProcessor::default()),
        SectionType::Parameters => Box::new(ParametersProcessor::default()),
        SectionType::Parameter => Box::new(ParameterProcessor::default()),
        SectionType::Values => Box::new(ValuesProcessor::default()),
        SectionType::Attributes => Box::new(AttributesProcessor::default()),
        SectionType::MsonProperty => Box::new(MemberProcessor::property()),
        SectionType::MsonValue => Box::new(MemberProcessor::value()),
        SectionType::MsonMixin => Box::new(MixinProcessor::default()),
        SectionType::MsonOneOf => Box::new(OneOfProcessor::default()),
        SectionType::MsonMemberGroup => Box::new(MemberGroupProcessor::default()),
        SectionType::MsonSample => Box::new(TypeSectionProcessor::new(
            TypeSectionClass::Sample,
            ctx.member_context(),
        )),
        SectionType::MsonDefault => Box::new(TypeSectionProcessor::new(
            TypeSectionClass::Default,
            ctx.member_context(),
        )),
    };
    Some(processor)
}
