//! View layer: render models and the static view registry.

mod registry;
mod render;

pub use registry::{ActionSpec, ViewDescriptor, ViewRegistry, VisibilityRule};
pub use render::{
    ListView, MediaRef, Notice, NoticeSeverity, PageInfo, RenderFlags, RenderModel, RenderedAction,
};
