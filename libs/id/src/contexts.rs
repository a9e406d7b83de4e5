//! Built-in grammars for the portal's own resources.

use std::sync::Arc;

use crate::types::{
    Group, Invoker, NavigationNode, Page, Portal, PortalContainer, Portlet, PortletInstance, Site,
    SiteType, User,
};
use crate::{Context, IdError};

pub const PORTLET_CONTEXT: &str = "portlet";
pub const SITE_CONTEXT: &str = "site";
pub const PAGE_CONTEXT: &str = "page";
pub const NAVIGATION_CONTEXT: &str = "navigation";
pub const GROUP_CONTEXT: &str = "group";
pub const USER_CONTEXT: &str = "user";

const SITE_TYPE_PATTERN: &str = "site|space|dashboard";
const PATH_SEGMENT_PATTERN: &str = "[^/]+";
const INVOCATION_SEGMENT_PATTERN: &str = "[^=]+";

/// `container=portal[=invoker[=portlet[=instance]]]`
pub fn portlet() -> Result<Arc<Context>, IdError> {
    Context::builder()
        .named(PORTLET_CONTEXT)
        .with_default_separator("=")
        .required_component("container", PortalContainer::KIND, INVOCATION_SEGMENT_PATTERN)
        .required_component("portal", Portal::KIND, INVOCATION_SEGMENT_PATTERN)
        .optional_component("invoker", Invoker::KIND, INVOCATION_SEGMENT_PATTERN)
        .optional_component("portlet", Portlet::KIND, INVOCATION_SEGMENT_PATTERN)
        .optional_component("instance", PortletInstance::KIND, INVOCATION_SEGMENT_PATTERN)
        .ignore_remaining_after_first_missing_optional()
        .build()
}

/// `type/name`, e.g. `site/classic`.
pub fn site() -> Result<Arc<Context>, IdError> {
    Context::builder()
        .named(SITE_CONTEXT)
        .with_default_separator("/")
        .required_component("type", SiteType::KIND, SITE_TYPE_PATTERN)
        .required_component("name", Site::KIND, PATH_SEGMENT_PATTERN)
        .build()
}

/// `/type/site/page`, e.g. `/site/classic/homepage`.
pub fn page() -> Result<Arc<Context>, IdError> {
    Context::builder()
        .named(PAGE_CONTEXT)
        .with_default_separator("/")
        .require_separator_in_first_position()
        .required_component("type", SiteType::KIND, SITE_TYPE_PATTERN)
        .required_component("site", Site::KIND, PATH_SEGMENT_PATTERN)
        .required_component("page", Page::KIND, PATH_SEGMENT_PATTERN)
        .build()
}

/// `/type/site/node[/node...]`, e.g. `/site/classic/home/about`.
pub fn navigation() -> Result<Arc<Context>, IdError> {
    Context::builder()
        .named(NAVIGATION_CONTEXT)
        .with_default_separator("/")
        .require_separator_in_first_position()
        .required_component("type", SiteType::KIND, SITE_TYPE_PATTERN)
        .required_component("site", Site::KIND, PATH_SEGMENT_PATTERN)
        .required_unbounded_hierarchical_component(
            "node",
            NavigationNode::KIND,
            PATH_SEGMENT_PATTERN,
        )
        .build()
}

/// `/segment[/segment...]`, e.g. `/platform/administrators`.
pub fn group() -> Result<Arc<Context>, IdError> {
    Context::builder()
        .named(GROUP_CONTEXT)
        .with_default_separator("/")
        .require_separator_in_first_position()
        .required_unbounded_hierarchical_component("group", Group::KIND, PATH_SEGMENT_PATTERN)
        .build()
}

/// A single user name.
pub fn user() -> Result<Arc<Context>, IdError> {
    Context::builder()
        .named(USER_CONTEXT)
        .required_component("user", User::KIND, "[A-Za-z0-9._@-]+")
        .build()
}

/// All built-in contexts.
pub fn builtin() -> Result<Vec<Arc<Context>>, IdError> {
    Ok(vec![portlet()?, site()?, page()?, navigation()?, group()?, user()?])
}
