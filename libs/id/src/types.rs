//! Identifiable kinds for all portal resources.
//!
//! Each kind has a unique name. Context components reference these names
//! as their kind tag, and typed ids carry the tag as a type parameter.

use crate::define_identifiable;

// =============================================================================
// Portlet Invocation
// =============================================================================

define_identifiable!(PortalContainer, "portal-container");
define_identifiable!(Portal, "portal");
define_identifiable!(Invoker, "invoker");
define_identifiable!(Portlet, "portlet");
define_identifiable!(PortletInstance, "portlet-instance");

// =============================================================================
// Sites and Pages
// =============================================================================

define_identifiable!(
    /// Kind of site: `site`, `space` or `dashboard`.
    SiteType,
    "site-type"
);
define_identifiable!(Site, "site");
define_identifiable!(Page, "page");
define_identifiable!(NavigationNode, "navigation-node");

// =============================================================================
// Users and Groups
// =============================================================================

define_identifiable!(User, "user");
define_identifiable!(Group, "group");

/// Every kind declared above.
pub const ALL_KINDS: &[&str] = &[
    PortalContainer::KIND,
    Portal::KIND,
    Invoker::KIND,
    Portlet::KIND,
    PortletInstance::KIND,
    SiteType::KIND,
    Site::KIND,
    Page::KIND,
    NavigationNode::KIND,
    User::KIND,
    Group::KIND,
];

// =============================================================================
// Tests
// =============================================================================
