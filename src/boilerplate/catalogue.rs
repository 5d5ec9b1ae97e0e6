//! Selector rule catalogue for boilerplate removal.
//!
//! Rules are data, not code: adding a pattern never touches pipeline control
//! flow. Each rule is a CSS-structural predicate; the `removes_rich` flag
//! marks the few regions (ads, cookie walls, modals) that are removed even
//! when they carry a lot of text, since their bulk is never article content.

/// What kind of page region a rule targets. Used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    Header,
    Footer,
    Navigation,
    Sidebar,
    Misc,
}

/// A selector-based removal rule.
#[derive(Debug, Clone, Copy)]
pub struct SelectorRule {
    /// CSS predicate matched structurally (tag, id, class membership).
    pub css: &'static str,

    /// Region category, for diagnostics.
    pub group: RuleGroup,

    /// When set, the rule removes matches even above the rich-content
    /// threshold. Reserved for regions whose text is never content.
    pub removes_rich: bool,
}

const fn rule(css: &'static str, group: RuleGroup) -> SelectorRule {
    SelectorRule { css, group, removes_rich: false }
}

const fn rich_rule(css: &'static str, group: RuleGroup) -> SelectorRule {
    SelectorRule { css, group, removes_rich: true }
}

/// The fixed removal catalogue, applied at every checkpoint.
pub static SELECTOR_RULES: &[SelectorRule] = &[
    // Headers
    rule("header", RuleGroup::Header),
    rule("#header", RuleGroup::Header),
    rule(".header", RuleGroup::Header),
    rule(".site-header", RuleGroup::Header),
    rule(".masthead", RuleGroup::Header),
    rule("[role='banner']", RuleGroup::Header),
    // Footers
    rule("footer", RuleGroup::Footer),
    rule("#footer", RuleGroup::Footer),
    rule(".footer", RuleGroup::Footer),
    rule(".site-footer", RuleGroup::Footer),
    rule(".copyright", RuleGroup::Footer),
    rule("[role='contentinfo']", RuleGroup::Footer),
    // Navigation
    rule("nav", RuleGroup::Navigation),
    rule(".navbar", RuleGroup::Navigation),
    rule(".main-nav", RuleGroup::Navigation),
    rule("#navbar", RuleGroup::Navigation),
    rule("#navigation", RuleGroup::Navigation),
    rule("#menu", RuleGroup::Navigation),
    rule("[role='navigation']", RuleGroup::Navigation),
    rule(".breadcrumb", RuleGroup::Navigation),
    rule(".breadcrumbs", RuleGroup::Navigation),
    // Sidebars
    rule("aside", RuleGroup::Sidebar),
    rule(".sidebar", RuleGroup::Sidebar),
    rule("#sidebar", RuleGroup::Sidebar),
    rule("[role='complementary']", RuleGroup::Sidebar),
    // Miscellaneous non-content regions
    rich_rule(".ads", RuleGroup::Misc),
    rich_rule(".advertisement", RuleGroup::Misc),
    rule(".ad-container", RuleGroup::Misc),
    rule(".adsbygoogle", RuleGroup::Misc),
    rule(".banner", RuleGroup::Misc),
    rich_rule(".cookie-notice", RuleGroup::Misc),
    rule(".cookie-banner", RuleGroup::Misc),
    rule(".gdpr", RuleGroup::Misc),
    rich_rule(".popup", RuleGroup::Misc),
    rich_rule(".modal", RuleGroup::Misc),
    rule(".newsletter-signup", RuleGroup::Misc),
    rule(".social-share", RuleGroup::Misc),
    rule(".share-buttons", RuleGroup::Misc),
    rule(".search-box", RuleGroup::Misc),
    rule(".search-form", RuleGroup::Misc),
    rule("[role='search']", RuleGroup::Misc),
];
