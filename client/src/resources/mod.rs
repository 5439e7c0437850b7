//! Resource-scoped specialization of the request machinery.
//!
//! A resource is a named REST-ish collection (`rockets`, `books`,
//! `sources`). [`ResourceConfig`] captures the naming for one
//! resource/action pair; [`generate_alerts`] synthesizes the default
//! alert rules for it; [`ResourceQuery`] wires an underlying data
//! source, the compiled alert rules, and arbitrary response effects
//! into one reactive query.

use lorekeeper_core::alerts::{
    AlertDirective, AlertDirectives, AlertKind, AlertProps, DirectiveStatus,
};
use lorekeeper_core::error::ErrorType;

/// English inflection for templated messages.
pub mod inflect;

mod query;

pub use query::{QuerySource, ResourceQuery, ResourceQueryBuilder, ResponseEffect};

/// Naming and shape of one resource/action pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// The action name, e.g. `index`, `show`, `create`, `destroy`.
    pub action: String,

    /// Whether the action addresses one member of the collection (and
    /// therefore needs identifying wildcards such as `id`).
    pub member: bool,

    /// Whether the action reads (`true`) or mutates (`false`).
    pub query: bool,

    /// The plural resource name, e.g. `rockets`.
    pub resource_name: String,

    /// Overrides the derived singular form for irregular nouns.
    pub singular_name: Option<String>,

    /// Overrides the resource name in the alert context key, for
    /// nested or namespaced resources.
    pub scope: Option<String>,
}

impl ResourceConfig {
    /// A collection-scoped query action.
    pub fn new(action: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            member: false,
            query: true,
            resource_name: resource_name.into(),
            singular_name: None,
            scope: None,
        }
    }

    /// Marks the action as addressing one member of the collection.
    #[must_use]
    pub const fn member(mut self) -> Self {
        self.member = true;
        self
    }

    /// Marks the action as a mutation.
    #[must_use]
    pub const fn mutation(mut self) -> Self {
        self.query = false;
        self
    }

    /// Overrides the singular form.
    #[must_use]
    pub fn with_singular_name(mut self, singular_name: impl Into<String>) -> Self {
        self.singular_name = Some(singular_name.into());
        self
    }

    /// Overrides the alert-context scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// The singular form of the resource name.
    #[must_use]
    pub fn singular(&self) -> String {
        self.singular_name
            .clone()
            .unwrap_or_else(|| inflect::singularize(&self.resource_name))
    }

    /// What alert messages talk about: singular for member actions,
    /// the collection name otherwise.
    #[must_use]
    pub fn subject(&self) -> String {
        if self.member {
            self.singular()
        } else {
            self.resource_name.clone()
        }
    }

    /// The deterministic context key alerts for this resource share.
    #[must_use]
    pub fn alert_context(&self) -> String {
        let scope = self.scope.as_deref().unwrap_or(&self.resource_name);
        format!("resources:{scope}:request")
    }
}

/// How a resource query sources its alert rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlertsConfig {
    /// Use the rules [`generate_alerts`] derives from the resource
    /// configuration.
    #[default]
    Default,

    /// Use an explicit rule list instead.
    Custom(AlertDirectives),

    /// No alert rules at all.
    Disabled,
}

/// Synthesizes the default alert rules for a resource/action pair.
///
/// Ordered specific-to-generic so the matcher's first-listed-wins
/// dispatch does the right thing:
///
/// 1. member actions only: a not-found failure names the record
/// 2. transport failures get a connectivity message
/// 3. any other failure gets `Unable to <action> <subject>.`
/// 4. success dismisses the context for queries, or announces
///    `Successfully <did> <subject>.` for mutations
#[must_use]
pub fn generate_alerts(config: &ResourceConfig) -> AlertDirectives {
    let context = config.alert_context();
    let subject = config.subject();
    let mut directives = AlertDirectives::new();

    if config.member {
        directives.push(
            AlertDirective::display(
                DirectiveStatus::Failure,
                AlertProps::new(
                    AlertKind::Failure,
                    format!("{} not found.", inflect::capitalize(&config.singular())),
                )
                .with_context(context.clone()),
            )
            .with_error_type(ErrorType::NOT_FOUND),
        );
    }

    directives.push(AlertDirective::display(
        DirectiveStatus::Errored,
        AlertProps::new(AlertKind::Failure, "Unable to connect to the server.")
            .with_context(context.clone()),
    ));

    directives.push(AlertDirective::display(
        DirectiveStatus::Failure,
        AlertProps::new(
            AlertKind::Failure,
            format!("Unable to {} {subject}.", config.action),
        )
        .with_context(context.clone()),
    ));

    if config.query {
        directives.push(AlertDirective::dismiss(DirectiveStatus::Success, context));
    } else {
        directives.push(AlertDirective::display(
            DirectiveStatus::Success,
            AlertProps::new(
                AlertKind::Success,
                format!(
                    "Successfully {} {subject}.",
                    inflect::past_tense(&config.action)
                ),
            )
            .with_context(context),
        ));
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorekeeper_core::alerts::AlertAction;

    fn messages(directives: &AlertDirectives) -> Vec<String> {
        directives
            .iter()
            .map(|directive| match &directive.action {
                AlertAction::Display(props) => props.message.clone(),
                AlertAction::Dismiss(context) => format!("dismiss {context}"),
            })
            .collect()
    }

    #[test]
    fn collection_queries_get_errored_failure_and_dismiss_rules() {
        let config = ResourceConfig::new("index", "rockets");
        let directives = generate_alerts(&config);

        assert_eq!(
            messages(&directives),
            vec![
                "Unable to connect to the server.",
                "Unable to index rockets.",
                "dismiss resources:rockets:request",
            ]
        );
    }

    #[test]
    fn member_actions_lead_with_a_not_found_rule() {
        let config = ResourceConfig::new("show", "rockets").member();
        let directives = generate_alerts(&config);

        assert_eq!(directives[0].error_type.as_ref().map(ErrorType::as_str), Some(ErrorType::NOT_FOUND));
        assert_eq!(messages(&directives)[0], "Rocket not found.");
    }

    #[test]
    fn mutations_announce_success_instead_of_dismissing() {
        let config = ResourceConfig::new("create", "rockets").mutation();
        let directives = generate_alerts(&config);

        let last = messages(&directives).pop();
        assert_eq!(last.as_deref(), Some("Successfully created rockets."));
    }

    #[test]
    fn member_mutations_speak_in_the_singular() {
        let config = ResourceConfig::new("update", "rockets").member().mutation();
        let directives = generate_alerts(&config);

        let all = messages(&directives);
        assert!(all.contains(&"Unable to update rocket.".to_string()));
        assert!(all.contains(&"Successfully updated rocket.".to_string()));
    }

    #[test]
    fn scope_overrides_the_context_key() {
        let config = ResourceConfig::new("index", "books").with_scope("library:books");

        assert_eq!(config.alert_context(), "resources:library:books:request");
    }

    #[test]
    fn singular_name_overrides_derivation() {
        let config = ResourceConfig::new("show", "dice").with_singular_name("die").member();

        assert_eq!(config.subject(), "die");
    }
}
