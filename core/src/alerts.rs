//! Declarative alert rules compiled into matchers.
//!
//! An [`AlertDirective`] maps a response lifecycle status (and, for
//! failures, an optional error type) to an alert action: display some
//! alert props, or dismiss the alert registered under a context key.
//! An ordered directive list compiles into one matcher chain via
//! [`compile_directives`], preserving the first-listed-wins dispatch of
//! [`reduce_matchers`](crate::matcher::reduce_matchers) — put specific
//! error-type rules before generic failure rules.
//!
//! The engine only decides *which* alert call to make. Owning the alert
//! list, replacing same-context alerts, and rendering are the alert
//! hub's responsibility behind the [`AlertSink`] seam.

use crate::error::ErrorType;
use crate::matcher::{MatchCriteria, MatchRule, Matcher, MatcherMiddleware, reduce_matchers};
use crate::middleware::Middleware;
use crate::response::{Response, ResponseStatus};
use smallvec::SmallVec;
use std::sync::Arc;

/// Visual category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Something went wrong.
    Failure,

    /// Neutral information.
    Info,

    /// Something completed.
    Success,

    /// Something needs attention.
    Warning,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failure => write!(f, "failure"),
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// The properties handed to [`AlertSink::display`].
///
/// Context-keyed alerts replace any existing alert with the same
/// context; the hub assigns identity (uuid) and manages the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertProps {
    /// Context key grouping alerts from one source.
    pub context: Option<String>,

    /// Icon name, e.g. `user-slash`.
    pub icon: Option<String>,

    /// Text shown to the user.
    pub message: String,

    /// Visual category.
    pub kind: AlertKind,

    /// Whether the user can dismiss the alert manually.
    pub dismissable: bool,

    /// Whether the alert survives navigation.
    pub persistent: bool,
}

impl AlertProps {
    /// Creates a dismissable, non-persistent alert.
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            context: None,
            icon: None,
            message: message.into(),
            kind,
            dismissable: true,
            persistent: false,
        }
    }

    /// Sets the context key.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the icon name.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Marks the alert persistent across navigation.
    #[must_use]
    pub const fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

/// Where alert show/hide calls land.
///
/// Implemented by the application's alert hub; the engine never touches
/// the alert list itself.
pub trait AlertSink: Send + Sync {
    /// Shows an alert, replacing any alert with the same context key.
    fn display(&self, alert: AlertProps);

    /// Hides the alert registered under a context key, if any.
    fn dismiss(&self, context: &str);
}

/// Context types that can route directive handlers to an alert sink.
pub trait AlertContext {
    /// The sink alert directives write to.
    fn alert_sink(&self) -> &dyn AlertSink;
}

/// Response lifecycle moment a directive fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveStatus {
    /// A request started.
    Loading,

    /// The request settled with data.
    Success,

    /// The request settled with an error from the server.
    Failure,

    /// The request settled with a transport-level error — the server
    /// never produced a structured response.
    Errored,
}

/// What a matched directive does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertAction {
    /// Show an alert.
    Display(AlertProps),

    /// Hide the alert registered under this context key.
    Dismiss(String),
}

/// One declarative alert rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDirective {
    /// When the rule fires.
    pub status: DirectiveStatus,

    /// Narrows a `Failure` rule to one structured error type.
    pub error_type: Option<ErrorType>,

    /// What happens on match.
    pub action: AlertAction,
}

/// An ordered directive list, small enough to live inline.
pub type AlertDirectives = SmallVec<[AlertDirective; 4]>;

impl AlertDirective {
    /// A rule that displays an alert.
    #[must_use]
    pub const fn display(status: DirectiveStatus, props: AlertProps) -> Self {
        Self {
            status,
            error_type: None,
            action: AlertAction::Display(props),
        }
    }

    /// A rule that dismisses the alert under `context`.
    pub fn dismiss(status: DirectiveStatus, context: impl Into<String>) -> Self {
        Self {
            status,
            error_type: None,
            action: AlertAction::Dismiss(context.into()),
        }
    }

    /// Narrows this rule to failures of one structured error type.
    #[must_use]
    pub fn with_error_type(mut self, error_type: impl Into<ErrorType>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    fn criteria(&self) -> MatchCriteria {
        match (self.status, &self.error_type) {
            (DirectiveStatus::Failure, Some(error_type)) => {
                MatchCriteria::Failure(error_type.clone())
            }
            (DirectiveStatus::Failure, None) => MatchCriteria::Status(ResponseStatus::Failure),
            (DirectiveStatus::Errored, _) => MatchCriteria::Errored,
            (DirectiveStatus::Loading, _) => MatchCriteria::Status(ResponseStatus::Loading),
            (DirectiveStatus::Success, _) => MatchCriteria::Status(ResponseStatus::Success),
        }
    }
}

/// Compiles an ordered directive list into one matcher chain.
///
/// Returns `None` for an empty list. Order is preserved: the first
/// directive whose criteria accept the response wins.
pub fn compile_directives<T, C, I>(directives: I) -> Option<Matcher<T, C>>
where
    C: AlertContext,
    I: IntoIterator<Item = AlertDirective>,
{
    let rules = directives.into_iter().map(|directive| {
        let action = directive.action.clone();
        MatchRule::new(
            directive.criteria(),
            move |_response: &Response<T>, context: &C| match &action {
                AlertAction::Display(props) => context.alert_sink().display(props.clone()),
                AlertAction::Dismiss(key) => context.alert_sink().dismiss(key),
            },
        )
    });

    reduce_matchers(rules)
}

/// Packages a directive list and its bound context as middleware.
///
/// Returns `None` for an empty list (nothing to observe).
pub fn alerts_middleware<P, T, C, I>(
    directives: I,
    context: C,
) -> Option<Arc<dyn Middleware<P, T>>>
where
    P: Send + 'static,
    T: Send + Sync + 'static,
    C: AlertContext + Clone + Send + Sync + 'static,
    I: IntoIterator<Item = AlertDirective>,
{
    let matcher = compile_directives(directives)?;

    Some(Arc::new(MatcherMiddleware::named("alerts", matcher, context)))
}
