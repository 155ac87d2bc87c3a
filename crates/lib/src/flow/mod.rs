//! Navigation between the marketplace views.
//!
//! The flow runs negotiate → create agreement → payment. Each step needs an
//! identifier that resolves to a contact or startup; anything that does not
//! resolve renders a not-found view with a way back to the catalog instead
//! of failing. [`FlowController`] turns a [`Route`] into a [`View`] and
//! hands out the controllers and sessions that drive the interactive
//! steps. All of them share one [`Navigator`], so timed redirects (the
//! agreement's move to payment, the payment's return home) show up as the
//! current route.

mod errors;
mod navigator;
mod route;
mod sessions;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;

pub use errors::FlowError;
pub use navigator::Navigator;
pub use route::Route;
pub use sessions::{AgreementSession, AgreementState, PaymentSession, PaymentState, StepDelays};

use crate::agreement::{
    AgreementStatus, DEFAULT_EQUITY_PERCENT, DEFAULT_RATE_PERCENT, SavedAgreement, TermOption,
};
use crate::catalog::{Contact, Counterparty, Deal, Startup};
use crate::conversation::{ConversationController, Message, ReplyStrategy};
use crate::scheduler::Scheduler;
use crate::search::{SortOrder, contact_directory};
use crate::{Clock, Error, Id, Marketplace, Result, Settings};

/// What a route shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Every listed startup, in catalog order.
    Catalog { startups: Vec<Startup> },
    /// The contact list, most recent activity first, with nothing open.
    ConversationIndex { contacts: Vec<Contact> },
    /// One conversation, oldest message first.
    Conversation {
        counterparty: Counterparty,
        messages: Vec<Message>,
    },
    /// The agreement form with its initial values, taken from the
    /// agreement already proposed to this startup when there is one.
    Agreement {
        deal: Deal,
        amount: u64,
        term: TermOption,
        rate_percent: f64,
        equity_percent: f64,
        status: Option<AgreementStatus>,
    },
    /// The payment form.
    Payment { deal: Deal, amount: u64 },
    /// The identifier or path did not resolve.
    NotFound { message: String, escape: Route },
    /// The marketplace data could not be loaded.
    LoadFailed { reason: String, retry: Route },
}

impl View {
    /// The view shown in place of `route` when it fails with `err`.
    ///
    /// Not-found errors escape to the catalog; anything else is reported as
    /// a load failure that retries `route`.
    pub fn for_error(err: &Error, route: &Route) -> View {
        if err.is_not_found() {
            View::NotFound {
                message: err.to_string(),
                escape: Route::Catalog,
            }
        } else {
            View::LoadFailed {
                reason: err.to_string(),
                retry: route.clone(),
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, View::NotFound { .. })
    }
}

/// Resolves routes against a marketplace and starts the interactive steps.
#[derive(Debug)]
pub struct FlowController {
    marketplace: Arc<Marketplace>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    replies: Arc<dyn ReplyStrategy>,
    settings: Settings,
    navigator: Arc<Navigator>,
}

impl FlowController {
    pub fn new(
        marketplace: Arc<Marketplace>,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        settings: Settings,
    ) -> Self {
        let replies = settings.reply_strategy();
        Self::with_replies(marketplace, clock, scheduler, replies, settings)
    }

    /// Like [`new`](Self::new) with an explicit reply strategy.
    pub fn with_replies(
        marketplace: Arc<Marketplace>,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        replies: Arc<dyn ReplyStrategy>,
        settings: Settings,
    ) -> Self {
        Self {
            marketplace,
            clock,
            scheduler,
            replies,
            settings,
            navigator: Arc::new(Navigator::default()),
        }
    }

    pub fn marketplace(&self) -> &Arc<Marketplace> {
        &self.marketplace
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Move to `route` and render it.
    pub fn navigate(&self, route: Route) -> View {
        self.navigator.navigate(route.clone());
        self.render(&route)
    }

    /// Parse `path`, move there and render it.
    pub fn open(&self, path: &str) -> View {
        self.navigate(Route::parse(path))
    }

    /// Render the current route.
    pub fn current(&self) -> View {
        self.render(&self.navigator.current())
    }

    /// Render `route` without navigating. Failures become a not-found or
    /// load-failure view.
    pub fn render(&self, route: &Route) -> View {
        match self.try_render(route) {
            Ok(view) => view,
            Err(err) => {
                tracing::warn!(%route, error = %err, "Route failed to render");
                View::for_error(&err, route)
            }
        }
    }

    fn try_render(&self, route: &Route) -> Result<View> {
        let catalog = self.marketplace.catalog();
        let view = match route {
            Route::Catalog | Route::Search => View::Catalog {
                startups: catalog.startups().to_vec(),
            },
            Route::Conversations => View::ConversationIndex {
                contacts: contact_directory(catalog, "", SortOrder::Recent),
            },
            Route::Conversation(id) => {
                let counterparty = catalog.resolve(id)?;
                let messages = self
                    .marketplace
                    .conversations()
                    .thread(&counterparty.conversation_key());
                View::Conversation {
                    counterparty,
                    messages,
                }
            }
            Route::Agreement(id) => {
                let deal = catalog.resolve_deal(id)?;
                match self.marketplace.saved_agreement(&deal.startup.id) {
                    Some(SavedAgreement {
                        amount,
                        term,
                        rate_percent,
                        equity_percent,
                        status,
                        ..
                    }) => View::Agreement {
                        amount: *amount,
                        term: *term,
                        rate_percent: *rate_percent,
                        equity_percent: *equity_percent,
                        status: Some(*status),
                        deal,
                    },
                    None => View::Agreement {
                        deal,
                        amount: self.settings.default_amount,
                        term: TermOption::default(),
                        rate_percent: DEFAULT_RATE_PERCENT,
                        equity_percent: DEFAULT_EQUITY_PERCENT,
                        status: None,
                    },
                }
            }
            Route::Payment { id, amount } => View::Payment {
                deal: catalog.resolve_deal(id)?,
                amount: amount.unwrap_or(self.settings.default_amount),
            },
            Route::NotFound(path) => {
                return Err(FlowError::UnknownRoute { path: path.clone() }.into());
            }
        };
        Ok(view)
    }

    /// Open the conversation with `id` for messaging.
    pub fn open_conversation(&self, id: &Id) -> Result<ConversationController> {
        let controller = ConversationController::open(
            Arc::clone(&self.marketplace),
            id,
            Arc::clone(&self.clock),
            Arc::clone(&self.scheduler),
            Arc::clone(&self.replies),
            self.settings.reply_delay(),
        )?;
        self.navigator.navigate(Route::Conversation(id.clone()));
        Ok(controller)
    }

    /// Start the agreement step for the startup behind `id`.
    pub fn start_agreement(&self, id: &Id) -> Result<AgreementSession> {
        let deal = self.marketplace.catalog().resolve_deal(id)?;
        self.navigator.navigate(Route::Agreement(id.clone()));
        Ok(AgreementSession::new(
            id.clone(),
            deal,
            Arc::clone(&self.navigator),
            Arc::clone(&self.scheduler),
            StepDelays::from(&self.settings),
        ))
    }

    /// Start the payment step. A missing amount uses the configured
    /// default.
    pub fn start_payment(&self, id: &Id, amount: Option<u64>) -> Result<PaymentSession> {
        let deal = self.marketplace.catalog().resolve_deal(id)?;
        let amount = amount.unwrap_or(self.settings.default_amount);
        let session = PaymentSession::new(
            deal,
            amount,
            Arc::clone(&self.navigator),
            Arc::clone(&self.scheduler),
            StepDelays::from(&self.settings),
        )?;
        self.navigator.navigate(Route::Payment {
            id: id.clone(),
            amount: Some(amount),
        });
        Ok(session)
    }
}
