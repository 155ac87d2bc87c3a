//! The timed agreement and payment steps.
//!
//! Both steps follow the same shape: the form is validated synchronously,
//! then a chain of scheduled tasks moves the step through its states and
//! finally navigates onward. Every scheduled task is tracked so that
//! closing or dropping the session stops the chain where it stands.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;

use super::{FlowError, Navigator, Route};
use crate::agreement::{AgreementTerms, Repayment, TermOption, parse_amount};
use crate::catalog::Deal;
use crate::payment::{CardDetails, PaymentError};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::{Id, Result};

/// Progress of the agreement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementState {
    Editing,
    Submitting,
    /// Acknowledged; the redirect to payment is pending.
    Succeeded,
    /// Moved on to the payment step.
    Redirected,
}

/// Progress of the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Editing,
    Processing,
    /// Confirmation showing; the return to the catalog is pending.
    Succeeded,
    /// Returned to the catalog.
    Completed,
}

#[derive(Debug)]
struct StepInner<S> {
    state: S,
    pending: Vec<TaskHandle>,
    closed: bool,
}

/// State shared between a session and its scheduled tasks.
#[derive(Debug)]
struct Step<S> {
    name: &'static str,
    inner: Arc<Mutex<StepInner<S>>>,
}

impl<S: Copy + Send + 'static> Step<S> {
    fn new(name: &'static str, initial: S) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(StepInner {
                state: initial,
                pending: Vec::new(),
                closed: false,
            })),
        }
    }

    fn state(&self) -> S {
        self.lock().state
    }

    fn lock(&self) -> MutexGuard<'_, StepInner<S>> {
        lock(&self.inner)
    }

    /// Schedule `then` after `delay`, tracked for cancellation.
    ///
    /// The task is skipped if the step was closed in the meantime.
    fn after(
        &self,
        scheduler: &Arc<dyn Scheduler>,
        delay: Duration,
        then: impl FnOnce(&mut StepInner<S>) + Send + 'static,
    ) {
        let inner = Arc::clone(&self.inner);
        let handle = scheduler.schedule(
            delay,
            Box::new(move || {
                let mut step = lock(&inner);
                if !step.closed {
                    then(&mut *step);
                }
            }),
        );
        let mut step = self.lock();
        step.pending.retain(TaskHandle::is_pending);
        step.pending.push(handle);
    }

    fn close(&self) {
        let mut step = self.lock();
        if step.closed {
            return;
        }
        for handle in step.pending.drain(..) {
            handle.cancel();
        }
        step.closed = true;
        tracing::debug!(step = self.name, "Step closed");
    }
}

fn lock<S>(inner: &Mutex<StepInner<S>>) -> MutexGuard<'_, StepInner<S>> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Timings for the two steps.
#[derive(Debug, Clone, Copy)]
pub struct StepDelays {
    pub agreement_ack: Duration,
    pub agreement_redirect: Duration,
    pub payment_processing: Duration,
    pub payment_dwell: Duration,
}

impl From<&crate::Settings> for StepDelays {
    fn from(settings: &crate::Settings) -> Self {
        Self {
            agreement_ack: settings.agreement_ack_delay(),
            agreement_redirect: settings.agreement_redirect_delay(),
            payment_processing: settings.payment_processing_delay(),
            payment_dwell: settings.payment_dwell(),
        }
    }
}

/// The "Create Agreement" step for one deal.
#[derive(Debug)]
pub struct AgreementSession {
    id: Id,
    deal: Deal,
    navigator: Arc<Navigator>,
    scheduler: Arc<dyn Scheduler>,
    delays: StepDelays,
    step: Step<AgreementState>,
}

impl AgreementSession {
    pub(crate) fn new(
        id: Id,
        deal: Deal,
        navigator: Arc<Navigator>,
        scheduler: Arc<dyn Scheduler>,
        delays: StepDelays,
    ) -> Self {
        Self {
            id,
            deal,
            navigator,
            scheduler,
            delays,
            step: Step::new("agreement", AgreementState::Editing),
        }
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn state(&self) -> AgreementState {
        self.step.state()
    }

    /// Live repayment figures for the form as currently filled in.
    pub fn preview(
        &self,
        amount: &str,
        term: TermOption,
        rate_percent: f64,
        equity_percent: f64,
    ) -> Result<Repayment> {
        let principal = parse_amount(amount)?;
        Ok(self
            .terms(principal, term, rate_percent, equity_percent)?
            .repayment()?)
    }

    /// Submit the form.
    ///
    /// Invalid input is rejected and the step stays in `Editing`. Valid
    /// terms move it to `Submitting`; the acknowledgement and the redirect
    /// to `/payment/{id}?amount=N` follow on their timers.
    pub fn submit(
        &self,
        amount: &str,
        term: TermOption,
        rate_percent: f64,
        equity_percent: f64,
    ) -> Result<AgreementTerms> {
        let mut step = self.step.lock();
        if step.closed {
            return Err(FlowError::Closed { step: "agreement" }.into());
        }
        if step.state != AgreementState::Editing {
            return Err(FlowError::AlreadySubmitted { step: "agreement" }.into());
        }
        let principal = parse_amount(amount)?;
        let terms = self.terms(principal, term, rate_percent, equity_percent)?;
        terms.repayment()?;
        step.state = AgreementState::Submitting;
        drop(step);
        tracing::info!(
            deal = %self.deal.startup.id,
            amount = terms.principal,
            months = terms.term_months,
            rate = terms.rate_percent,
            equity = terms.equity_percent,
            "Agreement submitted"
        );

        let scheduler = Arc::clone(&self.scheduler);
        let inner = Arc::clone(&self.step.inner);
        let navigator = Arc::clone(&self.navigator);
        let redirect_delay = self.delays.agreement_redirect;
        let next = Route::Payment {
            id: self.id.clone(),
            amount: Some(principal),
        };

        self.step
            .after(&self.scheduler, self.delays.agreement_ack, move |step| {
                step.state = AgreementState::Succeeded;
                tracing::debug!("Agreement acknowledged");
                let handle = scheduler.schedule(
                    redirect_delay,
                    Box::new(move || {
                        let mut step = lock(&inner);
                        if step.closed {
                            return;
                        }
                        step.state = AgreementState::Redirected;
                        drop(step);
                        navigator.navigate(next);
                    }),
                );
                step.pending.retain(TaskHandle::is_pending);
                step.pending.push(handle);
            });
        Ok(terms)
    }

    /// Leave the step, cancelling any pending acknowledgement or redirect.
    pub fn close(&self) {
        self.step.close();
    }

    fn terms(
        &self,
        principal: u64,
        term: TermOption,
        rate_percent: f64,
        equity_percent: f64,
    ) -> Result<AgreementTerms> {
        Ok(AgreementTerms::new(
            principal as f64,
            term.months(),
            rate_percent,
            equity_percent,
        )?)
    }
}

impl Drop for AgreementSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// The payment step for one deal.
#[derive(Debug)]
pub struct PaymentSession {
    deal: Deal,
    amount: u64,
    navigator: Arc<Navigator>,
    scheduler: Arc<dyn Scheduler>,
    delays: StepDelays,
    step: Step<PaymentState>,
}

impl PaymentSession {
    pub(crate) fn new(
        deal: Deal,
        amount: u64,
        navigator: Arc<Navigator>,
        scheduler: Arc<dyn Scheduler>,
        delays: StepDelays,
    ) -> Result<Self> {
        if amount == 0 {
            return Err(PaymentError::InvalidAmount.into());
        }
        Ok(Self {
            deal,
            amount,
            navigator,
            scheduler,
            delays,
            step: Step::new("payment", PaymentState::Editing),
        })
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn state(&self) -> PaymentState {
        self.step.state()
    }

    /// Submit card details.
    ///
    /// Invalid cards are rejected with every failing field and the step
    /// stays in `Editing`. Otherwise processing is simulated, the
    /// confirmation is held for the dwell time, and the flow returns to
    /// the catalog.
    pub fn submit(&self, card: &CardDetails) -> Result<()> {
        let mut step = self.step.lock();
        if step.closed {
            return Err(FlowError::Closed { step: "payment" }.into());
        }
        if step.state != PaymentState::Editing {
            return Err(FlowError::AlreadySubmitted { step: "payment" }.into());
        }
        card.validate()?;
        step.state = PaymentState::Processing;
        drop(step);
        tracing::info!(deal = %self.deal.startup.id, amount = self.amount, "Payment processing");

        let scheduler = Arc::clone(&self.scheduler);
        let inner = Arc::clone(&self.step.inner);
        let navigator = Arc::clone(&self.navigator);
        let dwell = self.delays.payment_dwell;
        let deal = self.deal.startup.id.clone();
        let amount = self.amount;
        let card_tail = card.last_four();

        self.step
            .after(&self.scheduler, self.delays.payment_processing, move |step| {
                step.state = PaymentState::Succeeded;
                tracing::info!(%deal, amount, card = %card_tail, "Payment completed");
                let handle = scheduler.schedule(
                    dwell,
                    Box::new(move || {
                        let mut step = lock(&inner);
                        if step.closed {
                            return;
                        }
                        step.state = PaymentState::Completed;
                        drop(step);
                        navigator.navigate(Route::Catalog);
                    }),
                );
                step.pending.retain(TaskHandle::is_pending);
                step.pending.push(handle);
            });
        Ok(())
    }

    /// Leave the step, cancelling any pending processing or redirect.
    pub fn close(&self) {
        self.step.close();
    }
}

impl Drop for PaymentSession {
    fn drop(&mut self) {
        self.close();
    }
}
