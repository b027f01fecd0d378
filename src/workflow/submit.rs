use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::form::{FormController, request_from};

const DEFAULT_SUCCESS_MESSAGE: &str = "Ticket submitted";

#[derive(Debug)]
pub enum SubmissionOutcome {
    Accepted {
        message: String,
    },
    Rejected {
        error: AppError,
        /// Values the reset wiped from the form, if it was reset.
        discarded: Option<BTreeMap<String, String>>,
    },
    /// A previous submission is still pending; nothing was sent.
    Blocked,
}

/// Sends the form as one create-ticket request, then notifies and resets.
///
/// A rejection is shown as an error toast only when the server supplied a
/// message. With `reset_on_error` set (the default) the form is cleared on
/// failure as well, and the wiped values are handed back to the caller.
pub async fn submit_ticket(
    ctx: &AppContext,
    form: &mut FormController,
) -> AppResult<SubmissionOutcome> {
    if !form.can_submit() {
        debug!(form = form.kind().as_str(), "submission already pending");
        return Ok(SubmissionOutcome::Blocked);
    }

    let token = ctx.session.bearer()?;
    let request = request_from(form);
    debug!(endpoint = request.endpoint(), payload = %request.to_json(), "submitting ticket");

    let result = {
        let _pending = PendingGuard::hold(form);
        ctx.api.create_ticket(token, &request).await
    };

    match result {
        Ok(ack) => {
            let message = ack.message_or(DEFAULT_SUCCESS_MESSAGE).to_string();
            info!(endpoint = request.endpoint(), title = request.title(), "ticket accepted");
            ctx.notifier.success(&message);
            form.reset();
            Ok(SubmissionOutcome::Accepted { message })
        }
        Err(error) => {
            match error.server_message() {
                Some(message) => ctx.notifier.error(message),
                None => warn!(
                    endpoint = request.endpoint(),
                    %error,
                    "ticket submission failed without a server message"
                ),
            }

            let discarded = if ctx.config.reset_on_error {
                let values = form.values();
                form.reset();
                Some(values)
            } else {
                None
            };
            Ok(SubmissionOutcome::Rejected { error, discarded })
        }
    }
}

/// Keeps the form pending while a request is in flight. Dropping the guard
/// clears the flag, also when the submission future itself is dropped.
struct PendingGuard<'a> {
    form: &'a mut FormController,
}

impl<'a> PendingGuard<'a> {
    fn hold(form: &'a mut FormController) -> Self {
        form.set_pending(true);
        Self { form }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.form.set_pending(false);
    }
}
