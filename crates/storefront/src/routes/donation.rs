//! Tree donation form handler.
//!
//! Donations are simulated. A valid request is acknowledged and the form is
//! reset; an invalid one is answered with `422` and the submitted values.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use green_earth_core::Donation;
use serde::Deserialize;
use tracing::instrument;

use super::NoticeView;
use crate::error::add_breadcrumb;

/// Notice shown when the donation form is rejected.
pub const INVALID_DONATION_NOTICE: &str = "Please fill valid details.";

/// Donation form field values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DonationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_count")]
    pub count: String,
}

fn default_count() -> String {
    "1".to_string()
}

impl Default for DonationForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            count: default_count(),
        }
    }
}

/// Donation form fragment with an out-of-band notice.
#[derive(Template, WebTemplate)]
#[template(path = "fragments/donation.html")]
pub struct DonationFragmentTemplate {
    pub donation: DonationForm,
    pub notice: Option<NoticeView>,
}

/// Validate a donation request (HTMX).
#[instrument(skip(form), fields(count = %form.count))]
pub async fn donate(Form(form): Form<DonationForm>) -> Response {
    match Donation::validate(&form.name, &form.email, &form.count) {
        Ok(donation) => {
            tracing::info!(count = %donation.count, "Donation request received");
            add_breadcrumb("donation", "Donation request received", None);
            DonationFragmentTemplate {
                donation: DonationForm::default(),
                notice: Some(NoticeView::success(donation.confirmation_message())),
            }
            .into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected donation request");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                DonationFragmentTemplate {
                    donation: form,
                    notice: Some(NoticeView::error(INVALID_DONATION_NOTICE)),
                },
            )
                .into_response()
        }
    }
}
