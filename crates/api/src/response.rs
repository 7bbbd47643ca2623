//! Shared response envelope and view types.
//!
//! List, detail, and index responses use a `{ "data": ... }` envelope.
//! Form, delete-confirmation, and password views are the JSON data
//! contracts the (external) presentation layer consumes; they carry what
//! the corresponding page template would be rendered with.

use serde::Serialize;

use dorsal_core::forms::FieldError;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A create/update form view: the echoed (sanitized) record, the choice
/// lists needed to repopulate selects, and the field errors, in order.
///
/// Served with 200 on form GET and 400 on a failed submission.
#[derive(Debug, Serialize)]
pub struct FormView<R: Serialize, C: Serialize> {
    pub record: Option<R>,
    #[serde(flatten)]
    pub choices: C,
    pub errors: Vec<FieldError>,
}

/// Confirmation view for the two-step delete protocol: the target entity
/// and the child entities currently blocking its deletion.
///
/// Served with 200 on confirm GET and 409 on a refused execute POST.
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation<E: Serialize, D: Serialize> {
    pub entity: E,
    pub dependents: Vec<D>,
}

/// The password confirmation view.
#[derive(Debug, Serialize)]
pub struct PasswordView {
    pub return_to: String,
    pub error: Option<String>,
}
